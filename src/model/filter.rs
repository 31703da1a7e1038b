//! Card filters backing the displayed card list

use super::card::Card;

/// Predicate selecting which cards of a folder are displayed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CardFilter {
    /// Every card, in folder order
    #[default]
    All,
    /// Cards whose question contains any of the keywords as a whole word
    QuestionKeywords(Vec<String>),
}

impl CardFilter {
    /// Build a keyword filter, ignoring blank keywords
    pub fn keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        if keywords.is_empty() { CardFilter::All } else { CardFilter::QuestionKeywords(keywords) }
    }

    /// Whether a card passes the filter
    pub fn matches(&self, card: &Card) -> bool {
        match self {
            CardFilter::All => true,
            CardFilter::QuestionKeywords(keywords) => card
                .question()
                .split_whitespace()
                .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
                .any(|word| keywords.contains(&word)),
        }
    }

    /// The filtered view over a folder's cards
    pub fn apply<'a>(&self, cards: &'a [Card]) -> Vec<&'a Card> {
        cards.iter().filter(|card| self.matches(card)).collect()
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, CardFilter::All)
    }

    /// Short description for the status line
    pub fn describe(&self) -> String {
        match self {
            CardFilter::All => "all cards".to_string(),
            CardFilter::QuestionKeywords(keywords) => format!("matching: {}", keywords.join(" ")),
        }
    }
}
