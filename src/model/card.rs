//! Flashcard value type

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyError};

/// A single flashcard
///
/// Cards are values: they are built once, compared field by field, and
/// replaced wholesale when edited. Deserialization runs the same validation
/// as the constructors, so a card read from disk is as trustworthy as one
/// typed in by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCard")]
pub struct Card {
    question: String,
    answer: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    choices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_score: Option<f64>,
}

/// Unvalidated card shape as it appears on disk
#[derive(Deserialize)]
struct RawCard {
    question: String,
    answer: String,
    #[serde(default)]
    choices: Vec<String>,
    #[serde(default)]
    last_score: Option<f64>,
}

impl TryFrom<RawCard> for Card {
    type Error = StudyError;

    fn try_from(raw: RawCard) -> Result<Self> {
        let card = if raw.choices.is_empty() {
            Card::new(raw.question, raw.answer)?
        } else {
            Card::multiple_choice(raw.question, raw.answer, raw.choices)?
        };
        Ok(match raw.last_score {
            Some(score) => card.with_last_score(score),
            None => card,
        })
    }
}

impl Card {
    /// Create a question/answer card
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Result<Self> {
        let question = question.into().trim().to_string();
        let answer = answer.into().trim().to_string();

        if question.is_empty() {
            return Err(StudyError::InvalidCard("question cannot be empty".into()));
        }
        if answer.is_empty() {
            return Err(StudyError::InvalidCard("answer cannot be empty".into()));
        }

        Ok(Self { question, answer, choices: Vec::new(), last_score: None })
    }

    /// Create a multiple-choice card; the answer must be one of the choices
    pub fn multiple_choice(
        question: impl Into<String>,
        answer: impl Into<String>,
        choices: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let mut card = Self::new(question, answer)?;
        let choices: Vec<String> =
            choices.into_iter().map(|c| c.into().trim().to_string()).collect();

        if choices.len() < 2 {
            return Err(StudyError::InvalidCard(
                "a multiple-choice card needs at least two choices".into(),
            ));
        }
        if choices.iter().any(String::is_empty) {
            return Err(StudyError::InvalidCard("choices cannot be empty".into()));
        }
        for (i, choice) in choices.iter().enumerate() {
            if choices[..i].iter().any(|earlier| normalize(earlier) == normalize(choice)) {
                return Err(StudyError::InvalidCard(format!("duplicate choice '{}'", choice)));
            }
        }
        if !choices.iter().any(|c| normalize(c) == normalize(&card.answer)) {
            return Err(StudyError::InvalidCard("the answer must be one of the choices".into()));
        }

        card.choices = choices;
        Ok(card)
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn is_multiple_choice(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Score from the most recent test session (1.0 correct, 0.0 wrong)
    pub fn last_score(&self) -> Option<f64> {
        self.last_score
    }

    /// Equal apart from the score
    pub fn same_content(&self, other: &Card) -> bool {
        self.question == other.question
            && self.answer == other.answer
            && self.choices == other.choices
    }

    /// Copy of this card carrying a new score
    pub fn with_last_score(&self, score: f64) -> Self {
        Self { last_score: Some(score.clamp(0.0, 1.0)), ..self.clone() }
    }

    /// Resolve what the user actually picked
    ///
    /// On a multiple-choice card a 1-based number selects that choice;
    /// anything else is taken as literal text.
    pub fn resolve_candidate<'a>(&'a self, candidate: &'a str) -> &'a str {
        if self.is_multiple_choice() {
            if let Ok(n) = candidate.trim().parse::<usize>() {
                if let Some(choice) = n.checked_sub(1).and_then(|i| self.choices.get(i)) {
                    return choice;
                }
            }
        }
        candidate
    }

    /// Check a candidate answer, ignoring case and surrounding whitespace
    pub fn check_answer(&self, candidate: &str) -> bool {
        normalize(self.resolve_candidate(candidate)) == normalize(&self.answer)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Question: {} Answer: {}", self.question, self.answer)?;
        if self.is_multiple_choice() {
            write!(f, " Choices: {}", self.choices.join(", "))?;
        }
        Ok(())
    }
}

/// Partial replacement for a card; unset fields keep the old value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardEdit {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub choices: Option<Vec<String>>,
}

impl CardEdit {
    /// Whether the edit changes anything at all
    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.answer.is_none() && self.choices.is_none()
    }

    /// Build the replacement card
    ///
    /// The previous score is dropped since it was earned on different content.
    pub fn apply(&self, card: &Card) -> Result<Card> {
        if self.is_empty() {
            return Err(StudyError::InvalidCard("at least one field must be edited".into()));
        }

        let question = self.question.clone().unwrap_or_else(|| card.question.clone());
        let answer = self.answer.clone().unwrap_or_else(|| card.answer.clone());
        let choices = self.choices.clone().unwrap_or_else(|| card.choices.clone());

        if choices.is_empty() {
            Card::new(question, answer)
        } else {
            Card::multiple_choice(question, answer, choices)
        }
    }
}

/// Collapse whitespace and lowercase for answer comparison
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_card_trims_fields() {
        let card = Card::new("  France?  ", " Paris ").unwrap();
        assert_eq!(card.question(), "France?");
        assert_eq!(card.answer(), "Paris");
        assert!(!card.is_multiple_choice());
    }

    #[test]
    fn empty_question_is_rejected() {
        assert!(matches!(Card::new("   ", "x"), Err(StudyError::InvalidCard(_))));
        assert!(matches!(Card::new("q", ""), Err(StudyError::InvalidCard(_))));
    }

    #[test]
    fn answer_check_ignores_case_and_spacing() {
        let card = Card::new("Capital of the UK?", "New  London").unwrap();
        assert!(card.check_answer("  new london "));
        assert!(card.check_answer("NEW LONDON"));
        assert!(!card.check_answer("London"));
    }

    #[test]
    fn multiple_choice_requires_answer_among_choices() {
        let err = Card::multiple_choice("2+2?", "5", ["3", "4"]).unwrap_err();
        assert!(matches!(err, StudyError::InvalidCard(_)));

        let err = Card::multiple_choice("2+2?", "4", ["4"]).unwrap_err();
        assert!(matches!(err, StudyError::InvalidCard(_)));

        let err = Card::multiple_choice("2+2?", "4", ["4", " 4 "]).unwrap_err();
        assert!(matches!(err, StudyError::InvalidCard(_)));
    }

    #[test]
    fn multiple_choice_accepts_choice_number_or_text() {
        let card = Card::multiple_choice("2+2?", "4", ["3", "4", "5"]).unwrap();
        assert!(card.check_answer("2"));
        assert!(card.check_answer("4"));
        assert!(!card.check_answer("1"));
        assert!(!card.check_answer("five"));
    }

    #[test]
    fn out_of_range_choice_number_is_literal_text() {
        let card = Card::multiple_choice("Year?", "1999", ["1998", "1999"]).unwrap();
        assert_eq!(card.resolve_candidate("1999"), "1999");
        assert!(card.check_answer("1999"));
        assert_eq!(card.resolve_candidate("1"), "1998");
    }

    #[test]
    fn with_last_score_returns_new_value() {
        let card = Card::new("q", "a").unwrap();
        let scored = card.with_last_score(1.0);
        assert_eq!(card.last_score(), None);
        assert_eq!(scored.last_score(), Some(1.0));
        assert_ne!(card, scored);
    }

    #[test]
    fn edit_replaces_only_given_fields() {
        let card = Card::new("q", "a").unwrap().with_last_score(0.0);
        let edit = CardEdit { answer: Some("b".into()), ..Default::default() };
        let edited = edit.apply(&card).unwrap();
        assert_eq!(edited.question(), "q");
        assert_eq!(edited.answer(), "b");
        assert_eq!(edited.last_score(), None);
    }

    #[test]
    fn empty_edit_is_rejected() {
        let card = Card::new("q", "a").unwrap();
        assert!(CardEdit::default().apply(&card).is_err());
    }

    #[test]
    fn card_deserialization_validates() {
        let ok: Card = serde_json::from_str(r#"{"question":"q","answer":"a"}"#).unwrap();
        assert_eq!(ok.answer(), "a");

        let bad = serde_json::from_str::<Card>(r#"{"question":"","answer":"a"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn card_serializes_without_empty_optionals() {
        let card = Card::new("q", "a").unwrap();
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, r#"{"question":"q","answer":"a"}"#);
    }
}
