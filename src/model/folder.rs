//! Card folders

use super::card::Card;
use crate::error::{Result, StudyError};

/// A named, ordered collection of cards
///
/// Insertion order is display order. The folder owns its cards exclusively;
/// callers only ever see shared references.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    name: String,
    cards: Vec<Card>,
}

impl Folder {
    /// Create an empty folder
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = validate_folder_name(name.into())?;
        Ok(Self { name, cards: Vec::new() })
    }

    /// Create a folder with initial cards
    pub fn with_cards(name: impl Into<String>, cards: Vec<Card>) -> Result<Self> {
        let mut folder = Self::new(name)?;
        for card in cards {
            folder.add_card(card)?;
        }
        Ok(folder)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Change the folder name
    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = validate_folder_name(name.into())?;
        Ok(())
    }

    /// Whether a card with the same question, answer and choices is present
    ///
    /// The last score is ignored.
    pub fn contains_content(&self, card: &Card) -> bool {
        self.cards.iter().any(|c| c.same_content(card))
    }

    /// Append a card; a folder never holds two cards with the same content
    pub fn add_card(&mut self, card: Card) -> Result<()> {
        if self.contains_content(&card) {
            return Err(duplicate_card());
        }
        self.cards.push(card);
        Ok(())
    }

    /// Remove a card by value, returning its former position
    pub fn remove_card(&mut self, card: &Card) -> Result<usize> {
        let position = self.position_of(card)?;
        self.cards.remove(position);
        Ok(position)
    }

    /// Replace a card by value, keeping its position
    pub fn replace_card(&mut self, old: &Card, new: Card) -> Result<()> {
        let position = self.position_of(old)?;
        let clashes = self
            .cards
            .iter()
            .enumerate()
            .any(|(i, c)| i != position && c.same_content(&new));
        if clashes {
            return Err(duplicate_card());
        }
        self.cards[position] = new;
        Ok(())
    }

    fn position_of(&self, card: &Card) -> Result<usize> {
        self.cards.iter().position(|c| c == card).ok_or(StudyError::CardNotFound)
    }
}

fn duplicate_card() -> StudyError {
    StudyError::InvalidCard("this card already exists in the folder".into())
}

/// Check that a folder name can double as a file name
pub fn validate_folder_name(name: String) -> Result<String> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.starts_with('.')
        || trimmed.chars().any(|c| matches!(c, '/' | '\\' | '\0') || c.is_control());

    if invalid {
        return Err(StudyError::InvalidFolderName(name));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(q: &str, a: &str) -> Card {
        Card::new(q, a).unwrap()
    }

    #[test]
    fn folder_names_are_trimmed() {
        let folder = Folder::new("  Capitals ").unwrap();
        assert_eq!(folder.name(), "Capitals");
    }

    #[test]
    fn path_like_names_are_rejected() {
        for name in ["", "  ", ".", "..", "a/b", "a\\b", ".hidden"] {
            assert!(
                matches!(Folder::new(name), Err(StudyError::InvalidFolderName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn duplicate_cards_are_rejected() {
        let mut folder = Folder::new("f").unwrap();
        folder.add_card(card("q", "a")).unwrap();
        assert!(folder.add_card(card("q", "a")).is_err());
        assert_eq!(folder.len(), 1);
    }

    #[test]
    fn scored_card_still_counts_as_duplicate() {
        let mut folder = Folder::new("f").unwrap();
        folder.add_card(card("France?", "Paris").with_last_score(1.0)).unwrap();

        let err = folder.add_card(card("France?", "Paris")).unwrap_err();
        assert!(matches!(err, StudyError::InvalidCard(_)));
        assert_eq!(folder.len(), 1);
    }

    #[test]
    fn replace_cannot_copy_another_cards_content() {
        let scored = card("q1", "a1").with_last_score(0.0);
        let mut folder = Folder::with_cards("f", vec![scored, card("q2", "a2")]).unwrap();

        let err = folder.replace_card(&card("q2", "a2"), card("q1", "a1")).unwrap_err();
        assert!(matches!(err, StudyError::InvalidCard(_)));
        assert_eq!(folder.cards()[1].question(), "q2");
    }

    #[test]
    fn replace_card_with_rescored_self_is_allowed() {
        let mut folder = Folder::with_cards("f", vec![card("q1", "a1")]).unwrap();
        folder.replace_card(&card("q1", "a1"), card("q1", "a1").with_last_score(1.0)).unwrap();
        assert_eq!(folder.cards()[0].last_score(), Some(1.0));
    }

    #[test]
    fn remove_card_by_value() {
        let mut folder =
            Folder::with_cards("f", vec![card("q1", "a1"), card("q2", "a2")]).unwrap();
        assert_eq!(folder.remove_card(&card("q2", "a2")).unwrap(), 1);
        assert!(matches!(folder.remove_card(&card("q2", "a2")), Err(StudyError::CardNotFound)));
        assert_eq!(folder.len(), 1);
    }

    #[test]
    fn replace_card_keeps_position() {
        let mut folder =
            Folder::with_cards("f", vec![card("q1", "a1"), card("q2", "a2")]).unwrap();
        folder.replace_card(&card("q1", "a1"), card("q1", "changed")).unwrap();
        assert_eq!(folder.cards()[0].answer(), "changed");
        assert_eq!(folder.cards()[1].question(), "q2");
    }

    #[test]
    fn replace_missing_card_fails() {
        let mut folder = Folder::with_cards("f", vec![card("q1", "a1")]).unwrap();
        let result = folder.replace_card(&card("nope", "x"), card("q", "a"));
        assert!(matches!(result, Err(StudyError::CardNotFound)));
    }
}
