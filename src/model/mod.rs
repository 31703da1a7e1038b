//! Flashcard data model
//!
//! Cards, folders and the filters that produce the displayed card list.

pub mod card;
pub mod filter;
pub mod folder;

pub use card::{Card, CardEdit};
pub use filter::CardFilter;
pub use folder::Folder;
