//! Knowitall - a terminal flashcard trainer
//!
//! Cards are question/answer pairs grouped into folders. Folders are browsed,
//! filtered by keyword and studied in test sessions that record a score for
//! every card, all driven by a small command language.

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod nav;
pub mod session;
pub mod storage;
pub mod store;
pub mod theme;
pub mod ui;

pub use app::App;
pub use command::{Command, CommandHistory, CommandResult, ResultKind};
pub use config::Config;
pub use error::{Result, StudyError};
pub use model::{Card, CardFilter, Folder};
pub use nav::{NavigationState, Navigator};
pub use storage::StorageManager;
pub use store::FolderStore;
pub use theme::Theme;
