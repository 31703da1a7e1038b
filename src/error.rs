//! Error types for the study core

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Navigation mode an operation requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredMode {
    Home,
    InFolder,
    InTestSession,
    InReport,
}

impl fmt::Display for RequiredMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RequiredMode::Home => "must be at the home directory",
            RequiredMode::InFolder => "must be inside a folder",
            RequiredMode::InTestSession => "must be in a test session",
            RequiredMode::InReport => "must be viewing a report",
        };
        f.write_str(text)
    }
}

/// What an out-of-range index was pointing into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Folder,
    Card,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Folder => f.write_str("folder"),
            IndexKind::Card => f.write_str("card"),
        }
    }
}

/// Errors raised by navigation, folder edits, test sessions and storage
#[derive(Debug, Error)]
pub enum StudyError {
    /// Operation is not legal in the current navigation mode
    #[error("Invalid command: {required}")]
    InvalidState {
        /// The mode the operation needs
        required: RequiredMode,
    },

    /// Index beyond the folder list or the filtered card view
    #[error("The {kind} index provided is invalid (got {}, {len} displayed)", .index + 1)]
    IndexOutOfRange {
        /// Folder list or card view
        kind: IndexKind,
        /// Zero-based index that was requested
        index: usize,
        /// Length of the list at the time of the request
        len: usize,
    },

    /// Value-based card lookup found nothing
    #[error("The card is no longer in this folder")]
    CardNotFound,

    /// Current card has already been answered
    #[error("This card has already been answered. Use next to continue")]
    AlreadyAnswered,

    /// Current card has not been answered yet
    #[error("Answer the current card before moving to the next one")]
    NotYetAnswered,

    /// Session would contain no cards
    #[error("Cannot start a test session: there are no cards to test")]
    EmptySession,

    /// No test session is running
    #[error("No test session is active")]
    NoActiveSession,

    /// Folder name is already taken
    #[error("A folder named '{0}' already exists")]
    DuplicateFolder(String),

    /// Folder name cannot be used as a storage unit
    #[error("'{0}' is not a valid folder name")]
    InvalidFolderName(String),

    /// Card payload failed validation
    #[error("Invalid card: {0}")]
    InvalidCard(String),

    /// Stored data is not in the expected format
    #[error("Data in {path:?} is not in the expected format: {source}")]
    DataConversion {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Save target exists but is not a folder file
    #[error("Refusing to overwrite {0:?}: it is not a folder file")]
    ForeignFile(PathBuf),

    /// Filesystem failure
    #[error("Could not access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StudyError {
    /// Shorthand for a guard failure
    pub fn invalid_state(required: RequiredMode) -> Self {
        StudyError::InvalidState { required }
    }

    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StudyError::Io { path: path.into(), source }
    }

    /// Check if this error came from the persistence layer
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            StudyError::DataConversion { .. } | StudyError::Io { .. } | StudyError::ForeignFile(_)
        )
    }

    /// Check if this error is a usage mistake the user can correct by retyping
    pub fn is_usage_error(&self) -> bool {
        !self.is_storage_failure()
    }
}

pub type Result<T> = std::result::Result<T, StudyError>;
