//! What a command tells the presentation layer to refresh

use crate::model::Card;

/// Kind of view change a command caused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultKind {
    /// Show the help overlay
    ShowHelp,
    /// Quit the application
    Exit,
    /// A folder was opened
    EnteredFolder,
    /// Back at the folder list
    ExitedFolder,
    /// Folder list or card list changed
    EditedFolder,
    /// A test session began
    StartTestSession,
    /// A test session ended and its report is showing
    EndTestSession,
    AnswerCorrect,
    AnswerWrong,
    AnswerReveal,
    /// A report came into view
    EnteredReport,
    /// The report was closed
    ExitedReport,
    /// The session moved on to another card
    ShowNextCard,
    /// Nothing beyond the message
    #[default]
    None,
}

/// Outcome of a successfully executed command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub message: String,
    pub kind: ResultKind,
    /// Card the test panel should display, if the command produced one
    pub test_session_card: Option<Card>,
}

impl CommandResult {
    pub fn new(message: impl Into<String>, kind: ResultKind) -> Self {
        Self { message: message.into(), kind, test_session_card: None }
    }

    /// Plain feedback with no view change
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(message, ResultKind::None)
    }

    pub fn with_card(mut self, card: Card) -> Self {
        self.test_session_card = Some(card);
        self
    }
}
