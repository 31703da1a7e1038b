//! Application state definitions

use crate::command::{CommandHistory, CommandResult, ResultKind};
use crate::model::Card;

/// Selection in whatever list is showing
#[derive(Debug, Clone, Copy, Default)]
pub struct ListSelection {
    /// Selected row
    pub selected: usize,
    /// First visible row
    pub scroll_offset: usize,
    /// Rows that fit on screen (updated on render)
    pub visible_height: usize,
}

impl ListSelection {
    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
        self.ensure_selection_visible();
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.ensure_selection_visible();
    }

    pub fn top(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn bottom(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
        self.ensure_selection_visible();
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
        self.ensure_selection_visible();
    }

    /// Ensure the selected item is visible by adjusting scroll offset
    pub fn ensure_selection_visible(&mut self) {
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        }
        let visible = self.visible_height.saturating_sub(2);
        if visible > 0 && self.selected >= self.scroll_offset + visible {
            self.scroll_offset = self.selected.saturating_sub(visible) + 1;
        }
    }
}

/// Command line mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandMode {
    /// Normal mode - command line hidden or showing status
    #[default]
    Normal,
    /// Command mode - accepting : commands
    Command,
    /// Search mode - accepting / search queries
    Search,
}

/// State for the command line input
#[derive(Debug, Clone, Default)]
pub struct CommandLineState {
    /// Current mode
    pub mode: CommandMode,
    /// Input buffer
    pub input: String,
    /// Cursor position in input
    pub cursor: usize,
    /// Status/error message to display (when not in input mode)
    pub message: Option<String>,
    /// Whether message is an error
    pub is_error: bool,
    /// Entered command lines
    pub history: CommandHistory,
    /// How far back the user has scrolled through the history
    pub history_index: Option<usize>,
}

impl CommandLineState {
    pub fn with_history_limit(limit: usize) -> Self {
        Self { history: CommandHistory::with_limit(limit), ..Default::default() }
    }

    /// Start command mode
    pub fn enter_command_mode(&mut self) {
        self.enter_mode(CommandMode::Command);
    }

    /// Start search mode
    pub fn enter_search_mode(&mut self) {
        self.enter_mode(CommandMode::Search);
    }

    fn enter_mode(&mut self, mode: CommandMode) {
        self.mode = mode;
        self.input.clear();
        self.cursor = 0;
        self.message = None;
        self.history_index = None;
    }

    /// Exit input mode
    pub fn exit_input_mode(&mut self) {
        self.mode = CommandMode::Normal;
        self.input.clear();
        self.cursor = 0;
    }

    /// Set a status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    /// Set an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    /// Convert character index to byte index
    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.input.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(self.input.len())
    }

    /// Get the number of characters in input
    fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at cursor (cursor is character index)
    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.char_to_byte_index(self.cursor);
        self.input.insert(byte_idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.input.remove(byte_idx);
        }
    }

    /// Move cursor left
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Check if we're in input mode
    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, CommandMode::Command | CommandMode::Search)
    }

    /// Take the typed line, leaving input mode
    pub fn submit(&mut self) -> (CommandMode, String) {
        let mode = self.mode;
        let line = std::mem::take(&mut self.input);
        self.exit_input_mode();
        (mode, line)
    }

    /// Navigate history up
    pub fn history_up(&mut self) {
        let back = self.history_index.map_or(0, |i| i + 1);
        if let Some(line) = self.history.recent(back) {
            self.input = line.to_string();
            self.cursor = self.char_count();
            self.history_index = Some(back);
        }
    }

    /// Navigate history down
    pub fn history_down(&mut self) {
        match self.history_index {
            Some(0) | None => {
                self.history_index = None;
                self.input.clear();
                self.cursor = 0;
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                self.input = self.history.recent(i - 1).unwrap_or_default().to_string();
                self.cursor = self.char_count();
            }
        }
    }
}

/// Feedback shown under the current test card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub kind: ResultKind,
    pub message: String,
}

/// Full application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Selection in the folder or card list
    pub selection: ListSelection,

    /// Help overlay visible
    pub show_help: bool,

    /// Multi-line command output shown in an overlay
    pub output: Option<String>,

    /// Card shown by the test panel
    pub test_card: Option<Card>,

    /// Result of the last answer or reveal
    pub feedback: Option<AnswerFeedback>,

    /// Command line state
    pub command_line: CommandLineState,

    /// Exit requested
    pub should_quit: bool,
}

impl AppState {
    /// Refresh view state from a command result
    pub fn apply_result(&mut self, result: &CommandResult) {
        match result.kind {
            ResultKind::ShowHelp => self.show_help = true,
            ResultKind::Exit => self.should_quit = true,
            ResultKind::EnteredFolder
            | ResultKind::ExitedFolder
            | ResultKind::ExitedReport
            | ResultKind::EnteredReport => {
                self.selection.top();
                self.test_card = None;
                self.feedback = None;
            }
            ResultKind::StartTestSession | ResultKind::ShowNextCard => {
                self.test_card = result.test_session_card.clone();
                self.feedback = None;
            }
            ResultKind::AnswerCorrect | ResultKind::AnswerWrong | ResultKind::AnswerReveal => {
                self.feedback =
                    Some(AnswerFeedback { kind: result.kind, message: result.message.clone() });
            }
            ResultKind::EndTestSession => {
                self.test_card = None;
                self.feedback = None;
            }
            ResultKind::EditedFolder | ResultKind::None => {}
        }
        if result.message.contains('\n') {
            self.output = Some(result.message.clone());
        }
        self.command_line.set_message(result.message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(state: &mut CommandLineState, text: &str) {
        for c in text.chars() {
            state.insert_char(c);
        }
    }

    #[test]
    fn insert_and_delete_respect_cursor() {
        let mut state = CommandLineState::default();
        state.enter_command_mode();
        typed(&mut state, "cd 1");
        state.move_left();
        state.delete_char();
        assert_eq!(state.input, "cd1");
        state.move_right();
        state.insert_char('0');
        assert_eq!(state.input, "cd10");
    }

    #[test]
    fn history_walks_back_and_forward() {
        let mut state = CommandLineState::default();
        state.history.add("cd 1");
        state.history.add("test");
        state.enter_command_mode();

        state.history_up();
        assert_eq!(state.input, "test");
        state.history_up();
        assert_eq!(state.input, "cd 1");
        state.history_up();
        assert_eq!(state.input, "cd 1");

        state.history_down();
        assert_eq!(state.input, "test");
        state.history_down();
        assert_eq!(state.input, "");
        assert_eq!(state.history_index, None);
    }

    #[test]
    fn submit_returns_line_and_leaves_input_mode() {
        let mut state = CommandLineState::default();
        state.enter_search_mode();
        typed(&mut state, "capital");
        assert_eq!(state.submit(), (CommandMode::Search, "capital".to_string()));
        assert!(!state.is_input_mode());
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut selection = ListSelection::default();
        selection.down(2);
        selection.down(2);
        assert_eq!(selection.selected, 1);
        selection.clamp(0);
        assert_eq!(selection.selected, 0);
        selection.up();
        assert_eq!(selection.selected, 0);
    }

    #[test]
    fn answer_result_sets_feedback() {
        let mut state = AppState::default();
        let card = Card::new("France?", "Paris").unwrap();
        state.apply_result(
            &CommandResult::new("Test session started", ResultKind::StartTestSession)
                .with_card(card.clone()),
        );
        assert_eq!(state.test_card, Some(card));

        state.apply_result(&CommandResult::new("Answer is correct!", ResultKind::AnswerCorrect));
        assert_eq!(state.feedback.as_ref().map(|f| f.kind), Some(ResultKind::AnswerCorrect));

        state.apply_result(&CommandResult::new("ended", ResultKind::EndTestSession));
        assert!(state.test_card.is_none());
        assert!(state.feedback.is_none());
    }

    #[test]
    fn multi_line_result_opens_output() {
        let mut state = AppState::default();
        state.apply_result(&CommandResult::message("Entered commands:\nlist"));
        assert_eq!(state.output.as_deref(), Some("Entered commands:\nlist"));
    }

    #[test]
    fn exit_result_requests_quit() {
        let mut state = AppState::default();
        state.apply_result(&CommandResult::new("bye", ResultKind::Exit));
        assert!(state.should_quit);
    }
}
