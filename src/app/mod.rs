//! Application state and event handling

pub mod command;
pub mod input;
pub mod state;

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, error};

use crate::command::{Command, Destination};
use crate::config::{Config, WindowGeometry};
use crate::nav::{NavigationState, Navigator};
use crate::theme::Theme;
use crate::ui;
use command::{ParseResult, parse_command, parse_search};
use input::{Action, key_with_modifier_to_action};
use state::{AppState, CommandLineState, CommandMode};

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// Colours resolved from the configuration
    theme: Theme,

    /// Current view state
    state: AppState,

    /// Folders, mode and test session
    navigator: Navigator,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, navigator: Navigator) -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        let theme = config.active_theme();
        let state = AppState {
            command_line: CommandLineState::with_history_limit(config.history_limit),
            ..Default::default()
        };

        Ok(Self { config, theme, state, navigator, terminal })
    }

    /// Preferences, including the window size recorded by [`App::run`]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Show a startup notice on the command line
    pub fn notify(&mut self, message: impl Into<String>, is_error: bool) {
        if is_error {
            self.state.command_line.set_error(message);
        } else {
            self.state.command_line.set_message(message);
        }
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        while !self.state.should_quit {
            self.terminal.draw(|frame| {
                ui::draw(frame, &mut self.state, &self.navigator, &self.theme);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        let size = self.terminal.size()?;
        self.config.window = WindowGeometry { width: size.width, height: size.height };

        self.restore_terminal()?;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.state.command_line.is_input_mode() {
            self.handle_input_key(key.code);
            return;
        }

        if self.state.show_help || self.state.output.is_some() {
            self.state.show_help = false;
            self.state.output = None;
            return;
        }

        if let Some(action) = key_with_modifier_to_action(key.code, key.modifiers) {
            self.handle_action(action);
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        let line = &mut self.state.command_line;
        match code {
            KeyCode::Esc => line.exit_input_mode(),
            KeyCode::Enter => {
                let (mode, text) = line.submit();
                self.submit_line(mode, &text);
            }
            KeyCode::Backspace => {
                if line.input.is_empty() {
                    line.exit_input_mode();
                } else {
                    line.delete_char();
                }
            }
            KeyCode::Left => line.move_left(),
            KeyCode::Right => line.move_right(),
            KeyCode::Up => line.history_up(),
            KeyCode::Down => line.history_down(),
            KeyCode::Char(c) => line.insert_char(c),
            _ => {}
        }
    }

    fn handle_action(&mut self, action: Action) {
        let len = self.list_len();
        match action {
            Action::Up => self.state.selection.up(),
            Action::Down => self.state.selection.down(len),
            Action::Top => self.state.selection.top(),
            Action::Bottom => self.state.selection.bottom(len),
            Action::Select => {
                if self.navigator.state() == NavigationState::Home && len > 0 {
                    let index = self.state.selection.selected;
                    self.dispatch(Command::ChangeDirectory(Destination::Folder(index)));
                }
            }
            Action::Back => match self.navigator.state() {
                NavigationState::Home => {}
                NavigationState::InFolder { .. } => {
                    self.dispatch(Command::ChangeDirectory(Destination::Home))
                }
                NavigationState::InTestSession { .. } | NavigationState::InReport { .. } => {
                    self.dispatch(Command::End)
                }
            },
            Action::CommandMode => self.state.command_line.enter_command_mode(),
            Action::Search => self.state.command_line.enter_search_mode(),
            Action::StartTest => self.dispatch(Command::Test(None)),
            Action::Reveal => self.dispatch(Command::Reveal),
            Action::NextCard => self.dispatch(Command::Next),
            Action::Help => self.state.show_help = true,
            Action::Quit => self.state.should_quit = true,
        }
    }

    /// Handle a line typed on the command line
    fn submit_line(&mut self, mode: CommandMode, text: &str) {
        let command = match mode {
            CommandMode::Search if text.trim().is_empty() => Command::List,
            CommandMode::Search => parse_search(text),
            _ => {
                let parsed = parse_command(text);
                match parsed {
                    ParseResult::Ok(command) => command,
                    ParseResult::Empty => return,
                    other => {
                        self.state.command_line.history.add(text);
                        if let Some(message) = other.error_message() {
                            self.state.command_line.set_error(message);
                        }
                        return;
                    }
                }
            }
        };

        self.dispatch(command);
        if mode == CommandMode::Command {
            self.state.command_line.history.add(text);
        }
    }

    /// Execute a command and refresh the view from its result
    fn dispatch(&mut self, command: Command) {
        let command = command.with_default_order(self.config.session_order);
        let result = command.execute(&mut self.navigator, &self.state.command_line.history);

        match result {
            Ok(result) => {
                debug!("Command result: {:?}", result.kind);
                self.state.apply_result(&result);
            }
            Err(e) => {
                if e.is_storage_failure() {
                    error!("Command failed to persist: {}", e);
                }
                self.state.command_line.set_error(e.to_string());
            }
        }

        let len = self.list_len();
        self.state.selection.clamp(len);
    }

    /// Rows in the list currently on screen
    fn list_len(&self) -> usize {
        match self.navigator.state() {
            NavigationState::Home => self.navigator.folders().len(),
            _ => self.navigator.displayed_cards().len(),
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
