//! Structured commands executed against the navigator
//!
//! Commands arrive already parsed (0-based indices, keyword lists, card
//! payloads). Executing one either returns a [`CommandResult`] describing what
//! to refresh or a [`StudyError`], in which case nothing changed.

pub mod history;
pub mod result;

pub use history::CommandHistory;
pub use result::{CommandResult, ResultKind};

use tracing::debug;

use crate::error::Result;
use crate::model::{Card, CardEdit, CardFilter};
use crate::nav::{NavigationState, Navigator, NextCard};
use crate::session::{ScoreSummary, SessionOrder, SessionPlan};

/// Where `cd` goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Folder at a 0-based index of the home list
    Folder(usize),
    /// Back out (`cd ..`)
    Home,
}

/// Every operation the user can request
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Exit,
    History,
    ChangeDirectory(Destination),
    AddFolder(String),
    DeleteFolder(usize),
    RenameFolder(usize, String),
    AddCard(Card),
    EditCard(usize, CardEdit),
    DeleteCard(usize),
    Search(Vec<String>),
    List,
    /// Start testing the displayed cards; `None` uses the configured order
    Test(Option<SessionOrder>),
    Answer(String),
    Reveal,
    Next,
    /// End the session, or close the report
    End,
}

impl Command {
    /// Fill in the session order for a `Test` command that left it open
    pub fn with_default_order(self, order: SessionOrder) -> Self {
        match self {
            Command::Test(None) => Command::Test(Some(order)),
            other => other,
        }
    }

    /// Run the command
    pub fn execute(&self, nav: &mut Navigator, history: &CommandHistory) -> Result<CommandResult> {
        debug!("Executing {:?} in {} mode", self, nav.state().label());

        match self {
            Command::Help => Ok(CommandResult::new("Opened help window.", ResultKind::ShowHelp)),
            Command::Exit => {
                Ok(CommandResult::new("Exiting application as requested ...", ResultKind::Exit))
            }
            Command::History => Ok(CommandResult::message(list_history(history))),
            Command::ChangeDirectory(Destination::Folder(index)) => {
                let folder = nav.enter_folder(*index)?;
                let message = format!("Entered Card Folder: {}", folder.name());
                Ok(CommandResult::new(message, ResultKind::EnteredFolder))
            }
            Command::ChangeDirectory(Destination::Home) => match nav.state() {
                NavigationState::InReport { .. } => {
                    nav.exit_report_to_home()?;
                    Ok(CommandResult::new("Returned to home", ResultKind::ExitedReport))
                }
                _ => {
                    nav.exit_folder_to_home()?;
                    Ok(CommandResult::new("Returned to home", ResultKind::ExitedFolder))
                }
            },
            Command::AddFolder(name) => {
                let index = nav.add_folder(name)?;
                let message = format!("New folder added: {}", nav.folders()[index].name());
                Ok(CommandResult::new(message, ResultKind::EditedFolder))
            }
            Command::DeleteFolder(index) => {
                let folder = nav.delete_folder(*index)?;
                let message = format!("Deleted Folder: {}", folder.name());
                Ok(CommandResult::new(message, ResultKind::EditedFolder))
            }
            Command::RenameFolder(index, name) => {
                let old = nav.store().folder(*index).map(|f| f.name().to_string());
                nav.rename_folder(*index, name)?;
                let message = format!(
                    "Renamed folder {} to {}",
                    old.unwrap_or_default(),
                    nav.folders()[*index].name()
                );
                Ok(CommandResult::new(message, ResultKind::EditedFolder))
            }
            Command::AddCard(card) => {
                nav.add_card(card.clone())?;
                Ok(CommandResult::new(format!("New card added: {}", card), ResultKind::EditedFolder))
            }
            Command::EditCard(index, edit) => {
                let card = nav.edit_card_at(*index, edit)?;
                Ok(CommandResult::new(format!("Edited Card: {}", card), ResultKind::EditedFolder))
            }
            Command::DeleteCard(index) => {
                let card = nav.delete_card_at(*index)?;
                Ok(CommandResult::new(format!("Deleted Card: {}", card), ResultKind::EditedFolder))
            }
            Command::Search(keywords) => {
                let shown = nav.set_filter(CardFilter::keywords(keywords))?;
                Ok(CommandResult::message(format!("{} cards listed!", shown)))
            }
            Command::List => {
                nav.set_filter(CardFilter::All)?;
                Ok(CommandResult::message("Listed all cards"))
            }
            Command::Test(order) => {
                let plan = SessionPlan {
                    filter: nav.store().filter().clone(),
                    order: order.unwrap_or_default(),
                };
                let card = nav.start_test_session(&plan)?.clone();
                Ok(CommandResult::new("Test session started", ResultKind::StartTestSession)
                    .with_card(card))
            }
            Command::Answer(candidate) => {
                let outcome = nav.submit_answer(candidate)?;
                if outcome.correct {
                    Ok(CommandResult::new("Answer is correct!", ResultKind::AnswerCorrect))
                } else {
                    let message =
                        format!("Answer is wrong! The correct answer is: {}", outcome.revealed_answer);
                    Ok(CommandResult::new(message, ResultKind::AnswerWrong))
                }
            }
            Command::Reveal => {
                let outcome = nav.reveal_answer()?;
                let message = format!("The answer is: {}", outcome.revealed_answer);
                Ok(CommandResult::new(message, ResultKind::AnswerReveal))
            }
            Command::Next => match nav.next_card()? {
                NextCard::Card(card) => {
                    Ok(CommandResult::new("Next card", ResultKind::ShowNextCard).with_card(card))
                }
                NextCard::Finished(summary) => Ok(session_ended(&summary)),
            },
            Command::End => match nav.state() {
                NavigationState::InReport { .. } => {
                    nav.exit_report()?;
                    Ok(CommandResult::new("Exited report", ResultKind::ExitedReport))
                }
                _ => {
                    let summary = nav.end_test_session()?;
                    Ok(session_ended(&summary))
                }
            },
        }
    }
}

fn session_ended(summary: &ScoreSummary) -> CommandResult {
    let message = format!(
        "Test session ended. Score: {} ({}%)",
        summary.display(),
        summary.percentage()
    );
    CommandResult::new(message, ResultKind::EndTestSession)
}

fn list_history(history: &CommandHistory) -> String {
    if history.is_empty() {
        return "You have not yet entered any commands.".to_string();
    }
    let lines: Vec<&str> = history.most_recent_first().collect();
    format!("Entered commands (from most recent to earliest):\n{}", lines.join("\n"))
}
