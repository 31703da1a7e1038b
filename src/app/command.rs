//! Command line parsing
//!
//! Turns typed text into a [`Command`]. Indices are 1-based here and 0-based
//! everywhere after.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::command::{Command, Destination};
use crate::model::{Card, CardEdit};
use crate::session::SessionOrder;

/// `q/`, `a/` and `c/` field prefixes of add and edit
static FIELD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\s)([qac])/").unwrap());

/// Result of parsing a command
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    /// Successfully parsed command
    Ok(Command),
    /// Nothing was typed
    Empty,
    /// Unknown command
    UnknownCommand(String),
    /// Command needs an argument
    MissingArgument(String),
    /// Argument present but unusable
    InvalidArgument { command: String, reason: String },
}

impl ParseResult {
    /// Message for the command line when parsing failed
    pub fn error_message(&self) -> Option<String> {
        match self {
            ParseResult::Ok(_) | ParseResult::Empty => None,
            ParseResult::UnknownCommand(cmd) => Some(format!("Unknown command: {}", cmd)),
            ParseResult::MissingArgument(cmd) => {
                Some(format!("{} needs an argument. {}", cmd, usage(cmd)))
            }
            ParseResult::InvalidArgument { command, reason } => {
                Some(format!("Invalid {} command: {}. {}", command, reason, usage(command)))
            }
        }
    }
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Empty;
    }

    // Split into command and arguments
    let mut parts = input.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").to_lowercase();
    let args = parts.next().map(|s| s.trim()).unwrap_or("");

    match cmd.as_str() {
        "help" | "h" | "?" => ParseResult::Ok(Command::Help),
        "exit" | "quit" | "q" => ParseResult::Ok(Command::Exit),
        "history" => ParseResult::Ok(Command::History),
        "cd" => match args {
            "" => ParseResult::MissingArgument(cmd.clone()),
            ".." => ParseResult::Ok(Command::ChangeDirectory(Destination::Home)),
            _ => with_index(&cmd, args, |i| Command::ChangeDirectory(Destination::Folder(i))),
        },
        "addfolder" => {
            if args.is_empty() {
                ParseResult::MissingArgument(cmd.clone())
            } else {
                ParseResult::Ok(Command::AddFolder(args.to_string()))
            }
        }
        "deletefolder" => with_index(&cmd, args, Command::DeleteFolder),
        "editfolder" => {
            let mut rest = args.splitn(2, char::is_whitespace);
            let index = rest.next().unwrap_or("");
            let name = rest.next().map(str::trim).unwrap_or("");
            if name.is_empty() {
                return ParseResult::MissingArgument(cmd.clone());
            }
            with_index(&cmd, index, |i| Command::RenameFolder(i, name.to_string()))
        }
        "add" => parse_add(&cmd, args),
        "edit" => parse_edit(&cmd, args),
        "delete" | "del" => with_index(&cmd, args, Command::DeleteCard),
        "search" | "find" => {
            if args.is_empty() {
                ParseResult::MissingArgument(cmd.clone())
            } else {
                ParseResult::Ok(parse_search(args))
            }
        }
        "list" | "ls" => ParseResult::Ok(Command::List),
        "test" => match args.to_lowercase().as_str() {
            "" => ParseResult::Ok(Command::Test(None)),
            "ordered" | "in-order" => {
                ParseResult::Ok(Command::Test(Some(SessionOrder::AsDisplayed)))
            }
            "shuffle" | "shuffled" => ParseResult::Ok(Command::Test(Some(SessionOrder::Shuffled))),
            "weakest" => ParseResult::Ok(Command::Test(Some(SessionOrder::WeakestFirst))),
            other => ParseResult::InvalidArgument {
                command: cmd.clone(),
                reason: format!("unknown order '{}'", other),
            },
        },
        "ans" | "answer" => {
            if args.is_empty() {
                ParseResult::MissingArgument(cmd.clone())
            } else {
                ParseResult::Ok(Command::Answer(args.to_string()))
            }
        }
        "reveal" => ParseResult::Ok(Command::Reveal),
        "next" => ParseResult::Ok(Command::Next),
        "end" => ParseResult::Ok(Command::End),
        _ => ParseResult::UnknownCommand(cmd.clone()),
    }
}

/// Parse a search query (without the leading /)
pub fn parse_search(input: &str) -> Command {
    Command::Search(input.split_whitespace().map(str::to_string).collect())
}

/// Usage line shown after a parse error
pub fn usage(cmd: &str) -> &'static str {
    match cmd {
        "cd" => "Usage: cd INDEX (at home) or cd .. (inside a folder)",
        "addfolder" => "Usage: addfolder NAME",
        "deletefolder" => "Usage: deletefolder INDEX",
        "editfolder" => "Usage: editfolder INDEX NEW_NAME",
        "add" => "Usage: add q/QUESTION a/ANSWER [c/CHOICE]...",
        "edit" => "Usage: edit INDEX [q/QUESTION] [a/ANSWER] [c/CHOICE]...",
        "delete" | "del" => "Usage: delete INDEX",
        "search" | "find" => "Usage: search KEYWORD [MORE_KEYWORDS]...",
        "test" => "Usage: test [ordered|shuffle|weakest]",
        "ans" | "answer" => "Usage: ans ANSWER",
        _ => "Type help to see all commands",
    }
}

fn with_index(cmd: &str, arg: &str, build: impl FnOnce(usize) -> Command) -> ParseResult {
    if arg.is_empty() {
        return ParseResult::MissingArgument(cmd.to_string());
    }
    match parse_index(arg) {
        Some(index) => ParseResult::Ok(build(index)),
        None => ParseResult::InvalidArgument {
            command: cmd.to_string(),
            reason: "INDEX must be a positive integer".to_string(),
        },
    }
}

/// 1-based text index to 0-based
fn parse_index(arg: &str) -> Option<usize> {
    arg.trim().parse::<usize>().ok()?.checked_sub(1)
}

/// Fields given with `q/`, `a/` and `c/` prefixes
#[derive(Debug, Default)]
struct CardFields {
    question: Option<String>,
    answer: Option<String>,
    choices: Vec<String>,
}

/// Split `q/... a/... c/...` text; anything before the first prefix is returned as the preamble
fn split_fields(args: &str) -> (&str, CardFields) {
    let mut fields = CardFields::default();
    let starts: Vec<(usize, usize, &str)> = FIELD_RE
        .captures_iter(args)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let prefix = caps.get(1)?;
            Some((prefix.start(), whole.end(), prefix.as_str()))
        })
        .collect();

    let preamble = starts.first().map(|(start, _, _)| &args[..*start]).unwrap_or(args);

    for (i, (_, value_start, prefix)) in starts.iter().enumerate() {
        let value_end = starts.get(i + 1).map(|(next, _, _)| *next).unwrap_or(args.len());
        let value = args[*value_start..value_end].trim().to_string();
        match *prefix {
            "q" => fields.question = Some(value),
            "a" => fields.answer = Some(value),
            _ => fields.choices.push(value),
        }
    }

    (preamble.trim(), fields)
}

fn parse_add(cmd: &str, args: &str) -> ParseResult {
    let (preamble, fields) = split_fields(args);
    if !preamble.is_empty() {
        return invalid(cmd, format!("unexpected text '{}'", preamble));
    }
    let (Some(question), Some(answer)) = (fields.question, fields.answer) else {
        return ParseResult::MissingArgument(cmd.to_string());
    };

    let card = if fields.choices.is_empty() {
        Card::new(question, answer)
    } else {
        Card::multiple_choice(question, answer, fields.choices)
    };

    match card {
        Ok(card) => ParseResult::Ok(Command::AddCard(card)),
        Err(e) => invalid(cmd, e.to_string()),
    }
}

fn parse_edit(cmd: &str, args: &str) -> ParseResult {
    let (preamble, fields) = split_fields(args);
    if preamble.is_empty() {
        return ParseResult::MissingArgument(cmd.to_string());
    }
    let Some(index) = parse_index(preamble) else {
        return invalid(cmd, "INDEX must be a positive integer".to_string());
    };

    let edit = CardEdit {
        question: fields.question,
        answer: fields.answer,
        choices: (!fields.choices.is_empty()).then_some(fields.choices),
    };
    if edit.is_empty() {
        return invalid(cmd, "at least one field to edit must be provided".to_string());
    }
    ParseResult::Ok(Command::EditCard(index, edit))
}

fn invalid(cmd: &str, reason: String) -> ParseResult {
    ParseResult::InvalidArgument { command: cmd.to_string(), reason }
}
