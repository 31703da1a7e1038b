//! Linear log of entered command lines

use std::collections::VecDeque;

/// Default number of remembered lines
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Bounded command history, oldest first
///
/// There is no undo: the log only records what was typed so it can be listed
/// and recalled on the command line.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self { entries: VecDeque::new(), limit: limit.max(1) }
    }

    /// Record a line, dropping the oldest once the limit is hit
    pub fn add(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.trim().is_empty() {
            return;
        }
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(line);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry counted back from the most recent (0 is the latest)
    pub fn recent(&self, back: usize) -> Option<&str> {
        let index = self.entries.len().checked_sub(back + 1)?;
        self.entries.get(index).map(String::as_str)
    }

    /// Entries from most recent to earliest
    pub fn most_recent_first(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().rev().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_lists_most_recent_first() {
        let mut history = CommandHistory::default();
        history.add("cd 1");
        history.add("list");
        history.add("test");

        let lines: Vec<&str> = history.most_recent_first().collect();
        assert_eq!(lines, vec!["test", "list", "cd 1"]);
        assert_eq!(history.recent(0), Some("test"));
        assert_eq!(history.recent(2), Some("cd 1"));
        assert_eq!(history.recent(3), None);
    }

    #[test]
    fn history_drops_oldest_past_limit() {
        let mut history = CommandHistory::with_limit(2);
        history.add("a");
        history.add("b");
        history.add("c");
        assert_eq!(history.most_recent_first().collect::<Vec<_>>(), vec!["c", "b"]);
    }

    #[test]
    fn blank_lines_are_not_recorded() {
        let mut history = CommandHistory::default();
        history.add("   ");
        assert!(history.is_empty());
    }
}
