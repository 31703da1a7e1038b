//! Test session engine
//!
//! A session walks a queue of cards built from one folder. Each card is
//! answered (or revealed) exactly once before the cursor may advance, and
//! every attempt lands in the score log that the report reads.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StudyError};
use crate::model::{Card, CardFilter, Folder};

/// Order in which a session presents cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionOrder {
    /// Folder order
    #[default]
    AsDisplayed,
    /// Random order
    Shuffled,
    /// Never-tested cards first, then lowest last score first
    WeakestFirst,
}

/// How to build a session queue from a folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPlan {
    pub filter: CardFilter,
    pub order: SessionOrder,
}

impl SessionPlan {
    pub fn ordered(order: SessionOrder) -> Self {
        Self { filter: CardFilter::All, order }
    }

    /// Select and order the cards to test
    pub fn build_queue(&self, folder: &Folder) -> Vec<Card> {
        let mut queue: Vec<Card> = self.filter.apply(folder.cards()).into_iter().cloned().collect();

        match self.order {
            SessionOrder::AsDisplayed => {}
            SessionOrder::Shuffled => queue.shuffle(&mut rand::thread_rng()),
            SessionOrder::WeakestFirst => queue.sort_by(compare_weakness),
        }
        queue
    }
}

fn compare_weakness(a: &Card, b: &Card) -> Ordering {
    let key = |card: &Card| card.last_score().unwrap_or(f64::NEG_INFINITY);
    key(a).total_cmp(&key(b))
}

/// Result of answering or revealing a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub revealed_answer: String,
}

/// One attempted card
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub card: Card,
    pub correct: bool,
}

/// Aggregate result shown by the report
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub correct: usize,
    pub attempted: usize,
    pub per_card: Vec<ScoreEntry>,
    pub elapsed: Duration,
}

impl ScoreSummary {
    /// Score as "correct/attempted"
    pub fn display(&self) -> String {
        format!("{}/{}", self.correct, self.attempted)
    }

    /// Score as a whole percentage, 0 when nothing was attempted
    pub fn percentage(&self) -> u8 {
        if self.attempted == 0 {
            0
        } else {
            ((self.correct * 100) / self.attempted) as u8
        }
    }
}

/// One run through a queue of cards
#[derive(Debug, Clone)]
pub struct TestSession {
    source_folder: usize,
    queue: Vec<Card>,
    cursor: usize,
    answered: bool,
    score_log: Vec<ScoreEntry>,
    started_at: Instant,
    finished_after: Option<Duration>,
}

impl TestSession {
    /// Start a session over the given cards
    pub fn new(source_folder: usize, queue: Vec<Card>) -> Result<Self> {
        if queue.is_empty() {
            return Err(StudyError::EmptySession);
        }
        debug!("Starting test session over {} cards", queue.len());

        Ok(Self {
            source_folder,
            queue,
            cursor: 0,
            answered: false,
            score_log: Vec::new(),
            started_at: Instant::now(),
            finished_after: None,
        })
    }

    /// Start a session over a folder according to a plan
    pub fn from_plan(source_folder: usize, folder: &Folder, plan: &SessionPlan) -> Result<Self> {
        Self::new(source_folder, plan.build_queue(folder))
    }

    /// Index of the folder the cards came from
    pub fn source_folder(&self) -> usize {
        self.source_folder
    }

    pub fn queue(&self) -> &[Card] {
        &self.queue
    }

    /// Zero-based position of the current card
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn is_finished(&self) -> bool {
        self.finished_after.is_some()
    }

    pub fn score_log(&self) -> &[ScoreEntry] {
        &self.score_log
    }

    /// Card under the cursor
    pub fn current_card(&self) -> Result<&Card> {
        if self.is_finished() {
            return Err(StudyError::NoActiveSession);
        }
        self.queue.get(self.cursor).ok_or(StudyError::NoActiveSession)
    }

    /// Check an answer against the current card
    pub fn submit_answer(&mut self, candidate: &str) -> Result<AnswerOutcome> {
        let card = self.current_card()?;
        if self.answered {
            return Err(StudyError::AlreadyAnswered);
        }

        let correct = card.check_answer(candidate);
        Ok(self.record(correct))
    }

    /// Give up on the current card and show its answer; counts as wrong
    pub fn reveal_answer(&mut self) -> Result<AnswerOutcome> {
        self.current_card()?;
        if self.answered {
            return Err(StudyError::AlreadyAnswered);
        }
        Ok(self.record(false))
    }

    fn record(&mut self, correct: bool) -> AnswerOutcome {
        let card = self.queue[self.cursor].clone();
        let revealed_answer = card.answer().to_string();
        self.score_log.push(ScoreEntry { card, correct });
        self.answered = true;
        AnswerOutcome { correct, revealed_answer }
    }

    /// Advance to the next card
    ///
    /// Returns `false` once the queue is exhausted; the cursor then sits one
    /// past the end until the session is finished.
    pub fn next_card(&mut self) -> Result<bool> {
        self.current_card()?;
        if !self.answered {
            return Err(StudyError::NotYetAnswered);
        }

        self.cursor += 1;
        self.answered = false;
        Ok(self.cursor < self.queue.len())
    }

    /// Freeze the session and return its score
    pub fn finish(&mut self) -> ScoreSummary {
        if self.finished_after.is_none() {
            self.finished_after = Some(self.started_at.elapsed());
        }
        self.cursor = self.cursor.min(self.queue.len().saturating_sub(1));
        self.summary()
    }

    /// Score so far
    pub fn summary(&self) -> ScoreSummary {
        let correct = self.score_log.iter().filter(|entry| entry.correct).count();
        ScoreSummary {
            correct,
            attempted: self.score_log.len(),
            per_card: self.score_log.clone(),
            elapsed: self.finished_after.unwrap_or_else(|| self.started_at.elapsed()),
        }
    }
}
