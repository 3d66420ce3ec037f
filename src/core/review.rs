//! Mistake review after a finished session.
//!
//! Mistakes don't lecture, they only retry: the review lists each missed
//! word with its correction and offers `retry` (same words, new session) or
//! `home`. With nothing missed, only `home` is offered.

use serde::Serialize;

use super::word::Word;
use crate::error::{MnemoError, Result};

/// Retry label cap used by the review screen.
pub const RETRY_LABEL_CAP: usize = 10;

/// Actions offered by the review screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Retry,
    Home,
}

/// Which screen the review shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    Mistakes,
    NoMistakes,
}

/// One read-only row of the review list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MistakeEntry {
    pub id: String,
    pub term: String,
    pub correction: String,
}

/// Review over a session's incorrect partition.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRouter {
    mistakes: Vec<Word>,
}

impl ReviewRouter {
    pub fn new(incorrect: Vec<Word>) -> Self {
        Self {
            mistakes: incorrect,
        }
    }

    pub fn state(&self) -> ReviewState {
        if self.mistakes.is_empty() {
            ReviewState::NoMistakes
        } else {
            ReviewState::Mistakes
        }
    }

    pub fn actions(&self) -> &'static [ReviewAction] {
        match self.state() {
            ReviewState::Mistakes => &[ReviewAction::Retry, ReviewAction::Home],
            ReviewState::NoMistakes => &[ReviewAction::Home],
        }
    }

    pub fn mistakes(&self) -> &[Word] {
        &self.mistakes
    }

    pub fn entries(&self) -> Vec<MistakeEntry> {
        self.mistakes
            .iter()
            .map(|w| MistakeEntry {
                id: w.id.clone(),
                term: w.term.clone(),
                correction: w.correction(),
            })
            .collect()
    }

    /// Label for the retry button.
    pub fn retry_label(&self) -> String {
        format!("Retry {} Now", self.mistakes.len().min(RETRY_LABEL_CAP))
    }

    /// Hand the missed words back as the next session's queue.
    pub fn retry(self) -> Result<Vec<Word>> {
        if self.mistakes.is_empty() {
            return Err(MnemoError::invalid_state("no mistakes to retry"));
        }
        Ok(self.mistakes)
    }

    /// Discard the review.
    pub fn home(self) {}
}
