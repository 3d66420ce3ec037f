//! Study session engine.
//!
//! A session is one pass over a fixed queue of words:
//!
//! ```text
//! Presenting(i) --select--> AwaitingAdvance --advance--> Presenting(i+1)
//!                                           \--advance--> Finished (last card)
//! ```
//!
//! Exactly one selection is accepted per card. Every queued word ends up in
//! exactly one of the correct/incorrect partitions, and the outcome is handed
//! out once. Advancing is driven by the caller after the feedback delay
//! carried by [`Feedback::advance_after`].

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::debug;

use super::word::Word;
use crate::config::SessionConfig;
use crate::error::{MnemoError, Result};
use crate::stats::SharedStats;

/// Feedback text for a correct answer.
pub const CORRECT_FEEDBACK: &str = "Correct. The essence is captured.";

/// How long feedback stays up before the next card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceDelays {
    pub correct: Duration,
    pub incorrect: Duration,
}

impl Default for AdvanceDelays {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for AdvanceDelays {
    fn from(config: &SessionConfig) -> Self {
        Self {
            correct: config.correct_delay(),
            incorrect: config.incorrect_delay(),
        }
    }
}

/// Where the session is in its card cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Waiting for an answer to the current card.
    Presenting,
    /// Answer taken, feedback on screen.
    AwaitingAdvance,
    /// Queue exhausted.
    Finished,
}

/// Result of answering a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub correct: bool,
    pub selected: String,
    pub message: String,
    /// Delay before the caller should call [`Session::advance`].
    #[serde(skip)]
    pub advance_after: Duration,
}

/// What `advance` moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Presenting the card at this index.
    Next(usize),
    Finished,
}

/// Partition of a finished session's queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    pub correct: Vec<Word>,
    pub incorrect: Vec<Word>,
}

impl SessionOutcome {
    pub fn total(&self) -> usize {
        self.correct.len() + self.incorrect.len()
    }
}

/// One study pass over a fixed queue.
#[derive(Debug)]
pub struct Session {
    queue: Vec<Word>,
    current_index: usize,
    phase: SessionPhase,
    options: Vec<String>,
    feedback: Option<Feedback>,
    correct: Vec<Word>,
    incorrect: Vec<Word>,
    outcome_taken: bool,
    stats: SharedStats,
    delays: AdvanceDelays,
    rng: StdRng,
}

impl Session {
    /// Start a session over `queue`.
    ///
    /// Correct answers are counted into `stats`. An empty queue starts
    /// finished.
    pub fn new(queue: Vec<Word>, stats: SharedStats, delays: AdvanceDelays) -> Self {
        Self::with_rng(queue, stats, delays, StdRng::from_os_rng())
    }

    /// Start a session with a fixed shuffle seed.
    pub fn with_seed(queue: Vec<Word>, stats: SharedStats, delays: AdvanceDelays, seed: u64) -> Self {
        Self::with_rng(queue, stats, delays, StdRng::seed_from_u64(seed))
    }

    fn with_rng(queue: Vec<Word>, stats: SharedStats, delays: AdvanceDelays, rng: StdRng) -> Self {
        let mut session = Self {
            phase: if queue.is_empty() {
                SessionPhase::Finished
            } else {
                SessionPhase::Presenting
            },
            queue,
            current_index: 0,
            options: Vec::new(),
            feedback: None,
            correct: Vec::new(),
            incorrect: Vec::new(),
            outcome_taken: false,
            stats,
            delays,
            rng,
        };
        if session.phase == SessionPhase::Presenting {
            session.present();
        }
        debug!(len = session.queue.len(), "session started");
        session
    }

    /// Shuffle a fresh option set for the current card.
    fn present(&mut self) {
        let mut options = self.queue[self.current_index].options();
        options.shuffle(&mut self.rng);
        self.options = options;
        self.feedback = None;
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The card on screen, `None` once finished.
    pub fn current_word(&self) -> Option<&Word> {
        if self.is_finished() {
            None
        } else {
            self.queue.get(self.current_index)
        }
    }

    /// Options for the current card in display order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Feedback for the current card, if answered.
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Fraction of cards already passed, for progress display.
    pub fn progress(&self) -> f64 {
        if self.queue.is_empty() {
            return 1.0;
        }
        self.current_index as f64 / self.queue.len() as f64
    }

    pub fn correct_words(&self) -> &[Word] {
        &self.correct
    }

    pub fn incorrect_words(&self) -> &[Word] {
        &self.incorrect
    }

    /// Answer the current card.
    ///
    /// Returns `None` without touching any state unless a card is being
    /// presented, so repeated input on an answered card is ignored.
    pub fn select(&mut self, option: &str) -> Option<Feedback> {
        if self.phase != SessionPhase::Presenting {
            return None;
        }

        let word = self.queue[self.current_index].clone();
        let correct = word.is_correct(option);

        let feedback = if correct {
            self.stats.tick(0, 1);
            Feedback {
                correct,
                selected: option.to_string(),
                message: CORRECT_FEEDBACK.to_string(),
                advance_after: self.delays.correct,
            }
        } else {
            Feedback {
                correct,
                selected: option.to_string(),
                message: word.correction(),
                advance_after: self.delays.incorrect,
            }
        };

        debug!(index = self.current_index, term = %word.term, correct, "card answered");
        if correct {
            self.correct.push(word);
        } else {
            self.incorrect.push(word);
        }

        self.phase = SessionPhase::AwaitingAdvance;
        self.feedback = Some(feedback.clone());
        Some(feedback)
    }

    /// Answer by position in [`Session::options`].
    pub fn select_index(&mut self, index: usize) -> Option<Feedback> {
        let option = self.options.get(index)?.clone();
        self.select(&option)
    }

    /// Move past an answered card.
    pub fn advance(&mut self) -> Result<Advance> {
        if self.phase != SessionPhase::AwaitingAdvance {
            return Err(MnemoError::invalid_state(format!(
                "cannot advance session while {:?}",
                self.phase
            )));
        }

        if self.current_index + 1 < self.queue.len() {
            self.current_index += 1;
            self.phase = SessionPhase::Presenting;
            self.present();
            Ok(Advance::Next(self.current_index))
        } else {
            self.phase = SessionPhase::Finished;
            self.options.clear();
            debug!(
                correct = self.correct.len(),
                incorrect = self.incorrect.len(),
                "session finished"
            );
            Ok(Advance::Finished)
        }
    }

    /// The current word for the detail side view.
    ///
    /// Only available before the card is answered. Does not change any
    /// session state.
    pub fn view_details(&self) -> Option<&Word> {
        if self.phase == SessionPhase::Presenting {
            self.queue.get(self.current_index)
        } else {
            None
        }
    }

    /// Swap in updated content for a word that is still ahead in the queue.
    ///
    /// If it is the unanswered current card, its options are dealt again.
    pub fn refresh_word(&mut self, word: &Word) {
        for queued in self.queue[self.current_index..]
            .iter_mut()
            .filter(|w| w.id == word.id)
        {
            *queued = word.clone();
        }
        if self.view_details().is_some_and(|w| w.id == word.id) {
            self.present();
        }
    }

    /// Hand out the final partitions. Yields `Some` exactly once, after the
    /// session has finished.
    pub fn take_outcome(&mut self) -> Option<SessionOutcome> {
        if !self.is_finished() || self.outcome_taken {
            return None;
        }
        self.outcome_taken = true;
        Some(SessionOutcome {
            correct: std::mem::take(&mut self.correct),
            incorrect: std::mem::take(&mut self.incorrect),
        })
    }
}
