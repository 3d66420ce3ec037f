//! In-memory word library.
//!
//! The `WordStore` is the source of truth for study queues and the library
//! size. It is loaded once at startup and written back by the app after
//! every change.

use std::collections::HashSet;

use rand::seq::index;
use rand::Rng;
use tracing::{debug, warn};

use super::session::SessionOutcome;
use super::word::{Word, WordContent};
use crate::error::{MnemoError, Result};

/// Ordered collection of words with unique ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordStore {
    words: Vec<Word>,
}

impl WordStore {
    /// Build a store from persisted words.
    ///
    /// Later entries that reuse an earlier id are dropped. Confusers are
    /// cleaned the same way as for freshly generated content.
    pub fn new(words: Vec<Word>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(words.len());
        for mut word in words {
            if seen.insert(word.id.clone()) {
                word.sanitize();
                kept.push(word);
            } else {
                warn!("dropping duplicate word id {} from library", word.id);
            }
        }
        Self { words: kept }
    }

    /// Store holding the starter library.
    pub fn seeded() -> Self {
        Self::new(super::seed::seed_library())
    }

    /// Number of words in the library.
    pub fn size(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All words in library order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Draw up to `n` distinct words uniformly at random.
    ///
    /// Never returns more words than the library holds and never repeats one.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<Word> {
        let amount = n.min(self.words.len());
        index::sample(rng, self.words.len(), amount)
            .into_iter()
            .map(|i| self.words[i].clone())
            .collect()
    }

    /// Append new words.
    ///
    /// The batch is rejected as a whole if any id collides with the library
    /// or with another word in the batch. Returns the number of words added.
    pub fn append(&mut self, words: Vec<Word>) -> Result<usize> {
        let mut batch_ids = HashSet::with_capacity(words.len());
        for word in &words {
            if self.contains(&word.id) || !batch_ids.insert(word.id.as_str()) {
                return Err(MnemoError::duplicate_id(word.id.clone()));
            }
        }

        let added = words.len();
        self.words.extend(words);
        debug!(added, size = self.words.len(), "appended words to library");
        Ok(added)
    }

    /// Replace a word's generated content in place.
    pub fn replace_content(&mut self, id: &str, content: WordContent) -> Result<&Word> {
        let word = self
            .words
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| MnemoError::word_not_found(id))?;
        word.apply_content(content);
        Ok(word)
    }

    /// Record a finished session: every answered word gets `last_review = now`,
    /// missed words also get their error count bumped.
    pub fn record_outcome(&mut self, outcome: &SessionOutcome, now: i64) {
        for reviewed in &outcome.correct {
            if let Some(word) = self.words.iter_mut().find(|w| w.id == reviewed.id) {
                word.last_review = now;
            }
        }
        for missed in &outcome.incorrect {
            if let Some(word) = self.words.iter_mut().find(|w| w.id == missed.id) {
                word.last_review = now;
                word.error_count += 1;
            }
        }
    }
}
