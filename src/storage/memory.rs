//! In-memory state storage for testing.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::Word;
use crate::error::Result;
use crate::stats::UserStats;
use crate::storage::StateStore;

#[derive(Debug, Default)]
struct Saved {
    words: Option<Vec<Word>>,
    stats: Option<UserStats>,
    writes: usize,
}

/// In-memory state store.
///
/// Thread-safe via `RwLock`. Contents are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    saved: RwLock<Saved>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `words`.
    pub fn with_words(words: Vec<Word>) -> Self {
        let store = Self::new();
        store.write().words = Some(words);
        store
    }

    /// Number of successful saves of either document.
    pub fn write_count(&self) -> usize {
        self.read().writes
    }

    fn read(&self) -> RwLockReadGuard<'_, Saved> {
        self.saved.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Saved> {
        self.saved.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl StateStore for MemoryStateStore {
    fn load_words(&self) -> Result<Option<Vec<Word>>> {
        Ok(self.read().words.clone())
    }

    fn save_words(&self, words: &[Word]) -> Result<()> {
        let mut saved = self.write();
        saved.words = Some(words.to_vec());
        saved.writes += 1;
        Ok(())
    }

    fn load_stats(&self) -> Result<Option<UserStats>> {
        Ok(self.read().stats)
    }

    fn save_stats(&self, stats: &UserStats) -> Result<()> {
        let mut saved = self.write();
        saved.stats = Some(*stats);
        saved.writes += 1;
        Ok(())
    }
}
