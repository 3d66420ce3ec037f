//! State storage traits for Mnemosyne.
//!
//! The trainer persists two documents: the word library and the user
//! stats. A store reports a missing document as `Ok(None)` so the caller
//! can fall back to the starter library or zeroed stats.

use std::sync::Arc;

use crate::core::Word;
use crate::error::Result;
use crate::stats::UserStats;

/// Trait for state storage backends.
///
/// Stores are shared with the study-time ticker task.
pub trait StateStore: Send + Sync + 'static {
    /// Load the word library.
    ///
    /// Returns `Ok(None)` if nothing has been saved yet.
    fn load_words(&self) -> Result<Option<Vec<Word>>>;

    /// Replace the saved word library.
    fn save_words(&self, words: &[Word]) -> Result<()>;

    /// Load the user stats.
    ///
    /// Returns `Ok(None)` if nothing has been saved yet.
    fn load_stats(&self) -> Result<Option<UserStats>>;

    /// Replace the saved user stats.
    fn save_stats(&self, stats: &UserStats) -> Result<()>;
}

/// Blanket implementation of StateStore for Arc-wrapped stores.
///
/// Lets tests keep a handle on the store they hand to the app.
impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    fn load_words(&self) -> Result<Option<Vec<Word>>> {
        (**self).load_words()
    }

    fn save_words(&self, words: &[Word]) -> Result<()> {
        (**self).save_words(words)
    }

    fn load_stats(&self) -> Result<Option<UserStats>> {
        (**self).load_stats()
    }

    fn save_stats(&self, stats: &UserStats) -> Result<()> {
        (**self).save_stats(stats)
    }
}
