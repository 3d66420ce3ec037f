//! Mnemosyne - vocabulary flashcard trainer
//!
//! Mnemosyne quizzes a word library with multiple-choice recall, routes
//! missed words into a retry-only review and keeps cumulative study stats.
//! Definitions, memory hooks and distractor options come from a generative
//! text service, with fixed fallback content when the service fails.

pub mod app;
pub mod cli;
pub mod config;
pub mod content;
pub mod core;
pub mod error;
pub mod import;
pub mod stats;
pub mod storage;
pub mod util;

pub use app::{App, Page, StudyView, View};
pub use config::Config;
pub use content::{ContentProvider, FallbackProvider, GeminiProvider};
pub use core::{
    seed_library, Advance, Feedback, ReviewRouter, ReviewState, Session, SessionOutcome,
    SessionPhase, Word, WordContent, WordStatus, WordStore,
};
pub use error::{MnemoError, Result};
pub use import::{parse_terms, ImportPipeline, ImportProgress, ImportReport};
pub use stats::{SharedStats, StatsTicker, StatsTracker, UserStats};
pub use storage::{FileStateStore, MemoryStateStore, StateStore};

// CLI commands
pub use cli::{
    ImportCommand, ListCommand, ProgressCommand, RegenerateCommand, ShowCommand, StudyCommand,
};
