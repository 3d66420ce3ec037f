//! Core domain types and logic for Mnemosyne.
//!
//! This module contains:
//! - Word records and the starter library
//! - The in-memory word store
//! - The study session engine
//! - The mistake review router

pub mod library;
pub mod review;
pub mod seed;
pub mod session;
pub mod word;

pub use library::WordStore;
pub use review::{MistakeEntry, ReviewAction, ReviewRouter, ReviewState};
pub use seed::seed_library;
pub use session::{Advance, AdvanceDelays, Feedback, Session, SessionOutcome, SessionPhase};
pub use word::{Word, WordContent, WordStatus};
