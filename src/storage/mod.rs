//! State storage for Mnemosyne.
//!
//! This module persists the word library and user stats,
//! supporting file-based and in-memory backends.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;
pub use traits::StateStore;
