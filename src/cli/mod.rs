//! CLI commands for Mnemosyne.
//!
//! This module provides the commands behind the `mnemosyne` binary:
//! - **Study**: study (interactive session and mistake review)
//! - **Library**: import, list, show, regenerate
//! - **Stats**: progress

pub mod study;

pub mod import_cmd;
pub mod list;
pub mod regenerate;
pub mod show;

pub mod progress;

pub use import_cmd::ImportCommand;
pub use list::ListCommand;
pub use progress::ProgressCommand;
pub use regenerate::RegenerateCommand;
pub use show::ShowCommand;
pub use study::StudyCommand;
