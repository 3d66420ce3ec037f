//! Unified error types for Mnemosyne with fail-open recovery.
//!
//! Nothing in the trainer is allowed to hard-fail in front of the user.
//! Content generation falls back to placeholder text, missing or corrupt
//! state is treated as a first run, and the helpers here log a warning
//! before substituting a safe value.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Mnemosyne operations.
#[derive(Error, Debug)]
pub enum MnemoError {
    /// I/O errors from state or import file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Content provider failures (network, HTTP status, malformed reply).
    #[error("provider error: {message}")]
    Provider { message: String },

    /// JSON serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Router or session transitions attempted from the wrong state.
    #[error("invalid state: {message}")]
    InvalidState { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// A word id that already exists in the library.
    #[error("duplicate word id: {id}")]
    DuplicateId { id: String },

    /// Word not found in the library.
    #[error("word not found: {id}")]
    WordNotFound { id: String },

    /// Import source errors.
    #[error("import error: {message}")]
    Import { message: String },
}

/// A specialized Result type for Mnemosyne operations.
pub type Result<T> = std::result::Result<T, MnemoError>;

impl MnemoError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create an invalid state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a duplicate id error.
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create a word not found error.
    pub fn word_not_found(id: impl Into<String>) -> Self {
        Self::WordNotFound { id: id.into() }
    }

    /// Create an import error.
    pub fn import(message: impl Into<String>) -> Self {
        Self::Import {
            message: message.into(),
        }
    }
}

impl From<io::Error> for MnemoError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for MnemoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for MnemoError {
    fn from(err: reqwest::Error) -> Self {
        Self::Provider {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Log the error and continue with a safe value instead of propagating.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }
}

/// Exit codes for the Mnemosyne CLI.
pub mod exit_codes {
    /// The command completed.
    pub const SUCCESS: i32 = 0;

    /// The command ran but reported a failure (unknown id, unreadable file).
    pub const ERROR: i32 = 1;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}
