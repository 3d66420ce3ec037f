//! Configuration loading for Mnemosyne.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.mnemosyne/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. The trainer runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{MnemoError, Result};

/// Main configuration struct for Mnemosyne.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Study session behavior.
    pub session: SessionConfig,
    /// Import pipeline behavior.
    pub import: ImportConfig,
    /// Generative content provider settings.
    pub provider: ProviderConfig,
}

/// Study session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of words sampled into a fresh session.
    pub sample_size: usize,
    /// Feedback display time after a correct answer.
    pub correct_delay_ms: u64,
    /// Feedback display time after an incorrect answer.
    pub incorrect_delay_ms: u64,
}

/// Minimum valid sample size.
pub const MIN_SAMPLE_SIZE: usize = 1;

impl SessionConfig {
    /// Check if a sample size is valid (must be >= 1).
    pub fn is_valid_sample_size(value: usize) -> bool {
        value >= MIN_SAMPLE_SIZE
    }

    pub fn correct_delay(&self) -> Duration {
        Duration::from_millis(self.correct_delay_ms)
    }

    pub fn incorrect_delay(&self) -> Duration {
        Duration::from_millis(self.incorrect_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_size: 10,
            correct_delay_ms: 1200,
            incorrect_delay_ms: 2500,
        }
    }
}

/// Import pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImportConfig {
    /// Maximum number of terms sent to the content provider per import.
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { batch_size: 5 }
    }
}

/// Content provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Model name used for generation.
    pub model: String,
    /// Base URL of the generative language API.
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl ProviderConfig {
    /// Resolve the API key from the configured environment variable.
    ///
    /// Falls back to `API_KEY` when the configured variable is unset.
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.api_key_env)
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = user_config;
        }

        config.apply_env_overrides();
        config
    }

    /// Load user config from `<home>/config.toml`.
    fn load_user_config() -> Option<Config> {
        let path = config_path()?;
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("ignoring unreadable config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Load config from a specific file path.
    ///
    /// Out-of-range values are reset to their defaults with a warning.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| MnemoError::storage(path, e))?;
        let mut config: Config =
            toml::from_str(&content).map_err(|e| MnemoError::config(e.to_string()))?;
        config.validate();
        Ok(config)
    }

    fn validate(&mut self) {
        if !SessionConfig::is_valid_sample_size(self.session.sample_size) {
            let default = SessionConfig::default().sample_size;
            tracing::warn!(
                "invalid session.sample_size {} in config file, expected an integer >= {}; using {}",
                self.session.sample_size,
                MIN_SAMPLE_SIZE,
                default
            );
            self.session.sample_size = default;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // MNEMOSYNE_SAMPLE_SIZE
        if let Ok(val) = env::var("MNEMOSYNE_SAMPLE_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if SessionConfig::is_valid_sample_size(n) => self.session.sample_size = n,
                _ => tracing::warn!(
                    "invalid MNEMOSYNE_SAMPLE_SIZE value '{}', expected an integer >= {}; keeping {}",
                    val,
                    MIN_SAMPLE_SIZE,
                    self.session.sample_size
                ),
            }
        }

        // MNEMOSYNE_IMPORT_BATCH
        if let Ok(val) = env::var("MNEMOSYNE_IMPORT_BATCH") {
            match val.parse::<usize>() {
                Ok(n) => self.import.batch_size = n,
                Err(_) => tracing::warn!(
                    "invalid MNEMOSYNE_IMPORT_BATCH value '{}', expected an integer; keeping {}",
                    val,
                    self.import.batch_size
                ),
            }
        }

        // MNEMOSYNE_MODEL
        if let Ok(val) = env::var("MNEMOSYNE_MODEL") {
            if val.trim().is_empty() {
                tracing::warn!("MNEMOSYNE_MODEL is empty; keeping {}", self.provider.model);
            } else {
                self.provider.model = val;
            }
        }
    }
}

/// Get the Mnemosyne home directory.
///
/// Checks `MNEMOSYNE_HOME` first, then falls back to `~/.mnemosyne`.
pub fn mnemosyne_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("MNEMOSYNE_HOME") {
        if home.is_empty() {
            tracing::warn!("MNEMOSYNE_HOME is empty, using default");
        } else {
            return Some(PathBuf::from(home));
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".mnemosyne"));
    }

    let fallback = env::temp_dir().join("mnemosyne");
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback.display()
    );
    Some(fallback)
}

/// Returns `<home>/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    mnemosyne_home().map(|h| h.join("config.toml"))
}

/// Returns `<home>/crash.log`.
pub fn crash_log_path() -> Option<PathBuf> {
    mnemosyne_home().map(|h| h.join("crash.log"))
}
