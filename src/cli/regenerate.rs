//! Regenerate command for Mnemosyne.
//!
//! Asks the content provider for a new hook and options for an existing
//! word. Identity and study history are kept.

use serde::Serialize;

use super::show::WordDetail;
use crate::app::App;
use crate::content::FallbackProvider;
use crate::storage::StateStore;

/// Options for the regenerate command.
#[derive(Debug, Clone, Default)]
pub struct RegenerateOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the regenerate command.
#[derive(Debug, Clone, Serialize)]
pub struct RegenerateOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<WordDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The regenerate command implementation.
pub struct RegenerateCommand<S: StateStore> {
    app: App<S>,
    provider: FallbackProvider,
}

impl<S: StateStore> RegenerateCommand<S> {
    pub fn new(app: App<S>, provider: FallbackProvider) -> Self {
        Self { app, provider }
    }

    /// Run the regenerate command.
    pub async fn run(&mut self, id: &str, _options: &RegenerateOptions) -> RegenerateOutput {
        match self.app.regenerate(id, &self.provider).await {
            Ok(word) => RegenerateOutput {
                success: true,
                word: Some(WordDetail::from_word(word, true)),
                error: None,
            },
            Err(e) => RegenerateOutput {
                success: false,
                word: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &RegenerateOutput, options: &RegenerateOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        match &output.word {
            Some(word) => format!("Regenerated:\n\n{}", word.render()),
            None => format!(
                "Regenerate failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}
