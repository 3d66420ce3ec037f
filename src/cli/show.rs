//! Show command for Mnemosyne.
//!
//! Prints one word with its memory hook. `--deep` adds the longer
//! explanation and the comparison.

use serde::Serialize;

use crate::app::App;
use crate::core::Word;
use crate::storage::StateStore;

/// Options for the show command.
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Include the deep explanation and comparison.
    pub deep: bool,
}

/// Detail view of one word.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDetail {
    pub id: String,
    pub term: String,
    pub definition: String,
    pub hook_l1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_l2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
}

impl WordDetail {
    pub fn from_word(word: &Word, deep: bool) -> Self {
        Self {
            id: word.id.clone(),
            term: word.term.clone(),
            definition: word.definition.clone(),
            hook_l1: word.hook_l1.clone(),
            hook_l2: deep.then(|| word.hook_l2.clone()),
            comparison: if deep { word.comparison.clone() } else { None },
        }
    }

    /// Human-readable card.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("{}  ({})", self.term, self.id),
            format!("  {}", self.definition),
            String::new(),
            format!("  Hook: {}", self.hook_l1),
        ];
        if let Some(hook_l2) = &self.hook_l2 {
            lines.push(format!("  Deeper: {}", hook_l2));
        }
        if let Some(comparison) = &self.comparison {
            lines.push(format!("  Note: {}", comparison));
        }
        lines.join("\n")
    }
}

/// Output format for the show command.
#[derive(Debug, Clone, Serialize)]
pub struct ShowOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<WordDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The show command implementation.
pub struct ShowCommand<S: StateStore> {
    app: App<S>,
}

impl<S: StateStore> ShowCommand<S> {
    pub fn new(app: App<S>) -> Self {
        Self { app }
    }

    /// Run the show command.
    pub fn run(&self, id: &str, options: &ShowOptions) -> ShowOutput {
        match self.app.words().get(id) {
            Some(word) => ShowOutput {
                success: true,
                word: Some(WordDetail::from_word(word, options.deep)),
                error: None,
            },
            None => ShowOutput {
                success: false,
                word: None,
                error: Some(format!("word not found: {}", id)),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ShowOutput, options: &ShowOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        match &output.word {
            Some(word) => word.render(),
            None => format!(
                "Show failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}
