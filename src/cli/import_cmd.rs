//! Import command for Mnemosyne.
//!
//! Reads a text file of terms and adds a generated word for each term of
//! the batch.

use std::path::Path;

use serde::Serialize;

use crate::app::App;
use crate::content::FallbackProvider;
use crate::import::ImportProgress;
use crate::storage::StateStore;
use crate::util::read_import_file;

/// Options for the import command.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

impl ImportOptions {
    fn show_progress(&self) -> bool {
        !self.json && !self.quiet
    }
}

/// Output format for the import command.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportOutput {
    pub success: bool,
    /// Number of words added.
    pub added: usize,
    /// Terms of the added words, in order.
    pub terms: Vec<String>,
    /// Terms left out by the batch cap.
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Progress line for a pipeline event.
pub fn progress_line(event: &ImportProgress<'_>) -> String {
    match event {
        ImportProgress::Parsed { found, batch } if found > batch => {
            format!("Found {} term(s), importing the first {}.", found, batch)
        }
        ImportProgress::Parsed { found, .. } => format!("Found {} term(s).", found),
        ImportProgress::Generating { index, total, term } => {
            format!("[{}/{}] Generating {}...", index, total, term)
        }
        ImportProgress::Finished { added } => format!("Done. {} word(s) generated.", added),
    }
}

/// The import command implementation.
pub struct ImportCommand<S: StateStore> {
    app: App<S>,
    provider: FallbackProvider,
}

impl<S: StateStore> ImportCommand<S> {
    pub fn new(app: App<S>, provider: FallbackProvider) -> Self {
        Self { app, provider }
    }

    /// Import the terms in `path`.
    pub async fn run(&mut self, path: &Path, options: &ImportOptions) -> ImportOutput {
        let text = match read_import_file(path) {
            Ok(text) => text,
            Err(e) => return ImportOutput::failure(e.to_string()),
        };
        self.run_text(&text, options).await
    }

    /// Import the terms in `text`.
    pub async fn run_text(&mut self, text: &str, options: &ImportOptions) -> ImportOutput {
        let show_progress = options.show_progress();
        let result = self
            .app
            .import(text, &self.provider, |event| {
                if show_progress {
                    eprintln!("{}", progress_line(&event));
                }
            })
            .await;

        match result {
            Ok(report) => ImportOutput {
                success: true,
                added: report.added(),
                terms: report.words.iter().map(|w| w.term.clone()).collect(),
                skipped: report.skipped,
                error: None,
            },
            Err(e) => ImportOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ImportOutput, options: &ImportOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if !output.success {
            return format!(
                "Import failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if output.added == 0 {
            return "No terms found. Separate terms with commas or new lines.\n".to_string();
        }

        let mut lines = vec![format!(
            "Added {} word(s): {}",
            output.added,
            output.terms.join(", ")
        )];
        if !output.skipped.is_empty() {
            lines.push(format!(
                "Skipped {} term(s) over the batch limit: {}",
                output.skipped.len(),
                output.skipped.join(", ")
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::content::ContentProvider;
    use crate::core::WordContent;
    use crate::error::{MnemoError, Result};
    use crate::storage::{MemoryStateStore, StateStore};
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Offline;

    #[async_trait]
    impl ContentProvider for Offline {
        async fn generate(&self, _term: &str) -> Result<WordContent> {
            Err(MnemoError::provider("offline"))
        }

        fn name(&self) -> &'static str {
            "offline"
        }
    }

    fn command() -> (ImportCommand<Arc<MemoryStateStore>>, Arc<MemoryStateStore>) {
        let store = Arc::new(MemoryStateStore::new());
        let app = App::load(Arc::clone(&store), Config::default());
        let cmd = ImportCommand::new(app, FallbackProvider::new(Box::new(Offline)));
        (cmd, store)
    }

    #[tokio::test]
    async fn test_import_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terms.txt");
        fs::write(&path, "cat,dog\n\nfish").unwrap();

        let (mut cmd, store) = command();
        let options = ImportOptions {
            quiet: true,
            ..ImportOptions::default()
        };
        let output = cmd.run(&path, &options).await;

        assert!(output.success);
        assert_eq!(output.terms, vec!["cat", "dog", "fish"]);
        assert_eq!(store.load_words().unwrap().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_import_over_batch_limit() {
        let (mut cmd, _store) = command();
        let options = ImportOptions {
            json: true,
            ..ImportOptions::default()
        };
        let output = cmd.run_text("a,b,c,d,e,f,g", &options).await;

        assert_eq!(output.added, 5);
        assert_eq!(output.skipped, vec!["f", "g"]);

        let json: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &options)).unwrap();
        assert_eq!(json["added"], 5);
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let dir = TempDir::new().unwrap();
        let (mut cmd, store) = command();
        let options = ImportOptions::default();

        let output = cmd.run(&dir.path().join("absent.txt"), &options).await;

        assert!(!output.success);
        assert!(cmd
            .format_output(&output, &options)
            .starts_with("Import failed"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_import_nothing() {
        let (mut cmd, _store) = command();
        let options = ImportOptions::default();
        let output = cmd.run_text("\n\n", &options).await;

        assert!(output.success);
        assert!(cmd
            .format_output(&output, &options)
            .starts_with("No terms found"));
    }

    #[test]
    fn test_progress_lines() {
        assert_eq!(
            progress_line(&ImportProgress::Parsed { found: 7, batch: 5 }),
            "Found 7 term(s), importing the first 5."
        );
        assert_eq!(
            progress_line(&ImportProgress::Generating {
                index: 2,
                total: 5,
                term: "owl"
            }),
            "[2/5] Generating owl..."
        );
    }
}
