//! List command for Mnemosyne.
//!
//! Lists the words in the library.

use chrono::DateTime;
use serde::Serialize;

use crate::app::App;
use crate::core::Word;
use crate::storage::StateStore;

/// Options for the list command.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Maximum number of words.
    pub limit: Option<usize>,
}

/// Output format for the list command.
#[derive(Debug, Clone, Serialize)]
pub struct ListOutput {
    pub success: bool,
    /// Number of words listed.
    pub count: usize,
    /// Number of words in the library.
    pub total: usize,
    pub words: Vec<WordInfo>,
}

/// Summary row for one word.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInfo {
    pub id: String,
    pub term: String,
    pub definition: String,
    pub status: String,
    /// `YYYY-MM-DD`, or `never`.
    pub last_review: String,
    pub error_count: u32,
}

impl WordInfo {
    pub fn from_word(word: &Word) -> Self {
        Self {
            id: word.id.clone(),
            term: word.term.clone(),
            definition: word.definition.clone(),
            status: word.status.as_str().to_string(),
            last_review: format_review_date(word.last_review),
            error_count: word.error_count,
        }
    }
}

/// Format an epoch-seconds review time as a date.
pub fn format_review_date(secs: i64) -> String {
    if secs <= 0 {
        return "never".to_string();
    }
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "never".to_string())
}

/// The list command implementation.
pub struct ListCommand<S: StateStore> {
    app: App<S>,
}

impl<S: StateStore> ListCommand<S> {
    pub fn new(app: App<S>) -> Self {
        Self { app }
    }

    /// Run the list command.
    pub fn run(&self, options: &ListOptions) -> ListOutput {
        let total = self.app.words().size();
        let limit = options.limit.unwrap_or(total);
        let words: Vec<WordInfo> = self
            .app
            .words()
            .iter()
            .take(limit)
            .map(WordInfo::from_word)
            .collect();

        ListOutput {
            success: true,
            count: words.len(),
            total,
            words,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ListOutput, options: &ListOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &ListOutput) -> String {
        if output.words.is_empty() {
            return "The library is empty. Import some words first.\n".to_string();
        }

        let mut lines = Vec::new();
        if output.count < output.total {
            lines.push(format!(
                "Showing {} of {} word(s):\n",
                output.count, output.total
            ));
        } else {
            lines.push(format!("{} word(s):\n", output.total));
        }

        for (i, word) in output.words.iter().enumerate() {
            lines.push(format!("{}. {}  {}", i + 1, word.term, word.definition));
            let misses = if word.error_count > 0 {
                format!(" | Missed: {}", word.error_count)
            } else {
                String::new()
            };
            lines.push(format!(
                "   Status: {} | Last review: {}{} | ID: {}",
                word.status, word.last_review, misses, word.id
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::MemoryStateStore;

    fn seeded_command() -> ListCommand<MemoryStateStore> {
        ListCommand::new(App::load(MemoryStateStore::new(), Config::default()))
    }

    #[test]
    fn test_list_all() {
        let cmd = seeded_command();
        let output = cmd.run(&ListOptions::default());

        assert!(output.success);
        assert_eq!(output.count, 3);
        assert_eq!(output.words[0].term, "Serendipity");
        assert_eq!(output.words[0].last_review, "never");
        assert_eq!(output.words[0].status, "new");
    }

    #[test]
    fn test_list_limit() {
        let cmd = seeded_command();
        let options = ListOptions {
            limit: Some(2),
            ..ListOptions::default()
        };
        let output = cmd.run(&options);

        assert_eq!(output.count, 2);
        assert_eq!(output.total, 3);
        assert!(cmd
            .format_output(&output, &options)
            .starts_with("Showing 2 of 3"));
    }

    #[test]
    fn test_list_empty_library() {
        let store = MemoryStateStore::with_words(Vec::new());
        let cmd = ListCommand::new(App::load(store, Config::default()));
        let options = ListOptions::default();
        let output = cmd.run(&options);

        assert_eq!(output.count, 0);
        assert!(cmd.format_output(&output, &options).contains("empty"));
    }

    #[test]
    fn test_list_json() {
        let cmd = seeded_command();
        let options = ListOptions {
            json: true,
            ..ListOptions::default()
        };
        let output = cmd.run(&options);
        let json: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &options)).unwrap();

        assert_eq!(json["count"], 3);
        assert_eq!(json["words"][2]["term"], "Labyrinth");
        assert_eq!(json["words"][2]["errorCount"], 0);
    }

    #[test]
    fn test_format_review_date() {
        assert_eq!(format_review_date(0), "never");
        assert_eq!(format_review_date(1_700_000_000), "2023-11-14");
    }
}
