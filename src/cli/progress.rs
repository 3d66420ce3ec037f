//! Progress command for Mnemosyne.
//!
//! Shows the cumulative study stats and the library size.

use serde::Serialize;

use crate::app::App;
use crate::stats::UserStats;
use crate::storage::StateStore;

/// Options for the progress command.
#[derive(Debug, Clone, Default)]
pub struct ProgressOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the progress command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOutput {
    pub success: bool,
    #[serde(flatten)]
    pub stats: UserStats,
    /// Number of words in the library.
    pub library_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The progress command implementation.
pub struct ProgressCommand<S: StateStore> {
    app: App<S>,
}

impl<S: StateStore> ProgressCommand<S> {
    pub fn new(app: App<S>) -> Self {
        Self { app }
    }

    /// Run the progress command.
    pub fn run(&mut self, _options: &ProgressOptions) -> ProgressOutput {
        match self.app.open_progress() {
            Ok(()) => ProgressOutput {
                success: true,
                stats: self.app.stats(),
                library_size: self.app.words().size(),
                error: None,
            },
            Err(e) => ProgressOutput {
                success: false,
                stats: UserStats::default(),
                library_size: 0,
                error: Some(e.to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ProgressOutput, options: &ProgressOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &ProgressOutput) -> String {
        if !output.success {
            return format!(
                "Progress unavailable: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let stats = &output.stats;
        let lines = [
            "Mnemosyne progress".to_string(),
            String::new(),
            format!("  Study time:     {}", format_duration(stats.today_duration)),
            format!("  Correct:        {}", stats.today_count),
            format!("  Mastered:       {}", stats.total_mastered),
            format!("  Streak:         {} day(s)", stats.streak),
            format!("  Library:        {} word(s)", output.library_size),
        ];
        lines.join("\n")
    }
}

/// Render seconds as `1h 02m 03s`, `2m 05s` or `45s`.
pub fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}
