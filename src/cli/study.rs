//! Study command for Mnemosyne.
//!
//! Runs an interactive session in the terminal. Each card lists its options
//! by number; an answer can be given by number or by typing the option
//! text. `d` opens the word detail, where `c` asks for a new memory hook.
//! `q` leaves the session. After the last card the mistake review offers
//! `r` to retry and `h` to go home.

use std::io::Write;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use super::show::WordDetail;
use crate::app::{App, Page};
use crate::content::FallbackProvider;
use crate::core::{Feedback, ReviewState};
use crate::error::Result;
use crate::stats::UserStats;
use crate::storage::StateStore;

/// What the user typed on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CardInput {
    /// Zero-based option index.
    Choice(usize),
    Text(String),
    Details,
    Quit,
}

fn parse_card_input(line: &str) -> CardInput {
    match line {
        "d" | "D" => CardInput::Details,
        "q" | "Q" => CardInput::Quit,
        _ => match line.parse::<usize>() {
            Ok(n) if n >= 1 => CardInput::Choice(n - 1),
            _ => CardInput::Text(line.to_string()),
        },
    }
}

/// Summary of a study run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyOutput {
    pub success: bool,
    /// Sessions started, retries included.
    pub sessions: usize,
    pub answered: usize,
    pub correct: usize,
    pub stats: UserStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The study command implementation.
pub struct StudyCommand<S: StateStore> {
    app: App<S>,
    provider: FallbackProvider,
    output: StudyOutput,
}

impl<S: StateStore> StudyCommand<S> {
    /// `provider` backs the regenerate action in the detail view.
    pub fn new(app: App<S>, provider: FallbackProvider) -> Self {
        Self {
            app,
            provider,
            output: StudyOutput::default(),
        }
    }

    /// Run sessions until the user goes home or input ends.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> StudyOutput
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.output = StudyOutput::default();
        let result = self.drive(input.lines(), out).await;
        self.conclude(result)
    }

    /// Stop a run cut short from outside, such as by Ctrl-C.
    pub fn interrupt(&mut self) -> StudyOutput {
        self.conclude(Ok(()))
    }

    fn conclude(&mut self, result: Result<()>) -> StudyOutput {
        // Leaving mid-session still keeps the time studied so far.
        if self.app.page() != Page::Home {
            let _ = self.app.home();
        }

        let mut output = std::mem::take(&mut self.output);
        output.stats = self.app.stats();
        match result {
            Ok(()) => output.success = true,
            Err(e) => output.error = Some(e.to_string()),
        }
        output
    }

    async fn drive<R, W>(&mut self, mut lines: Lines<R>, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.app.start_session()?;
        self.output.sessions = 1;

        loop {
            match self.app.page() {
                Page::Study => {
                    self.render_card(out)?;
                    let Some(line) = lines.next_line().await? else {
                        return Ok(());
                    };
                    match parse_card_input(line.trim()) {
                        CardInput::Quit => return Ok(()),
                        CardInput::Details => {
                            if !self.details(&mut lines, out).await? {
                                return Ok(());
                            }
                        }
                        CardInput::Choice(index) => match self.app.select_index(index) {
                            Ok(Some(feedback)) => self.answered(feedback, out).await?,
                            Ok(None) => {}
                            Err(_) => writeln!(out, "No option {}.", index + 1)?,
                        },
                        CardInput::Text(text) => {
                            let known = self
                                .app
                                .session()
                                .is_some_and(|s| s.options().iter().any(|o| *o == text));
                            if known {
                                if let Some(feedback) = self.app.select(&text)? {
                                    self.answered(feedback, out).await?;
                                }
                            } else {
                                writeln!(out, "Pick an option number, d for details or q to quit.")?;
                            }
                        }
                    }
                }
                Page::MistakeReview => {
                    let has_mistakes = self.render_review(out)?;
                    let Some(line) = lines.next_line().await? else {
                        return Ok(());
                    };
                    match line.trim() {
                        "r" | "R" if has_mistakes => {
                            self.app.retry()?;
                            self.output.sessions += 1;
                        }
                        "h" | "H" | "q" | "Q" => return Ok(()),
                        _ => {}
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Detail side view of the current card.
    ///
    /// Returns `false` when the user quits or input ends.
    async fn details<R, W>(&mut self, lines: &mut Lines<R>, out: &mut W) -> Result<bool>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut detail = WordDetail::from_word(self.app.view_details()?, true);
        loop {
            writeln!(out, "\n{}\n", detail.render())?;
            writeln!(out, "  c) change method   b) back   q) quit")?;
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                return Ok(false);
            };
            match line.trim() {
                "c" | "C" => {
                    writeln!(out, "Generating a new hook...")?;
                    let word = self.app.regenerate_detail(&self.provider).await?;
                    detail = WordDetail::from_word(word, true);
                }
                "q" | "Q" => return Ok(false),
                _ => {
                    self.app.back()?;
                    return Ok(true);
                }
            }
        }
    }

    /// Show feedback, hold it for its delay, then move on.
    async fn answered<W: Write>(&mut self, feedback: Feedback, out: &mut W) -> Result<()> {
        self.output.answered += 1;
        if feedback.correct {
            self.output.correct += 1;
            writeln!(out, "  ✓ {}", feedback.message)?;
        } else {
            writeln!(out, "  ✗ {}", feedback.message)?;
        }
        out.flush()?;

        tokio::time::sleep(feedback.advance_after).await;
        self.app.advance()?;
        Ok(())
    }

    fn render_card<W: Write>(&self, out: &mut W) -> Result<()> {
        let Some(session) = self.app.session() else {
            return Ok(());
        };
        let Some(word) = session.current_word() else {
            return Ok(());
        };

        writeln!(
            out,
            "\n[{}/{}] {}",
            session.current_index() + 1,
            session.len(),
            word.term
        )?;
        for (i, option) in session.options().iter().enumerate() {
            writeln!(out, "  {}) {}", i + 1, option)?;
        }
        writeln!(out, "  d) details   q) quit")?;
        write!(out, "> ")?;
        out.flush()?;
        Ok(())
    }

    /// Returns whether there is anything to retry.
    fn render_review<W: Write>(&self, out: &mut W) -> Result<bool> {
        let Some(review) = self.app.review() else {
            return Ok(false);
        };

        match review.state() {
            ReviewState::Mistakes => {
                writeln!(out, "\nMistakes to revisit:")?;
                for entry in review.entries() {
                    writeln!(out, "  {}  {}", entry.term, entry.correction)?;
                }
                writeln!(out, "  r) {}   h) home", review.retry_label())?;
            }
            ReviewState::NoMistakes => {
                writeln!(out, "\nNo mistakes this round.")?;
                writeln!(out, "  h) home")?;
            }
        }
        write!(out, "> ")?;
        out.flush()?;
        Ok(review.state() == ReviewState::Mistakes)
    }
}

/// Closing line printed after a study run.
pub fn format_summary(output: &StudyOutput) -> String {
    if let Some(error) = &output.error {
        return format!("Study stopped: {}\n", error);
    }
    format!(
        "\n{} of {} correct. Study time: {}.",
        output.correct,
        output.answered,
        super::progress::format_duration(output.stats.today_duration)
    )
}
