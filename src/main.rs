//! Mnemosyne - vocabulary flashcard trainer
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mnemosyne::cli::import_cmd::{ImportCommand, ImportOptions};
use mnemosyne::cli::list::{ListCommand, ListOptions};
use mnemosyne::cli::progress::{ProgressCommand, ProgressOptions};
use mnemosyne::cli::regenerate::{RegenerateCommand, RegenerateOptions};
use mnemosyne::cli::show::{ShowCommand, ShowOptions};
use mnemosyne::cli::study::{format_summary, StudyCommand};
use mnemosyne::config::{crash_log_path, Config};
use mnemosyne::content::{FallbackProvider, GeminiProvider};
use mnemosyne::error::exit_codes;
use mnemosyne::storage::FileStateStore;
use mnemosyne::App;

// =============================================================================
// CLI Definition
// =============================================================================

/// Mnemosyne - vocabulary flashcard trainer
#[derive(Parser)]
#[command(name = "mnemosyne")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Study a random sample of the library, then review mistakes
    Study,

    /// Import terms from a text file (comma or newline separated)
    Import {
        /// File with the terms
        file: PathBuf,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show study stats and library size
    Progress {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// List the words in the library
    List {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Maximum number of words
        #[arg(long, short)]
        limit: Option<usize>,
    },

    /// Show one word and its memory hook
    Show {
        /// Word ID
        id: String,
        /// Include the deeper explanation and comparison
        #[arg(long)]
        deep: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Generate new content for an existing word
    Regenerate {
        /// Word ID
        id: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    setup_panic_handler();
    init_logging();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("mnemosyne error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Log to stderr, filtered by `MNEMOSYNE_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("MNEMOSYNE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Set up the global panic handler.
///
/// On panic, logs to `<home>/crash.log` and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("mnemosyne panic: {}", info);

        if let Some(crash_log) = crash_log_path() {
            if let Some(dir) = crash_log.parent() {
                let _ = std::fs::create_dir_all(dir);
            }
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Run the CLI and return the exit code.
async fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load();
    let app = App::load(FileStateStore::new()?, config);

    match cli.command {
        Commands::Study => run_study(app).await,
        Commands::Import { file, json, quiet } => run_import(app, &file, json, quiet).await,
        Commands::Progress { json } => run_progress(app, json),
        Commands::List { json, limit } => run_list(app, json, limit),
        Commands::Show { id, deep, json } => run_show(app, &id, deep, json),
        Commands::Regenerate { id, json } => run_regenerate(app, &id, json).await,
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

type FileApp = App<FileStateStore>;

fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

fn print_output(formatted: &str) {
    if !formatted.is_empty() {
        println!("{}", formatted);
    }
}

fn content_provider(app: &FileApp) -> FallbackProvider {
    FallbackProvider::new(Box::new(GeminiProvider::new(&app.config().provider)))
}

async fn run_study(app: FileApp) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let provider = content_provider(&app);
    let mut cmd = StudyCommand::new(app, provider);
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    let finished = tokio::select! {
        output = cmd.run(input, &mut stdout) => Some(output),
        _ = tokio::signal::ctrl_c() => None,
    };
    let output = match finished {
        Some(output) => output,
        None => {
            tracing::debug!("study interrupted");
            cmd.interrupt()
        }
    };
    println!("{}", format_summary(&output));

    Ok(success_to_exit_code(output.success))
}

async fn run_import(
    app: FileApp,
    file: &Path,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let provider = content_provider(&app);
    let mut cmd = ImportCommand::new(app, provider);
    let options = ImportOptions { json, quiet };

    let output = cmd.run(file, &options).await;
    print_output(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_progress(app: FileApp, json: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut cmd = ProgressCommand::new(app);
    let options = ProgressOptions { json, quiet: false };

    let output = cmd.run(&options);
    print_output(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_list(
    app: FileApp,
    json: bool,
    limit: Option<usize>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cmd = ListCommand::new(app);
    let options = ListOptions {
        json,
        quiet: false,
        limit,
    };

    let output = cmd.run(&options);
    print_output(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_show(
    app: FileApp,
    id: &str,
    deep: bool,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cmd = ShowCommand::new(app);
    let options = ShowOptions {
        json,
        quiet: false,
        deep,
    };

    let output = cmd.run(id, &options);
    print_output(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

async fn run_regenerate(
    app: FileApp,
    id: &str,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let provider = content_provider(&app);
    let mut cmd = RegenerateCommand::new(app, provider);
    let options = RegenerateOptions { json, quiet: false };

    let output = cmd.run(id, &options).await;
    print_output(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

// =============================================================================
// Tests
// =============================================================================
