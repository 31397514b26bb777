//! Journal CLI - inspect journal files and run commands inside a journaled context.

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use journal_core::{Config, JournalError};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "journal")]
#[command(about = "Structured event journal tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the entries of a journal
    Dump {
        /// Journal file
        file: PathBuf,
        /// Render entries as an indented timeline instead of raw JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Show entry counts by type, level and thread
    Stats {
        /// Journal file
        file: PathBuf,
    },
    /// Check timestamps and context pairing
    Verify {
        /// Journal file
        file: PathBuf,
    },
    /// Run a command inside a journal context
    Run {
        /// Journal file to write (defaults to [journal] path in journal.toml)
        #[arg(short, long)]
        journal: Option<PathBuf>,
        /// Context title (defaults to the command line)
        #[arg(short, long)]
        title: Option<String>,
        /// Command and arguments
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
}

fn main() -> Result<()> {
    let config = Config::load(&std::env::current_dir()?);

    // Respects RUST_LOG, falling back to [logging] filter from journal.toml
    let default_filter = config
        .as_ref()
        .map(|c| c.logging.filter.clone())
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config.unwrap_or_else(|e| {
        tracing::warn!("Ignoring journal.toml: {}", e);
        Config::default()
    });

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Dump { file, pretty } => commands::dump::run(&file, pretty),
        Commands::Stats { file } => commands::stats::run(&file),
        Commands::Verify { file } => commands::verify::run(&file),
        Commands::Run {
            journal,
            title,
            command,
        } => match commands::run::run(&config, journal, title.as_deref(), &command) {
            Ok(0) => Ok(()),
            Ok(code) => std::process::exit(code),
            Err(e) => Err(e),
        },
    };

    if let Err(e) = &result {
        if let Some(hint) = e
            .downcast_ref::<JournalError>()
            .and_then(JournalError::recovery_suggestion)
        {
            eprintln!("{} {}", style("hint:").cyan(), hint);
        }
    }
    result
}
