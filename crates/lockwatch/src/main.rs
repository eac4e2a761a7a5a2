//! Lockwatch CLI (`lw`)
//!
//! Thin wrapper over lockwatch-core: parses arguments, initializes
//! logging, fetches one snapshot from the configured source, runs the
//! correlation engine, and prints the result.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use lockwatch_core::config::Config;
use lockwatch_core::logging::{LogConfig, LogFormat, init_logging};
use lockwatch_core::snapshot::{Snapshot, correlate};
use lockwatch_core::source::{Backoff, fetch_with_backoff};

mod dump_source;
mod render;

use dump_source::JsonSnapshotSource;

#[derive(Parser)]
#[command(name = "lw", version, about = "Operator view over live database lock state")]
struct Cli {
    /// Path to lockwatch.toml (defaults are used when absent)
    #[arg(long, global = true, env = "LOCKWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show every lock in the snapshot, enriched and classified
    Inspect {
        /// Snapshot dump to read (JSON form of the input batches)
        #[arg(long)]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show who waits on whom, with root blockers
    Waits {
        /// Snapshot dump to read
        #[arg(long)]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show the session and transaction overview
    Sessions {
        /// Snapshot dump to read
        #[arg(long)]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Fixed-width table, no ANSI
    Table,
    /// Machine-readable JSON
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load_or_default("lockwatch.toml")?,
    };

    let log_config = LogConfig {
        level: cli
            .log_level
            .clone()
            .unwrap_or_else(|| config.general.log_level.clone()),
        format: if cli.log_json {
            LogFormat::Json
        } else {
            config.general.log_format
        },
        file: None,
    };
    init_logging(&log_config).context("initializing logging")?;

    match cli.command {
        Command::Inspect { input, format } => {
            let snapshot = load_snapshot(&input).await?;
            match format {
                OutputFormat::Table => print!("{}", render::render_locks(&snapshot)),
                OutputFormat::Json => print_json(&snapshot)?,
            }
        }
        Command::Waits { input, format } => {
            let snapshot = load_snapshot(&input).await?;
            match format {
                OutputFormat::Table => print!("{}", render::render_waits(&snapshot)),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&snapshot.wait_edges)?);
                }
            }
        }
        Command::Sessions { input, format } => {
            let snapshot = load_snapshot(&input).await?;
            match format {
                OutputFormat::Table => print!("{}", render::render_sessions(&snapshot)),
                OutputFormat::Json => {
                    let overview = serde_json::json!({
                        "sessions": snapshot.sessions,
                        "transactions": snapshot.transactions,
                    });
                    println!("{}", serde_json::to_string_pretty(&overview)?);
                }
            }
        }
    }

    Ok(())
}

/// Fetch one snapshot from the dump file and correlate it.
async fn load_snapshot(input: &Path) -> anyhow::Result<Snapshot> {
    let mut source = JsonSnapshotSource::new(input);
    let batches = fetch_with_backoff(&mut source, &Backoff::default())
        .await
        .with_context(|| format!("reading snapshot dump {}", input.display()))?;
    tracing::debug!(
        lock_count = batches.locks.len(),
        session_count = batches.sessions.len(),
        "snapshot batches loaded"
    );
    Ok(correlate(&batches))
}

fn print_json(snapshot: &Snapshot) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(snapshot)?);
    Ok(())
}
