//! Palaver - chat backend with an idle-evicting conversation cache
//!
//! Main entry point for the Palaver CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use palaver_config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;

mod commands;

use commands::{ask, chat, config};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Palaver - chat backend with an idle-evicting conversation cache
#[derive(Parser)]
#[command(name = "palaver")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a one-shot question
    Ask(ask::AskArgs),

    /// Enter interactive chat mode (REPL)
    Chat(chat::ChatArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = palaver_config::load_config(None)?;
    let _guard = init_tracing(&loaded.config.logging(), cli.verbose);

    for warning in &loaded.warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let ctx = commands::Context {
        config: loaded,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Ask(args) => ask::run(args, &ctx).await,
        Commands::Chat(args) => chat::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}

/// Console (human-readable, stderr) + optional rotating JSON file.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
fn init_tracing(logging: &LoggingConfig, verbose: bool) -> Option<WorkerGuard> {
    use tracing_subscriber::prelude::*;

    let console_filter = if verbose {
        "palaver=debug,palaver_chat=debug,palaver_session=debug,palaver_config=debug,info"
            .to_string()
    } else {
        let level = &logging.level;
        format!("palaver={level},palaver_chat={level},palaver_session={level},warn")
    };

    let (file_layer, guard) = if logging.json_file {
        let log_dir = logging
            .directory
            .clone()
            .or_else(|| palaver_config::config_dir().map(|d| d.join("logs")))
            .unwrap_or_else(|| PathBuf::from("logs"));
        let file_appender = tracing_appender::rolling::daily(&log_dir, "palaver.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_filter(tracing_subscriber::EnvFilter::new(
                "palaver=trace,palaver_chat=trace,palaver_session=trace,palaver_config=trace,info",
            ));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(console_filter)),
        )
        .with(file_layer)
        .init();

    guard
}
