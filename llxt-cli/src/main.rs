// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! llxt - fetch llms.txt files for AI agents.
//!
//! # Examples
//!
//! ```bash
//! # Print a source's llms.txt
//! llxt fetch hono
//!
//! # Prefer llms-full.txt when the source has one
//! llxt fetch svelte --full
//!
//! # Save to a file instead of stdout
//! llxt fetch anthropic -o anthropic.txt
//!
//! # Browse the registry
//! llxt list --category AI
//! llxt info model-context-protocol --format json
//! ```

mod commands;
mod duration;
mod exit;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{config, fetch, info, list};
use exit::{CommandError, ExitCode};
use output::TextFormatter;

// ============================================================================
// CLI Definition
// ============================================================================

/// llxt - fetch llms.txt files for AI agents.
#[derive(Parser)]
#[command(name = "llxt")]
#[command(about = "Fetch llms.txt files for AI agents")]
#[command(long_about = r#"
llxt looks up a documentation source in its registry and prints the
source's llms.txt (or llms-full.txt) to stdout, ready to pipe into an
AI agent.

Examples:
  llxt fetch hono               # llms.txt for Hono
  llxt fetch svelte --full      # llms-full.txt when available
  llxt list                     # All known sources
  llxt info anthropic           # Details for one source
"#)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path.
    #[arg(long, short, global = true, env = "LLXT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write fetched content to this file instead of stdout.
    #[arg(long, short, global = true, env = "LLXT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Verbose output (log request and response details).
    #[arg(
        long,
        short,
        global = true,
        env = "LLXT_VERBOSE",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub verbose: bool,

    /// Per-request timeout, e.g. 30s, 500ms, 2m.
    #[arg(long, global = true, env = "LLXT_TIMEOUT", value_parser = duration::parse_duration)]
    pub timeout: Option<Duration>,

    /// Quiet mode (no spinner, no logs).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Output format for listings (text or json).
    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch llms.txt for a tool or framework.
    #[command(visible_alias = "f")]
    Fetch(fetch::FetchArgs),

    /// List registry sources.
    #[command(visible_alias = "ls")]
    List(list::ListArgs),

    /// Show details for one source.
    Info(info::InfoArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("llxt=debug,info")
        } else {
            EnvFilter::new("llxt=warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Fetch(args) => fetch::run(args, &cli).await,
        Commands::List(args) => list::run(args, &cli).await,
        Commands::Info(args) => info::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        let code = exit::code_for(&e);
        if !cli.quiet {
            let formatter = TextFormatter::new(!cli.no_color);
            let hint = e.downcast_ref::<CommandError>().and_then(CommandError::hint);
            eprintln!("{}", formatter.format_error(&format!("{e:#}"), hint));
        }
        std::process::exit(code as i32);
    }

    std::process::exit(ExitCode::Success as i32);
}
