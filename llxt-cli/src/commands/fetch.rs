//! Fetch command - print a source's llms.txt.

use std::io::Write;
use std::path::Path;

use anyhow::{Context as _, Result};
use clap::Args;
use llxt_fetch::Fetcher;
use tracing::{debug, info};

use super::Context;
use crate::exit::CommandError;
use crate::output::Spinner;
use crate::Cli;

/// Arguments for the fetch command.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Source name, as shown by `llxt list`.
    pub name: Option<String>,

    /// Fetch llms-full.txt if available.
    #[arg(long, short)]
    pub full: bool,
}

/// Runs the fetch command.
pub async fn run(args: &FetchArgs, cli: &Cli) -> Result<()> {
    let name = match args.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return Err(CommandError::missing_name("fetch").into()),
    };

    let ctx = Context::load(cli).await?;
    let entry = ctx
        .registry
        .lookup(name)
        .map_err(|e| CommandError::from_registry(name, &e))?;

    if args.full && !entry.has_full() {
        debug!(key = %entry.key, "No llms-full.txt published, using llms.txt");
    }

    let fetcher = Fetcher::new(Some(ctx.client_config(cli)));

    let spinner = if cli.quiet {
        Spinner::hidden()
    } else {
        Spinner::start(format!("Fetching {name}..."))
    };

    let result = fetcher
        .fetch_llms_txt_or_cancel(&entry.llms_url, entry.full_url(), args.full, ctrl_c())
        .await;
    fetcher.close();

    let content = match result {
        Ok(content) => {
            spinner.finish_done(format!("Fetched {name}"));
            content
        }
        Err(e) => {
            spinner.finish_errored(format!("Failed to fetch {name}"));
            return Err(CommandError::from_fetch(&e).into());
        }
    };

    match &cli.output {
        Some(path) => write_file(path, &content).await,
        None => write_stdout(&content),
    }
}

async fn write_file(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = content.len(), "Wrote content");
    Ok(())
}

fn write_stdout(content: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
