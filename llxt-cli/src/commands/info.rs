//! Info command - show one source.

use anyhow::Result;
use clap::Args;

use super::Context;
use crate::exit::CommandError;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the info command.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Source name, as shown by `llxt list`.
    pub name: Option<String>,
}

/// Runs the info command.
pub async fn run(args: &InfoArgs, cli: &Cli) -> Result<()> {
    let name = match args.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return Err(CommandError::missing_name("info").into()),
    };

    let ctx = Context::load(cli).await?;
    let entry = ctx
        .registry
        .lookup(name)
        .map_err(|e| CommandError::from_registry(name, &e))?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_entry_details(entry));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_entry(entry)?);
        }
    }

    Ok(())
}
