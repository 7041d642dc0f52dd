//! List command - show registry sources.

use anyhow::Result;
use clap::Args;
use tracing::debug;

use super::Context;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the list command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show sources in this category (case-insensitive).
    #[arg(long)]
    pub category: Option<String>,

    /// Print the known categories instead of sources.
    #[arg(long, conflicts_with = "category")]
    pub categories: bool,
}

/// Runs the list command.
pub async fn run(args: &ListArgs, cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli).await?;
    let registry = &ctx.registry;

    if args.categories {
        let categories = registry.categories();
        match cli.format {
            OutputFormat::Text => {
                for category in categories {
                    println!("{category}");
                }
            }
            OutputFormat::Json => {
                println!("{}", JsonFormatter::new(cli.pretty).format(&categories)?);
            }
        }
        return Ok(());
    }

    let entries = match &args.category {
        Some(category) => registry.list_by_category(category),
        None => registry.list(),
    };
    debug!(count = entries.len(), category = ?args.category, "Listing sources");

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_entries_header());
            println!("{}", "─".repeat(70));
            for entry in &entries {
                println!("{}", formatter.format_entry_line(entry));
            }
            println!();
            println!(
                "{}",
                formatter.format_total(entries.len(), args.category.as_deref())
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format_entries(&entries, args.category.as_deref())?
            );
        }
    }

    Ok(())
}
