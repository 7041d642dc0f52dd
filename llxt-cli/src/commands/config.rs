//! Config command - inspect and create the config file.

use anyhow::Result;
use clap::{Args, Subcommand};
use llxt_store::{default_config_dir, default_config_path, Settings};
use tracing::info;

use super::Context;
use crate::exit::{CommandError, ExitCode};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Write a config file with default settings.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Init { force } => init_config(cli, *force).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli).await?;
    let client = ctx.client_config(cli);

    match cli.format {
        OutputFormat::Text => {
            println!("llxt Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config file:     {}", ctx.config_path.display());
            println!("Timeout:         {:?}", client.timeout);
            println!("Retry count:     {}", client.retry_count);
            println!(
                "Retry wait:      {:?} - {:?}",
                client.retry_wait, client.retry_max_wait
            );
            println!(
                "Circuit breaker: open after {} failures, close after {} successes, reset {:?}",
                client.breaker.failure_threshold,
                client.breaker.success_threshold,
                client.breaker.reset_timeout
            );
            println!(
                "Sources:         {} ({} from config)",
                ctx.registry.count(),
                ctx.settings.sources.len()
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let output = serde_json::json!({
                "configFile": ctx.config_path.display().to_string(),
                "settings": ctx.settings,
                "effective": {
                    "timeoutMs": duration_ms(client.timeout),
                    "retryCount": client.retry_count,
                    "retryWaitMs": duration_ms(client.retry_wait),
                    "retryMaxWaitMs": duration_ms(client.retry_max_wait),
                    "verbose": client.verbose,
                },
                "sourceCount": ctx.registry.count(),
            });
            println!("{}", formatter.format(&output)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let exists = config_path.exists();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:  {}", config_dir.display());
            println!(
                "Config file: {}{}",
                config_path.display(),
                if exists { "" } else { " (not created)" }
            );
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "configDir": config_dir.display().to_string(),
                "configFile": config_path.display().to_string(),
                "exists": exists,
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let path = cli.config.clone().unwrap_or_else(default_config_path);

    if path.exists() && !force {
        return Err(CommandError::new(
            ExitCode::Config,
            format!("Config file already exists: {}", path.display()),
        )
        .with_hint("Pass --force to overwrite it")
        .into());
    }

    Settings::default()
        .save(&path)
        .await
        .map_err(|e| CommandError::new(ExitCode::Config, format!("Failed to write config: {e}")))?;

    info!(path = %path.display(), "Wrote default config");
    if !cli.quiet {
        println!("Created {}", path.display());
    }
    Ok(())
}

fn duration_ms(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
