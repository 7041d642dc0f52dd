//! CLI command implementations.

pub mod config;
pub mod fetch;
pub mod info;
pub mod list;

use std::path::PathBuf;

use anyhow::Result;
use llxt_fetch::ClientConfig;
use llxt_registry::Registry;
use llxt_store::{default_config_path, Settings};
use tracing::debug;

use crate::exit::{CommandError, ExitCode};
use crate::Cli;

/// Settings and registry resolved for one invocation.
pub struct Context {
    /// Config file in use.
    pub config_path: PathBuf,
    /// Loaded settings (defaults when the file is absent).
    pub settings: Settings,
    /// Bundled registry with user sources merged in.
    pub registry: Registry,
}

impl Context {
    /// Loads settings from the configured path and builds the registry.
    pub async fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli.config.clone().unwrap_or_else(default_config_path);

        let settings = Settings::load(&config_path)
            .await
            .map_err(|e| CommandError::from_store(&e))?;

        let mut registry = Registry::bundled()?;
        let user_entries = settings
            .user_entries()
            .map_err(|e| CommandError::from_store(&e))?;
        let merged = registry
            .merge(user_entries)
            .map_err(|e| CommandError::new(ExitCode::Config, e.to_string()))?;
        debug!(
            path = %config_path.display(),
            user_sources = merged,
            total = registry.count(),
            "Resolved context"
        );

        Ok(Self {
            config_path,
            settings,
            registry,
        })
    }

    /// Client configuration with command-line overrides applied.
    pub fn client_config(&self, cli: &Cli) -> ClientConfig {
        let mut config = self.settings.to_client_config().with_verbose(cli.verbose);
        if let Some(timeout) = cli.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}
