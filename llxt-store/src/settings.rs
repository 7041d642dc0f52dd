//! User settings.
//!
//! Mirrors the `sources.toml` layout:
//!
//! ```toml
//! [http]
//! timeout_secs = 30
//! retry_count = 3
//!
//! [breaker]
//! failure_threshold = 3
//!
//! [sources.mylib]
//! name = "My Lib"
//! llms_url = "https://mylib.dev/llms.txt"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use llxt_core::{CoreError, Entry};
use llxt_fetch::config::{
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_RESET_TIMEOUT, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_MAX_WAIT,
    DEFAULT_RETRY_WAIT, DEFAULT_SUCCESS_THRESHOLD, DEFAULT_TIMEOUT,
};
use llxt_fetch::{BreakerConfig, ClientConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::StoreError;
use crate::persistence::{load_toml_or_default, save_toml};

// ============================================================================
// Settings Types
// ============================================================================

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP client settings.
    pub http: HttpSettings,

    /// Circuit breaker settings.
    pub breaker: BreakerSettings,

    /// User-defined sources, keyed by lookup key.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<String, SourceSettings>,
}

/// `[http]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,
    /// Re-attempts after the first request.
    pub retry_count: u32,
    /// Base backoff in milliseconds.
    pub retry_wait_ms: u64,
    /// Max backoff in milliseconds.
    pub retry_max_wait_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            retry_count: DEFAULT_RETRY_COUNT,
            retry_wait_ms: duration_ms(DEFAULT_RETRY_WAIT),
            retry_max_wait_ms: duration_ms(DEFAULT_RETRY_MAX_WAIT),
        }
    }
}

/// `[breaker]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerSettings {
    /// Consecutive failures that open the breaker.
    pub failure_threshold: u32,
    /// Consecutive half-open successes that close it.
    pub success_threshold: u32,
    /// Seconds the breaker stays open.
    pub reset_timeout_secs: u64,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
            reset_timeout_secs: DEFAULT_RESET_TIMEOUT.as_secs(),
        }
    }
}

/// A `[sources.<key>]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Display name; defaults to the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// URL of the `llms.txt` file.
    pub llms_url: String,
    /// URL of the `llms-full.txt` file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llms_full_url: Option<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category for listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Settings Implementation
// ============================================================================

impl Settings {
    /// Loads settings from `path`; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let settings: Self = load_toml_or_default(path).await?;
        debug!(
            path = %path.display(),
            sources = settings.sources.len(),
            "Loaded settings"
        );
        Ok(settings)
    }

    /// Writes settings to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on serialization or IO failure.
    pub async fn save(&self, path: &Path) -> Result<(), StoreError> {
        save_toml(path, self).await
    }

    /// Builds the HTTP client configuration these settings describe.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_timeout(Duration::from_secs(self.http.timeout_secs))
            .with_retry_count(self.http.retry_count)
            .with_retry_wait(
                Duration::from_millis(self.http.retry_wait_ms),
                Duration::from_millis(self.http.retry_max_wait_ms),
            )
            .with_breaker(BreakerConfig {
                failure_threshold: self.breaker.failure_threshold,
                success_threshold: self.breaker.success_threshold,
                reset_timeout: Duration::from_secs(self.breaker.reset_timeout_secs),
                ..BreakerConfig::default()
            })
    }

    /// Converts the user sources into registry entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidSource`] for the first source whose URL
    /// does not parse or that fails entry validation.
    pub fn user_entries(&self) -> Result<Vec<Entry>, StoreError> {
        self.sources
            .iter()
            .map(|(key, source)| source.to_entry(key).map_err(StoreError::from))
            .collect()
    }
}

impl SourceSettings {
    /// Creates a source with just an `llms.txt` URL.
    pub fn new(llms_url: impl Into<String>) -> Self {
        Self {
            name: None,
            llms_url: llms_url.into(),
            llms_full_url: None,
            description: None,
            category: None,
        }
    }

    /// Builds a validated entry for `key`. The domain is taken from the URL host.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidEntry`] if the entry is unusable.
    pub fn to_entry(&self, key: &str) -> Result<Entry, CoreError> {
        let domain = Url::parse(&self.llms_url)
            .map_err(|e| CoreError::invalid_entry(key, format!("llms_url: {e}")))?
            .host_str()
            .map(str::to_string)
            .unwrap_or_default();

        let mut entry = Entry::new(
            key.to_lowercase(),
            self.name.clone().unwrap_or_else(|| key.to_string()),
            domain,
            self.llms_url.clone(),
        );
        entry.llms_full_url.clone_from(&self.llms_full_url);
        entry.description.clone_from(&self.description);
        entry.category.clone_from(&self.category);

        entry.validate()?;
        Ok(entry)
    }
}

// ============================================================================
// Tests
// ============================================================================
