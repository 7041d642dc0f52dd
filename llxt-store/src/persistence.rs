//! File persistence helpers.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::StoreError;

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "sources.toml";

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/.config/llxt`
/// - Linux: `$XDG_CONFIG_HOME/llxt` (usually `~/.config/llxt`)
/// - Windows: `%APPDATA%\llxt`
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join(".config").join("llxt"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .map(|c| c.join("llxt"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join(CONFIG_FILE_NAME)
}

// ============================================================================
// File Operations
// ============================================================================

/// Loads data from a TOML file.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read and
/// [`StoreError::Parse`] if its contents do not match `T`.
pub async fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    debug!(path = %path.display(), "Loading TOML file");

    let content = tokio::fs::read_to_string(path).await?;
    toml::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads data from a TOML file, returning the default if it does not exist.
///
/// # Errors
///
/// Any failure other than a missing file is returned.
pub async fn load_toml_or_default<T: DeserializeOwned + Default>(
    path: &Path,
) -> Result<T, StoreError> {
    match load_toml(path).await {
        Ok(data) => Ok(data),
        Err(e) if e.is_not_found() => {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

/// Saves data to a TOML file.
///
/// Creates parent directories, writes via a temp file and rename, and
/// restricts the file to the owner on Unix.
///
/// # Errors
///
/// Returns [`StoreError`] on serialization or IO failure.
pub async fn save_toml<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving TOML file");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let content = toml::to_string_pretty(data)?;

    let temp_path = path.with_extension("toml.tmp");
    tokio::fs::write(&temp_path, &content).await?;
    tokio::fs::rename(&temp_path, path).await?;

    set_owner_only(path).await?;
    Ok(())
}

#[cfg(unix)]
async fn set_owner_only(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn set_owner_only(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
