//! Store error types.

use std::path::PathBuf;

use llxt_core::CoreError;
use thiserror::Error;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for the expected shape.
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },

    /// Settings could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    /// A configured source is unusable.
    #[error("Invalid source in config: {0}")]
    InvalidSource(#[from] CoreError),
}

impl StoreError {
    /// Returns true if the error came from a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
