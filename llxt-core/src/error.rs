//! Core error types for llxt.

use thiserror::Error;

/// Core error type for llxt operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An entry is missing a required field or carries an unusable URL.
    #[error("Invalid entry {key:?}: {reason}")]
    InvalidEntry {
        /// Key of the offending entry.
        key: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid entry error.
    pub fn invalid_entry(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
