//! Registry error types.

use llxt_core::CoreError;
use thiserror::Error;

/// Hint shown when a lookup misses.
pub const LOOKUP_HINT: &str =
    "Use 'llxt list' to see available sources, or add one under [sources.<key>] in the config file";

/// Errors from building or querying a [`Registry`](crate::Registry).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No entry with this key.
    #[error("source {key:?} not found in registry")]
    NotFound {
        /// Key as given by the caller.
        key: String,
    },

    /// Registry JSON could not be parsed.
    #[error("Invalid registry data in {file}: {source}")]
    Data {
        /// Which data set failed.
        file: &'static str,
        /// Parse error.
        #[source]
        source: serde_json::Error,
    },

    /// An entry failed validation.
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

impl RegistryError {
    /// Returns an advisory hint for the caller, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            RegistryError::NotFound { .. } => Some(LOOKUP_HINT),
            _ => None,
        }
    }

    /// Returns true for lookup misses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_hint_points_at_existing_commands() {
        let err = RegistryError::NotFound {
            key: "nope".to_string(),
        };
        let hint = err.hint().unwrap();
        assert!(hint.contains("llxt list"));
        assert!(hint.contains("[sources.<key>]"));
        assert!(!hint.contains("llxt add"));
    }
}
