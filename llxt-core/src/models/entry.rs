//! Registry entry types.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;

// ============================================================================
// Entry
// ============================================================================

/// A documentation source that publishes an `llms.txt` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Lookup key (lowercase, hyphenated).
    pub key: String,
    /// Display name.
    pub name: String,
    /// Site domain.
    pub domain: String,
    /// Short description of the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category used for grouping in listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// URL of the `llms.txt` file.
    pub llms_url: String,
    /// URL of the `llms-full.txt` file, when the source publishes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llms_full_url: Option<String>,
}

impl Entry {
    /// Creates an entry with the required fields.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        domain: impl Into<String>,
        llms_url: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            domain: domain.into(),
            description: None,
            category: None,
            llms_url: llms_url.into(),
            llms_full_url: None,
        }
    }

    /// Sets the `llms-full.txt` URL.
    #[must_use]
    pub fn with_full_url(mut self, url: impl Into<String>) -> Self {
        self.llms_full_url = Some(url.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns the full-document URL if it is present and non-empty.
    pub fn full_url(&self) -> Option<&str> {
        self.llms_full_url.as_deref().filter(|u| !u.is_empty())
    }

    /// Returns true if the source publishes an `llms-full.txt`.
    pub fn has_full(&self) -> bool {
        self.full_url().is_some()
    }

    /// Checks that the entry has a key and that its URLs are absolute http(s) URLs.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidEntry`] describing the first problem found.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.key.trim().is_empty() {
            return Err(CoreError::invalid_entry(&self.key, "empty key"));
        }

        check_url(&self.key, "llms_url", &self.llms_url)?;
        if let Some(full) = self.full_url() {
            check_url(&self.key, "llms_full_url", full)?;
        }

        Ok(())
    }
}

fn check_url(key: &str, field: &str, raw: &str) -> Result<(), CoreError> {
    let parsed =
        Url::parse(raw).map_err(|e| CoreError::invalid_entry(key, format!("{field}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(CoreError::invalid_entry(
            key,
            format!("{field}: unsupported scheme {other:?}"),
        )),
    }
}

/// Normalizes a display name into a registry key.
///
/// Lowercases and replaces spaces with hyphens: `"Hono Docs"` → `"hono-docs"`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Entry {
        Entry::new("hono", "Hono", "hono.dev", "https://hono.dev/llms.txt")
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hono"), "hono");
        assert_eq!(slugify("Model Context Protocol"), "model-context-protocol");
        assert_eq!(slugify("already-slug"), "already-slug");
    }

    #[test]
    fn test_full_url_ignores_empty() {
        let e = entry().with_full_url("");
        assert!(!e.has_full());
        assert_eq!(e.full_url(), None);

        let e = entry().with_full_url("https://hono.dev/llms-full.txt");
        assert_eq!(e.full_url(), Some("https://hono.dev/llms-full.txt"));
    }

    #[test]
    fn test_validate_ok() {
        assert!(entry().validate().is_ok());
        assert!(entry()
            .with_full_url("https://hono.dev/llms-full.txt")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut e = entry();
        e.llms_url = "not a url".to_string();
        assert!(matches!(e.validate(), Err(CoreError::InvalidEntry { .. })));

        let e = entry().with_full_url("ftp://hono.dev/llms-full.txt");
        let err = e.validate().unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let mut e = entry();
        e.key = "  ".to_string();
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_serde_skips_missing_optionals() {
        let json = serde_json::to_value(entry()).unwrap();
        assert!(json.get("description").is_none());
        assert!(json.get("llms_full_url").is_none());
        assert_eq!(json["llms_url"], "https://hono.dev/llms.txt");
    }
}
