//! JSON output formatting.

use anyhow::Result;
use llxt_core::Entry;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one registry entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryOutput<'a> {
    pub key: &'a str,
    pub name: &'a str,
    pub domain: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    pub llms_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llms_full_url: Option<&'a str>,
}

impl<'a> From<&'a Entry> for EntryOutput<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            key: &entry.key,
            name: &entry.name,
            domain: &entry.domain,
            description: entry.description.as_deref(),
            category: entry.category.as_deref(),
            llms_url: &entry.llms_url,
            llms_full_url: entry.full_url(),
        }
    }
}

/// JSON output for a listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOutput<'a> {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    pub sources: Vec<EntryOutput<'a>>,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats one entry.
    pub fn format_entry(&self, entry: &Entry) -> Result<String> {
        self.format(&EntryOutput::from(entry))
    }

    /// Formats a listing, optionally filtered by category.
    pub fn format_entries(&self, entries: &[&Entry], category: Option<&str>) -> Result<String> {
        self.format(&ListOutput {
            count: entries.len(),
            category,
            sources: entries.iter().map(|e| EntryOutput::from(*e)).collect(),
        })
    }
}
