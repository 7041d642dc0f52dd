//! Bundled registry data and its on-disk record shapes.

use llxt_core::{slugify, Entry};
use serde::Deserialize;

use crate::error::RegistryError;

pub(crate) const DIRECTORY_ENTRIES: &str = include_str!("../data/directory_entries.json");
pub(crate) const WEBSITES: &str = include_str!("../data/websites.json");

/// Record in `directory_entries.json`.
#[derive(Debug, Deserialize)]
struct DirectoryRecord {
    key: String,
    name: String,
    domain: String,
    llms_url: String,
    #[serde(default)]
    llms_full_url: Option<String>,
}

/// Record in `websites.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebsiteRecord {
    name: String,
    domain: String,
    #[serde(default)]
    description: Option<String>,
    llms_txt_url: String,
    #[serde(default)]
    llms_full_txt_url: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

fn parse<T: serde::de::DeserializeOwned>(
    file: &'static str,
    json: &str,
) -> Result<Vec<T>, RegistryError> {
    serde_json::from_str(json).map_err(|source| RegistryError::Data { file, source })
}

/// Parses `directory_entries.json`. Keys are lowercased.
pub(crate) fn parse_directory(json: &str) -> Result<Vec<Entry>, RegistryError> {
    let records: Vec<DirectoryRecord> = parse("directory_entries.json", json)?;

    Ok(records
        .into_iter()
        .map(|r| {
            let mut entry = Entry::new(r.key.to_lowercase(), r.name, r.domain, r.llms_url);
            entry.llms_full_url = r.llms_full_url;
            entry
        })
        .collect())
}

/// Parses `websites.json`, keying each record by the slug of its name.
pub(crate) fn parse_websites(json: &str) -> Result<Vec<Entry>, RegistryError> {
    let records: Vec<WebsiteRecord> = parse("websites.json", json)?;

    Ok(records
        .into_iter()
        .map(|r| {
            let mut entry = Entry::new(slugify(&r.name), r.name, r.domain, r.llms_txt_url);
            entry.description = r.description.filter(|d| !d.is_empty());
            entry.category = r.category.filter(|c| !c.is_empty());
            entry.llms_full_url = r.llms_full_txt_url;
            entry
        })
        .collect())
}
