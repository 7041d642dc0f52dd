//! Registry of `llms.txt` sources.

use std::collections::BTreeMap;

use llxt_core::Entry;
use tracing::debug;

use crate::data::{parse_directory, parse_websites, DIRECTORY_ENTRIES, WEBSITES};
use crate::error::RegistryError;

// ============================================================================
// Registry
// ============================================================================

/// Lookup table of sources keyed by lowercase key.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, Entry>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry from the data compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Data`] if the bundled JSON is malformed.
    pub fn bundled() -> Result<Self, RegistryError> {
        Self::from_json(DIRECTORY_ENTRIES, WEBSITES)
    }

    /// Builds a registry from the two JSON data sets.
    ///
    /// Directory records are loaded first. Website records are keyed by the
    /// slug of their name; a record whose key already exists only supplies
    /// description and category, any other record becomes a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Data`] if either document is malformed.
    pub fn from_json(directory: &str, websites: &str) -> Result<Self, RegistryError> {
        let mut entries = BTreeMap::new();

        for entry in parse_directory(directory)? {
            entries.insert(entry.key.clone(), entry);
        }

        for site in parse_websites(websites)? {
            if let Some(existing) = entries.get_mut(&site.key) {
                existing.description = site.description;
                existing.category = site.category;
            } else {
                entries.insert(site.key.clone(), site);
            }
        }

        debug!(count = entries.len(), "Loaded registry");
        Ok(Self { entries })
    }

    /// Looks up an entry by key, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no entry has this key.
    pub fn lookup(&self, key: &str) -> Result<&Entry, RegistryError> {
        self.get(key).ok_or_else(|| RegistryError::NotFound {
            key: key.to_string(),
        })
    }

    /// Returns the entry for `key`, ignoring case.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(&key.to_lowercase())
    }

    /// Returns true if an entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns all entries sorted by key.
    pub fn list(&self) -> Vec<&Entry> {
        self.entries.values().collect()
    }

    /// Returns entries whose category matches, ignoring case, sorted by key.
    pub fn list_by_category(&self, category: &str) -> Vec<&Entry> {
        let wanted = category.to_lowercase();
        self.entries
            .values()
            .filter(|e| {
                e.category
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase() == wanted)
            })
            .collect()
    }

    /// Returns the distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .entries
            .values()
            .filter_map(|e| e.category.as_deref())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Returns the number of entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Inserts or replaces an entry after validating it.
    ///
    /// The key is lowercased. Returns the entry it replaced, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Invalid`] if the entry fails validation.
    pub fn insert(&mut self, mut entry: Entry) -> Result<Option<Entry>, RegistryError> {
        entry.key = entry.key.trim().to_lowercase();
        entry.validate()?;
        Ok(self.entries.insert(entry.key.clone(), entry))
    }

    /// Inserts every entry, replacing existing ones with the same key.
    ///
    /// Stops at the first invalid entry; entries before it stay inserted.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Invalid`] for the first invalid entry.
    pub fn merge<I>(&mut self, entries: I) -> Result<usize, RegistryError>
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut merged = 0;
        for entry in entries {
            let key = entry.key.clone();
            if self.insert(entry)?.is_some() {
                debug!(key = %key, "User entry overrides bundled source");
            }
            merged += 1;
        }
        Ok(merged)
    }
}
