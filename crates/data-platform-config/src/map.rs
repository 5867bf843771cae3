// crates/data-platform-config/src/map.rs
// ============================================================================
// Module: Config Map
// Description: String key/value map and the `KEY=VALUE` file loader.
// Purpose: Hold merged partner configuration for the lifetime of a suite run.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! [`ConfigMap`] is a plain string-to-string map. [`load_file`] fills one from a
//! `KEY=VALUE` text file: blank lines and lines without `=` are ignored, keys
//! and values are trimmed, and only the first `=` separates key from value.
//! The loader has no error path; a missing or unreadable file yields an empty
//! map.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;
use tracing::warn;

use crate::keys::RecognizedKey;
use crate::report::REDACTED;

// ============================================================================
// SECTION: Config Map
// ============================================================================

/// Merged partner configuration.
///
/// # Invariants
/// - Keys are unique; a later insert replaces the earlier value.
/// - `Debug` output never contains the value of a secret key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    /// Ordered storage so reports and debug output are stable.
    entries: BTreeMap<String, String>,
}

impl ConfigMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `KEY=VALUE` lines from text.
    ///
    /// `\n`, `\r\n`, and a lone `\r` all end a line.
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::new();
        for line in contents.split(['\n', '\r']) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            map.insert(key.trim(), value.trim());
        }
        map
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the value for `key` only when it is present and non-empty.
    #[must_use]
    pub fn get_nonempty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Returns true when `key` is present, even with an empty value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl fmt::Debug for ConfigMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| {
                let secret = RecognizedKey::from_name(key).is_some_and(RecognizedKey::is_secret);
                (key, if secret { REDACTED } else { value })
            }))
            .finish()
    }
}

// ============================================================================
// SECTION: File Loader
// ============================================================================

/// Loads a `KEY=VALUE` file into a [`ConfigMap`].
///
/// A path that does not exist yields an empty map. A file that exists but
/// cannot be read is logged and also yields an empty map. Invalid UTF-8 is
/// decoded lossily.
#[must_use]
pub fn load_file(path: impl AsRef<Path>) -> ConfigMap {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "partner variables file not found; skipping");
        return ConfigMap::new();
    }
    match fs::read(path) {
        Ok(bytes) => {
            let map = ConfigMap::parse(&String::from_utf8_lossy(&bytes));
            debug!(path = %path.display(), entries = map.len(), "loaded partner variables file");
            map
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "partner variables file unreadable; skipping");
            ConfigMap::new()
        }
    }
}
