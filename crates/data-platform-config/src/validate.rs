// crates/data-platform-config/src/validate.rs
// ============================================================================
// Module: Config Validation
// Description: Required-key checks over a resolved ConfigMap.
// Purpose: Fail the suite at setup when partner configuration is incomplete.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A required key is missing when it is absent from the map or present with an
//! empty value. [`validate`] reports missing keys in the order they were
//! requested; [`ValidationResult::into_result`] turns a non-empty report into
//! [`ConfigError::MissingConfiguration`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::map::ConfigMap;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors raised before the suite starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// One or more required keys were absent or empty.
    #[error("Missing required configuration variables: {}", keys.join(", "))]
    MissingConfiguration {
        /// Missing key names, in the order they were checked.
        keys: Vec<String>,
    },
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Outcome of a required-key check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    /// Missing key names, in the order they were checked.
    missing: Vec<String>,
}

impl ValidationResult {
    /// Returns the missing key names.
    #[must_use]
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Returns true when no required key is missing.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    /// Converts the outcome into a result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingConfiguration`] listing every missing key.
    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.missing.is_empty() {
            return Ok(());
        }
        Err(ConfigError::MissingConfiguration {
            keys: self.missing,
        })
    }
}

/// Checks that every key in `required` is present and non-empty.
#[must_use]
pub fn validate<K: AsRef<str>>(map: &ConfigMap, required: &[K]) -> ValidationResult {
    let missing = required
        .iter()
        .map(AsRef::as_ref)
        .filter(|key| map.get_nonempty(key).is_none())
        .map(ToString::to_string)
        .collect();
    ValidationResult {
        missing,
    }
}
