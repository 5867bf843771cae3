// crates/data-platform-config/src/partner.rs
// ============================================================================
// Module: Partner Config
// Description: Typed, validated view over a resolved ConfigMap.
// Purpose: Hand acceptance steps named fields instead of string lookups.
// Dependencies: data-platform-config
// ============================================================================

//! ## Overview
//! [`PartnerConfig`] is only constructible from a map that passes
//! [`crate::validate`] against [`REQUIRED_KEYS`]. Credentials are wrapped in
//! [`Secret`] so they cannot leak through `Debug` formatting. The full map is
//! retained so optional, file-only keys stay reachable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::keys::REQUIRED_KEYS;
use crate::keys::RecognizedKey;
use crate::map::ConfigMap;
use crate::report::REDACTED;
use crate::validate::ConfigError;
use crate::validate::validate;

// ============================================================================
// SECTION: Secret
// ============================================================================

/// String value whose `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw secret for use on the wire.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

// ============================================================================
// SECTION: Partner Config
// ============================================================================

/// Validated partner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerConfig {
    /// Gateway host, optionally with a scheme.
    pub host: String,
    /// Partner account user name.
    pub username: String,
    /// Partner account password.
    pub password: Secret,
    /// Orion-LD PEP client secret.
    pub orion_pep_secret: Secret,
    /// Miktaka PEP client secret.
    pub miktaka_pep_secret: Secret,
    /// Full resolved map, including file-only keys.
    map: ConfigMap,
}

impl PartnerConfig {
    /// Validates `map` and builds the typed view.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingConfiguration`] listing every required key
    /// that is absent or empty.
    pub fn from_map(map: ConfigMap) -> Result<Self, ConfigError> {
        validate(&map, &REQUIRED_KEYS).into_result()?;
        let required = |key: RecognizedKey| -> Result<String, ConfigError> {
            map.get_nonempty(key.as_str()).map(ToString::to_string).ok_or_else(|| {
                ConfigError::MissingConfiguration {
                    keys: vec![key.as_str().to_string()],
                }
            })
        };
        let host = required(RecognizedKey::Host)?;
        let username = required(RecognizedKey::PartnerUsername)?;
        let password = Secret::new(required(RecognizedKey::PartnerPassword)?);
        let orion_pep_secret = Secret::new(required(RecognizedKey::OrionPepSecret)?);
        let miktaka_pep_secret = Secret::new(required(RecognizedKey::MiktakaPepSecret)?);
        Ok(Self {
            host,
            username,
            password,
            orion_pep_secret,
            miktaka_pep_secret,
            map,
        })
    }

    /// Returns an optional, non-empty value from the resolved map.
    #[must_use]
    pub fn optional(&self, key: &str) -> Option<&str> {
        self.map.get_nonempty(key)
    }
}
