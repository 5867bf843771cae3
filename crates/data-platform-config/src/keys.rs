// crates/data-platform-config/src/keys.rs
// ============================================================================
// Module: Recognized Configuration Keys
// Description: The fixed set of partner keys read from the environment.
// Purpose: Give the key names one canonical spelling and secrecy flag.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`RecognizedKey`] names the partner variables that the environment may
//! override. The same five keys are required before the suite starts.

use std::fmt;

/// Partner configuration keys that the environment may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecognizedKey {
    /// Gateway host name (optionally with an explicit scheme).
    Host,
    /// Partner account user name.
    PartnerUsername,
    /// Partner account password.
    PartnerPassword,
    /// Client secret of the Orion-LD PEP client.
    OrionPepSecret,
    /// Client secret of the Miktaka PEP client.
    MiktakaPepSecret,
}

/// Keys that must be present and non-empty before the suite may start.
pub const REQUIRED_KEYS: [RecognizedKey; 5] = RecognizedKey::ALL;

impl RecognizedKey {
    /// Every recognized key, in reporting order.
    pub const ALL: [Self; 5] = [
        Self::Host,
        Self::PartnerUsername,
        Self::PartnerPassword,
        Self::OrionPepSecret,
        Self::MiktakaPepSecret,
    ];

    /// Returns the canonical variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Host => "HOST",
            Self::PartnerUsername => "PARTNER_USERNAME",
            Self::PartnerPassword => "PARTNER_PASSWORD",
            Self::OrionPepSecret => "ORION_PEP_SECRET",
            Self::MiktakaPepSecret => "MIKTAKA_PEP_SECRET",
        }
    }

    /// Returns true when the value must be redacted in any output.
    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::PartnerPassword | Self::OrionPepSecret | Self::MiktakaPepSecret)
    }

    /// Looks up a recognized key by its variable name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl AsRef<str> for RecognizedKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RecognizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
