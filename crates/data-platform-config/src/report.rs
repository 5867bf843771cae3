// crates/data-platform-config/src/report.rs
// ============================================================================
// Module: Config Report
// Description: Operator-facing echo of the resolved partner configuration.
// Purpose: Show what the suite will use without revealing secrets.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! [`ConfigReport`] renders one line per [`RecognizedKey`]. Secret keys render
//! as [`REDACTED`] when they hold a non-empty value and [`NOT_SET`] otherwise;
//! other keys render verbatim when present and [`NOT_SET`] when absent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use tracing::info;

use crate::keys::RecognizedKey;
use crate::map::ConfigMap;

// ============================================================================
// SECTION: Markers
// ============================================================================

/// Rendered in place of a secret value.
pub const REDACTED: &str = "***";

/// Rendered when a key has no usable value.
pub const NOT_SET: &str = "NOT SET";

// ============================================================================
// SECTION: Report
// ============================================================================

/// Redacted rendering of the recognized keys in a [`ConfigMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigReport {
    /// Rendered `(key, value)` lines in reporting order.
    lines: Vec<(RecognizedKey, String)>,
}

impl ConfigReport {
    /// Builds the report for `map`.
    #[must_use]
    pub fn from_map(map: &ConfigMap) -> Self {
        let lines = RecognizedKey::ALL.into_iter().map(|key| (key, render(map, key))).collect();
        Self {
            lines,
        }
    }

    /// Returns the rendered lines.
    #[must_use]
    pub fn lines(&self) -> &[(RecognizedKey, String)] {
        &self.lines
    }

    /// Returns the rendered value for `key`.
    #[must_use]
    pub fn value(&self, key: RecognizedKey) -> Option<&str> {
        self.lines.iter().find(|(candidate, _)| *candidate == key).map(|(_, value)| value.as_str())
    }

    /// Emits the report through `tracing` at info level.
    pub fn log(&self) {
        info!("loaded partner configuration");
        for (key, value) in &self.lines {
            info!(key = key.as_str(), value = value.as_str(), "partner configuration value");
        }
    }
}

impl fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Loaded Configuration:")?;
        for (key, value) in &self.lines {
            writeln!(f, "{key}: {value}")?;
        }
        Ok(())
    }
}

/// Renders a single key according to its secrecy.
fn render(map: &ConfigMap, key: RecognizedKey) -> String {
    let rendered = if key.is_secret() {
        map.get_nonempty(key.as_str()).map_or(NOT_SET, |_| REDACTED)
    } else {
        map.get(key.as_str()).unwrap_or(NOT_SET)
    };
    rendered.to_string()
}
