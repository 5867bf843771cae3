// system-tests/src/config/mod.rs
// ============================================================================
// Module: System Test Configuration
// Description: Harness settings for the partner acceptance suite.
// Purpose: Provide typed access to harness environment settings and defaults.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Harness configuration is read from environment variables and mapped into a
//! small typed structure. [`SuiteSettings`] combines it with built-in defaults
//! to drive suite setup. Partner credentials are not part of this module; see
//! `data-platform-config`.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use data_platform_client::PING_TIMEOUT;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::SystemTestConfig;
pub use env::SystemTestEnv;
pub use env::read_env_strict;

// ============================================================================
// SECTION: Suite Settings
// ============================================================================

/// Default per-request HTTP timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// File name of the partner variables file.
pub const PARTNER_VARIABLES_FILE: &str = "partner_variables.txt";

/// Effective settings for one suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteSettings {
    /// Partner variables file; a missing file is allowed.
    pub config_file: PathBuf,
    /// Timeout for token, version, and entity requests.
    pub http_timeout: Duration,
    /// Timeout for the liveness ping.
    pub ping_timeout: Duration,
}

impl SuiteSettings {
    /// Builds settings with defaults for the given partner variables file.
    #[must_use]
    pub const fn new(config_file: PathBuf) -> Self {
        Self {
            config_file,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            ping_timeout: PING_TIMEOUT,
        }
    }

    /// Applies harness overrides on top of `default_config_file`.
    ///
    /// A timeout override raises both timeouts to at least the given value.
    #[must_use]
    pub fn from_config(config: &SystemTestConfig, default_config_file: PathBuf) -> Self {
        let mut settings =
            Self::new(config.config_file.clone().unwrap_or(default_config_file));
        if let Some(timeout) = config.timeout {
            settings.http_timeout = timeout;
            settings.ping_timeout = settings.ping_timeout.max(timeout);
        }
        settings
    }
}
