// system-tests/src/error.rs
// ============================================================================
// Module: Suite Errors
// Description: Typed failures for suite setup and scenario steps.
// Purpose: Separate fatal setup errors from per-scenario step failures.
// Dependencies: data-platform-client, data-platform-config, thiserror
// ============================================================================

//! ## Overview
//! [`SuiteError`] aborts the run before any scenario starts. [`StepError`]
//! fails only the scenario it occurs in; the runner records it and moves on.

use data_platform_client::ClientError;
use data_platform_config::ConfigError;
use thiserror::Error;

/// Fatal errors raised while setting up the suite.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// Required partner configuration is missing.
    #[error(transparent)]
    MissingConfiguration(#[from] ConfigError),
    /// The gateway client could not be built from the configuration.
    #[error("gateway client setup failed: {0}")]
    Client(#[from] ClientError),
    /// Harness settings were invalid.
    #[error("harness configuration invalid: {0}")]
    Harness(String),
}

/// Failure of a single scenario step.
#[derive(Debug, Error)]
pub enum StepError {
    /// A response or scenario-state assertion did not hold.
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    /// An HTTP exchange failed.
    #[error("request failed: {0}")]
    RequestFailed(#[from] ClientError),
}

/// Returns [`StepError::ValidationFailed`] with `message` unless `condition` holds.
///
/// # Errors
///
/// Returns [`StepError::ValidationFailed`] when `condition` is false.
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), StepError> {
    if condition { Ok(()) } else { Err(StepError::ValidationFailed(message())) }
}
