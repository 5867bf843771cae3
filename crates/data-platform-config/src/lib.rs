// crates/data-platform-config/src/lib.rs
// ============================================================================
// Module: Data Platform Config Library
// Description: Partner configuration resolution for the acceptance suite.
// Purpose: Merge file and environment settings, validate, and report them.
// Dependencies: thiserror, tracing
// ============================================================================

//! ## Overview
//! Partner configuration is assembled from an optional `KEY=VALUE` file and a
//! fixed set of environment variables, with the environment taking precedence.
//! The merged [`ConfigMap`] is echoed with secrets redacted and validated
//! against [`REQUIRED_KEYS`] before any acceptance scenario runs.
//! Invariants:
//! - Missing files contribute nothing and never fail.
//! - Environment variables that are set always win over file values.
//! - Validation reports missing keys in the order they were requested.
//! - Secret values never appear in logs or `Debug` output.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod keys;
pub mod map;
pub mod partner;
pub mod report;
pub mod resolver;
pub mod validate;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use keys::REQUIRED_KEYS;
pub use keys::RecognizedKey;
pub use map::ConfigMap;
pub use map::load_file;
pub use partner::PartnerConfig;
pub use partner::Secret;
pub use report::ConfigReport;
pub use report::NOT_SET;
pub use report::REDACTED;
pub use resolver::ConfigResolver;
pub use resolver::EnvSource;
pub use resolver::MapEnv;
pub use resolver::ProcessEnv;
pub use resolver::resolve;
pub use validate::ConfigError;
pub use validate::ValidationResult;
pub use validate::validate;
