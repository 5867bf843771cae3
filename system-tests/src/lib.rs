// system-tests/src/lib.rs
// ============================================================================
// Module: Data Platform System Tests Library
// Description: Acceptance harness for the central data platform gateway.
// Purpose: Provide setup, scenario execution, and reporting for acceptance runs.
// Dependencies: data-platform-client, data-platform-config
// ============================================================================

//! ## Overview
//! This crate hosts the partner acceptance suite: harness settings, the suite
//! setup hook, a sequential Given/When/Then runner, the step library, and the
//! artifact writer. The `acceptance` test target drives it against a live
//! deployment; `local_gateway` drives it against an in-process stub.
//! Security posture: partner secrets are redacted in logs and never written to
//! artifacts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod artifacts;
pub mod config;
pub mod context;
pub mod error;
pub mod features;
pub mod runner;
pub mod steps;
pub mod telemetry;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use context::SuiteContext;
pub use context::World;
pub use error::StepError;
pub use error::SuiteError;
pub use runner::SuiteReport;
pub use runner::SuiteRun;
pub use runner::run;
