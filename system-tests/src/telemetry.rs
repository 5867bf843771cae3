// system-tests/src/telemetry.rs
// ============================================================================
// Module: Telemetry
// Description: Tracing subscriber setup for harness binaries.
// Purpose: Route structured logs to stderr with `RUST_LOG` filtering.
// Dependencies: tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! Installs a stderr `fmt` subscriber filtered by `RUST_LOG`, defaulting to
//! `info`. Installation is idempotent: a second call leaves the first
//! subscriber in place.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Default filter directive when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the global tracing subscriber.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let fmt_layer =
        tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_ansi(false);
    let _ = tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init();
}
