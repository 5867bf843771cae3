// crates/data-platform-client/src/lib.rs
// ============================================================================
// Module: Data Platform Client Library
// Description: HTTP client for the identity-aware gateway under test.
// Purpose: Issue liveness, token, version, and NGSI-LD entity requests.
// Dependencies: reqwest, serde, serde_json, thiserror, tracing, url
// ============================================================================

//! ## Overview
//! [`GatewayClient`] wraps the handful of HTTP exchanges the acceptance suite
//! performs against a deployment: a liveness ping, an OpenID Connect password
//! grant, and bearer-authorized calls routed through a PEP-protected gateway
//! route ([`PepTarget`]) to the broker.
//! Invariants:
//! - Non-expected status codes fail closed with [`ClientError::UnexpectedStatus`].
//! - No request is retried.
//! - Tokens, passwords, and client secrets never appear in logs, transcripts,
//!   or `Debug` output.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod endpoint;
pub mod error;
pub mod model;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::Exchange;
pub use client::GatewayClient;
pub use client::PING_TIMEOUT;
pub use endpoint::GatewayEndpoint;
pub use endpoint::IDM_REALM;
pub use endpoint::PepTarget;
pub use error::ClientError;
pub use error::Operation;
pub use model::AccessToken;
pub use model::CreatedEntity;
pub use model::NGSI_LD_CORE_CONTEXT;
pub use model::NgsiEntity;
pub use model::PasswordGrant;
pub use model::VersionReport;
