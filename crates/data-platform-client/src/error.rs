// crates/data-platform-client/src/error.rs
// ============================================================================
// Module: Client Errors
// Description: Error and operation labels for gateway requests.
// Purpose: Give each failed exchange a typed, loggable description.
// Dependencies: serde, thiserror
// ============================================================================

//! Error and operation labels shared by every gateway request.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Exchange kinds issued by [`crate::GatewayClient`].
///
/// # Invariants
/// - Variants are stable labels for logs and transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `GET /index.html`.
    Ping,
    /// OpenID Connect password grant.
    TokenRequest,
    /// Authorized `GET .../version`.
    VersionCheck,
    /// NGSI-LD entity creation.
    EntityCreate,
    /// NGSI-LD entity retrieval.
    EntityRetrieve,
}

impl Operation {
    /// Returns the stable label used in logs, errors, and transcripts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::TokenRequest => "token_request",
            Self::VersionCheck => "version_check",
            Self::EntityCreate => "entity_create",
            Self::EntityRetrieve => "entity_retrieve",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the gateway client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured host does not form a usable base URL.
    #[error("invalid gateway endpoint: {0}")]
    InvalidEndpoint(String),
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Build(String),
    /// The request could not be sent or the response body not read.
    #[error("{operation} request to {url} failed: {message}")]
    Transport {
        /// Operation that failed.
        operation: Operation,
        /// Target URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service answered with a status the operation does not accept.
    #[error("{operation} returned {status} {reason}: {body}")]
    UnexpectedStatus {
        /// Operation that failed.
        operation: Operation,
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
        /// Truncated response body.
        body: String,
    },
    /// The response body did not have the expected shape.
    #[error("{operation} returned an invalid payload: {message}")]
    InvalidPayload {
        /// Operation that failed.
        operation: Operation,
        /// Decoding or shape error.
        message: String,
    },
}
