// crates/data-platform-client/src/endpoint.rs
// ============================================================================
// Module: Gateway Endpoint
// Description: Base URL handling and route construction for the deployment.
// Purpose: Keep every path the suite calls in one place.
// Dependencies: url
// ============================================================================

//! ## Overview
//! [`GatewayEndpoint`] turns the configured `HOST` into a base URL. A bare host
//! is served over `https`; a host that already names `http://` or `https://`
//! is used as given, which lets the suite target a local stub. Routes are
//! appended as path segments so entity ids are encoded as one segment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use url::Url;

use crate::error::ClientError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Identity provider realm that issues partner tokens.
pub const IDM_REALM: &str = "fiware-server";

// ============================================================================
// SECTION: PEP Targets
// ============================================================================

/// PEP-protected gateway routes reachable with a partner token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PepTarget {
    /// Orion-LD behind the `orion-pep` client.
    OrionLd,
    /// Miktaka behind the `miktaka-pep` client.
    Miktaka,
}

impl PepTarget {
    /// Returns the OpenID Connect client id for the target.
    #[must_use]
    pub const fn client_id(self) -> &'static str {
        match self {
            Self::OrionLd => "orion-pep",
            Self::Miktaka => "miktaka-pep",
        }
    }

    /// Returns the gateway route segment under `/kong`.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::OrionLd => "keycloak-orion",
            Self::Miktaka => "keycloak-miktaka",
        }
    }

    /// Returns the human-readable service name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::OrionLd => "Orion-LD",
            Self::Miktaka => "Miktaka",
        }
    }
}

impl fmt::Display for PepTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// SECTION: Endpoint
// ============================================================================

/// Base URL of the deployment under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayEndpoint {
    /// Scheme, host, port, and optional path prefix.
    base: Url,
}

impl GatewayEndpoint {
    /// Builds an endpoint from the configured host.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] when the host is empty or does
    /// not parse as an `http`/`https` URL.
    pub fn from_host(host: &str) -> Result<Self, ClientError> {
        let trimmed = host.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ClientError::InvalidEndpoint("host is empty".to_string()));
        }
        let raw = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        let mut base =
            Url::parse(&raw).map_err(|err| ClientError::InvalidEndpoint(format!("{raw}: {err}")))?;
        if base.cannot_be_a_base() || base.host_str().is_none() {
            return Err(ClientError::InvalidEndpoint(format!("{raw}: missing host")));
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self {
            base,
        })
    }

    /// Returns the liveness page URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] when the base cannot take path segments.
    pub fn index_url(&self) -> Result<Url, ClientError> {
        self.join(&["index.html"])
    }

    /// Returns the OpenID Connect token URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] when the base cannot take path segments.
    pub fn token_url(&self) -> Result<Url, ClientError> {
        self.join(&["idm", "realms", IDM_REALM, "protocol", "openid-connect", "token"])
    }

    /// Returns the version URL for a PEP target.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] when the base cannot take path segments.
    pub fn version_url(&self, target: PepTarget) -> Result<Url, ClientError> {
        self.join(&["kong", target.route(), "version"])
    }

    /// Returns the NGSI-LD entities collection URL for a PEP target.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] when the base cannot take path segments.
    pub fn entities_url(&self, target: PepTarget) -> Result<Url, ClientError> {
        self.join(&["kong", target.route(), "ngsi-ld", "v1", "entities"])
    }

    /// Returns the URL of a single NGSI-LD entity.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] when the base cannot take path segments.
    pub fn entity_url(&self, target: PepTarget, entity_id: &str) -> Result<Url, ClientError> {
        self.join(&["kong", target.route(), "ngsi-ld", "v1", "entities", entity_id])
    }

    /// Appends path segments to the base URL.
    fn join(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidEndpoint(format!("{}: cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl fmt::Display for GatewayEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}
