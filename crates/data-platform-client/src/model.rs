// crates/data-platform-client/src/model.rs
// ============================================================================
// Module: Client Models
// Description: Request and response payloads exchanged with the deployment.
// Purpose: Type the token grant, version report, and NGSI-LD entity documents.
// Dependencies: serde, serde_json, url
// ============================================================================

//! ## Overview
//! Payload types for [`crate::GatewayClient`]. Credentials and tokens keep a
//! redacted `Debug` so test failures can be printed safely. Version reports
//! and entities stay loosely typed JSON objects because the suite only asserts
//! on a few fields.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use url::form_urlencoded;

use crate::endpoint::PepTarget;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Core JSON-LD context attached to created entities.
pub const NGSI_LD_CORE_CONTEXT: &str = "https://uri.etsi.org/ngsi-ld/v1/ngsi-ld-core-context.jsonld";

/// Placeholder used wherever a credential would otherwise be printed.
const REDACTED: &str = "***";

// ============================================================================
// SECTION: Token Grant
// ============================================================================

/// Resource-owner password grant for a PEP client.
#[derive(Clone, Copy)]
pub struct PasswordGrant<'a> {
    /// Partner user name.
    pub username: &'a str,
    /// Partner password.
    pub password: &'a str,
    /// Client secret of the PEP client.
    pub client_secret: &'a str,
}

impl PasswordGrant<'_> {
    /// Encodes the grant as an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn form_body(&self, target: PepTarget) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("username", self.username)
            .append_pair("password", self.password)
            .append_pair("grant_type", "password")
            .append_pair("client_id", target.client_id())
            .append_pair("client_secret", self.client_secret)
            .finish()
    }
}

impl fmt::Debug for PasswordGrant<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordGrant")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("client_secret", &REDACTED)
            .finish()
    }
}

/// Bearer token issued by the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({REDACTED})")
    }
}

/// Token endpoint response; only the access token is used.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    /// Issued bearer token.
    #[serde(default)]
    pub(crate) access_token: Option<String>,
}

// ============================================================================
// SECTION: Version Report
// ============================================================================

/// JSON object returned by a broker `version` route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionReport(Map<String, Value>);

impl VersionReport {
    /// Field carrying the Orion-LD release.
    pub const ORIONLD_VERSION: &'static str = "orionld version";
    /// Field carrying the upstream Orion release.
    pub const ORION_VERSION: &'static str = "orion version";
    /// Field carrying the broker uptime.
    pub const UPTIME: &'static str = "uptime";
    /// Field carrying the build commit.
    pub const GIT_HASH: &'static str = "git_hash";
    /// Field carrying the release date.
    pub const RELEASE_DATE: &'static str = "release_date";

    /// Wraps a JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns true when `field` is present.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the raw value of `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns `field` when it is a JSON string.
    #[must_use]
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

// ============================================================================
// SECTION: NGSI-LD Entity
// ============================================================================

/// NGSI-LD entity document.
///
/// # Invariants
/// - Entities built with [`NgsiEntity::new`] always carry `id` and `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NgsiEntity(Map<String, Value>);

impl NgsiEntity {
    /// Creates an entity with the given `id` and `type` and the core context.
    #[must_use]
    pub fn new(id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::String(id.into()));
        fields.insert("type".to_string(), Value::String(entity_type.into()));
        fields.insert("@context".to_string(), Value::String(NGSI_LD_CORE_CONTEXT.to_string()));
        Self(fields)
    }

    /// Adds an NGSI-LD `Property` attribute.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        let mut attribute = Map::new();
        attribute.insert("type".to_string(), Value::String("Property".to_string()));
        attribute.insert("value".to_string(), value);
        self.0.insert(name.into(), Value::Object(attribute));
        self
    }

    /// Returns the entity id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Returns the entity type.
    #[must_use]
    pub fn entity_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Returns the value of a `Property` attribute.
    #[must_use]
    pub fn property_value(&self, name: &str) -> Option<&Value> {
        self.0.get(name).and_then(|attribute| attribute.get("value"))
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Result of a successful entity creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEntity {
    /// `Location` header returned by the broker, when present.
    pub location: Option<String>,
}
