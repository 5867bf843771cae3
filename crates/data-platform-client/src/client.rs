// crates/data-platform-client/src/client.rs
// ============================================================================
// Module: Gateway Client
// Description: Async HTTP client for the deployment under test.
// Purpose: Issue the acceptance exchanges and record a transcript of them.
// Dependencies: reqwest, serde, serde_json, tracing, url
// ============================================================================

//! ## Overview
//! [`GatewayClient`] issues one request per call, checks the status code the
//! operation expects, and decodes the body. Every exchange is appended to a
//! transcript holding only the method, path, and status.
//! Invariants:
//! - Requests are never retried.
//! - The liveness ping uses [`PING_TIMEOUT`]; other requests use the client
//!   timeout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::LOCATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::endpoint::GatewayEndpoint;
use crate::endpoint::PepTarget;
use crate::error::ClientError;
use crate::error::Operation;
use crate::model::AccessToken;
use crate::model::CreatedEntity;
use crate::model::NgsiEntity;
use crate::model::PasswordGrant;
use crate::model::TokenResponse;
use crate::model::VersionReport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Timeout applied to the liveness ping.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum number of response body characters kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Content type of form-encoded token requests.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Content type of NGSI-LD documents carrying an inline `@context`.
const LD_JSON_CONTENT_TYPE: &str = "application/ld+json";

// ============================================================================
// SECTION: Transcript
// ============================================================================

/// One recorded request/response exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    /// 1-based position in the transcript.
    pub sequence: u64,
    /// Operation label.
    pub operation: Operation,
    /// HTTP method.
    pub method: String,
    /// Request path (no query, no credentials).
    pub path: String,
    /// Response status, or `None` when the request never completed.
    pub status: Option<u16>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client bound to one deployment.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    /// Deployment base URL.
    endpoint: GatewayEndpoint,
    /// Underlying reqwest client.
    http: Client,
    /// Timeout for the liveness ping.
    ping_timeout: Duration,
    /// Recorded exchanges.
    transcript: Arc<Mutex<Vec<Exchange>>>,
}

impl GatewayClient {
    /// Creates a client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] when the HTTP client cannot be built.
    pub fn new(endpoint: GatewayEndpoint, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;
        Ok(Self {
            endpoint,
            http,
            ping_timeout: PING_TIMEOUT,
            transcript: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Overrides the liveness ping timeout.
    #[must_use]
    pub const fn with_ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = timeout;
        self
    }

    /// Returns the deployment endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &GatewayEndpoint {
        &self.endpoint
    }

    /// Returns a snapshot of the recorded exchanges.
    #[must_use]
    pub fn transcript(&self) -> Vec<Exchange> {
        self.transcript.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Checks that the deployment serves its landing page.
    ///
    /// # Errors
    ///
    /// Returns an error when the page is unreachable or not `200 OK`.
    pub async fn ping(&self) -> Result<(), ClientError> {
        let operation = Operation::Ping;
        let url = self.endpoint.index_url()?;
        let request = self.http.get(url.clone()).timeout(self.ping_timeout);
        let response = self.send(operation, Method::GET, &url, request).await?;
        expect_status(operation, response, &[StatusCode::OK]).await?;
        Ok(())
    }

    /// Requests a partner access token for a PEP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails, the status is not `200 OK`,
    /// or the response carries no `access_token`.
    pub async fn request_token(
        &self,
        target: PepTarget,
        grant: &PasswordGrant<'_>,
    ) -> Result<AccessToken, ClientError> {
        let operation = Operation::TokenRequest;
        let url = self.endpoint.token_url()?;
        let request = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(grant.form_body(target));
        let response = self.send(operation, Method::POST, &url, request).await?;
        let response = expect_status(operation, response, &[StatusCode::OK]).await?;
        let token: TokenResponse = decode_json(operation, &url, response).await?;
        match token.access_token {
            Some(value) if !value.is_empty() => Ok(AccessToken::new(value)),
            _ => Err(ClientError::InvalidPayload {
                operation,
                message: "missing access token in response".to_string(),
            }),
        }
    }

    /// Fetches the version report through a PEP-protected route.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails, the status is not `200 OK`,
    /// or the body is not a JSON object.
    pub async fn fetch_version(
        &self,
        target: PepTarget,
        token: &AccessToken,
    ) -> Result<VersionReport, ClientError> {
        let operation = Operation::VersionCheck;
        let url = self.endpoint.version_url(target)?;
        let request = self.http.get(url.clone()).bearer_auth(token.as_str());
        let response = self.send(operation, Method::GET, &url, request).await?;
        let response = expect_status(operation, response, &[StatusCode::OK]).await?;
        decode_json(operation, &url, response).await
    }

    /// Creates an NGSI-LD entity through a PEP-protected route.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the broker does not report
    /// success.
    pub async fn create_entity(
        &self,
        target: PepTarget,
        token: &AccessToken,
        entity: &NgsiEntity,
    ) -> Result<CreatedEntity, ClientError> {
        let operation = Operation::EntityCreate;
        let url = self.endpoint.entities_url(target)?;
        let body = serde_json::to_vec(entity).map_err(|err| ClientError::InvalidPayload {
            operation,
            message: err.to_string(),
        })?;
        let request = self
            .http
            .post(url.clone())
            .bearer_auth(token.as_str())
            .header(CONTENT_TYPE, LD_JSON_CONTENT_TYPE)
            .body(body);
        let response = self.send(operation, Method::POST, &url, request).await?;
        let response = expect_status(
            operation,
            response,
            &[StatusCode::CREATED, StatusCode::OK, StatusCode::NO_CONTENT],
        )
        .await?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        Ok(CreatedEntity {
            location,
        })
    }

    /// Retrieves an NGSI-LD entity by id through a PEP-protected route.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails, the status is not `200 OK`,
    /// or the body is not a JSON object.
    pub async fn get_entity(
        &self,
        target: PepTarget,
        token: &AccessToken,
        entity_id: &str,
    ) -> Result<NgsiEntity, ClientError> {
        let operation = Operation::EntityRetrieve;
        let url = self.endpoint.entity_url(target, entity_id)?;
        let request = self
            .http
            .get(url.clone())
            .bearer_auth(token.as_str())
            .header(ACCEPT, LD_JSON_CONTENT_TYPE);
        let response = self.send(operation, Method::GET, &url, request).await?;
        let response = expect_status(operation, response, &[StatusCode::OK]).await?;
        decode_json(operation, &url, response).await
    }

    /// Sends a request and records the exchange.
    async fn send(
        &self,
        operation: Operation,
        method: Method,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<Response, ClientError> {
        let result = request.send().await;
        let status = result.as_ref().ok().map(|response| response.status().as_u16());
        self.record(operation, &method, url, status);
        result.map_err(|err| ClientError::Transport {
            operation,
            url: url.to_string(),
            message: err.to_string(),
        })
    }

    /// Appends an exchange to the transcript.
    fn record(&self, operation: Operation, method: &Method, url: &Url, status: Option<u16>) {
        debug!(
            operation = operation.as_str(),
            method = method.as_str(),
            path = url.path(),
            status,
            "gateway exchange"
        );
        if let Ok(mut entries) = self.transcript.lock() {
            let sequence = u64::try_from(entries.len()).unwrap_or(u64::MAX).saturating_add(1);
            entries.push(Exchange {
                sequence,
                operation,
                method: method.to_string(),
                path: url.path().to_string(),
                status,
            });
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Fails with [`ClientError::UnexpectedStatus`] unless the status is accepted.
async fn expect_status(
    operation: Operation,
    response: Response,
    accepted: &[StatusCode],
) -> Result<Response, ClientError> {
    let status = response.status();
    if accepted.contains(&status) {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::UnexpectedStatus {
        operation,
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("").to_string(),
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}

/// Reads and decodes a JSON response body.
async fn decode_json<T: DeserializeOwned>(
    operation: Operation,
    url: &Url,
    response: Response,
) -> Result<T, ClientError> {
    let bytes = response.bytes().await.map_err(|err| ClientError::Transport {
        operation,
        url: url.to_string(),
        message: err.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::InvalidPayload {
        operation,
        message: err.to_string(),
    })
}
