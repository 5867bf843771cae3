// system-tests/tests/helpers/gateway_stub.rs
// ============================================================================
// Module: Gateway Stub
// Description: In-process stand-in for the identity-aware gateway.
// Purpose: Exercise the acceptance runner end to end without a deployment.
// Dependencies: axum, serde_json, tokio
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use axum::Form;
use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use axum::http::header::LOCATION;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// Partner user name accepted by default.
pub const STUB_USERNAME: &str = "partner";
/// Partner password accepted by default.
pub const STUB_PASSWORD: &str = "partner-pass";
/// Orion PEP client secret accepted by default.
pub const STUB_ORION_SECRET: &str = "orion-secret";
/// Miktaka PEP client secret accepted by default.
pub const STUB_MIKTAKA_SECRET: &str = "miktaka-secret";

/// Behavior knobs for the gateway stub.
#[derive(Clone, Debug)]
pub struct GatewayStubConfig {
    pub username: String,
    pub password: String,
    pub client_secrets: BTreeMap<String, String>,
    pub ping_status: StatusCode,
    pub omit_access_token: bool,
    pub version: Value,
    pub miktaka_version: Value,
}

impl Default for GatewayStubConfig {
    fn default() -> Self {
        let client_secrets = BTreeMap::from([
            ("orion-pep".to_string(), STUB_ORION_SECRET.to_string()),
            ("miktaka-pep".to_string(), STUB_MIKTAKA_SECRET.to_string()),
        ]);
        Self {
            username: STUB_USERNAME.to_string(),
            password: STUB_PASSWORD.to_string(),
            client_secrets,
            ping_status: StatusCode::OK,
            omit_access_token: false,
            version: default_version(),
            miktaka_version: default_miktaka_version(),
        }
    }
}

/// Version payload of a healthy Orion-LD 1.4.0 deployment.
pub fn default_version() -> Value {
    json!({
        "orionld version": "1.4.0",
        "orion version": "1.15.0-next",
        "uptime": "0 d, 1 h, 2 m, 3 s",
        "git_hash": "0123abcd",
        "build_branch": "",
        "release_date": "Mon Jan 15 2024"
    })
}

/// Version payload of the Miktaka service; carries no broker fields.
pub fn default_miktaka_version() -> Value {
    json!({ "service": "miktaka", "version": "0.3.1" })
}

/// Recorded request metadata for stub calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StubRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub bearer: Option<String>,
}

#[derive(Clone)]
struct GatewayState {
    config: Arc<GatewayStubConfig>,
    requests: Arc<Mutex<Vec<StubRequest>>>,
    entities: Arc<Mutex<HashMap<String, Value>>>,
}

impl GatewayState {
    fn record(&self, method: &Method, uri: &Uri, headers: &HeaderMap) {
        let header = |name: HeaderName| headers.get(name).and_then(|value| value.to_str().ok());
        let request = StubRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            content_type: header(CONTENT_TYPE).map(ToString::to_string),
            bearer: header(AUTHORIZATION)
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(ToString::to_string),
        };
        if let Ok(mut entries) = self.requests.lock() {
            entries.push(request);
        }
    }

    /// Returns true when the bearer token was issued for the route's PEP client.
    fn authorized(&self, route: &str, headers: &HeaderMap) -> bool {
        let Some(client_id) = route_client(route) else {
            return false;
        };
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == format!("Bearer {}", issued_token(client_id)))
    }
}

fn route_client(route: &str) -> Option<&'static str> {
    match route {
        "keycloak-orion" => Some("orion-pep"),
        "keycloak-miktaka" => Some("miktaka-pep"),
        _ => None,
    }
}

/// Token the stub issues for a PEP client.
pub fn issued_token(client_id: &str) -> String {
    format!("stub-token-{client_id}")
}

/// Handle for the gateway stub server.
pub struct GatewayStubHandle {
    host: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    requests: Arc<Mutex<Vec<StubRequest>>>,
    entities: Arc<Mutex<HashMap<String, Value>>>,
}

impl GatewayStubHandle {
    /// Returns the `HOST` value pointing at the stub.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns captured requests.
    pub fn requests(&self) -> Vec<StubRequest> {
        self.requests.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Returns the ids of stored entities.
    pub fn entity_ids(&self) -> Vec<String> {
        self.entities.lock().map_or_else(|_| Vec::new(), |entries| entries.keys().cloned().collect())
    }
}

impl Drop for GatewayStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawns a gateway stub with default behavior.
pub fn spawn_gateway_stub() -> Result<GatewayStubHandle, String> {
    spawn_gateway_stub_with(GatewayStubConfig::default())
}

/// Spawns a gateway stub with the given behavior.
pub fn spawn_gateway_stub_with(config: GatewayStubConfig) -> Result<GatewayStubHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("gateway stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("gateway stub listener nonblocking failed: {err}"))?;
    let addr =
        listener.local_addr().map_err(|err| format!("gateway stub local addr failed: {err}"))?;
    let host = format!("http://{addr}");

    let requests = Arc::new(Mutex::new(Vec::new()));
    let entities = Arc::new(Mutex::new(HashMap::new()));
    let state = GatewayState {
        config: Arc::new(config),
        requests: Arc::clone(&requests),
        entities: Arc::clone(&entities),
    };
    let app = Router::new()
        .route("/index.html", get(handle_index))
        .route("/idm/realms/fiware-server/protocol/openid-connect/token", post(handle_token))
        .route("/kong/{route}/version", get(handle_version))
        .route("/kong/{route}/ngsi-ld/v1/entities", post(handle_create_entity))
        .route("/kong/{route}/ngsi-ld/v1/entities/{id}", get(handle_get_entity))
        .with_state(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(GatewayStubHandle {
        host,
        shutdown: Some(shutdown_tx),
        join: Some(join),
        requests,
        entities,
    })
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response()
}

async fn handle_index(
    State(state): State<GatewayState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&method, &uri, &headers);
    (state.config.ping_status, "<html><body>data platform</body></html>").into_response()
}

async fn handle_token(
    State(state): State<GatewayState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.record(&method, &uri, &headers);
    let config = &state.config;
    let field = |name: &str| form.get(name).map(String::as_str).unwrap_or_default();
    let client_id = field("client_id");
    let valid = field("grant_type") == "password"
        && field("username") == config.username
        && field("password") == config.password
        && config.client_secrets.get(client_id).is_some_and(|secret| secret == field("client_secret"));
    if !valid {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid_grant" })))
            .into_response();
    }
    if config.omit_access_token {
        return Json(json!({ "token_type": "Bearer", "expires_in": 300 })).into_response();
    }
    Json(json!({
        "access_token": issued_token(client_id),
        "token_type": "Bearer",
        "expires_in": 300
    }))
    .into_response()
}

async fn handle_version(
    State(state): State<GatewayState>,
    Path(route): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&method, &uri, &headers);
    if !state.authorized(&route, &headers) {
        return unauthorized();
    }
    let version = if route_client(&route) == Some("miktaka-pep") {
        state.config.miktaka_version.clone()
    } else {
        state.config.version.clone()
    };
    Json(version).into_response()
}

async fn handle_create_entity(
    State(state): State<GatewayState>,
    Path(route): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.record(&method, &uri, &headers);
    if !state.authorized(&route, &headers) {
        return unauthorized();
    }
    let ld_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/ld+json"));
    if !ld_json {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }
    let Ok(entity) = serde_json::from_slice::<Value>(&body) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Some(id) = entity.get("id").and_then(Value::as_str).map(ToString::to_string) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Ok(mut entities) = state.entities.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    if entities.contains_key(&id) {
        return (StatusCode::CONFLICT, Json(json!({ "title": "Entity already exists" })))
            .into_response();
    }
    entities.insert(id.clone(), entity);
    (StatusCode::CREATED, [(LOCATION, format!("/ngsi-ld/v1/entities/{id}"))]).into_response()
}

async fn handle_get_entity(
    State(state): State<GatewayState>,
    Path((route, id)): Path<(String, String)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&method, &uri, &headers);
    if !state.authorized(&route, &headers) {
        return unauthorized();
    }
    let stored = state.entities.lock().ok().and_then(|entities| entities.get(&id).cloned());
    match stored {
        Some(entity) => Json(entity).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "title": "Entity Not Found" })))
            .into_response(),
    }
}
