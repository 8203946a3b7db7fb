//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for sending requests through the full axum router, and
//! `MockTelegram`, a local stand-in for the Bot API that records every call.
//!
//! ## Test Servers
//!
//! Use [`spawn_test_server()`] to run any router on a random local port.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{self, Method, Request, Response, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tower::ServiceExt;
use vk_relay::api::{create_router, AppState};
use vk_relay::config::Config;

// ============================================================================
// Test Server
// ============================================================================

/// A running test server bound to a random port.
pub struct TestServer {
    /// Server address (127.0.0.1:PORT).
    pub addr: SocketAddr,
    /// Base URL for HTTP requests (e.g., `http://127.0.0.1:12345`).
    pub url: String,
    /// Handle to the server task for cleanup.
    _handle: JoinHandle<()>,
}

/// Spawn a real HTTP server on a random port.
pub async fn spawn_test_server(router: Router) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    TestServer {
        addr,
        url,
        _handle: handle,
    }
}

// ============================================================================
// Mock Telegram Bot API
// ============================================================================

/// One Bot API call received by the mock.
#[derive(Debug, Clone)]
pub struct TelegramCall {
    /// Path segment carrying the token, e.g. `bot123456:TEST-TOKEN`.
    pub bot: String,
    /// Bot API method, e.g. `sendMediaGroup`.
    pub method: String,
    /// JSON request body.
    pub body: Value,
}

#[derive(Clone, Default)]
struct MockState {
    calls: Arc<Mutex<Vec<TelegramCall>>>,
    failure: Option<(StatusCode, &'static str)>,
}

/// Local Bot API server that records calls and answers like Telegram.
pub struct MockTelegram {
    pub server: TestServer,
    calls: Arc<Mutex<Vec<TelegramCall>>>,
}

impl MockTelegram {
    /// Start a mock that accepts every call.
    pub async fn start() -> Self {
        Self::spawn(MockState::default()).await
    }

    /// Start a mock that rejects every call with `status` and `description`.
    pub async fn failing(status: StatusCode, description: &'static str) -> Self {
        Self::spawn(MockState {
            failure: Some((status, description)),
            ..MockState::default()
        })
        .await
    }

    async fn spawn(state: MockState) -> Self {
        let calls = state.calls.clone();
        let router = Router::new()
            .route("/{bot}/{method}", post(mock_method))
            .with_state(state);
        let server = spawn_test_server(router).await;
        Self { server, calls }
    }

    /// Base URL to use as `TELEGRAM_API_BASE`.
    pub fn url(&self) -> &str {
        &self.server.url
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<TelegramCall> {
        self.calls.lock().expect("mock state poisoned").clone()
    }

    /// Calls of one Bot API method.
    pub fn calls_to(&self, method: &str) -> Vec<TelegramCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method)
            .collect()
    }
}

async fn mock_method(
    State(state): State<MockState>,
    Path((bot, method)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let media_count = body["media"].as_array().map_or(0, Vec::len);
    state
        .calls
        .lock()
        .expect("mock state poisoned")
        .push(TelegramCall {
            bot,
            method: method.clone(),
            body,
        });

    if let Some((status, description)) = state.failure {
        return (
            status,
            Json(json!({
                "ok": false,
                "error_code": status.as_u16(),
                "description": description
            })),
        );
    }

    let result = match method.as_str() {
        "getMe" => json!({
            "id": 777,
            "is_bot": true,
            "first_name": "Relay",
            "username": "relay_bot"
        }),
        "sendMediaGroup" => Value::Array(
            (0..media_count)
                .map(|i| json!({"message_id": 100 + i, "date": 0, "chat": {"id": 1}}))
                .collect(),
        ),
        _ => json!({"message_id": 99, "date": 0, "chat": {"id": 1}}),
    };
    (StatusCode::OK, Json(json!({"ok": true, "result": result})))
}

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Create a test app whose Telegram gateway talks to `telegram_url`.
    pub fn new(telegram_url: &str) -> Self {
        let mut config = Config::default_for_test();
        config.telegram.api_base = telegram_url.to_owned();
        Self::with_config(config)
    }

    /// Create a test app with a custom config.
    pub fn with_config(config: Config) -> Self {
        let state = AppState::new(config.clone(), reqwest::Client::new());
        let router = create_router(state);

        Self {
            router,
            config: Arc::new(config),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// POST a callback wrapped in the function transport envelope to `/`.
    pub async fn invoke(&self, callback: &Value) -> Response<Body> {
        self.invoke_body(&callback.to_string()).await
    }

    /// POST an arbitrary callback string wrapped in the transport envelope to `/`.
    pub async fn invoke_body(&self, body: &str) -> Response<Body> {
        let envelope = json!({ "body": body });
        self.post_raw("/", envelope.to_string()).await
    }

    /// POST an arbitrary body to `uri`.
    pub async fn post_raw(&self, uri: &str, body: impl Into<Body>) -> Response<Body> {
        let request = Self::request(Method::POST, uri)
            .header("content-type", "application/json")
            .body(body.into())
            .expect("Failed to build request");
        self.oneshot(request).await
    }
}

// ============================================================================
// Callback builders
// ============================================================================

/// A callback signed with the test secret and group id.
pub fn callback(config: &Config, event_type: &str, object: Value) -> Value {
    json!({
        "type": event_type,
        "event_id": "6d4b2e1a9c",
        "v": "5.199",
        "object": object,
        "group_id": config.vk_group_id,
        "secret": config.vk_secret
    })
}

/// A photo attachment with an original-size rendition.
pub fn photo_attachment(url: &str) -> Value {
    json!({
        "type": "photo",
        "photo": {
            "id": 457239017,
            "owner_id": -229580316,
            "orig_photo": {"type": "base", "url": url, "width": 1280, "height": 960}
        }
    })
}

/// Collect a response body as a JSON value.
pub async fn body_to_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();

    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        let preview = String::from_utf8_lossy(&bytes);
        panic!("Failed to parse response as JSON: {e}\nBody: {preview}")
    })
}

/// Collect a response body as text.
pub async fn body_to_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}
