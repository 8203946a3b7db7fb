//! Relay HTTP Handlers
//!
//! Both entry points run the same dispatcher; they differ only in how the
//! callback body arrives and how the reply is shaped.

use axum::{body::Bytes, extract::State, http::StatusCode};
use tracing::{debug, error};

use super::types::{FunctionResponse, TransportRequest};
use super::AppState;
use crate::callback;
use crate::telegram::TelegramGateway;

/// Function-style entry point.
///
/// POST /
pub async fn function_entry(State(state): State<AppState>, body: Bytes) -> FunctionResponse {
    let request: TransportRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "Error parsing API Gateway request");
            return FunctionResponse::new(
                StatusCode::BAD_REQUEST,
                "Invalid API Gateway request format",
            );
        }
    };

    debug!(body = %request.redacted_body(), "API Gateway request body");

    let (status, body) = relay(&state, request.body.as_bytes()).await;
    FunctionResponse::new(status, body)
}

/// Raw VK Callback API entry point.
///
/// POST /callback
pub async fn raw_callback(State(state): State<AppState>, body: Bytes) -> (StatusCode, String) {
    relay(&state, &body).await
}

/// Dispatch the callback, building this invocation's gateway on demand.
async fn relay(state: &AppState, body: &[u8]) -> (StatusCode, String) {
    let connect = || TelegramGateway::new(state.http.clone(), &state.config.telegram);

    match callback::dispatch(&state.callback, body, connect).await {
        Ok(outcome) => (StatusCode::OK, outcome.into_body()),
        Err(e) => (e.status(), e.to_string()),
    }
}
