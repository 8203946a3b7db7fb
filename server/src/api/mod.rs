//! API Router and Application State
//!
//! Routing configuration and the state shared by the relay handlers.

pub mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{callback::CallbackSettings, config::Config};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Relay configuration
    pub config: Arc<Config>,
    /// VK values every callback is checked against
    pub callback: Arc<CallbackSettings>,
    /// HTTP client handed to each per-request Telegram gateway
    pub http: reqwest::Client,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(config: Config, http: reqwest::Client) -> Self {
        Self {
            callback: Arc::new(CallbackSettings::from(&config)),
            config: Arc::new(config),
            http,
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Function-style entry: {"body": "<callback JSON>"}
        .route("/", post(handlers::function_entry))
        // Raw VK Callback API entry
        .route("/callback", post(handlers::raw_callback))
        // Middleware
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
