//! Transport Envelope Types
//!
//! Shapes used when the relay is invoked like a serverless function behind an
//! API gateway: the callback arrives as a JSON string inside `body`, and the
//! reply carries its own status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stands in for the VK secret in logged bodies.
const REDACTED: &str = "[redacted]";

/// Incoming function request.
#[derive(Debug, Deserialize)]
pub struct TransportRequest {
    /// The VK callback JSON, as a string.
    #[serde(default)]
    pub body: String,
}

impl TransportRequest {
    /// The callback body with its `secret` masked, for logging.
    ///
    /// Bodies that are not a JSON object are reduced to their length.
    pub fn redacted_body(&self) -> String {
        match serde_json::from_str::<Value>(&self.body) {
            Ok(Value::Object(mut fields)) => {
                if let Some(secret) = fields.get_mut("secret") {
                    *secret = Value::String(REDACTED.to_owned());
                }
                Value::Object(fields).to_string()
            }
            _ => format!("<{} bytes, not a JSON object>", self.body.len()),
        }
    }
}

/// Function response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl FunctionResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            body: body.into(),
        }
    }
}

impl IntoResponse for FunctionResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
