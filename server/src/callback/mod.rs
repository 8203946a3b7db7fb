//! VK Callback Dispatch
//!
//! Validates incoming callbacks and routes them by event type:
//! confirmations are answered with the configured code, new wall posts are
//! relayed to Telegram, everything else is acknowledged and ignored.

pub mod dispatch;
pub mod wall_post;

use axum::http::StatusCode;

pub use dispatch::{dispatch, CallbackSettings};
pub use wall_post::{handle_wall_post_new, WallPostError, WallPostOutcome};

use crate::telegram::GatewayError;
use crate::vk::ModelError;

/// Body VK expects for every acknowledged non-confirmation callback.
pub const OK_BODY: &str = "ok";

/// Successful result of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Confirmation handshake; carries the code VK must receive verbatim.
    Confirmation(String),
    /// The event was processed or skipped.
    Acknowledged,
}

impl CallbackOutcome {
    /// Response body for VK.
    pub fn into_body(self) -> String {
        match self {
            Self::Confirmation(code) => code,
            Self::Acknowledged => OK_BODY.to_owned(),
        }
    }
}

/// Conditions that reject a callback outright.
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("Invalid JSON format")]
    MalformedCallback(#[source] ModelError),

    #[error("Invalid secret key")]
    Unauthorized,

    #[error("Invalid group_id")]
    InvalidGroup { received: i64, expected: i64 },

    #[error("Failed to initialize Telegram service")]
    GatewayUnavailable(#[source] GatewayError),
}

impl CallbackError {
    /// HTTP status reported back to VK.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedCallback(_) | Self::InvalidGroup { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::GatewayUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let malformed = CallbackError::MalformedCallback(ModelError::MissingObject);
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(malformed.to_string(), "Invalid JSON format");

        assert_eq!(CallbackError::Unauthorized.status(), StatusCode::UNAUTHORIZED);

        let group = CallbackError::InvalidGroup {
            received: 1,
            expected: 2,
        };
        assert_eq!(group.status(), StatusCode::BAD_REQUEST);
        assert_eq!(group.to_string(), "Invalid group_id");

        let unavailable =
            CallbackError::GatewayUnavailable(GatewayError::InvalidChatId("@channel".into()));
        assert_eq!(unavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(unavailable.to_string(), "Failed to initialize Telegram service");
    }

    #[test]
    fn test_outcome_body() {
        assert_eq!(CallbackOutcome::Acknowledged.into_body(), "ok");
        assert_eq!(
            CallbackOutcome::Confirmation("d8v2ve07".into()).into_body(),
            "d8v2ve07"
        );
    }
}
