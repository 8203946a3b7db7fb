//! VK Callback API Model
//!
//! Shapes of the callback envelope VK posts to the relay and of the
//! `wall_post_new` payload, plus the extraction helpers the relay needs.

pub mod types;

pub use types::{Attachment, CallbackEnvelope, Photo, PhotoSize, PostAuthorData, WallPost};

/// Base of a VK user profile URL; the numeric user id is appended.
pub const PROFILE_URL_BASE: &str = "https://vk.com/id";

/// Callback event types the relay knows how to handle.
pub const EVENT_CONFIRMATION: &str = "confirmation";
pub const EVENT_WALL_POST_NEW: &str = "wall_post_new";

/// Errors raised while decoding VK payloads.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Malformed callback envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    #[error("Malformed wall post payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("Callback carries no object payload")]
    MissingObject,
}
