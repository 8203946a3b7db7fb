//! Telegram Messaging Gateway
//!
//! Delivers composed relay messages to a single Telegram chat through the Bot API.
//! Every call is a single attempt; failures are returned to the caller.

pub mod client;
pub mod types;

use async_trait::async_trait;
use tracing::debug;

pub use client::TelegramGateway;

use crate::relay::OutboundMessage;

/// Telegram limits a media group to this many items.
pub const MEDIA_GROUP_LIMIT: usize = 10;

/// Markdown flavour used for text messages and captions.
pub const PARSE_MODE: &str = "Markdown";

/// Errors raised by a messaging gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid destination chat id {0:?}")]
    InvalidChatId(String),

    #[error("Photo batch is empty")]
    EmptyBatch,

    #[error("Transport error: {0}")]
    Transport(reqwest::Error),

    #[error("Telegram API error (HTTP {status}): {description}")]
    Api { status: u16, description: String },
}

// Request URLs embed the bot token, so they never reach the error text.
impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

/// Sends messages to the relay's fixed destination chat.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Send a Markdown text message.
    async fn send_text(&self, text: &str) -> Result<(), GatewayError>;

    /// Send remote photos as one grouped message, captioning only the first photo.
    async fn send_photo_batch(
        &self,
        photo_urls: &[String],
        caption: Option<&str>,
    ) -> Result<(), GatewayError>;
}

/// Route a composed message to the matching gateway primitive.
pub async fn deliver(
    gateway: &dyn MessagingGateway,
    message: &OutboundMessage,
) -> Result<(), GatewayError> {
    match message {
        OutboundMessage::Text { text } => {
            debug!(length = text.len(), "Delivering text message");
            gateway.send_text(text).await
        }
        OutboundMessage::PhotoBatch {
            photo_urls,
            caption,
        } => {
            debug!(photo_count = photo_urls.len(), "Delivering photo batch");
            gateway
                .send_photo_batch(photo_urls, caption.as_deref())
                .await
        }
    }
}
