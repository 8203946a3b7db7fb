//! `wall_post_new` handling.

use tracing::{debug, info, warn};

use crate::relay::OutboundContent;
use crate::telegram::{self, GatewayError, MessagingGateway};
use crate::vk::{CallbackEnvelope, ModelError};

/// What happened to a new wall post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WallPostOutcome {
    /// A message was delivered to the chat.
    Sent,
    /// The post has neither text nor photos.
    NoContent,
    /// The post is not an ordinary wall post (`post_type` shown).
    Skipped(String),
}

/// Failures while relaying a wall post. Never fatal for the callback.
#[derive(Debug, thiserror::Error)]
pub enum WallPostError {
    #[error(transparent)]
    Payload(#[from] ModelError),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] GatewayError),
}

/// Decode the wall post carried by `envelope` and forward it through `gateway`.
pub async fn handle_wall_post_new(
    envelope: &CallbackEnvelope,
    gateway: &dyn MessagingGateway,
) -> Result<WallPostOutcome, WallPostError> {
    let post = envelope.wall_post()?;

    if !post.is_forwardable() {
        let post_type = post.post_type.unwrap_or_default();
        warn!(post_type = %post_type, "post_type != 'post', skipping");
        return Ok(WallPostOutcome::Skipped(post_type));
    }

    info!(
        id = post.id,
        owner_id = post.owner_id,
        from_id = post.from_id,
        "New wall post received"
    );
    debug!(count = post.attachments.len(), "Processing attachments");

    let content = OutboundContent::from_post(&post);
    let Some(message) = content.compose() else {
        info!("Post has no content (text or photos), skipping Telegram notification");
        return Ok(WallPostOutcome::NoContent);
    };

    info!(
        text_length = content.text.len(),
        photo_count = content.photo_urls.len(),
        author_url = content.author_url.as_deref().unwrap_or(""),
        "Forwarding wall post"
    );

    telegram::deliver(gateway, &message).await?;

    info!("Message successfully sent to Telegram");
    Ok(WallPostOutcome::Sent)
}
