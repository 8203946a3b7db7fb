//! Message Composer
//!
//! Decides between a text message, a photo batch, or nothing at all, and
//! appends the author link when the post was signed.

use crate::vk::WallPost;

/// Label of the Markdown link pointing at the post author's profile.
pub const AUTHOR_LINK_LABEL: &str = "contact the author";

/// Content extracted from a wall post, before formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundContent {
    pub text: String,
    pub photo_urls: Vec<String>,
    pub author_url: Option<String>,
}

impl OutboundContent {
    /// Collect text, original-size photo URLs, and the author link from a post.
    pub fn from_post(post: &WallPost) -> Self {
        Self {
            text: post.text.clone(),
            photo_urls: post.photo_urls(),
            author_url: post.author_url(),
        }
    }

    /// Whether there is neither text nor a photo to forward.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.photo_urls.is_empty()
    }

    /// Compose the outbound message; `None` when there is nothing to send.
    pub fn compose(&self) -> Option<OutboundMessage> {
        compose(&self.text, &self.photo_urls, self.author_url.as_deref())
    }
}

/// A message ready for the messaging gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Plain Markdown text message.
    Text { text: String },
    /// Remote photos sent as one grouped message; the caption goes on the first photo.
    PhotoBatch {
        photo_urls: Vec<String>,
        caption: Option<String>,
    },
}

/// Compose the message for `text`, `photo_urls`, and an optional author profile URL.
///
/// The emptiness check looks at the post text itself, so an author link alone
/// never produces a message.
pub fn compose(
    text: &str,
    photo_urls: &[String],
    author_url: Option<&str>,
) -> Option<OutboundMessage> {
    if text.is_empty() && photo_urls.is_empty() {
        return None;
    }

    let text = match author_url {
        Some(url) => format!("{text}\n\n[{AUTHOR_LINK_LABEL}]({url})"),
        None => text.to_owned(),
    };

    if photo_urls.is_empty() {
        return Some(OutboundMessage::Text { text });
    }

    Some(OutboundMessage::PhotoBatch {
        photo_urls: photo_urls.to_vec(),
        caption: (!text.is_empty()).then_some(text),
    })
}
