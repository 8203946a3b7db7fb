//! VK Callback Types
//!
//! Decoding is lenient: absent scalar fields fall back to their zero value and
//! `null` collections decode as empty, so only structurally invalid JSON fails.

use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

use super::{ModelError, PROFILE_URL_BASE};

/// Outer callback payload delivered by VK.
#[derive(Debug, Deserialize)]
pub struct CallbackEnvelope {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub event_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_id: String,
    #[serde(rename = "v", default, deserialize_with = "null_as_default")]
    pub version: String,
    /// Type-specific payload, decoded on demand.
    #[serde(default)]
    pub object: Option<Box<RawValue>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub secret: String,
}

impl CallbackEnvelope {
    /// Decode an envelope from the raw callback body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        serde_json::from_slice(bytes).map_err(ModelError::MalformedEnvelope)
    }

    /// Decode the `object` field as a wall post.
    pub fn wall_post(&self) -> Result<WallPost, ModelError> {
        let raw = self.object.as_deref().ok_or(ModelError::MissingObject)?;
        serde_json::from_str(raw.get()).map_err(ModelError::MalformedPayload)
    }
}

/// A post published on the community wall.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WallPost {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub from_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: i64,
    /// `post`, `copy`, `reply`, `postpone`, `suggest`; absent on some API versions.
    #[serde(default)]
    pub post_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub post_author_data: Option<PostAuthorData>,
}

impl WallPost {
    /// Whether the post is an ordinary wall post.
    ///
    /// Posts that do not report a `post_type` are treated as ordinary.
    pub fn is_forwardable(&self) -> bool {
        self.post_type.as_deref().map_or(true, |t| t == "post")
    }

    /// Original-size photo URLs in attachment order.
    pub fn photo_urls(&self) -> Vec<String> {
        self.attachments
            .iter()
            .filter_map(Attachment::original_photo_url)
            .map(str::to_owned)
            .collect()
    }

    /// Profile link of the user who wrote the post, if VK reported one.
    pub fn author_url(&self) -> Option<String> {
        self.post_author_data
            .as_ref()
            .and_then(PostAuthorData::profile_url)
    }
}

/// Signed-post metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostAuthorData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publisher: i64,
}

impl PostAuthorData {
    /// `https://vk.com/id<author>`, or `None` when the author id is zero.
    pub fn profile_url(&self) -> Option<String> {
        (self.author != 0).then(|| format!("{PROFILE_URL_BASE}{}", self.author))
    }
}

/// A single wall post attachment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default)]
    pub photo: Option<Photo>,
}

impl Attachment {
    /// URL of the original-size rendition when this is a photo attachment.
    pub fn original_photo_url(&self) -> Option<&str> {
        if self.kind != "photo" {
            return None;
        }
        self.photo
            .as_ref()?
            .orig_photo
            .as_ref()
            .map(|size| size.url.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Photo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_id: i64,
    #[serde(default)]
    pub orig_photo: Option<PhotoSize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoSize {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: u32,
}

/// Decode `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
