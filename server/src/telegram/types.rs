//! Telegram Bot API Types
//!
//! Request bodies and the response envelope for the few Bot API methods the relay calls.

use serde::{Deserialize, Serialize};

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    pub parse_mode: &'a str,
}

/// `sendPhoto` request body; `photo` is a remote URL Telegram fetches itself.
#[derive(Debug, Serialize)]
pub struct SendPhoto<'a> {
    pub chat_id: i64,
    pub photo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'a str>,
}

/// `sendMediaGroup` request body.
#[derive(Debug, Serialize)]
pub struct SendMediaGroup<'a> {
    pub chat_id: i64,
    pub media: Vec<InputMediaPhoto<'a>>,
}

/// One photo of a media group.
#[derive(Debug, Serialize)]
pub struct InputMediaPhoto<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub media: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'a str>,
}

impl<'a> InputMediaPhoto<'a> {
    pub const fn new(url: &'a str) -> Self {
        Self {
            kind: "photo",
            media: url,
            caption: None,
            parse_mode: None,
        }
    }
}

/// Response envelope shared by every Bot API method.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i32>,
}

/// The subset of a sent `Message` the relay logs.
#[derive(Debug, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}

/// The subset of `getMe`'s `User` the relay logs.
#[derive(Debug, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}
