//! Telegram Bot API Client
//!
//! `reqwest`-backed implementation of [`MessagingGateway`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};

use super::types::{
    ApiResponse, BotUser, InputMediaPhoto, SendMediaGroup, SendMessage, SendPhoto, SentMessage,
};
use super::{GatewayError, MessagingGateway, MEDIA_GROUP_LIMIT, PARSE_MODE};
use crate::config::TelegramConfig;

/// Gateway bound to one bot token and one destination chat.
#[derive(Clone)]
pub struct TelegramGateway {
    http: reqwest::Client,
    api_base: String,
    token: String,
    chat_id: i64,
    debug: bool,
}

impl std::fmt::Debug for TelegramGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramGateway")
            .field("api_base", &self.api_base)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramGateway {
    /// Build a gateway from the Telegram settings.
    ///
    /// Fails when the configured chat id is not a decimal integer.
    pub fn new(http: reqwest::Client, config: &TelegramConfig) -> Result<Self, GatewayError> {
        let chat_id = config
            .chat_id
            .trim()
            .parse::<i64>()
            .map_err(|_| GatewayError::InvalidChatId(config.chat_id.clone()))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_owned(),
            token: config.bot_token.clone(),
            chat_id,
            debug: config.debug,
        })
    }

    /// Destination chat id.
    pub const fn chat_id(&self) -> i64 {
        self.chat_id
    }

    /// Authorize the bot token and return the bot's username.
    pub async fn get_me(&self) -> Result<String, GatewayError> {
        let user: BotUser = self.call("getMe", &serde_json::json!({})).await?;
        Ok(user.username.unwrap_or_else(|| user.id.to_string()))
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token)
    }

    /// POST `body` to a Bot API method and decode its `result`.
    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        if self.debug {
            debug!(
                method,
                payload = %serde_json::to_string(body).unwrap_or_default(),
                "Telegram request"
            );
        }

        let response = self
            .http
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let parsed: ApiResponse<T> = match serde_json::from_slice(&bytes) {
            Ok(parsed) => parsed,
            Err(e) => {
                let preview: String = String::from_utf8_lossy(&bytes).chars().take(200).collect();
                return Err(GatewayError::Api {
                    status: status.as_u16(),
                    description: format!("unreadable response ({e}): {preview}"),
                });
            }
        };

        if !status.is_success() || !parsed.ok {
            return Err(GatewayError::Api {
                status: status.as_u16(),
                description: parsed
                    .description
                    .unwrap_or_else(|| "no description".to_owned()),
            });
        }

        parsed.result.ok_or_else(|| GatewayError::Api {
            status: status.as_u16(),
            description: "response has no result".to_owned(),
        })
    }

    async fn send_single_photo(
        &self,
        url: &str,
        caption: Option<&str>,
    ) -> Result<(), GatewayError> {
        let body = SendPhoto {
            chat_id: self.chat_id,
            photo: url,
            caption,
            parse_mode: caption.map(|_| PARSE_MODE),
        };
        let sent: SentMessage = self.call("sendPhoto", &body).await?;
        info!(message_id = sent.message_id, "Photo sent successfully");
        Ok(())
    }
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
    async fn send_text(&self, text: &str) -> Result<(), GatewayError> {
        info!("Sending text message to Telegram");
        debug!(chat_id = self.chat_id, text, "Text message details");

        let body = SendMessage {
            chat_id: self.chat_id,
            text,
            parse_mode: PARSE_MODE,
        };
        let sent: SentMessage = self.call("sendMessage", &body).await?;

        info!(message_id = sent.message_id, "Text message sent successfully");
        Ok(())
    }

    async fn send_photo_batch(
        &self,
        photo_urls: &[String],
        caption: Option<&str>,
    ) -> Result<(), GatewayError> {
        info!(photo_count = photo_urls.len(), "Sending photos as media group to Telegram");
        debug!(chat_id = self.chat_id, ?caption, ?photo_urls, "Media group details");

        // Media groups need at least two items.
        match photo_urls {
            [] => return Err(GatewayError::EmptyBatch),
            [only] => return self.send_single_photo(only, caption).await,
            _ => {}
        }

        let mut messages_sent = 0;
        for (index, chunk) in photo_urls.chunks(MEDIA_GROUP_LIMIT).enumerate() {
            if let [only] = chunk {
                // A trailing chunk of one cannot be a media group.
                self.send_single_photo(only, None).await?;
                messages_sent += 1;
                continue;
            }

            let mut media: Vec<InputMediaPhoto<'_>> =
                chunk.iter().map(|url| InputMediaPhoto::new(url)).collect();
            if index == 0 {
                if let Some(first) = media.first_mut() {
                    first.caption = caption;
                    first.parse_mode = caption.map(|_| PARSE_MODE);
                }
            }

            let body = SendMediaGroup {
                chat_id: self.chat_id,
                media,
            };
            let sent: Vec<SentMessage> = match self.call("sendMediaGroup", &body).await {
                Ok(sent) => sent,
                Err(e) => {
                    error!(error = %e, chunk = index, "Failed to send media group");
                    return Err(e);
                }
            };
            messages_sent += sent.len();
        }

        info!(messages_sent, "Media group sent successfully");
        Ok(())
    }
}
