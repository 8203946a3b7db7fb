//! Relay Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{bail, Context, Result};
use std::env;

/// Default Telegram Bot API endpoint.
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Relay configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// Code returned to VK for `confirmation` callbacks
    pub vk_confirmation_code: String,

    /// Shared secret every VK callback must carry
    pub vk_secret: String,

    /// Community id expected on `confirmation` callbacks
    pub vk_group_id: i64,

    /// Telegram delivery settings
    pub telegram: TelegramConfig,
}

/// Settings for the Telegram gateway.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: String,

    /// Destination chat id, kept as the numeric string from the environment
    pub chat_id: String,

    /// Bot API base URL (default: `https://api.telegram.org`)
    pub api_base: String,

    /// Log every outgoing Bot API payload at debug level
    pub debug: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every VK and Telegram variable is required; an empty value counts as missing.
    pub fn from_env() -> Result<Self> {
        let vk_group_id = required("VK_GROUP_ID")?;
        let vk_group_id = vk_group_id
            .trim()
            .parse()
            .with_context(|| format!("VK_GROUP_ID must be numeric, got {vk_group_id:?}"))?;

        let chat_id = required("TELEGRAM_CHAT_ID")?;
        if chat_id.trim().parse::<i64>().is_err() {
            bail!("TELEGRAM_CHAT_ID must be numeric, got {chat_id:?}");
        }

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            vk_confirmation_code: required("VK_CONFIRMATION_CODE")?,
            vk_secret: required("VK_SECRET")?,
            vk_group_id,
            telegram: TelegramConfig {
                bot_token: required("TELEGRAM_BOT_TOKEN")?,
                chat_id,
                api_base: env::var("TELEGRAM_API_BASE")
                    .ok()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.into()),
                debug: env::var("TELEGRAM_DEBUG").is_ok_and(|v| v == "true"),
            },
        })
    }

    /// Create a fixed configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            vk_confirmation_code: "d8v2ve07".into(),
            vk_secret: "test-secret".into(),
            vk_group_id: 229_580_316,
            telegram: TelegramConfig {
                bot_token: "123456:TEST-TOKEN".into(),
                chat_id: "-1001234567890".into(),
                api_base: "http://127.0.0.1:9".into(),
                debug: false,
            },
        }
    }
}

/// Read a required variable, treating an empty value as missing.
fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("{name} must be set"),
    }
}
