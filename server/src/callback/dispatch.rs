//! Callback Dispatcher
//!
//! One pass per callback: decode the envelope, check the shared secret,
//! then branch on the event type.

use tracing::{debug, error, field, info, instrument, warn, Span};

use super::wall_post::{handle_wall_post_new, WallPostOutcome};
use super::{CallbackError, CallbackOutcome};
use crate::config::Config;
use crate::telegram::{GatewayError, MessagingGateway};
use crate::vk::{CallbackEnvelope, EVENT_CONFIRMATION, EVENT_WALL_POST_NEW};

/// Longest body prefix logged when a callback fails to decode.
const BODY_PREVIEW_LEN: usize = 100;

/// VK-side values every callback is checked against.
#[derive(Debug, Clone)]
pub struct CallbackSettings {
    pub confirmation_code: String,
    pub secret: String,
    pub group_id: i64,
}

impl From<&Config> for CallbackSettings {
    fn from(config: &Config) -> Self {
        Self {
            confirmation_code: config.vk_confirmation_code.clone(),
            secret: config.vk_secret.clone(),
            group_id: config.vk_group_id,
        }
    }
}

/// Validate a raw callback body and act on it.
///
/// `connect` builds the messaging gateway. It runs only for authorized
/// callbacks past the confirmation handshake, so a broken Telegram setup never
/// blocks confirming the server with VK.
///
/// Rejections are a malformed envelope, a wrong secret, a foreign group id on
/// a confirmation, or a gateway that cannot be built. Wall post problems are
/// logged and the callback is still acknowledged, since VK disables servers
/// that keep failing.
#[instrument(
    name = "vk_callback",
    skip_all,
    fields(event_id = field::Empty, event_type = field::Empty)
)]
pub async fn dispatch<G, F>(
    settings: &CallbackSettings,
    body: &[u8],
    connect: F,
) -> Result<CallbackOutcome, CallbackError>
where
    G: MessagingGateway,
    F: FnOnce() -> Result<G, GatewayError>,
{
    let envelope = match CallbackEnvelope::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            let preview = String::from_utf8_lossy(&body[..body.len().min(BODY_PREVIEW_LEN)]);
            error!(error = %e, body_preview = %preview, "Error parsing VK callback JSON");
            return Err(CallbackError::MalformedCallback(e));
        }
    };

    let span = Span::current();
    span.record("event_id", envelope.event_id.as_str());
    span.record("event_type", envelope.event_type.as_str());
    debug!(group_id = envelope.group_id, version = %envelope.version, "VK callback parsed");

    if !secrets_match(&envelope.secret, &settings.secret) {
        error!(
            received_length = envelope.secret.len(),
            expected_length = settings.secret.len(),
            "Invalid secret key received"
        );
        return Err(CallbackError::Unauthorized);
    }

    if envelope.event_type == EVENT_CONFIRMATION {
        if envelope.group_id != settings.group_id {
            error!(
                received = envelope.group_id,
                expected = settings.group_id,
                "Invalid group_id in confirmation request"
            );
            return Err(CallbackError::InvalidGroup {
                received: envelope.group_id,
                expected: settings.group_id,
            });
        }

        info!(group_id = envelope.group_id, "Handling confirmation request");
        return Ok(CallbackOutcome::Confirmation(
            settings.confirmation_code.clone(),
        ));
    }

    let gateway = connect().map_err(|e| {
        error!(error = %e, "Error creating Telegram service");
        CallbackError::GatewayUnavailable(e)
    })?;

    match envelope.event_type.as_str() {
        EVENT_WALL_POST_NEW => match handle_wall_post_new(&envelope, &gateway).await {
            Ok(WallPostOutcome::Sent) => {}
            Ok(outcome) => debug!(?outcome, "Wall post not forwarded"),
            Err(e) => error!(error = %e, "Error handling wall_post_new"),
        },
        other => warn!(event_type = other, "Unhandled event type"),
    }

    info!("Return OK to VK");
    Ok(CallbackOutcome::Acknowledged)
}

/// Compare secrets without short-circuiting on the first differing byte.
fn secrets_match(received: &str, expected: &str) -> bool {
    received.len() == expected.len()
        && received
            .as_bytes()
            .iter()
            .zip(expected.as_bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
