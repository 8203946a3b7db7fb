//! Outbound Message Composition
//!
//! Turns a wall post into the message the relay sends to Telegram.

pub mod compose;

pub use compose::{compose, OutboundContent, OutboundMessage, AUTHOR_LINK_LABEL};
