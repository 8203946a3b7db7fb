//! VK Relay
//!
//! Stateless webhook relay: validates VK community callbacks and forwards new
//! wall posts, with their photos and author link, to a Telegram chat.

pub mod api;
pub mod callback;
pub mod config;
pub mod relay;
pub mod telegram;
pub mod vk;
