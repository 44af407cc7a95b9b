//! Notification sinks

pub mod discord;

pub use discord::{render_content, DiscordNotifier};
