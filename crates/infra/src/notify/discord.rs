//! Discord webhook sink

use async_trait::async_trait;
use endfield_core::Notifier;
use endfield_domain::constants::{DISCORD_WEBHOOK_PREFIX, NOTIFICATION_TITLE};
use endfield_domain::{DailyError, DiscordConfig, MessageLog, Result};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::http::HttpClient;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts each message log as one Discord message.
#[derive(Clone)]
pub struct DiscordNotifier {
    webhook_url: String,
    user_id: Option<String>,
    http: HttpClient,
    check_host: bool,
}

impl DiscordNotifier {
    pub fn new(webhook_url: impl Into<String>, user_id: Option<String>, http: HttpClient) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            user_id: user_id.filter(|id| !id.is_empty()),
            http,
            check_host: true,
        }
    }

    /// Build from configuration; `None` when no webhook is configured.
    pub fn from_config(config: &DiscordConfig, http: HttpClient) -> Option<Self> {
        config
            .webhook_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map(|url| Self::new(url, config.user_id.clone(), http))
    }

    #[cfg(test)]
    fn accepting_any_host(mut self) -> Self {
        self.check_host = false;
        self
    }

    #[instrument(skip_all, fields(messages = log.messages.len()))]
    async fn post(&self, log: &MessageLog) -> Result<()> {
        if self.check_host && !is_webhook_url(&self.webhook_url) {
            return Err(DailyError::Notification("invalid Discord webhook URL".to_string()));
        }

        let content = render_content(self.user_id.as_deref(), log);
        let payload = WebhookPayload { content: &content };
        let url = self.webhook_url.trim();

        let response = self
            .http
            .execute(|| Ok(self.http.request(Method::POST, url).json(&payload)))
            .await
            .map_err(|err| {
                DailyError::Notification(format!("discord webhook request failed: {err}"))
            })?;

        if response.status != StatusCode::NO_CONTENT {
            return Err(DailyError::Notification(format!(
                "discord webhook returned status {}",
                response.status.as_u16()
            )));
        }
        debug!("discord notification delivered");
        Ok(())
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, log: &MessageLog) -> Result<()> {
        self.post(log).await
    }
}

/// Case-insensitive prefix check on the trimmed URL.
pub fn is_webhook_url(url: &str) -> bool {
    url.trim().to_ascii_lowercase().starts_with(DISCORD_WEBHOOK_PREFIX)
}

/// Message body: optional mention, title, then one `(LEVEL) text` line per
/// message.
pub fn render_content(user_id: Option<&str>, log: &MessageLog) -> String {
    let mut content = String::new();
    if let Some(user) = user_id.filter(|id| !id.is_empty()) {
        content.push_str(&format!("<@{user}>\n"));
    }
    content.push_str(NOTIFICATION_TITLE);
    content.push('\n');
    for message in &log.messages {
        content.push_str(&format!(
            "({}) {}\n",
            message.level.as_str().to_ascii_uppercase(),
            message.text
        ));
    }
    content
}
