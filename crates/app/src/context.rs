//! Application context - dependency injection container

use std::sync::Arc;

use endfield_core::CheckInService;
use endfield_domain::{AppConfig, Result};
use endfield_infra::http::{HttpClient, HttpClientBuilder};
use endfield_infra::{DiscordNotifier, SkportAuthenticator, SkportClient};
use tracing::info;

/// Configuration plus the service built from it.
pub struct AppContext {
    pub config: AppConfig,
    pub service: Arc<CheckInService>,
}

impl AppContext {
    /// Wire the HTTP clients, SKPort adapters and the optional Discord sink.
    ///
    /// The OAuth exchange gets its own client so its retry budget
    /// (`negotiation_retries`) stays separate from the game API's.
    pub fn new(config: AppConfig) -> Result<Self> {
        let api_http =
            HttpClientBuilder::from_config(&config.http, config.http.max_retries).build()?;
        let auth_http =
            HttpClientBuilder::from_config(&config.http, config.http.negotiation_retries).build()?;

        let negotiator = SkportAuthenticator::new(auth_http, config.endpoints.clone());
        let gateway = SkportClient::new(api_http, config.endpoints.clone());

        let mut service = CheckInService::new(Arc::new(negotiator), Arc::new(gateway))
            .with_pacing(config.pacing.clone())
            .with_notify_no_ops(config.notify_no_ops);

        let notify_http =
            HttpClient::builder().timeout(config.http.timeout()).max_retries(0).build()?;
        match DiscordNotifier::from_config(&config.discord, notify_http) {
            Some(notifier) => {
                info!(mention = config.discord.user_id.is_some(), "Discord notifications enabled");
                service = service.with_notifier(Arc::new(notifier));
            }
            None => info!("Discord notifications disabled"),
        }

        info!(accounts = config.accounts.len(), "Application context ready");
        Ok(Self { config, service: Arc::new(service) })
    }
}
