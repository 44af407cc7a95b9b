//! Configuration structures
//!
//! Loaded by `endfield-infra::config`; every section except `accounts` has
//! defaults so a file only needs to list what it overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ACCOUNT_BASE_URL, DEFAULT_ACCOUNT_DELAY_MS, DEFAULT_BASE_BACKOFF_MS, DEFAULT_HEALTH_PORT,
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_ROLE_DELAY_MS, ZONAI_BASE_URL,
};
use crate::types::AccountToken;

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Account tokens, processed in order.
    pub accounts: Vec<AccountToken>,
    /// Cron expression; `None` means run once and exit.
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default = "default_health_port")]
    pub health_port: u16,
    /// Also notify when a role was already checked in.
    #[serde(default)]
    pub notify_no_ops: bool,
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

impl AppConfig {
    /// Configuration with defaults for everything but the tokens.
    pub fn with_accounts(accounts: Vec<AccountToken>) -> Self {
        Self {
            accounts,
            schedule: None,
            health_port: DEFAULT_HEALTH_PORT,
            notify_no_ops: false,
            discord: DiscordConfig::default(),
            http: HttpConfig::default(),
            pacing: PacingConfig::default(),
            endpoints: EndpointsConfig::default(),
        }
    }
}

/// Discord webhook sink; disabled when `webhook_url` is unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// User id to mention at the top of each notification.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Outbound HTTP behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries after the first attempt for signed game API calls.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    /// Retries for the OAuth exchange; transport failures only.
    #[serde(default)]
    pub negotiation_retries: u32,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff_ms: DEFAULT_BASE_BACKOFF_MS,
            negotiation_retries: 0,
        }
    }
}

/// Minimum spacing between consecutive accounts and roles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_account_delay_ms")]
    pub account_delay_ms: u64,
    #[serde(default = "default_role_delay_ms")]
    pub role_delay_ms: u64,
}

impl PacingConfig {
    pub fn account_delay(&self) -> Duration {
        Duration::from_millis(self.account_delay_ms)
    }

    pub fn role_delay(&self) -> Duration {
        Duration::from_millis(self.role_delay_ms)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { account_delay_ms: DEFAULT_ACCOUNT_DELAY_MS, role_delay_ms: DEFAULT_ROLE_DELAY_MS }
    }
}

/// Base URLs of the remote services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Gryphline account service (token validation, OAuth grant).
    #[serde(default = "default_account_base_url")]
    pub account_base_url: String,
    /// SKPort zonai service (credential exchange, binding, attendance).
    #[serde(default = "default_zonai_base_url")]
    pub zonai_base_url: String,
}

impl EndpointsConfig {
    /// Point both services at the same base URL (mock servers in tests).
    pub fn single(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self { account_base_url: base_url.clone(), zonai_base_url: base_url }
    }

    pub fn account_url(&self, path: &str) -> String {
        join_url(&self.account_base_url, path)
    }

    pub fn zonai_url(&self, path: &str) -> String {
        join_url(&self.zonai_base_url, path)
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            account_base_url: default_account_base_url(),
            zonai_base_url: default_zonai_base_url(),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

fn default_health_port() -> u16 {
    DEFAULT_HEALTH_PORT
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_base_backoff_ms() -> u64 {
    DEFAULT_BASE_BACKOFF_MS
}

fn default_account_delay_ms() -> u64 {
    DEFAULT_ACCOUNT_DELAY_MS
}

fn default_role_delay_ms() -> u64 {
    DEFAULT_ROLE_DELAY_MS
}

fn default_account_base_url() -> String {
    ACCOUNT_BASE_URL.to_string()
}

fn default_zonai_base_url() -> String {
    ZONAI_BASE_URL.to_string()
}
