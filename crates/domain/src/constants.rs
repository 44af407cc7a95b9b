//! Protocol constants
//!
//! Fixed client identity and endpoint locations expected by the SKPort and
//! Gryphline account services. Changing any of the identity values breaks
//! request signing.

// Client identity
pub const PLATFORM: &str = "3";
pub const VNAME: &str = "1.0.0";
pub const APP_CODE: &str = "6eb76d4e13aa36e6";
pub const GAME_ID: &str = "3";
pub const GAME_APP_CODE: &str = "endfield";
pub const LANGUAGE: &str = "en";
pub const USER_AGENT: &str =
    "Skport/0.7.0 (com.gryphline.skport; build:700089; Android 33; ) Okhttp/5.1.0";

// Browser-style origin for signed game API calls
pub const GAME_ORIGIN: &str = "https://game.skport.com";
pub const GAME_REFERER: &str = "https://game.skport.com/";

// Origin for the credential exchange
pub const WEB_ORIGIN: &str = "https://www.skport.com";
pub const WEB_REFERER: &str = "https://www.skport.com/";

// Base URLs
pub const ACCOUNT_BASE_URL: &str = "https://as.gryphline.com";
pub const ZONAI_BASE_URL: &str = "https://zonai.skport.com";

// Paths; signed calls sign exactly these strings
pub const BASIC_INFO_PATH: &str = "/user/info/v1/basic";
pub const OAUTH_GRANT_PATH: &str = "/user/oauth2/v2/grant";
pub const GENERATE_CRED_PATH: &str = "/web/v1/user/auth/generate_cred_by_code";
pub const BINDING_PATH: &str = "/api/v1/game/player/binding";
pub const ATTENDANCE_PATH: &str = "/web/v1/game/endfield/attendance";

// Pacing between accounts and roles within one run
pub const DEFAULT_ACCOUNT_DELAY_MS: u64 = 1000;
pub const DEFAULT_ROLE_DELAY_MS: u64 = 500;

// Outbound retry policy
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_BACKOFF_MS: u64 = 1000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_HEALTH_PORT: u16 = 8080;

pub const DISCORD_WEBHOOK_PREFIX: &str = "https://discord.com/api/webhooks/";
pub const NOTIFICATION_TITLE: &str = "**Endfield Daily Check-in**";

/// Fallback when neither the API message nor the response body says anything.
pub const UNKNOWN_ERROR: &str = "unknown error";
