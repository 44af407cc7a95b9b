//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. `ACCOUNT_TOKEN` set: everything comes from the environment
//! 2. Otherwise: read a TOML/JSON file (`ENDFIELD_CONFIG` or a probed path)
//! 3. In both cases the optional variables below override the result
//!
//! ## Environment Variables
//! - `ACCOUNT_TOKEN`: one or more account tokens separated by newlines
//! - `SCHEDULE`: cron expression; unset or empty runs once
//! - `HEALTH_PORT`: health endpoint port (default 8080)
//! - `DISCORD_WEBHOOK`: Discord webhook URL
//! - `DISCORD_USER`: Discord user id to mention
//! - `NOTIFY_NO_OPS`: any non-empty value also notifies already-claimed roles
//! - `ENDFIELD_CONFIG`: explicit config file path
//!
//! ## File Locations
//! When `ENDFIELD_CONFIG` is unset the loader probes, in order:
//! `./endfield-daily.toml`, `./endfield-daily.json`, `./config.toml`,
//! `./config.json`, then the same names next to the executable.

use std::path::{Path, PathBuf};

use endfield_domain::{AccountToken, AppConfig, DailyError, Result};

pub const ACCOUNT_TOKEN_VAR: &str = "ACCOUNT_TOKEN";
pub const SCHEDULE_VAR: &str = "SCHEDULE";
pub const HEALTH_PORT_VAR: &str = "HEALTH_PORT";
pub const DISCORD_WEBHOOK_VAR: &str = "DISCORD_WEBHOOK";
pub const DISCORD_USER_VAR: &str = "DISCORD_USER";
pub const NOTIFY_NO_OPS_VAR: &str = "NOTIFY_NO_OPS";
pub const CONFIG_PATH_VAR: &str = "ENDFIELD_CONFIG";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["endfield-daily.toml", "endfield-daily.json", "config.toml", "config.json"];

/// Load configuration from the process environment, falling back to a file.
///
/// # Errors
/// Returns `DailyError::Config` if no tokens are configured, the file cannot
/// be read or parsed, or an environment value is malformed.
pub fn load() -> Result<AppConfig> {
    load_with(|key| std::env::var(key).ok())
}

/// [`load`] with an injectable environment lookup.
pub fn load_with<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(ACCOUNT_TOKEN_VAR) {
        Some(raw) => {
            tracing::info!("Configuration loaded from environment variables");
            AppConfig::with_accounts(parse_tokens(&raw))
        }
        None => {
            let path = lookup(CONFIG_PATH_VAR).filter(|p| !p.is_empty()).map(PathBuf::from);
            if path.is_none() && probe_config_paths().is_none() {
                return Err(missing_tokens());
            }
            load_from_file(path)?
        }
    };

    apply_env_overrides(&mut config, &lookup)?;
    validate(config)
}

/// Load configuration from environment variables only.
///
/// # Errors
/// Returns `DailyError::Config` if `ACCOUNT_TOKEN` is missing or holds no
/// tokens, or another variable is malformed.
pub fn load_from_env<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(ACCOUNT_TOKEN_VAR).ok_or_else(missing_tokens)?;
    let mut config = AppConfig::with_accounts(parse_tokens(&raw));
    apply_env_overrides(&mut config, &lookup)?;
    validate(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. The format is picked
/// by extension. Account tokens in the file are trimmed and empty entries
/// dropped.
///
/// # Errors
/// Returns `DailyError::Config` if the file is missing, unreadable or
/// invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DailyError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DailyError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DailyError::Config(format!("Failed to read config file: {e}")))?;

    let mut config = parse_config(&contents, &config_path)?;
    config.accounts = config
        .accounts
        .into_iter()
        .map(|token| token.as_str().trim().to_string())
        .filter(|token| !token.is_empty())
        .map(AccountToken::from)
        .collect();
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DailyError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DailyError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DailyError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the working directory, then next to the
/// executable.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }
    probe_in(&dirs)
}

fn probe_in(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Split a newline-separated token list.
///
/// Each line is trimmed and query-unescaped (`+` becomes a space). A line
/// with a malformed escape, or one that does not decode to UTF-8, is kept as
/// is. Empty lines are dropped.
pub fn parse_tokens(raw: &str) -> Vec<AccountToken> {
    raw.lines()
        .map(str::trim)
        .map(|line| query_unescape(line).unwrap_or_else(|| line.to_string()))
        .filter(|token| !token.is_empty())
        .map(AccountToken::from)
        .collect()
}

fn query_unescape(line: &str) -> Option<String> {
    let bytes = line.as_bytes();
    let well_formed = bytes.iter().enumerate().filter(|(_, b)| **b == b'%').all(|(i, _)| {
        bytes.get(i + 1..i + 3).is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    });
    if !well_formed {
        return None;
    }
    urlencoding::decode(&line.replace('+', " ")).ok().map(|decoded| decoded.into_owned())
}

fn apply_env_overrides<F>(config: &mut AppConfig, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(schedule) = lookup(SCHEDULE_VAR) {
        let schedule = schedule.trim();
        config.schedule = (!schedule.is_empty()).then(|| schedule.to_string());
    }

    if let Some(port) = lookup(HEALTH_PORT_VAR).filter(|p| !p.trim().is_empty()) {
        config.health_port = port
            .trim()
            .parse()
            .map_err(|e| DailyError::Config(format!("Invalid {HEALTH_PORT_VAR} '{port}': {e}")))?;
    }

    if let Some(webhook) = lookup(DISCORD_WEBHOOK_VAR).filter(|v| !v.is_empty()) {
        config.discord.webhook_url = Some(webhook);
    }
    if let Some(user) = lookup(DISCORD_USER_VAR).filter(|v| !v.is_empty()) {
        config.discord.user_id = Some(user);
    }

    if lookup(NOTIFY_NO_OPS_VAR).is_some_and(|v| !v.is_empty()) {
        config.notify_no_ops = true;
    }

    Ok(())
}

fn validate(config: AppConfig) -> Result<AppConfig> {
    if config.accounts.is_empty() {
        return Err(missing_tokens());
    }
    Ok(config)
}

fn missing_tokens() -> DailyError {
    DailyError::Config(format!(
        "{ACCOUNT_TOKEN_VAR} environment variable is required (one or more tokens separated by newlines)"
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    fn tokens(config: &AppConfig) -> Vec<&str> {
        config.accounts.iter().map(AccountToken::as_str).collect()
    }

    #[test]
    fn parse_tokens_trims_decodes_and_drops_blanks() {
        let parsed = parse_tokens("  first  \n\nsecond%2Bpart%3D%3D\r\n   \n%FF%FE\n");
        let parsed: Vec<&str> = parsed.iter().map(AccountToken::as_str).collect();

        assert_eq!(parsed, vec!["first", "second+part==", "%FF%FE"]);
    }

    #[test]
    fn parse_tokens_unescapes_like_a_query_string() {
        let parsed = parse_tokens("a+b%20c\n%20padded%20\n50%\nbad%zzescape\n%2B");
        let parsed: Vec<&str> = parsed.iter().map(AccountToken::as_str).collect();

        assert_eq!(parsed, vec!["a b c", " padded ", "50%", "bad%zzescape", "+"]);
    }

    #[test]
    fn env_supplies_every_setting() {
        let config = load_from_env(env(&[
            ("ACCOUNT_TOKEN", "T1\nT2"),
            ("SCHEDULE", "0 2 * * *"),
            ("HEALTH_PORT", "9090"),
            ("DISCORD_WEBHOOK", "https://discord.com/api/webhooks/1/x"),
            ("DISCORD_USER", "42"),
            ("NOTIFY_NO_OPS", "1"),
        ]))
        .unwrap();

        assert_eq!(tokens(&config), vec!["T1", "T2"]);
        assert_eq!(config.schedule.as_deref(), Some("0 2 * * *"));
        assert_eq!(config.health_port, 9090);
        assert_eq!(
            config.discord.webhook_url.as_deref(),
            Some("https://discord.com/api/webhooks/1/x")
        );
        assert_eq!(config.discord.user_id.as_deref(), Some("42"));
        assert!(config.notify_no_ops);
        assert_eq!(config.http.max_retries, 3);
        assert_eq!(config.pacing.account_delay_ms, 1000);
    }

    #[test]
    fn empty_optional_values_keep_defaults() {
        let config = load_from_env(env(&[
            ("ACCOUNT_TOKEN", "T1"),
            ("SCHEDULE", ""),
            ("NOTIFY_NO_OPS", ""),
        ]))
        .unwrap();

        assert!(config.schedule.is_none());
        assert!(!config.notify_no_ops);
        assert_eq!(config.health_port, 8080);
    }

    #[test]
    fn blank_token_list_is_a_config_error() {
        let err = load_from_env(env(&[("ACCOUNT_TOKEN", " \n \n")])).unwrap_err();
        assert!(matches!(err, DailyError::Config(ref msg) if msg.contains("ACCOUNT_TOKEN")));
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err =
            load_from_env(env(&[("ACCOUNT_TOKEN", "T1"), ("HEALTH_PORT", "http")])).unwrap_err();
        assert!(matches!(err, DailyError::Config(_)));
    }

    #[test]
    fn file_is_used_when_token_variable_is_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("endfield-daily.toml");
        fs::write(
            &path,
            r#"
accounts = ["  T1  ", ""]
schedule = "0 0 3 * * *"

[http]
max_retries = 5

[pacing]
role_delay_ms = 0
"#,
        )
        .unwrap();
        let path_str = path.to_string_lossy().into_owned();

        let config = load_with(env(&[
            ("ENDFIELD_CONFIG", path_str.as_str()),
            ("DISCORD_USER", "7"),
        ]))
        .unwrap();

        assert_eq!(tokens(&config), vec!["T1"]);
        assert_eq!(config.schedule.as_deref(), Some("0 0 3 * * *"));
        assert_eq!(config.http.max_retries, 5);
        assert_eq!(config.http.base_backoff_ms, 1000);
        assert_eq!(config.pacing.role_delay_ms, 0);
        assert_eq!(config.pacing.account_delay_ms, 1000);
        assert_eq!(config.discord.user_id.as_deref(), Some("7"));
    }

    #[test]
    fn json_file_is_supported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"accounts": ["T9"], "notify_no_ops": true}"#).unwrap();

        let config = load_from_file(Some(path)).unwrap();

        assert_eq!(tokens(&config), vec!["T9"]);
        assert!(config.notify_no_ops);
    }

    #[test]
    fn file_without_accounts_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("endfield-daily.json");
        fs::write(&path, r#"{"accounts": []}"#).unwrap();
        let path_str = path.to_string_lossy().into_owned();

        let err = load_with(env(&[("ENDFIELD_CONFIG", path_str.as_str())])).unwrap_err();

        assert!(matches!(err, DailyError::Config(_)));
    }

    #[test]
    fn missing_explicit_file_is_reported() {
        let missing = PathBuf::from("/nonexistent/endfield-daily.toml");
        let err = load_from_file(Some(missing)).unwrap_err();
        assert!(matches!(
            err,
            DailyError::Config(ref msg) if msg.starts_with("Config file not found")
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "accounts: []").unwrap();

        let err = load_from_file(Some(path)).unwrap_err();

        assert_eq!(err, DailyError::Config("Unsupported config format: yaml".to_string()));
    }

    #[test]
    fn probe_prefers_project_specific_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "accounts = []").unwrap();
        fs::write(dir.path().join("endfield-daily.json"), "{}").unwrap();

        let found = probe_in(&[dir.path().to_path_buf()]).unwrap();

        assert_eq!(found.file_name().unwrap(), "endfield-daily.json");
    }
}
