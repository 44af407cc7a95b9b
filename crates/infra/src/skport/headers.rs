//! Header set for signed game API requests

use endfield_domain::constants::{GAME_ORIGIN, GAME_REFERER, LANGUAGE, PLATFORM, USER_AGENT, VNAME};
use endfield_domain::{DailyError, Result, SessionCredential};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER,
    USER_AGENT as USER_AGENT_HEADER,
};

pub const CRED: HeaderName = HeaderName::from_static("cred");
pub const PLATFORM_HEADER: HeaderName = HeaderName::from_static("platform");
pub const SK_LANGUAGE: HeaderName = HeaderName::from_static("sk-language");
pub const TIMESTAMP: HeaderName = HeaderName::from_static("timestamp");
pub const VNAME_HEADER: HeaderName = HeaderName::from_static("vname");
pub const SK_GAME_ROLE: HeaderName = HeaderName::from_static("sk-game-role");
pub const SIGN: HeaderName = HeaderName::from_static("sign");

const ACCEPT_ANY: &str = "application/json, text/plain, */*";
const JSON: &str = "application/json";

/// Assemble every header of a signed request except `Sign`.
///
/// `Sk-Game-Role` is only present when `game_role` is non-empty. Values that
/// cannot be sent as a header (control characters, non-visible bytes) are
/// rejected as invalid input.
pub fn build_headers(
    cred: &SessionCredential,
    game_role: &str,
    timestamp: &str,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(11);

    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
    headers.insert(ORIGIN, HeaderValue::from_static(GAME_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static(GAME_REFERER));
    headers.insert(CRED, header_value("Cred", &cred.cred)?);
    headers.insert(PLATFORM_HEADER, HeaderValue::from_static(PLATFORM));
    headers.insert(SK_LANGUAGE, HeaderValue::from_static(LANGUAGE));
    headers.insert(TIMESTAMP, header_value("Timestamp", timestamp)?);
    headers.insert(VNAME_HEADER, HeaderValue::from_static(VNAME));
    headers.insert(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));

    if !game_role.is_empty() {
        headers.insert(SK_GAME_ROLE, header_value("Sk-Game-Role", game_role)?);
    }

    Ok(headers)
}

pub(crate) fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|err| {
        DailyError::InvalidInput(format!("{name} is not a valid header value: {err}"))
    })
}
