//! Account token and session credential
//!
//! Both values are secrets; their `Debug` output never includes them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Long-lived account token supplied by the user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountToken(String);

impl AccountToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for AccountToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccountToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for AccountToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountToken(<{} chars>)", self.0.len())
    }
}

/// Short-lived credential produced by the OAuth exchange.
///
/// `salt` keys the request signature; `cred` travels in the `Cred` header.
/// Lives for one run and is never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential {
    pub cred: String,
    pub salt: String,
    pub user_id: String,
}

impl SessionCredential {
    pub fn new(
        cred: impl Into<String>,
        salt: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self { cred: cred.into(), salt: salt.into(), user_id: user_id.into() }
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredential")
            .field("cred", &"<redacted>")
            .field("salt", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let token = AccountToken::new("super-secret");
        assert!(!format!("{token:?}").contains("super-secret"));

        let cred = SessionCredential::new("cred-value", "salt-value", "42");
        let rendered = format!("{cred:?}");
        assert!(!rendered.contains("cred-value"));
        assert!(!rendered.contains("salt-value"));
        assert!(rendered.contains("42"));
    }

    #[test]
    fn token_deserializes_from_plain_string() {
        let token: AccountToken = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(token.as_str(), "abc");
    }
}
