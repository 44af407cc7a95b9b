//! Error types used throughout the application

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Step of the token → code → credential exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStep {
    /// Token validation against the basic-info endpoint.
    Validate,
    /// OAuth grant returning an authorization code.
    Grant,
    /// Authorization code exchanged for cred + salt.
    Exchange,
}

impl NegotiationStep {
    /// 1-based position of the step in the exchange.
    pub fn number(self) -> u8 {
        match self {
            Self::Validate => 1,
            Self::Grant => 2,
            Self::Exchange => 3,
        }
    }
}

impl fmt::Display for NegotiationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}", self.number())
    }
}

/// Main error type for endfield-daily
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum DailyError {
    /// Missing or malformed input; no network call was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The account service rejected one of the three OAuth steps.
    #[error("OAuth {step} failed: {message}")]
    Negotiation { step: NegotiationStep, message: String },

    /// Network failure or 5xx that outlived the retry budget.
    #[error("{message} (after {attempts} attempt(s))")]
    Transport { attempts: u32, message: String },

    /// Non-zero application code in a response.
    #[error("{context}: {message}")]
    Api { context: String, message: String },

    /// The account has no Endfield entry (or an empty one) in its bindings.
    #[error("no Endfield account binding found")]
    NoBinding,

    /// The Endfield binding exists but contains no roles.
    #[error("no roles found in binding")]
    NoRoles,

    /// Response body could not be decoded.
    #[error("{context} parse failed: {message}")]
    Parse { context: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DailyError {
    /// Whether another attempt could succeed without any change of input.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Prefix a transport error's message with the operation that failed.
    ///
    /// Other variants already carry their own context and are returned as is.
    #[must_use]
    pub fn in_context(self, context: &str) -> Self {
        match self {
            Self::Transport { attempts, message } => {
                Self::Transport { attempts, message: format!("{context}: {message}") }
            }
            other => other,
        }
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Negotiation { .. } => "negotiation",
            Self::Transport { .. } => "transport",
            Self::Api { .. } => "api",
            Self::NoBinding => "no_binding",
            Self::NoRoles => "no_roles",
            Self::Parse { .. } => "parse",
            Self::Config(_) => "config",
            Self::Notification(_) => "notification",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for endfield-daily operations
pub type Result<T> = std::result::Result<T, DailyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiation_message_names_step() {
        let err = DailyError::Negotiation {
            step: NegotiationStep::Validate,
            message: "invalid token".into(),
        };
        assert_eq!(err.to_string(), "OAuth step 1 failed: invalid token");
    }

    #[test]
    fn only_transport_is_transient() {
        let transport = DailyError::Transport { attempts: 4, message: "HTTP 503".into() };
        assert!(transport.is_transient());
        assert!(!DailyError::NoBinding.is_transient());
        assert!(!DailyError::Api { context: "claim".into(), message: "x".into() }.is_transient());
        assert!(!DailyError::Parse { context: "binding".into(), message: "eof".into() }
            .is_transient());
    }

    #[test]
    fn in_context_prefixes_transport_only() {
        let err = DailyError::Transport { attempts: 2, message: "connection refused".into() }
            .in_context("binding request failed");
        assert_eq!(
            err.to_string(),
            "binding request failed: connection refused (after 2 attempt(s))"
        );

        assert_eq!(DailyError::NoRoles.in_context("ignored"), DailyError::NoRoles);
    }

    #[test]
    fn binding_errors_have_distinct_messages() {
        assert_eq!(DailyError::NoBinding.to_string(), "no Endfield account binding found");
        assert_eq!(DailyError::NoRoles.to_string(), "no roles found in binding");
    }
}
