//! Port interfaces for the check-in flow

use async_trait::async_trait;
use endfield_domain::{AccountToken, AttendanceOutcome, MessageLog, Result, Role, SessionCredential};

/// Exchanges an account token for session credentials.
#[async_trait]
pub trait CredentialNegotiator: Send + Sync {
    /// Run the full exchange. Called once per account per run.
    async fn negotiate(&self, token: &AccountToken) -> Result<SessionCredential>;
}

/// Signed game API calls made with a negotiated credential.
#[async_trait]
pub trait AttendanceGateway: Send + Sync {
    /// List every role bound to the account for this game.
    async fn discover_roles(&self, credential: &SessionCredential) -> Result<Vec<Role>>;

    /// Check today's attendance for `role` and claim it if still open.
    async fn check_and_claim(
        &self,
        credential: &SessionCredential,
        role: &Role,
    ) -> Result<AttendanceOutcome>;
}

/// Delivers a message log somewhere the user will see it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, log: &MessageLog) -> Result<()>;
}
