//! Check-in service - walks accounts, then roles, one at a time
//!
//! Each account gets a fresh credential; nothing is shared between accounts.
//! Failures are recorded and processing moves on to the next role or
//! account.

use std::sync::Arc;

use endfield_common::{Sleeper, TokioSleeper};
use endfield_domain::{AccountToken, MessageLog, PacingConfig, Role, SessionCredential};
use tracing::{error, info, instrument, warn};

use super::ports::{AttendanceGateway, CredentialNegotiator, Notifier};
use super::report::{AccountReport, RoleReport, RunReport};

/// Daily attendance check-in service
pub struct CheckInService {
    negotiator: Arc<dyn CredentialNegotiator>,
    gateway: Arc<dyn AttendanceGateway>,
    notifier: Option<Arc<dyn Notifier>>,
    sleeper: Arc<dyn Sleeper>,
    pacing: PacingConfig,
    notify_no_ops: bool,
}

impl CheckInService {
    /// Create a service with default pacing and no notifier.
    pub fn new(
        negotiator: Arc<dyn CredentialNegotiator>,
        gateway: Arc<dyn AttendanceGateway>,
    ) -> Self {
        Self {
            negotiator,
            gateway,
            notifier: None,
            sleeper: Arc::new(TokioSleeper),
            pacing: PacingConfig::default(),
            notify_no_ops: false,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Also notify for roles that were already checked in.
    pub fn with_notify_no_ops(mut self, enabled: bool) -> Self {
        self.notify_no_ops = enabled;
        self
    }

    /// Process every account in order, pausing between accounts.
    #[instrument(skip_all, fields(accounts = tokens.len()))]
    pub async fn run_all(&self, tokens: &[AccountToken]) -> RunReport {
        let mut report = RunReport::default();

        for (i, token) in tokens.iter().enumerate() {
            report.accounts.push(self.run_account(token, i + 1).await);
            if i + 1 < tokens.len() {
                self.sleeper.sleep(self.pacing.account_delay()).await;
            }
        }

        if report.has_errors() {
            warn!(claimed = report.claimed_count(), "Run completed with errors");
        } else {
            info!(claimed = report.claimed_count(), "Run completed");
        }
        report
    }

    /// Negotiate, discover roles and check in every role of one account.
    ///
    /// `index` is the 1-based account position used in messages.
    #[instrument(skip(self, token))]
    pub async fn run_account(&self, token: &AccountToken, index: usize) -> AccountReport {
        let mut report =
            AccountReport { index, roles: Vec::new(), error: None, log: MessageLog::new() };

        let credential = match self.negotiator.negotiate(token).await {
            Ok(credential) => credential,
            Err(err) => {
                error!(account = index, error = %err, kind = err.label(), "Negotiation failed");
                report.log.error(format!("Account {index}: {err}"));
                report.error = Some(err);
                self.notify(&report.log).await;
                return report;
            }
        };
        info!(account = index, "Obtained cred and salt");

        let roles = match self.gateway.discover_roles(&credential).await {
            Ok(roles) => roles,
            Err(err) => {
                error!(account = index, error = %err, kind = err.label(), "Role discovery failed");
                report.log.error(format!("Account {index}: {err}"));
                report.error = Some(err);
                self.notify(&report.log).await;
                return report;
            }
        };
        info!(account = index, roles = roles.len(), "Found role(s)");

        for (i, role) in roles.iter().enumerate() {
            report.roles.push(self.check_in_role(&credential, role, index).await);
            if i + 1 < roles.len() {
                self.sleeper.sleep(self.pacing.role_delay()).await;
            }
        }

        report
    }

    async fn check_in_role(
        &self,
        credential: &SessionCredential,
        role: &Role,
        account: usize,
    ) -> RoleReport {
        let label = role.label();
        let mut log = MessageLog::new();
        log.info(format!("Account {account} - {label}"));

        let outcome = self.gateway.check_and_claim(credential, role).await;
        let should_notify = match &outcome {
            Ok(outcome) => {
                info!(account, role = %label, summary = %outcome.summary(), "Role processed");
                log.info(format!("  → {}", outcome.summary()));
                !outcome.is_no_op() || self.notify_no_ops
            }
            Err(err) => {
                error!(account, role = %label, error = %err, kind = err.label(), "Check-in failed");
                log.error(format!("  → {err}"));
                true
            }
        };

        if should_notify {
            self.notify(&log).await;
        }

        RoleReport { role: role.clone(), outcome, log }
    }

    async fn notify(&self, log: &MessageLog) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        if let Err(err) = notifier.send(log).await {
            warn!(error = %err, "Failed to send notification");
        }
    }
}
