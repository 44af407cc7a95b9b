//! Outcome records returned by [`super::CheckInService`]

use endfield_domain::{AttendanceOutcome, DailyError, Message, MessageLog, Role};

/// Result of checking in a single role.
#[derive(Debug, Clone)]
pub struct RoleReport {
    pub role: Role,
    pub outcome: Result<AttendanceOutcome, DailyError>,
    pub log: MessageLog,
}

impl RoleReport {
    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Result of processing one account.
#[derive(Debug, Clone)]
pub struct AccountReport {
    /// 1-based position of the account in the configured list.
    pub index: usize,
    pub roles: Vec<RoleReport>,
    /// Failure before any role was processed (negotiation or discovery).
    pub error: Option<DailyError>,
    /// Account-level messages; empty unless `error` is set.
    pub log: MessageLog,
}

impl AccountReport {
    pub fn has_errors(&self) -> bool {
        self.error.is_some() || self.roles.iter().any(RoleReport::is_failure)
    }
}

/// Result of one pass over every configured account.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub accounts: Vec<AccountReport>,
}

impl RunReport {
    pub fn has_errors(&self) -> bool {
        self.accounts.iter().any(AccountReport::has_errors)
    }

    /// Number of roles whose attendance was claimed during this run.
    pub fn claimed_count(&self) -> usize {
        self.roles().filter(|r| matches!(r.outcome, Ok(AttendanceOutcome::Claimed { .. }))).count()
    }

    pub fn roles(&self) -> impl Iterator<Item = &RoleReport> {
        self.accounts.iter().flat_map(|a| a.roles.iter())
    }

    /// Every message produced during the run, account logs before role logs.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.accounts.iter().flat_map(|account| {
            account
                .log
                .messages
                .iter()
                .chain(account.roles.iter().flat_map(|r| r.log.messages.iter()))
        })
    }

    /// Whether any message of the run contains `needle`.
    pub fn contains_message(&self, needle: &str) -> bool {
        self.messages().any(|m| m.text.contains(needle))
    }
}
