//! Attendance check-in outcomes

use std::fmt;

use serde::{Deserialize, Serialize};

/// One reward granted by a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub name: String,
    pub count: i64,
}

impl Reward {
    pub fn new(name: impl Into<String>, count: i64) -> Self {
        Self { name: name.into(), count }
    }
}

impl fmt::Display for Reward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.name, self.count)
    }
}

/// Result of a successful status-then-claim sequence for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttendanceOutcome {
    /// Today's reward was collected before this run; no claim was sent.
    AlreadyClaimed,
    /// The claim succeeded. `rewards` is empty when none of the award ids
    /// resolved to a resource entry.
    Claimed { rewards: Vec<Reward> },
}

impl AttendanceOutcome {
    /// Whether this run changed anything on the server.
    pub fn is_no_op(&self) -> bool {
        matches!(self, Self::AlreadyClaimed)
    }

    /// User-facing one-line summary.
    pub fn summary(&self) -> String {
        match self {
            Self::AlreadyClaimed => "Already checked in today".to_string(),
            Self::Claimed { rewards } if rewards.is_empty() => {
                "Successfully checked in!".to_string()
            }
            Self::Claimed { rewards } => {
                let list = rewards.iter().map(ToString::to_string).collect::<Vec<_>>();
                format!("Checked in! Rewards: {}", list.join(", "))
            }
        }
    }
}
