//! Cron scheduling of check-in runs
//!
//! Explicit lifecycle (start/stop), lifecycle timeouts, structured tracing.

pub mod checkin_scheduler;
pub mod error;

pub use checkin_scheduler::{
    normalize_cron, run_exclusive, validate_cron, AccountsJob, CheckInJob, CheckInScheduler,
    CheckInSchedulerConfig, RunOutcome,
};
pub use error::{SchedulerError, SchedulerResult};
