//! Scheduler error types

use endfield_domain::DailyError;
use thiserror::Error;
use tokio_cron_scheduler::JobSchedulerError;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Scheduler already running")]
    AlreadyRunning,

    #[error("Scheduler not running")]
    NotRunning,

    /// Expression rejected before or by the cron parser.
    #[error("Invalid cron expression '{expression}': {reason}")]
    InvalidCron { expression: String, reason: String },

    #[error("Failed to create scheduler: {source}")]
    CreationFailed {
        #[source]
        source: JobSchedulerError,
    },

    #[error("Failed to start scheduler: {source}")]
    StartFailed {
        #[source]
        source: JobSchedulerError,
    },

    #[error("Failed to stop scheduler: {source}")]
    StopFailed {
        #[source]
        source: JobSchedulerError,
    },

    #[error("Failed to register job: {source}")]
    JobRegistrationFailed {
        #[source]
        source: JobSchedulerError,
    },

    #[error("Operation timed out after {}s", .duration.as_secs())]
    Timeout {
        duration: std::time::Duration,
        #[source]
        source: tokio::time::error::Elapsed,
    },
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let daily_err = match err {
            SchedulerError::InvalidCron { .. } => DailyError::Config(err.to_string()),
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                DailyError::InvalidInput(err.to_string())
            }
            _ => DailyError::Internal(err.to_string()),
        };
        InfraError(daily_err)
    }
}

impl From<SchedulerError> for DailyError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
