//! Cron-driven check-in runs.
//!
//! Wraps `tokio-cron-scheduler` with explicit lifecycle management. Runs never
//! overlap: a tick that fires while a run is still in progress is skipped.
//! Expressions are evaluated in UTC.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use endfield_core::RunReport;
//! use endfield_infra::scheduling::{CheckInJob, CheckInScheduler, SchedulerResult};
//!
//! struct NoopJob;
//!
//! #[async_trait]
//! impl CheckInJob for NoopJob {
//!     async fn run(&self) -> RunReport {
//!         RunReport::default()
//!     }
//! }
//!
//! # async fn example() -> SchedulerResult<()> {
//! let mut scheduler = CheckInScheduler::new("0 2 * * *", Arc::new(NoopJob)).await?;
//! scheduler.run_now().await;
//! scheduler.start().await?;
//! // ... wait for a shutdown signal ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use endfield_core::{CheckInService, RunReport};
use endfield_domain::AccountToken;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// One complete check-in run.
#[async_trait]
pub trait CheckInJob: Send + Sync {
    async fn run(&self) -> RunReport;
}

/// Runs every configured account through a [`CheckInService`].
pub struct AccountsJob {
    service: Arc<CheckInService>,
    accounts: Vec<AccountToken>,
}

impl AccountsJob {
    pub fn new(service: Arc<CheckInService>, accounts: Vec<AccountToken>) -> Self {
        Self { service, accounts }
    }
}

#[async_trait]
impl CheckInJob for AccountsJob {
    async fn run(&self) -> RunReport {
        self.service.run_all(&self.accounts).await
    }
}

/// Normalise a cron expression to the six-field form (leading seconds).
///
/// Five-field expressions use standard cron numbering for the day of week
/// (0 and 7 are Sunday). They get a `0` seconds field and their numeric
/// weekdays are rewritten as names, since the scheduler counts Sunday as 1.
/// Six and seven fields and `@` shorthands pass through unchanged.
pub fn normalize_cron(expression: &str) -> SchedulerResult<String> {
    let trimmed = expression.trim();
    if trimmed.starts_with('@') {
        return Ok(trimmed.to_string());
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    match fields.len() {
        5 => {
            let weekdays = weekday_names(fields[4]).map_err(|reason| {
                SchedulerError::InvalidCron { expression: expression.to_string(), reason }
            })?;
            Ok(format!("0 {} {weekdays}", fields[..4].join(" ")))
        }
        6 | 7 => Ok(fields.join(" ")),
        n => Err(SchedulerError::InvalidCron {
            expression: expression.to_string(),
            reason: format!("expected 5 or 6 fields, found {n}"),
        }),
    }
}

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Rewrite numeric day-of-week items (0-7, Sunday first) as day names.
///
/// Ranges and stepped ranges are expanded into lists. `*`, `*/n`, names and
/// other non-numeric items are kept as written.
fn weekday_names(field: &str) -> Result<String, String> {
    let mut days = Vec::new();
    for item in field.split(',') {
        let (base, step) = match item.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (item, None),
        };
        let (start, end) = match base.split_once('-') {
            Some((start, end)) => (start, end),
            None => (base, base),
        };
        let (Ok(start), Ok(end)) = (start.parse::<usize>(), end.parse::<usize>()) else {
            days.push(item.to_string());
            continue;
        };
        if start > 7 || end > 7 || start > end {
            return Err(format!("invalid day of week '{item}'"));
        }
        let step = match step {
            Some(step) => match step.parse::<usize>() {
                Ok(step) if step > 0 => step,
                _ => return Err(format!("invalid day of week step '{item}'")),
            },
            None => 1,
        };
        // A lone `n/step` runs to Saturday.
        let end = if step > 1 && !base.contains('-') { end.max(6) } else { end };
        for day in (start..=end).step_by(step) {
            let name = WEEKDAYS[day % 7];
            if !days.iter().any(|d| d == name) {
                days.push(name.to_string());
            }
        }
    }
    Ok(days.join(","))
}

/// Normalise and parse `expression`, returning the form the scheduler uses.
pub fn validate_cron(expression: &str) -> SchedulerResult<String> {
    let normalized = normalize_cron(expression)?;
    Job::new_async(normalized.as_str(), |_id, _scheduler| Box::pin(async {})).map_err(|err| {
        SchedulerError::InvalidCron { expression: expression.to_string(), reason: err.to_string() }
    })?;
    Ok(normalized)
}

/// Lifecycle timeouts.
#[derive(Debug, Clone)]
pub struct CheckInSchedulerConfig {
    pub start_timeout: Duration,
    pub stop_timeout: Duration,
}

impl Default for CheckInSchedulerConfig {
    fn default() -> Self {
        Self { start_timeout: Duration::from_secs(5), stop_timeout: Duration::from_secs(5) }
    }
}

/// What happened to a requested run.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunReport),
    /// Another run held the lock.
    Skipped,
}

/// Check-in scheduler with explicit start/stop.
pub struct CheckInScheduler {
    scheduler: JobScheduler,
    expression: String,
    config: CheckInSchedulerConfig,
    job_id: Uuid,
    job: Arc<dyn CheckInJob>,
    run_lock: Arc<Mutex<()>>,
    running: bool,
}

impl CheckInScheduler {
    /// Validate `expression` and register `job` with the default timeouts.
    pub async fn new(expression: &str, job: Arc<dyn CheckInJob>) -> SchedulerResult<Self> {
        Self::with_config(expression, job, CheckInSchedulerConfig::default()).await
    }

    pub async fn with_config(
        expression: &str,
        job: Arc<dyn CheckInJob>,
        config: CheckInSchedulerConfig,
    ) -> SchedulerResult<Self> {
        let expression = validate_cron(expression)?;
        let scheduler =
            JobScheduler::new().await.map_err(|source| SchedulerError::CreationFailed { source })?;

        let mut this = Self {
            scheduler,
            expression,
            config,
            job_id: Uuid::nil(),
            job,
            run_lock: Arc::new(Mutex::new(())),
            running: false,
        };
        this.job_id = this.register_job().await?;
        Ok(this)
    }

    /// Normalised expression in use.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run immediately, waiting for any in-flight scheduled run to finish.
    pub async fn run_now(&self) -> RunReport {
        let _guard = self.run_lock.lock().await;
        execute(self.job.as_ref()).await
    }

    /// Wait until no run is in progress.
    pub async fn wait_idle(&self) {
        let _guard = self.run_lock.lock().await;
    }

    /// Start firing on cron ticks.
    #[instrument(skip(self), fields(cron = %self.expression))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.running {
            return Err(SchedulerError::AlreadyRunning);
        }

        let start_timeout = self.config.start_timeout;
        tokio::time::timeout(start_timeout, self.scheduler.start())
            .await
            .map_err(|source| SchedulerError::Timeout { duration: start_timeout, source })?
            .map_err(|source| SchedulerError::StartFailed { source })?;

        self.running = true;
        info!("Check-in scheduler started");
        log_next_tick(&mut self.scheduler, self.job_id).await;
        Ok(())
    }

    /// Shut the underlying scheduler down. A run in progress is not
    /// interrupted.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.running {
            return Err(SchedulerError::NotRunning);
        }

        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, self.scheduler.shutdown())
            .await
            .map_err(|source| SchedulerError::Timeout { duration: stop_timeout, source })?
            .map_err(|source| SchedulerError::StopFailed { source })?;

        self.running = false;
        info!("Check-in scheduler stopped");
        Ok(())
    }

    async fn register_job(&mut self) -> SchedulerResult<Uuid> {
        if self.job_id != Uuid::nil() {
            return Ok(self.job_id);
        }

        let job = self.job.clone();
        let run_lock = self.run_lock.clone();

        let definition = Job::new_async(self.expression.as_str(), move |id, mut scheduler| {
            let job = job.clone();
            let run_lock = run_lock.clone();

            Box::pin(async move {
                if let RunOutcome::Skipped = run_exclusive(&run_lock, job.as_ref()).await {
                    warn!("Previous check-in run still in progress; skipping this tick");
                }
                log_next_tick(&mut scheduler, id).await;
            })
        })
        .map_err(|source| SchedulerError::JobRegistrationFailed { source })?;

        let job_id = self
            .scheduler
            .add(definition)
            .await
            .map_err(|source| SchedulerError::JobRegistrationFailed { source })?;

        debug!(cron = %self.expression, job_id = %job_id, "Registered check-in job");
        Ok(job_id)
    }
}

impl Drop for CheckInScheduler {
    fn drop(&mut self) {
        if self.running {
            warn!("CheckInScheduler dropped while running");
        }
    }
}

/// Run `job` unless another run holds `lock`.
pub async fn run_exclusive(lock: &Mutex<()>, job: &dyn CheckInJob) -> RunOutcome {
    match lock.try_lock() {
        Ok(_guard) => RunOutcome::Completed(execute(job).await),
        Err(_) => RunOutcome::Skipped,
    }
}

async fn execute(job: &dyn CheckInJob) -> RunReport {
    let started = Instant::now();
    let report = job.run().await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    debug!(elapsed_ms, has_errors = report.has_errors(), "Check-in job finished");
    report
}

async fn log_next_tick(scheduler: &mut JobScheduler, job_id: Uuid) {
    match scheduler.next_tick_for_job(job_id).await {
        Ok(Some(next)) => info!(next_run = %next.to_rfc3339(), "Next run scheduled"),
        Ok(None) => debug!("No upcoming tick for check-in job"),
        Err(err) => warn!(error = %err, "Failed to compute next tick"),
    }
}
