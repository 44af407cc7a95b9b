//! endfield-daily - daily SKPort attendance check-in
//!
//! Without `SCHEDULE` every account is processed once and the process exits
//! with status 1 if anything failed. With `SCHEDULE` it keeps running, checks
//! in on every cron tick (UTC) and serves `GET /health`.

use std::process::ExitCode;

use anyhow::Context;
use endfield_daily::{logging, run_once, run_scheduled, AppContext};
use endfield_infra::config;
use tracing::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    logging::init();
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(err) => debug!(error = %err, "No .env file loaded"),
    }

    match run().await {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let config = config::load().context("failed to load configuration")?;
    let ctx = AppContext::new(config).context("failed to initialise application")?;

    match ctx.config.schedule.clone() {
        None => {
            let has_errors = run_once(&ctx).await;
            Ok(if has_errors { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
        Some(expression) => {
            run_scheduled(&ctx, &expression).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
