//! Run-once and scheduled modes

use std::sync::Arc;

use anyhow::{Context, Result};
use endfield_infra::scheduling::{AccountsJob, CheckInScheduler};
use endfield_infra::HealthServer;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::context::AppContext;

/// Process every account once. Returns whether anything failed.
pub async fn run_once(ctx: &AppContext) -> bool {
    let report = ctx.service.run_all(&ctx.config.accounts).await;
    if report.has_errors() {
        error!("Run completed with errors");
    }
    report.has_errors()
}

/// Validate `expression`, start the health endpoint, run once immediately,
/// then run on every tick until SIGINT or SIGTERM.
pub async fn run_scheduled(ctx: &AppContext, expression: &str) -> Result<()> {
    let job = AccountsJob::new(ctx.service.clone(), ctx.config.accounts.clone());
    let mut scheduler = CheckInScheduler::new(expression, Arc::new(job))
        .await
        .context("failed to create scheduler")?;

    let shutdown = CancellationToken::new();
    let health = HealthServer::start(ctx.config.health_port, shutdown.clone())
        .await
        .context("failed to start health endpoint")?;

    info!(cron = %scheduler.expression(), "Starting scheduled mode");
    scheduler.run_now().await;
    scheduler.start().await.context("failed to start scheduler")?;

    wait_for_shutdown_signal().await;
    info!("Received signal, shutting down");

    if let Err(err) = scheduler.stop().await {
        warn!(error = %err, "Scheduler did not stop cleanly");
    }
    scheduler.wait_idle().await;
    health.shutdown().await;
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(err) => {
            warn!(error = %err, "failed to register SIGTERM handler; waiting for Ctrl-C only");
            ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
