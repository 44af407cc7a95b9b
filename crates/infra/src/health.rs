//! Liveness endpoint for scheduled mode

use std::net::{Ipv4Addr, SocketAddr};

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use endfield_domain::{DailyError, Result};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// `GET /health` answers 200 with an empty body.
pub fn router() -> Router {
    Router::new().route("/health", get(|| async { StatusCode::OK }))
}

/// Background health server; stops when its token is cancelled.
pub struct HealthServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl HealthServer {
    /// Bind `0.0.0.0:port` (0 picks a free port) and serve in the background.
    pub async fn start(port: u16, shutdown: CancellationToken) -> Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await.map_err(|err| {
            DailyError::Internal(format!("failed to bind health server on port {port}: {err}"))
        })?;
        let addr = listener
            .local_addr()
            .map_err(|err| DailyError::Internal(format!("failed to determine port: {err}")))?;

        let token = shutdown.clone();
        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, router())
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await
            {
                error!("Health server error: {}", err);
            }
        });

        info!(port = addr.port(), "Health check listening");
        Ok(Self { addr, shutdown, handle: Some(handle) })
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Cancel the token and wait for the server task.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                error!("Health server task failed: {}", err);
            }
        }
    }
}

impl Drop for HealthServer {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown.cancel();
        }
    }
}
