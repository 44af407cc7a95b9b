use std::time::Duration;

use async_trait::async_trait;

/// Suspends the current task for a duration.
///
/// Retry backoff and inter-request pacing sleep through this trait.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Sleep for `duration`. A zero duration returns immediately.
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
