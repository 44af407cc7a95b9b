//! Controllable clock and sleeper for tests.

// Test utilities panic on poisoned mutexes to fail tests early.
#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::time::{Clock, Sleeper};

/// Mock clock for deterministic testing.
///
/// Clones share the same elapsed time, so a clone handed to the code under
/// test observes every [`MockClock::advance`] made by the test.
#[derive(Debug, Clone)]
pub struct MockClock {
    base_system_time: SystemTime,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Create a mock clock starting at the current real time.
    pub fn new() -> Self {
        Self::at(SystemTime::now())
    }

    /// Create a mock clock frozen at `base`.
    pub fn at(base: SystemTime) -> Self {
        Self { base_system_time: base, elapsed: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    /// Create a mock clock frozen at the given UNIX timestamp.
    pub fn at_unix_seconds(secs: u64) -> Self {
        Self::at(UNIX_EPOCH + Duration::from_secs(secs))
    }

    /// Simulate time passing without waiting.
    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().expect("mutex poisoned");
        *elapsed += duration;
    }

    /// Total simulated time since creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().expect("mutex poisoned")
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn system_time(&self) -> SystemTime {
        self.base_system_time + self.elapsed()
    }
}

/// Sleeper that records requested delays and returns immediately.
///
/// When built with [`RecordingSleeper::advancing`], every sleep also advances
/// the given [`MockClock`], so timestamps taken after a backoff differ from
/// the ones taken before it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
    clock: Option<MockClock>,
}

impl RecordingSleeper {
    /// Create a sleeper that only records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sleeper that records and advances `clock`.
    pub fn advancing(clock: MockClock) -> Self {
        Self { delays: Arc::default(), clock: Some(clock) }
    }

    /// Delays requested so far, in call order.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().expect("mutex poisoned").clone()
    }

    /// Sum of all requested delays.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.delays().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().expect("mutex poisoned").push(duration);
        if let Some(clock) = &self.clock {
            clock.advance(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_clock_starts_at_given_timestamp() {
        let clock = MockClock::at_unix_seconds(1_700_000_000);
        assert_eq!(clock.unix_seconds(), 1_700_000_000);
    }

    #[test]
    fn clones_share_elapsed_time() {
        let clock1 = MockClock::at_unix_seconds(10);
        let clock2 = clock1.clone();

        clock1.advance(Duration::from_secs(5));

        assert_eq!(clock2.elapsed(), Duration::from_secs(5));
        assert_eq!(clock2.unix_seconds(), 15);
    }

    #[tokio::test]
    async fn recording_sleeper_keeps_call_order() {
        let sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_secs(1)).await;
        sleeper.sleep(Duration::from_millis(500)).await;

        assert_eq!(sleeper.delays(), vec![Duration::from_secs(1), Duration::from_millis(500)]);
        assert_eq!(sleeper.total(), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn advancing_sleeper_moves_clock() {
        let clock = MockClock::at_unix_seconds(100);
        let sleeper = RecordingSleeper::advancing(clock.clone());

        sleeper.sleep(Duration::from_secs(4)).await;

        assert_eq!(clock.unix_seconds(), 104);
    }
}
