//! Deterministic test doubles for the [`crate::time`] traits.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use endfield_common::testing::{MockClock, RecordingSleeper};
//! use endfield_common::{Clock, Sleeper};
//!
//! # tokio_test::block_on(async {
//! let clock = MockClock::at_unix_seconds(1_700_000_000);
//! let sleeper = RecordingSleeper::advancing(clock.clone());
//! sleeper.sleep(Duration::from_secs(2)).await;
//! assert_eq!(clock.unix_seconds(), 1_700_000_002);
//! assert_eq!(sleeper.delays(), vec![Duration::from_secs(2)]);
//! # });
//! ```

pub mod time;

pub use time::{MockClock, RecordingSleeper};
