//! Shared primitives used across the endfield-daily crates.
//!
//! # Feature Tiers
//!
//! - `runtime`: async time primitives ([`time::Clock`], [`time::Sleeper`])
//! - `test-utils`: deterministic doubles ([`testing::MockClock`],
//!   [`testing::RecordingSleeper`]) for tests in downstream crates

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "test-utils")]
pub mod testing;

#[cfg(feature = "runtime")]
pub use time::{Clock, Sleeper, SystemClock, TokioSleeper};
