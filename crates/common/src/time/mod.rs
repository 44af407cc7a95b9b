//! Time abstractions for protocol code.
//!
//! Request signing needs the wall clock and the retry loop needs to sleep.
//! Both go through traits so tests can observe timestamps and backoff delays
//! without waiting for real time to pass.

mod clock;
mod sleeper;

pub use clock::{Clock, SystemClock};
pub use sleeper::{Sleeper, TokioSleeper};
