//! endfield-daily - daily SKPort attendance for Arknights: Endfield
//!
//! Library half of the binary: dependency wiring, logging setup and the
//! run-once / scheduled lifecycles.

pub mod context;
pub mod lifecycle;
pub mod logging;

pub use context::AppContext;
pub use lifecycle::{run_once, run_scheduled};
