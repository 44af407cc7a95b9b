//! # endfield-daily Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The retrying HTTP executor
//! - The SKPort protocol: signing, credential negotiation, role discovery and
//!   attendance
//! - The Discord notification sink
//! - Configuration loading, cron scheduling and the health endpoint
//!
//! ## Architecture
//! - Implements traits defined in `endfield-core`
//! - Depends on `endfield-common`, `endfield-domain` and `endfield-core`
//! - Contains all "impure" code (network, filesystem, timers)

pub mod config;
pub mod errors;
pub mod health;
pub mod http;
pub mod notify;
pub mod scheduling;
pub mod skport;

// Re-export commonly used items
pub use errors::InfraError;
pub use health::HealthServer;
pub use http::{HttpClient, HttpClientBuilder, HttpResponse};
pub use notify::DiscordNotifier;
pub use scheduling::{AccountsJob, CheckInScheduler, SchedulerError};
pub use skport::{SkportAuthenticator, SkportClient};
