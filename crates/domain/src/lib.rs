//! # endfield-daily Domain
//!
//! Domain types for the daily SKPort attendance check-in.
//!
//! This crate contains:
//! - Account, credential, role and attendance types
//! - The error taxonomy and Result alias
//! - Configuration structures
//! - Protocol constants (endpoints, client identity)
//!
//! ## Architecture
//! - No dependencies on other endfield crates
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
