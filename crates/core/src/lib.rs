//! # endfield-daily Core
//!
//! Pure orchestration layer - no HTTP or platform code.
//!
//! This crate contains:
//! - Port interfaces (traits) for credential negotiation, the attendance API
//!   and notification delivery
//! - The check-in service that walks accounts and roles
//!
//! ## Architecture Principles
//! - Only depends on `endfield-common` and `endfield-domain`
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod checkin;

pub use checkin::ports::{AttendanceGateway, CredentialNegotiator, Notifier};
pub use checkin::report::{AccountReport, RoleReport, RunReport};
pub use checkin::CheckInService;
