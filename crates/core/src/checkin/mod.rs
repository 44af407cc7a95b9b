//! Daily check-in across accounts and roles

pub mod ports;
pub mod report;
pub mod service;

pub use service::CheckInService;
