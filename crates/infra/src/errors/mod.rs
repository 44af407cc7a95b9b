//! Conversions from third-party errors into [`endfield_domain::DailyError`].

pub mod conversions;

pub use conversions::{describe_transport_error, parse_error, InfraError};
