//! SKPort protocol: request signing, credential negotiation and the signed
//! game API client.

pub mod auth;
pub mod client;
pub mod headers;
pub mod request;
pub mod sign;
pub mod wire;

pub use auth::SkportAuthenticator;
pub use client::{AttendanceStatus, SkportClient};
pub use headers::build_headers;
pub use request::SignedRequest;
pub use sign::compute_signature;
