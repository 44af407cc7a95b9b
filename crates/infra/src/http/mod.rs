//! Outbound HTTP with retry.

pub mod client;

pub use client::{AttemptResult, HttpClient, HttpClientBuilder, HttpResponse};
