//! One signed request, rebuilt for every attempt

use endfield_domain::{Result, SessionCredential};
use reqwest::header::HeaderMap;
use reqwest::{Method, RequestBuilder};

use super::headers::{build_headers, header_value, SIGN};
use super::sign::compute_signature;
use crate::http::HttpClient;

/// Method, target and headers (with `Sign`) of a single attempt.
///
/// The signature is bound to `timestamp`; build a new value for each retry.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: Method,
    pub url: String,
    pub path: String,
    pub timestamp: String,
    pub headers: HeaderMap,
}

impl SignedRequest {
    pub fn new(
        method: Method,
        url: String,
        path: &str,
        cred: &SessionCredential,
        game_role: &str,
        timestamp: u64,
    ) -> Result<Self> {
        let timestamp = timestamp.to_string();
        let mut headers = build_headers(cred, game_role, &timestamp)?;
        let sign = compute_signature(path, &timestamp, &cred.salt);
        headers.insert(SIGN, header_value("Sign", &sign)?);

        Ok(Self { method, url, path: path.to_string(), timestamp, headers })
    }

    pub fn into_builder(self, http: &HttpClient) -> RequestBuilder {
        http.request(self.method, self.url).headers(self.headers)
    }
}
