use std::sync::Arc;
use std::time::Duration;

use endfield_common::{Sleeper, TokioSleeper};
use endfield_domain::constants::{
    DEFAULT_BASE_BACKOFF_MS, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_RETRIES,
};
use endfield_domain::{DailyError, HttpConfig, Result};
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, StatusCode};
use tracing::{debug, warn};

use crate::errors::{describe_transport_error, InfraError};

/// Response that was not retried: any status below 500.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Outcome of a single attempt.
#[derive(Debug)]
pub enum AttemptResult {
    /// Status below 500; returned to the caller as is.
    Success(HttpResponse),
    /// Network failure or 5xx; eligible for another attempt.
    TransientFailure(String),
    /// Never retried.
    TerminalFailure(DailyError),
}

/// HTTP client with built-in retry and timeout support.
///
/// Requests are produced by a factory that runs once per attempt, so headers
/// derived from the current time are regenerated for every retry.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_retries: u32,
    base_backoff: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Total attempts per call (initial try + retries).
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Execute the request produced by `factory`, retrying transient failures.
    ///
    /// `factory` is called before every attempt. Statuses below 500 are
    /// returned immediately, including 4xx, so callers can read the API error
    /// code in the body. A factory error aborts without sending anything.
    pub async fn execute<F>(&self, mut factory: F) -> Result<HttpResponse>
    where
        F: FnMut() -> Result<RequestBuilder>,
    {
        let attempts = self.max_attempts();
        let mut last_cause = None;

        for attempt in 1..=attempts {
            if attempt > 1 {
                let retry = attempt - 1;
                let delay = self.backoff_delay(retry);
                debug!(
                    retry,
                    max_retries = self.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "retrying HTTP request"
                );
                self.sleeper.sleep(delay).await;
            }

            let request =
                factory()?.build().map_err(|err| DailyError::from(InfraError::from(err)))?;
            let method = request.method().clone();
            // Query strings may carry the account token; log the path only.
            let path = request.url().path().to_string();
            debug!(attempt, %method, %path, "sending HTTP request");

            match self.attempt(request).await {
                AttemptResult::Success(response) => {
                    debug!(
                        attempt,
                        %method,
                        %path,
                        status = %response.status,
                        "received HTTP response"
                    );
                    return Ok(response);
                }
                AttemptResult::TransientFailure(cause) => {
                    warn!(attempt, attempts, %method, %path, cause = %cause, "HTTP attempt failed");
                    last_cause = Some(cause);
                }
                AttemptResult::TerminalFailure(err) => return Err(err),
            }
        }

        Err(DailyError::Transport {
            attempts,
            message: last_cause.unwrap_or_else(|| "request was never attempted".to_string()),
        })
    }

    async fn attempt(&self, request: Request) -> AttemptResult {
        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) if err.is_builder() => {
                return AttemptResult::TerminalFailure(InfraError::from(err).into());
            }
            Err(err) => return AttemptResult::TransientFailure(describe_transport_error(&err)),
        };

        let status = response.status();
        match response.bytes().await {
            Err(err) => AttemptResult::TransientFailure(format!(
                "reading HTTP {} response body failed: {err}",
                status.as_u16()
            )),
            Ok(body) if status.is_server_error() => AttemptResult::TransientFailure(format!(
                "server error HTTP {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&body)
            )),
            Ok(body) => AttemptResult::Success(HttpResponse { status, body: body.to_vec() }),
        }
    }

    fn backoff_delay(&self, retry_number: u32) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8);
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    timeout: Duration,
    max_retries: u32,
    base_backoff: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff: Duration::from_millis(DEFAULT_BASE_BACKOFF_MS),
            sleeper: Arc::new(TokioSleeper),
        }
    }
}

impl HttpClientBuilder {
    /// Apply timeout and backoff from configuration. `retries` picks which
    /// retry budget of the config applies to this client.
    pub fn from_config(config: &HttpConfig, retries: u32) -> Self {
        Self::default()
            .timeout(config.timeout())
            .base_backoff(config.base_backoff())
            .max_retries(retries)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the number of retries after the initial attempt.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// Replace the sleeper used between attempts.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .no_proxy()
            .build()
            .map_err(|err| DailyError::Internal(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpClient {
            client,
            max_retries: self.max_retries,
            base_backoff: self.base_backoff,
            sleeper: self.sleeper,
        })
    }
}
