//! Conversions from external infrastructure errors into domain errors.

use endfield_domain::DailyError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DailyError);

impl From<InfraError> for DailyError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

/// Build a [`DailyError::Parse`] for a response body that failed to decode.
pub fn parse_error(context: &str, err: &serde_json::Error) -> DailyError {
    DailyError::Parse { context: context.to_string(), message: err.to_string() }
}

/// One-line description of a failed send, used for retry logging and as the
/// final transport error message.
pub fn describe_transport_error(err: &HttpError) -> String {
    if err.is_timeout() {
        return format!("HTTP request timed out: {err}");
    }
    if err.is_connect() {
        return format!("HTTP connection failure: {err}");
    }
    format!("HTTP request failed: {err}")
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DailyError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        if value.is_builder() {
            return InfraError(DailyError::InvalidInput(format!("invalid HTTP request: {value}")));
        }
        InfraError(DailyError::Transport { attempts: 1, message: describe_transport_error(&value) })
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::Client;

    use super::*;

    #[tokio::test]
    async fn connection_refused_maps_to_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let err = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: DailyError = InfraError::from(err).into();
        match mapped {
            DailyError::Transport { attempts, message } => {
                assert_eq!(attempts, 1);
                assert!(message.starts_with("HTTP"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn parse_error_keeps_context() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped = parse_error("binding", &err);
        assert!(mapped.to_string().starts_with("binding parse failed:"));
    }
}
