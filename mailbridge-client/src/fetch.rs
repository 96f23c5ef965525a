//! HTTP fetcher
//!
//! One GET per call against the bridge endpoint, with merged headers and a
//! per-request timeout. No retries here: retry policy belongs to the
//! polling loop, this layer only performs and classifies a single attempt.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

use crate::error::FetchError;

/// Fixed User-Agent sent with every request unless overridden by the caller.
const USER_AGENT_VALUE: &str = concat!("mailbridge/", env!("CARGO_PKG_VERSION"));

/// A single fetch attempt against the bridge endpoint.
///
/// The poller depends on this trait instead of a concrete HTTP client so
/// tests can script responses without a network.
#[async_trait]
pub trait Fetch: Send + Sync + std::fmt::Debug {
    /// Performs one GET and returns the raw response body.
    ///
    /// `timeout` bounds this attempt only; the polling budget is tracked by
    /// the caller.
    async fn fetch(
        &self,
        url: &str,
        headers: &HeaderMap,
        timeout: Duration,
    ) -> Result<String, FetchError>;
}

/// Production fetcher over a pooled [`reqwest::Client`]
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a fresh connection pool
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Creates a fetcher over a pre-configured client
    ///
    /// This allows tuning proxies, TLS settings, connection pooling, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Baseline headers; caller headers are merged over these.
fn baseline_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    headers
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        headers: &HeaderMap,
        timeout: Duration,
    ) -> Result<String, FetchError> {
        let mut merged = baseline_headers();
        for (name, value) in headers {
            merged.insert(name.clone(), value.clone());
        }

        let response = self
            .client
            .get(url)
            .headers(merged)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error"),
            ));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_returns_body_on_2xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"k1":{}}"#))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new();
        let body = fetcher
            .fetch(
                &format!("{}/messages", server.uri()),
                &HeaderMap::new(),
                TIMEOUT,
            )
            .await
            .unwrap();

        assert_eq!(body, r#"{"k1":{}}"#);
    }

    #[tokio::test]
    async fn test_sends_baseline_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("accept", "application/json"))
            .and(header("user-agent", USER_AGENT_VALUE))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new();
        let result = fetcher.fetch(&server.uri(), &HeaderMap::new(), TIMEOUT).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_caller_headers_override_baseline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("accept", "text/plain"))
            .and(header("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));
        headers.insert("x-api-key", HeaderValue::from_static("secret"));

        let fetcher = HttpFetcher::new();
        let result = fetcher.fetch(&server.uri(), &headers, TIMEOUT).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_non_2xx_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new();
        let err = fetcher
            .fetch(&server.uri(), &HeaderMap::new(), TIMEOUT)
            .await
            .unwrap_err();

        match err {
            FetchError::Status { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_a_request_error() {
        // Nothing listens on port 1.
        let fetcher = HttpFetcher::new();
        let err = fetcher
            .fetch("http://127.0.0.1:1/messages", &HeaderMap::new(), TIMEOUT)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Request(_)));
        assert!(!err.is_timeout());
    }
}
