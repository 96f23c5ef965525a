//! Mailbridge Client
//!
//! An async client for waiting on messages relayed through an HTTP inbox
//! bridge: verification codes, login links, or anything else sent to an
//! out-of-band inbox and re-published by the bridge as a shared JSON
//! message map.
//!
//! The one operation is [`BridgeClient::listen_from`]: poll the bridge
//! endpoint until the map contains a matching, non-expired,
//! recently-emitted message for the given key, or until the overall
//! budget elapses. Transient network failures are retried silently; only
//! bad arguments, missing configuration, or an unparseable endpoint body
//! end the call with an error.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use mailbridge_client::{BridgeClient, Config, ListenOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BridgeClient::new(Config::new("https://bridge.example.com/messages"));
//!
//!     let outcome = client
//!         .listen_from(
//!             "user@example.com",
//!             ListenOptions::new(
//!                 "verification-code",
//!                 Duration::from_secs(120),
//!                 Duration::from_secs(60),
//!             ),
//!         )
//!         .await?;
//!
//!     match outcome.data() {
//!         Some(data) => println!("received: {data}"),
//!         None => println!("no message within the budget"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod options;
mod poller;

// Re-export commonly used types
pub use config::Config;
pub use error::{FetchError, ListenError, Result};
pub use fetch::{Fetch, HttpFetcher};
pub use mailbridge_core::domain::message::{MessageEnvelope, MessageMeta};
pub use mailbridge_core::domain::outcome::PollOutcome;
pub use options::ListenOptions;

use std::sync::Arc;

/// Client for waiting on messages relayed through a bridge endpoint
///
/// The client owns the resolved configuration and the fetcher; each
/// [`listen_from`](Self::listen_from) call owns its own timer and counters,
/// so concurrent calls on one client are fully isolated.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    /// Resolved configuration (default endpoint and poll interval)
    config: Config,
    /// Fetcher performing one GET per poll cycle
    fetcher: Arc<dyn Fetch>,
}

impl BridgeClient {
    /// Creates a client over the production HTTP fetcher
    ///
    /// # Example
    /// ```
    /// use mailbridge_client::{BridgeClient, Config};
    ///
    /// let client = BridgeClient::new(Config::new("https://bridge.example.com/messages"));
    /// ```
    pub fn new(config: Config) -> Self {
        Self {
            config,
            fetcher: Arc::new(HttpFetcher::new()),
        }
    }

    /// Creates a client with an injected fetcher implementation
    ///
    /// This allows sharing a tuned `reqwest` pool via
    /// [`HttpFetcher::with_client`], or scripting responses in tests.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetch>) -> Self {
        Self { config, fetcher }
    }

    /// Returns the configured default endpoint
    pub fn endpoint_url(&self) -> &str {
        &self.config.endpoint_url
    }

    /// Waits for an acceptable message under `key`
    ///
    /// Polls the bridge endpoint every interval until the message map
    /// contains an entry for `key` whose type matches, which has not
    /// expired, and which was emitted within the retro-back window — or
    /// until the overall budget elapses. Exactly one of
    /// [`PollOutcome::Success`], [`PollOutcome::TimedOut`], or an error is
    /// produced.
    ///
    /// # Errors
    /// - [`ListenError::InvalidArgument`] before any network activity for
    ///   an empty key or type, a non-positive timeout or retro-back
    ///   window, or an ill-formed header
    /// - [`ListenError::Configuration`] when no endpoint can be resolved
    /// - [`ListenError::Parse`] when the endpoint body is not valid JSON
    ///   (stops polling immediately)
    pub async fn listen_from(&self, key: &str, options: ListenOptions) -> Result<PollOutcome> {
        poller::listen_from(self.fetcher.as_ref(), &self.config, key, &options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_exposes_endpoint() {
        let client = BridgeClient::new(Config::new("http://localhost:8080/messages"));
        assert_eq!(client.endpoint_url(), "http://localhost:8080/messages");
    }

    // End-to-end over a real socket: wiremock serves the message map, the
    // production fetcher polls it. Uses real (short) durations because real
    // I/O is involved.
    #[tokio::test]
    async fn test_listen_from_end_to_end() {
        let server = MockServer::start().await;
        let now = chrono::Utc::now().timestamp();
        Mock::given(method("GET"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "inbox-1": {
                    "type": "verification-code",
                    "data": "424242",
                    "meta": { "timestamp": now, "expiration": 300 }
                }
            })))
            .mount(&server)
            .await;

        let client = BridgeClient::new(
            Config::new(format!("{}/messages", server.uri()))
                .with_poll_interval(Duration::from_secs(1)),
        );

        let outcome = client
            .listen_from(
                "inbox-1",
                ListenOptions::new(
                    "verification-code",
                    Duration::from_secs(10),
                    Duration::from_secs(60),
                ),
            )
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.data(), Some(&json!("424242")));
        assert_eq!(outcome.attempts(), 1);
    }

    #[tokio::test]
    async fn test_listen_from_times_out_on_empty_map() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = BridgeClient::new(
            Config::new(server.uri()).with_poll_interval(Duration::from_secs(1)),
        );

        let outcome = client
            .listen_from(
                "inbox-1",
                ListenOptions::new("t", Duration::from_secs(2), Duration::from_secs(60)),
            )
            .await
            .unwrap();

        assert!(!outcome.is_success());
        assert!(outcome.attempts() >= 1);
    }
}
