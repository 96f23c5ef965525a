//! Client configuration
//!
//! The default endpoint and poll interval live in an explicit `Config`
//! value handed to the client at construction; nothing global is read
//! while a listen operation is running. Per-call overrides stay on
//! `ListenOptions`.

use std::time::Duration;

use crate::error::ListenError;
use crate::options::DEFAULT_POLL_INTERVAL;

/// Bridge client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint URL serving the shared message map
    pub endpoint_url: String,

    /// Default spacing between fetch attempts for calls that do not set one
    pub poll_interval: Duration,
}

impl Config {
    /// Creates a configuration for the given endpoint with the library
    /// default poll interval
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MAILBRIDGE_URL (required)
    /// - MAILBRIDGE_POLL_INTERVAL (optional, seconds, default: 5)
    pub fn from_env() -> Result<Self, ListenError> {
        let endpoint_url = std::env::var("MAILBRIDGE_URL").map_err(|_| {
            ListenError::Configuration("MAILBRIDGE_URL environment variable not set".to_string())
        })?;

        let poll_interval = std::env::var("MAILBRIDGE_POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        Ok(Self {
            endpoint_url,
            poll_interval,
        })
    }

    /// Sets the default poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ListenError> {
        if self.endpoint_url.is_empty() {
            return Err(ListenError::Configuration(
                "endpoint_url cannot be empty".to_string(),
            ));
        }

        if !self.endpoint_url.starts_with("http://") && !self.endpoint_url.starts_with("https://") {
            return Err(ListenError::Configuration(
                "endpoint_url must start with http:// or https://".to_string(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(ListenError::Configuration(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
