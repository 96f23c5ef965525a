//! Listen request options
//!
//! Defines the per-call parameters of a listen operation: which message to
//! wait for, the timing envelope, and transport details merged into every
//! fetch.

use std::collections::HashMap;
use std::time::Duration;

/// Default spacing between fetch attempts when neither the call nor the
/// configuration sets one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default per-attempt network timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Floor for the poll interval; smaller values are silently clamped.
pub(crate) const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Options for a single listen operation
///
/// Constructed once per call and read-only for its whole duration. The three
/// required fields cover the acceptance contract; everything else has a
/// sensible default.
#[derive(Debug, Clone)]
pub struct ListenOptions {
    /// Required message kind; only a message declaring this type qualifies
    pub message_type: String,

    /// Total wall-clock budget for the whole operation
    pub timeout: Duration,

    /// A message is only acceptable if emitted within this window before
    /// the instant it is evaluated
    pub retro_back: Duration,

    /// Spacing between fetch attempts; `None` falls back to the configured
    /// default. Values below one second are clamped to one second.
    pub interval: Option<Duration>,

    /// Per-call endpoint override; `None` falls back to the configured
    /// endpoint
    pub endpoint: Option<String>,

    /// Extra headers merged over the baseline on every request
    pub headers: HashMap<String, String>,

    /// Per-attempt network timeout, independent of the overall budget
    pub request_timeout: Duration,

    /// Emit per-cycle diagnostics through `tracing`; no behavioral effect
    pub debug: bool,
}

impl ListenOptions {
    /// Creates options for waiting on a message of `message_type`, giving
    /// the whole operation `timeout` and accepting only messages emitted
    /// within `retro_back` of their evaluation instant.
    pub fn new(message_type: impl Into<String>, timeout: Duration, retro_back: Duration) -> Self {
        Self {
            message_type: message_type.into(),
            timeout,
            retro_back,
            interval: None,
            endpoint: None,
            headers: HashMap::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            debug: false,
        }
    }

    /// Sets the spacing between fetch attempts
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Overrides the bridge endpoint for this call only
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Adds a header sent with every fetch (overrides a baseline entry of
    /// the same name)
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the per-attempt network timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enables per-cycle diagnostic tracing
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
