//! Error types for the mailbridge client

use thiserror::Error;

/// Result type alias for listen operations
pub type Result<T> = std::result::Result<T, ListenError>;

/// Fatal errors surfaced to the caller of a listen operation.
///
/// Transient network failures never appear here: the polling loop absorbs
/// them and retries on the next cycle. Only conditions that cannot
/// self-correct end the call early.
#[derive(Debug, Error)]
pub enum ListenError {
    /// A request parameter failed pre-flight validation
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No endpoint could be resolved from the override or the configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The endpoint body was not valid JSON
    #[error("failed to parse endpoint response: {0}")]
    Parse(String),
}

/// Failure of a single fetch attempt.
///
/// Always transient from the orchestrator's point of view: every variant is
/// logged and retried on the next cycle, never surfaced to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure or per-request timeout
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint answered outside the 2xx range
    #[error("endpoint error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Canonical status text
        message: String,
    },
}

impl FetchError {
    /// Create a status error from code and status text
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Check if this failure was a per-request timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}
