//! Terminal poll outcomes

use serde::{Deserialize, Serialize};

use crate::domain::message::MessageMeta;

/// Terminal result of a listen operation.
///
/// Exactly one outcome is produced per call. A timeout is a normal outcome,
/// not an error: whether an absent message is fatal is the caller's call.
/// Fatal conditions (bad arguments, missing configuration, unparseable
/// endpoint body) never appear here; they surface as errors instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PollOutcome {
    /// An acceptable message was found.
    Success {
        /// The message payload, passed through untouched.
        data: serde_json::Value,
        /// Emission metadata of the accepted message.
        meta: MessageMeta,
        /// Wall-clock seconds from call start to acceptance, one decimal.
        elapsed_seconds: f64,
        /// Fetch attempts initiated, including the accepting one.
        attempts: u32,
    },
    /// The overall budget elapsed without an acceptable message.
    TimedOut {
        /// Wall-clock seconds from call start to budget exhaustion.
        elapsed_seconds: f64,
        /// Fetch attempts initiated before the budget ran out.
        attempts: u32,
    },
}

impl PollOutcome {
    /// Returns true for the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The accepted payload, if any.
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::TimedOut { .. } => None,
        }
    }

    /// Emission metadata of the accepted message, if any.
    pub fn meta(&self) -> Option<&MessageMeta> {
        match self {
            Self::Success { meta, .. } => Some(meta),
            Self::TimedOut { .. } => None,
        }
    }

    /// Wall-clock seconds the operation ran for.
    pub fn elapsed_seconds(&self) -> f64 {
        match self {
            Self::Success {
                elapsed_seconds, ..
            }
            | Self::TimedOut {
                elapsed_seconds, ..
            } => *elapsed_seconds,
        }
    }

    /// Number of fetch attempts initiated.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } | Self::TimedOut { attempts, .. } => *attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_accessors() {
        let outcome = PollOutcome::Success {
            data: json!("123456"),
            meta: MessageMeta {
                timestamp: 1_700_000_000,
                expiration: 300,
            },
            elapsed_seconds: 5.0,
            attempts: 1,
        };

        assert!(outcome.is_success());
        assert_eq!(outcome.data(), Some(&json!("123456")));
        assert_eq!(outcome.meta().unwrap().expiration, 300);
        assert_eq!(outcome.elapsed_seconds(), 5.0);
        assert_eq!(outcome.attempts(), 1);
    }

    #[test]
    fn test_timed_out_accessors() {
        let outcome = PollOutcome::TimedOut {
            elapsed_seconds: 10.0,
            attempts: 2,
        };

        assert!(!outcome.is_success());
        assert!(outcome.data().is_none());
        assert!(outcome.meta().is_none());
        assert_eq!(outcome.elapsed_seconds(), 10.0);
        assert_eq!(outcome.attempts(), 2);
    }
}
