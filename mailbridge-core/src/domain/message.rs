//! Relayed message domain types
//!
//! The bridge endpoint publishes a JSON object mapping inbox keys to message
//! envelopes. Envelopes are fetched fresh on every poll cycle and discarded
//! right after evaluation; nothing here is cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single message relayed through the bridge endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// Message kind declared by the emitter (e.g. "verification-code").
    #[serde(rename = "type")]
    pub message_type: String,

    /// Opaque payload: a primitive or any JSON structure. Never inspected
    /// by the acceptance rules.
    pub data: serde_json::Value,

    /// Emission metadata.
    pub meta: MessageMeta,
}

/// Emission metadata attached to every relayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMeta {
    /// Emission time, Unix seconds.
    pub timestamp: i64,

    /// Validity duration in seconds, counted from `timestamp`.
    pub expiration: u64,
}

impl MessageEnvelope {
    /// Evaluates every acceptance rule for the given request parameters at
    /// evaluation instant `now` (Unix seconds).
    ///
    /// A message is acceptable iff all of:
    /// - its declared type equals `wanted_type`
    /// - it has not expired: `now <= timestamp + expiration`
    /// - it falls inside the retro-back window:
    ///   `timestamp >= now - retro_back_secs`
    ///
    /// Both time comparisons accept the boundary instant.
    pub fn is_acceptable(&self, wanted_type: &str, retro_back_secs: u64, now: i64) -> bool {
        self.message_type == wanted_type
            && !self.is_expired_at(now)
            && self.is_within_retro_back(retro_back_secs, now)
    }

    /// Expiration check. `now == timestamp + expiration` is still valid.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.meta.expiry_instant()
    }

    /// Retro-back window check. `timestamp == now - retro_back_secs` is
    /// still inside the window.
    pub fn is_within_retro_back(&self, retro_back_secs: u64, now: i64) -> bool {
        let window_secs = i64::try_from(retro_back_secs).unwrap_or(i64::MAX);
        self.meta.timestamp >= now.saturating_sub(window_secs)
    }
}

impl MessageMeta {
    /// Last instant (Unix seconds) at which the message is still valid.
    pub fn expiry_instant(&self) -> i64 {
        let expiration = i64::try_from(self.expiration).unwrap_or(i64::MAX);
        self.timestamp.saturating_add(expiration)
    }

    /// Emission time as a UTC timestamp, `None` outside chrono's range.
    pub fn emitted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Last valid instant as a UTC timestamp, `None` outside chrono's range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expiry_instant(), 0)
    }
}
