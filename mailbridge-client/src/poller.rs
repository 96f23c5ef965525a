//! Polling orchestrator
//!
//! Drives repeated fetch-and-validate cycles against the bridge endpoint
//! until an acceptable message appears or the overall budget elapses.
//! Cycles are strictly serialized: the loop sleeps one interval after each
//! cycle completes, so a slow fetch stretches its cycle instead of letting
//! a second fetch start underneath it. The first fetch therefore happens
//! one interval after the call starts.

use std::time::Duration;

use mailbridge_core::domain::message::MessageEnvelope;
use mailbridge_core::domain::outcome::PollOutcome;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::config::Config;
use crate::error::{ListenError, Result};
use crate::fetch::Fetch;
use crate::options::{ListenOptions, MIN_POLL_INTERVAL};

/// A listen call that passed pre-flight validation.
struct Plan {
    url: String,
    headers: HeaderMap,
    interval: Duration,
    timeout: Duration,
    request_timeout: Duration,
    retro_back_secs: u64,
}

/// Waits for an acceptable message under `key`.
///
/// Validation failures and unparseable endpoint bodies are returned as
/// errors; everything else resolves to exactly one [`PollOutcome`].
pub(crate) async fn listen_from(
    fetcher: &dyn Fetch,
    config: &Config,
    key: &str,
    options: &ListenOptions,
) -> Result<PollOutcome> {
    let plan = validate(config, key, options)?;

    if options.debug {
        debug!(
            key,
            message_type = %options.message_type,
            url = %plan.url,
            interval = ?plan.interval,
            timeout = ?plan.timeout,
            "starting listen"
        );
    }

    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        sleep(plan.interval).await;

        // Budget check with fresh wall-clock elapsed; reaching it here does
        // not count as an attempt.
        if started.elapsed() >= plan.timeout {
            let elapsed_seconds = elapsed_seconds(started.elapsed());
            if options.debug {
                debug!(elapsed_seconds, attempts, "listen budget exhausted");
            }
            return Ok(PollOutcome::TimedOut {
                elapsed_seconds,
                attempts,
            });
        }

        attempts += 1;

        let body = match fetcher
            .fetch(&plan.url, &plan.headers, plan.request_timeout)
            .await
        {
            Ok(body) => body,
            Err(e) => {
                // Transient: the next cycle retries.
                if options.debug {
                    debug!(attempt = attempts, error = %e, "fetch failed, retrying next cycle");
                }
                continue;
            }
        };

        // A body that is not JSON at all is fatal: a malformed endpoint will
        // not self-correct, so surface it instead of burning the budget.
        let map: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ListenError::Parse(e.to_string()))?;

        let now = chrono::Utc::now().timestamp();
        match find_acceptable(&map, key, &options.message_type, plan.retro_back_secs, now) {
            Some(envelope) => {
                let elapsed_seconds = elapsed_seconds(started.elapsed());
                if options.debug {
                    debug!(elapsed_seconds, attempts, "acceptable message found");
                }
                return Ok(PollOutcome::Success {
                    data: envelope.data,
                    meta: envelope.meta,
                    elapsed_seconds,
                    attempts,
                });
            }
            None => {
                if options.debug {
                    debug!(attempt = attempts, "no acceptable message yet");
                }
            }
        }
    }
}

/// Pre-flight validation; runs before any network activity.
fn validate(config: &Config, key: &str, options: &ListenOptions) -> Result<Plan> {
    if key.is_empty() {
        return Err(ListenError::InvalidArgument(
            "key must be a non-empty string".to_string(),
        ));
    }

    if options.message_type.is_empty() {
        return Err(ListenError::InvalidArgument(
            "message type must be a non-empty string".to_string(),
        ));
    }

    if options.timeout.is_zero() {
        return Err(ListenError::InvalidArgument(
            "timeout must be positive".to_string(),
        ));
    }

    if options.retro_back.is_zero() {
        return Err(ListenError::InvalidArgument(
            "retro-back window must be positive".to_string(),
        ));
    }

    let mut headers = HeaderMap::new();
    for (name, value) in &options.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ListenError::InvalidArgument(format!("invalid header name {name:?}: {e}")))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            ListenError::InvalidArgument(format!("invalid value for header {name:?}: {e}"))
        })?;
        headers.insert(header_name, header_value);
    }

    let endpoint = options.endpoint.as_deref().unwrap_or(&config.endpoint_url);
    if endpoint.is_empty() {
        return Err(ListenError::Configuration(
            "no bridge endpoint resolved; configure one or pass an override".to_string(),
        ));
    }

    let requested = options.interval.unwrap_or(config.poll_interval);
    let interval = if requested < MIN_POLL_INTERVAL {
        if options.debug {
            debug!(requested = ?requested, "poll interval below floor, clamping to 1s");
        }
        MIN_POLL_INTERVAL
    } else {
        requested
    };

    Ok(Plan {
        url: endpoint.to_string(),
        headers,
        interval,
        timeout: options.timeout,
        request_timeout: options.request_timeout,
        retro_back_secs: options.retro_back.as_secs(),
    })
}

/// Looks up `key` in the fetched map and evaluates the entry.
///
/// `None` always means "keep polling": the key is absent, the body is not
/// an object, the entry is not envelope-shaped, or the envelope fails an
/// acceptance rule.
fn find_acceptable(
    map: &serde_json::Value,
    key: &str,
    wanted_type: &str,
    retro_back_secs: u64,
    now: i64,
) -> Option<MessageEnvelope> {
    let entry = map.as_object()?.get(key)?;
    let envelope: MessageEnvelope = serde_json::from_value(entry.clone()).ok()?;
    envelope
        .is_acceptable(wanted_type, retro_back_secs, now)
        .then_some(envelope)
}

/// Wall-clock seconds rounded to one decimal place, half-up on the tenths
/// digit.
fn elapsed_seconds(elapsed: Duration) -> f64 {
    (elapsed.as_millis() as f64 / 100.0).round() / 10.0
}
