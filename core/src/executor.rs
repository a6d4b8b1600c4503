//! Request serialization, the retry loop and response classification.
//!
//! # Design
//! A fetch moves through `Sending`, then either `Retrying` (non-200 or no
//! response at all) or classification of the 200 body. Classification
//! failures are final and never retried. The only version-specific input
//! is how a `REQUEST_NOT_PROCESSED` body is reported, passed in as
//! `rejection`.

use std::thread;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::BlsError;
use crate::http::{HttpRequest, HttpSession};
use crate::types::{QueryParams, ResponseStatus, INVALID_SERIES_MESSAGES};

/// How many times to retry a failed attempt, and the fixed pause between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retry_count: u32,
    pub pause: Duration,
}

impl RetryPolicy {
    pub const fn new(retry_count: u32, pause: Duration) -> Self {
        Self { retry_count, pause }
    }

    /// Total attempts, including the first.
    pub const fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: 3,
            pause: Duration::from_millis(1),
        }
    }
}

/// Posts serialized parameters to a single endpoint with bounded retries.
#[derive(Debug, Clone)]
pub struct QueryExecutor<S> {
    session: S,
    url: String,
    policy: RetryPolicy,
}

impl<S: HttpSession> QueryExecutor<S> {
    pub fn new(session: S, url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            session,
            url: url.into(),
            policy,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Serialize `params` into the POST request.
    pub fn prepare(&self, params: &QueryParams) -> Result<HttpRequest, BlsError> {
        let body = serde_json::to_string(params).map_err(|e| BlsError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            url: self.url.clone(),
            headers: vec![("Content-type".to_string(), "application/json".to_string())],
            body,
        })
    }

    /// Send `request` until a 200 arrives or attempts run out.
    pub fn execute<F>(&self, request: &HttpRequest, rejection: F) -> Result<Value, BlsError>
    where
        F: Fn() -> BlsError,
    {
        let attempts = self.policy.max_attempts();
        for attempt in 1..=attempts {
            debug!(attempt, max_attempts = attempts, url = %request.url, "sending query");
            match self.session.post(request) {
                Ok(response) if response.status == 200 => {
                    let json: Value = serde_json::from_str(&response.body)
                        .map_err(|e| BlsError::query(format!("response body is not valid JSON: {e}")))?;
                    return validate_response(json, rejection);
                }
                Ok(response) => {
                    warn!(attempt, status = response.status, "query attempt failed");
                }
                Err(e) => {
                    warn!(attempt, error = %e, "query attempt failed");
                }
            }
            if attempt < attempts {
                thread::sleep(self.policy.pause);
            }
        }
        Err(BlsError::query(format!("no successful response after {attempts} attempts")))
    }
}

/// Classify a 200 response body.
///
/// `rejection` builds the error for `REQUEST_NOT_PROCESSED`. Unrecognized
/// statuses pass through unchanged.
pub fn validate_response<F>(json: Value, rejection: F) -> Result<Value, BlsError>
where
    F: Fn() -> BlsError,
{
    if let Some(message) = json.get("Error Message") {
        return Err(BlsError::query(format!("server returned an error message: {message}")));
    }
    let status = json
        .get("status")
        .and_then(Value::as_str)
        .map(ResponseStatus::parse)
        .ok_or_else(|| BlsError::query("response body has no status field"))?;

    match status {
        ResponseStatus::NotProcessed => Err(rejection()),
        ResponseStatus::Succeeded => {
            if let Some(series) = find_invalid_series(&json) {
                return Err(BlsError::Series { series });
            }
            Ok(json)
        }
        ResponseStatus::Other(other) => {
            debug!(status = %other, "passing through unrecognized status");
            Ok(json)
        }
    }
}

/// The series ID named by the first invalid-series message, if any.
fn find_invalid_series(json: &Value) -> Option<String> {
    json.get("message")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .find(|msg| INVALID_SERIES_MESSAGES.iter().any(|code| msg.contains(code)))
        .and_then(|msg| msg.split_whitespace().last())
        .map(str::to_string)
}
