//! Blocking `HttpSession` backed by ureq.

use std::time::Duration;

use crate::error::SessionError;
use crate::http::{HttpRequest, HttpResponse, HttpSession};

/// Default session used when the caller does not supply one.
///
/// Status codes are returned as data so the client can decide what to retry.
#[derive(Debug, Clone)]
pub struct UreqSession {
    agent: ureq::Agent,
}

impl UreqSession {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// Build a session whose requests fail after `timeout` in total.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap a preconfigured agent. It should have `http_status_as_error(false)`.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqSession {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSession for UreqSession {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, SessionError> {
        let mut builder = self.agent.post(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .send(request.body.as_bytes())
            .map_err(|e| SessionError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| SessionError::new(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
