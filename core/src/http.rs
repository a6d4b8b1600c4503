//! HTTP transport types and the session seam.
//!
//! # Design
//! The client describes its one POST as plain data and hands it to an
//! `HttpSession`. The session owns the network; the client owns retries and
//! status interpretation. Tests script a session in memory, production uses
//! `UreqSession`.
//!
//! All fields use owned types so requests can be recorded and replayed
//! without lifetime concerns.

use crate::error::SessionError;

/// A POST request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// Executes a single HTTP POST.
///
/// Non-2xx statuses must come back as `Ok(HttpResponse)`; `Err` is reserved
/// for failures where no response was received at all.
pub trait HttpSession {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, SessionError>;
}

impl<S: HttpSession + ?Sized> HttpSession for &S {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, SessionError> {
        (**self).post(request)
    }
}
