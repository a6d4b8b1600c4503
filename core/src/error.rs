//! Error types for the BLS client.
//!
//! # Design
//! Input problems surface from reader construction and are never retried.
//! Everything the server tells us lands in one of `Query`, `Auth` or
//! `Series`; the latter two carry the offending value so callers can report
//! it without re-parsing the message.

use thiserror::Error;

/// Errors returned by reader construction and `fetch`.
#[derive(Debug, Error)]
pub enum BlsError {
    /// Bad series shape, unparsable year or an out-of-limit date range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Network or server failure, malformed body, or retries exhausted.
    #[error("An error occurred while making the query: {0}")]
    Query(String),

    /// The server refused the registration key (v2 only).
    #[error("The provided key: {key} is either invalid or was not authorized by the BLS server")]
    Auth { key: String },

    /// The server reported that a requested series does not exist.
    #[error("The Series: {series} could not be retrieved. Please verify proper series ID formatting.")]
    Series { series: String },

    /// The request parameters could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl BlsError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        BlsError::InvalidInput(msg.into())
    }

    pub(crate) fn query(msg: impl Into<String>) -> Self {
        BlsError::Query(msg.into())
    }
}

/// Transport-level failure reported by an `HttpSession`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport error: {message}")]
pub struct SessionError {
    pub message: String,
}

impl SessionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
