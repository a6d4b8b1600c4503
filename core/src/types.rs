//! Wire types for the timeseries endpoint.
//!
//! # Design
//! Only the request payload is modeled. Responses stay as
//! `serde_json::Value`; the client inspects `status` and `message` and hands
//! everything else back untouched.

use serde::{Deserialize, Serialize};

/// Request payload posted to the timeseries endpoint.
///
/// Years travel as strings. Optional fields are omitted from the JSON
/// rather than sent as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryParams {
    pub seriesid: Vec<String>,
    pub startyear: String,
    pub endyear: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrationkey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculations: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annualaverage: Option<bool>,
}

pub const REQUEST_SUCCEEDED: &str = "REQUEST_SUCCEEDED";
pub const REQUEST_NOT_PROCESSED: &str = "REQUEST_NOT_PROCESSED";

/// Message fragments the server uses for unknown or malformed series IDs.
pub const INVALID_SERIES_MESSAGES: [&str; 2] = [
    "Invalid Series for Series",
    "Series does not exist for Series",
];

/// The `status` field of a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseStatus {
    Succeeded,
    NotProcessed,
    Other(String),
}

impl ResponseStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            REQUEST_SUCCEEDED => ResponseStatus::Succeeded,
            REQUEST_NOT_PROCESSED => ResponseStatus::NotProcessed,
            other => ResponseStatus::Other(other.to_string()),
        }
    }
}
