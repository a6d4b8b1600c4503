//! Client configuration and per-call request inputs.
//!
//! # Design
//! The environment is consulted once, in `Config::from_env`. Everything
//! downstream receives explicit values, so readers never look up the API key
//! on their own.

use std::time::Duration;

use crate::executor::RetryPolicy;
use crate::query::{SeriesInput, Year};

pub const DEFAULT_BASE_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";
pub const API_KEY_ENV: &str = "BLS_API_KEY";

/// Settings shared by every query: credentials, endpoint and retry policy.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Config {
    /// Default settings with the API key taken from `BLS_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Default settings with the API key resolved through `get`.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self::default().with_optional_api_key(get(API_KEY_ENV))
    }

    pub fn with_api_key(self, key: impl Into<String>) -> Self {
        self.with_optional_api_key(Some(key.into()))
    }

    /// Set or clear the key. Blank keys count as absent.
    pub fn with_optional_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry.retry_count = retry_count;
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.retry.pause = pause;
        self
    }
}

/// What to fetch: series, year range and the v2 enrichment flags.
///
/// The flags are ignored by v1 readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub series: SeriesInput,
    pub start: Option<Year>,
    pub end: Option<Year>,
    pub catalog: bool,
    pub calculations: bool,
    pub annual_average: bool,
}

impl SeriesRequest {
    pub fn new(series: impl Into<SeriesInput>) -> Self {
        Self {
            series: series.into(),
            start: None,
            end: None,
            catalog: false,
            calculations: false,
            annual_average: false,
        }
    }

    pub fn start(mut self, year: impl Into<Year>) -> Self {
        self.start = Some(year.into());
        self
    }

    pub fn end(mut self, year: impl Into<Year>) -> Self {
        self.end = Some(year.into());
        self
    }

    pub fn catalog(mut self, on: bool) -> Self {
        self.catalog = on;
        self
    }

    pub fn calculations(mut self, on: bool) -> Self {
        self.calculations = on;
        self
    }

    pub fn annual_average(mut self, on: bool) -> Self {
        self.annual_average = on;
        self
    }
}
