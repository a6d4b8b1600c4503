//! Input validation shared by both API versions.
//!
//! # Design
//! Callers may pass a single series ID or a list, and years as numbers or
//! strings. `SeriesInput` and `Year` capture those shapes so validation can
//! run once, at reader construction, producing an immutable `Query`.

use chrono::{Datelike, Local};

use crate::error::BlsError;
use crate::version::ApiVersion;

/// Number of years before the current one used when `start` is omitted.
pub const DEFAULT_LOOKBACK_YEARS: i32 = 3;

/// A single series ID or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesInput {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for SeriesInput {
    fn from(s: &str) -> Self {
        SeriesInput::One(s.to_string())
    }
}

impl From<String> for SeriesInput {
    fn from(s: String) -> Self {
        SeriesInput::One(s)
    }
}

impl From<Vec<String>> for SeriesInput {
    fn from(v: Vec<String>) -> Self {
        SeriesInput::Many(v)
    }
}

impl From<Vec<&str>> for SeriesInput {
    fn from(v: Vec<&str>) -> Self {
        SeriesInput::Many(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for SeriesInput {
    fn from(v: &[&str]) -> Self {
        SeriesInput::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

impl TryFrom<&serde_json::Value> for SeriesInput {
    type Error = BlsError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::String(s) => Ok(SeriesInput::One(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(SeriesInput::Many)
                .ok_or_else(|| BlsError::invalid("Expected series ID or list of series IDs")),
            _ => Err(BlsError::invalid("Expected series ID or list of series IDs")),
        }
    }
}

/// A year given either as a number or as text such as `"2015"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Year {
    Number(i32),
    Text(String),
}

impl Year {
    /// Coerce to an integer year.
    pub fn resolve(&self) -> Result<i32, BlsError> {
        match self {
            Year::Number(n) => Ok(*n),
            Year::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| BlsError::invalid(format!("'{s}' is not a valid year"))),
        }
    }
}

impl From<i32> for Year {
    fn from(n: i32) -> Self {
        Year::Number(n)
    }
}

impl From<&str> for Year {
    fn from(s: &str) -> Self {
        Year::Text(s.to_string())
    }
}

impl From<String> for Year {
    fn from(s: String) -> Self {
        Year::Text(s)
    }
}

/// Validated, immutable query configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub series: Vec<String>,
    pub start: i32,
    pub end: i32,
}

impl Query {
    pub fn new(
        series: SeriesInput,
        start: Option<Year>,
        end: Option<Year>,
        version: ApiVersion,
    ) -> Result<Self, BlsError> {
        let series = validate_series(series, version)?;
        let (start, end) = sanitize_dates(start, end, version)?;
        Ok(Self { series, start, end })
    }
}

/// Normalize `input` into an ordered list within the version's series limit.
pub fn validate_series(input: SeriesInput, version: ApiVersion) -> Result<Vec<String>, BlsError> {
    match input {
        SeriesInput::One(id) => Ok(vec![id]),
        SeriesInput::Many(ids) => {
            if ids.is_empty() {
                return Err(BlsError::invalid("Expected series ID or list of series IDs"));
            }
            let limit = version.limits().series_per_query;
            if ids.len() > limit {
                return Err(BlsError::invalid(format!(
                    "{} series requested; version {version} allows at most {limit} per query",
                    ids.len()
                )));
            }
            Ok(ids)
        }
    }
}

/// Resolve `(start, end)` against the current calendar year.
pub fn sanitize_dates(
    start: Option<Year>,
    end: Option<Year>,
    version: ApiVersion,
) -> Result<(i32, i32), BlsError> {
    sanitize_dates_at(start, end, version, Local::now().year())
}

/// Resolve `(start, end)`, defaulting to `(current_year - 3, current_year)`.
pub fn sanitize_dates_at(
    start: Option<Year>,
    end: Option<Year>,
    version: ApiVersion,
    current_year: i32,
) -> Result<(i32, i32), BlsError> {
    let start = match start {
        Some(year) => year.resolve()?,
        None => current_year - DEFAULT_LOOKBACK_YEARS,
    };
    let end = match end {
        Some(year) => year.resolve()?,
        None => current_year,
    };
    if start > end {
        return Err(BlsError::invalid("start must be an earlier date than end"));
    }
    let span = version.limits().years_per_query;
    if i64::from(end) - i64::from(start) > i64::from(span) {
        return Err(BlsError::invalid(format!(
            "Invalid year range for version {version}: {start}-{end} spans more than {span} years"
        )));
    }
    Ok((start, end))
}
