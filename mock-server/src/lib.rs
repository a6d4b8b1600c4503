use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{debug, info};

pub const DATA_PATH: &str = "/publicAPI/v2/timeseries/data/";

/// Series the server knows about unless told otherwise.
pub const DEFAULT_SERIES: [&str; 3] = ["CUUR0000SA0", "LNS14000000", "MPU4900012"];

const V1_LIMITS: (usize, i32) = (25, 10);
const V2_LIMITS: (usize, i32) = (50, 20);

/// Request payload as the real endpoint accepts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesQuery {
    pub seriesid: Vec<String>,
    pub startyear: Option<String>,
    pub endyear: Option<String>,
    pub registrationkey: Option<String>,
    #[serde(default)]
    pub catalog: bool,
    #[serde(default)]
    pub calculations: bool,
    #[serde(default)]
    pub annualaverage: bool,
}

#[derive(Debug, Default)]
struct Inner {
    api_keys: HashSet<String>,
    series: HashSet<String>,
    failures_remaining: AtomicU32,
    requests: AtomicU32,
}

/// Shared server state. Configure it before handing it to `app`.
#[derive(Debug, Clone)]
pub struct MockState {
    inner: Arc<Inner>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(DEFAULT_SERIES, std::iter::empty::<&str>())
    }
}

impl MockState {
    pub fn new<I, K>(series: I, api_keys: K) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            inner: Arc::new(Inner {
                api_keys: api_keys.into_iter().map(Into::into).collect(),
                series: series.into_iter().map(Into::into).collect(),
                ..Inner::default()
            }),
        }
    }

    /// Default series, accepting `key` as a registration key.
    pub fn with_key(key: &str) -> Self {
        Self::new(DEFAULT_SERIES, [key])
    }

    /// Answer the next `n` requests with HTTP 503.
    pub fn fail_next(&self, n: u32) {
        self.inner.failures_remaining.store(n, Ordering::SeqCst);
    }

    /// Requests received so far, including failed ones.
    pub fn request_count(&self) -> u32 {
        self.inner.requests.load(Ordering::SeqCst)
    }
}

pub fn app(state: MockState) -> Router {
    Router::new().route(DATA_PATH, post(timeseries)).with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn timeseries(State(state): State<MockState>, body: String) -> Response {
    let seen = state.inner.requests.fetch_add(1, Ordering::SeqCst) + 1;
    let should_fail = state
        .inner
        .failures_remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if should_fail {
        debug!(request = seen, "injecting 503");
        return (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable").into_response();
    }

    let query: SeriesQuery = match serde_json::from_str(&body) {
        Ok(q) => q,
        Err(e) => return Json(json!({ "Error Message": format!("Unable to parse request: {e}") })).into_response(),
    };
    Json(answer(&state, &query)).into_response()
}

fn not_processed(message: impl Into<String>) -> Value {
    json!({
        "status": "REQUEST_NOT_PROCESSED",
        "responseTime": 0,
        "message": [message.into()],
        "Results": {}
    })
}

fn parse_year(raw: Option<&str>, fallback: i32) -> Result<i32, String> {
    match raw {
        None => Ok(fallback),
        Some(s) => s.trim().parse().map_err(|_| format!("Invalid year: {s}")),
    }
}

/// Build the response body for a well-formed query.
pub fn answer(state: &MockState, query: &SeriesQuery) -> Value {
    let limits = match &query.registrationkey {
        Some(key) if !state.inner.api_keys.contains(key) => {
            info!("rejecting unknown registration key");
            return not_processed("The key provided by the User is invalid.");
        }
        Some(_) => V2_LIMITS,
        None => V1_LIMITS,
    };

    if query.seriesid.len() > limits.0 {
        return not_processed(format!(
            "The number of series requested exceeds the limit of {} per query.",
            limits.0
        ));
    }

    let end = match parse_year(query.endyear.as_deref(), 2024) {
        Ok(y) => y,
        Err(e) => return json!({ "Error Message": e }),
    };
    let start = end
        .checked_sub(2)
        .ok_or_else(|| format!("Invalid year: {end}"))
        .and_then(|fallback| parse_year(query.startyear.as_deref(), fallback));
    let start = match start {
        Ok(y) => y,
        Err(e) => return json!({ "Error Message": e }),
    };
    if start > end {
        return json!({ "Error Message": "Start year must not be after end year." });
    }
    let Some(span) = end.checked_sub(start) else {
        return json!({ "Error Message": format!("Invalid year range: {start}-{end}") });
    };
    if span > limits.1 {
        return not_processed(format!(
            "Year range has been reduced to the system-allowed limit of {} years.",
            limits.1
        ));
    }

    let mut messages = Vec::new();
    let mut results = Vec::new();
    for id in &query.seriesid {
        if !state.inner.series.contains(id) {
            messages.push(format!("Series does not exist for Series {id}"));
            continue;
        }
        results.push(series_entry(id, start, end, query));
    }

    json!({
        "status": "REQUEST_SUCCEEDED",
        "responseTime": 1,
        "message": messages,
        "Results": { "series": results }
    })
}

fn series_entry(id: &str, start: i32, end: i32, query: &SeriesQuery) -> Value {
    let data: Vec<Value> = (start..=end)
        .rev()
        .map(|year| {
            let mut point = json!({
                "year": year.to_string(),
                "period": "M13",
                "periodName": "Annual",
                "value": format!("{:.1}", 100.0 + (f64::from(year) - 2000.0) * 1.5),
                "footnotes": [{}]
            });
            if query.catalog && query.calculations {
                point["calculations"] = json!({ "net_changes": { "12": "1.5" } });
            }
            point
        })
        .collect();

    let mut entry = json!({ "seriesID": id, "data": data });
    if query.catalog {
        entry["catalog"] = json!({ "series_title": format!("Synthetic series {id}"), "series_id": id });
    }
    entry
}
