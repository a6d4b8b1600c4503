//! Verify parameter building and response classification against the JSON
//! test vectors stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use std::time::Duration;

use bls_core::{
    validate_response, ApiVariant, BlsError, HttpRequest, HttpResponse, HttpSession, QueryExecutor, RetryPolicy,
    SeriesInput, SeriesRequest, SessionError, V1Reader, V2Reader, Year, V1, V2,
};
use serde_json::Value;

/// Session for cases that must never reach the network.
struct Offline;

impl HttpSession for Offline {
    fn post(&self, _request: &HttpRequest) -> Result<HttpResponse, SessionError> {
        Err(SessionError::new("offline"))
    }
}

fn executor() -> QueryExecutor<Offline> {
    QueryExecutor::new(Offline, "http://localhost:3000/data/", RetryPolicy::new(0, Duration::ZERO))
}

fn year(value: &Value) -> Option<Year> {
    match value {
        Value::Number(n) => Some(Year::Number(n.as_i64().unwrap() as i32)),
        Value::String(s) => Some(Year::Text(s.clone())),
        _ => None,
    }
}

fn flag(input: &Value, name: &str) -> bool {
    input.get(name).and_then(Value::as_bool).unwrap_or(false)
}

fn error_kind(err: &BlsError) -> &'static str {
    match err {
        BlsError::InvalidInput(_) => "InvalidInput",
        BlsError::Query(_) => "Query",
        BlsError::Auth { .. } => "Auth",
        BlsError::Series { .. } => "Series",
        BlsError::Serialization(_) => "Serialization",
    }
}

// ---------------------------------------------------------------------------
// Params
// ---------------------------------------------------------------------------

/// Build the request params for a vector, or the error construction raised.
fn build_params(case: &Value) -> Result<Value, BlsError> {
    let input = &case["input"];
    let series = SeriesInput::try_from(&input["series"])?;
    let mut request = SeriesRequest::new(series)
        .catalog(flag(input, "catalog"))
        .calculations(flag(input, "calculations"))
        .annual_average(flag(input, "annual_average"));
    request.start = year(&input["start"]);
    request.end = year(&input["end"]);

    let params = match case["version"].as_u64().unwrap() {
        1 => V1Reader::v1(request, executor())?.params(),
        2 => V2Reader::v2(request, case["api_key"].as_str().unwrap(), executor())?.params(),
        other => panic!("unknown version: {other}"),
    };
    Ok(serde_json::to_value(params).unwrap())
}

#[test]
fn params_test_vectors() {
    let raw = include_str!("../../test-vectors/params.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = build_params(case);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.expect_err(name);
            assert_eq!(error_kind(&err), expected_error.as_str().unwrap(), "{name}: error kind");
        } else {
            let params = result.unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(params, case["expected_params"], "{name}: params");
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let body = case["body"].clone();

        let result = match case["version"].as_u64().unwrap() {
            1 => validate_response(body.clone(), || V1.rejection()),
            2 => {
                let v2 = V2::new(case["api_key"].as_str().unwrap()).unwrap();
                validate_response(body.clone(), || v2.rejection())
            }
            other => panic!("unknown version: {other}"),
        };

        match case["expected"].as_str().unwrap() {
            "Ok" => assert_eq!(result.unwrap(), body, "{name}: body passes through"),
            kind => {
                let err = result.expect_err(name);
                assert_eq!(error_kind(&err), kind, "{name}: error kind");
                match (&err, case.get("expected_value").and_then(Value::as_str)) {
                    (BlsError::Series { series }, Some(expected)) => assert_eq!(series, expected, "{name}"),
                    (BlsError::Auth { key }, Some(expected)) => assert_eq!(key, expected, "{name}"),
                    _ => {}
                }
            }
        }
    }
}
