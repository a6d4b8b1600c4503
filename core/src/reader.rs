//! Version-specific readers.
//!
//! # Design
//! `Reader<V, S>` owns a validated `Query` and a `QueryExecutor`. Everything
//! that differs between API versions lives behind `ApiVariant`: limits,
//! parameter building and how a rejected request is reported. `SeriesReader`
//! is the closed sum of the two readers, returned by the factory.

use serde_json::Value;

use crate::config::SeriesRequest;
use crate::error::BlsError;
use crate::executor::QueryExecutor;
use crate::http::HttpSession;
use crate::query::Query;
use crate::types::QueryParams;
use crate::version::{ApiVersion, Limits};

/// The per-version surface of a reader.
pub trait ApiVariant {
    fn version(&self) -> ApiVersion;

    fn limits(&self) -> Limits {
        self.version().limits()
    }

    fn params(&self, query: &Query) -> QueryParams;

    /// Error reported when the server answers `REQUEST_NOT_PROCESSED`.
    fn rejection(&self) -> BlsError;
}

/// Keyless v1 API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V1;

impl ApiVariant for V1 {
    fn version(&self) -> ApiVersion {
        ApiVersion::V1
    }

    fn params(&self, query: &Query) -> QueryParams {
        QueryParams {
            seriesid: query.series.clone(),
            startyear: query.start.to_string(),
            endyear: query.end.to_string(),
            registrationkey: None,
            catalog: None,
            calculations: None,
            annualaverage: None,
        }
    }

    fn rejection(&self) -> BlsError {
        BlsError::query("request was not processed")
    }
}

/// Key-authenticated v2 API with optional response enrichments.
#[derive(Clone, PartialEq, Eq)]
pub struct V2 {
    api_key: String,
    pub catalog: bool,
    pub calculations: bool,
    pub annual_average: bool,
}

impl V2 {
    pub fn new(api_key: impl Into<String>) -> Result<Self, BlsError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(BlsError::invalid(
                "The BLS API key must be provided either through the configuration or the BLS_API_KEY environment variable",
            ));
        }
        Ok(Self {
            api_key,
            catalog: false,
            calculations: false,
            annual_average: false,
        })
    }

    pub fn with_flags(mut self, catalog: bool, calculations: bool, annual_average: bool) -> Self {
        self.catalog = catalog;
        self.calculations = calculations;
        self.annual_average = annual_average;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

// keep the key out of debug output
impl std::fmt::Debug for V2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V2")
            .field("api_key", &"<redacted>")
            .field("catalog", &self.catalog)
            .field("calculations", &self.calculations)
            .field("annual_average", &self.annual_average)
            .finish()
    }
}

impl ApiVariant for V2 {
    fn version(&self) -> ApiVersion {
        ApiVersion::V2
    }

    fn params(&self, query: &Query) -> QueryParams {
        // All three enrichments are gated on `catalog`. `calculations` and
        // `annual_average` are not sent unless the catalog is requested.
        let enrich = self.catalog.then_some(true);
        QueryParams {
            seriesid: query.series.clone(),
            startyear: query.start.to_string(),
            endyear: query.end.to_string(),
            registrationkey: Some(self.api_key.clone()),
            catalog: enrich,
            calculations: enrich,
            annualaverage: enrich,
        }
    }

    fn rejection(&self) -> BlsError {
        BlsError::Auth {
            key: self.api_key.clone(),
        }
    }
}

/// Validated query bound to an API version and an executor.
#[derive(Debug, Clone)]
pub struct Reader<V, S> {
    query: Query,
    variant: V,
    executor: QueryExecutor<S>,
}

pub type V1Reader<S> = Reader<V1, S>;
pub type V2Reader<S> = Reader<V2, S>;

impl<V: ApiVariant, S: HttpSession> Reader<V, S> {
    /// Validate `request` against `variant`'s limits.
    pub fn new(request: SeriesRequest, variant: V, executor: QueryExecutor<S>) -> Result<Self, BlsError> {
        let query = Query::new(request.series, request.start, request.end, variant.version())?;
        Ok(Self {
            query,
            variant,
            executor,
        })
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn variant(&self) -> &V {
        &self.variant
    }

    pub fn version(&self) -> ApiVersion {
        self.variant.version()
    }

    pub fn limits(&self) -> Limits {
        self.variant.limits()
    }

    pub fn params(&self) -> QueryParams {
        self.variant.params(&self.query)
    }

    /// Run the full query cycle and return the parsed response body.
    pub fn fetch(&self) -> Result<Value, BlsError> {
        let request = self.executor.prepare(&self.params())?;
        self.executor.execute(&request, || self.variant.rejection())
    }
}

impl<S: HttpSession> Reader<V1, S> {
    pub fn v1(request: SeriesRequest, executor: QueryExecutor<S>) -> Result<Self, BlsError> {
        Self::new(request, V1, executor)
    }
}

impl<S: HttpSession> Reader<V2, S> {
    /// Build a v2 reader; the enrichment flags come from `request`.
    pub fn v2(request: SeriesRequest, api_key: impl Into<String>, executor: QueryExecutor<S>) -> Result<Self, BlsError> {
        let variant = V2::new(api_key)?.with_flags(request.catalog, request.calculations, request.annual_average);
        Self::new(request, variant, executor)
    }
}

/// Either reader, as chosen by `get_series`.
#[derive(Debug, Clone)]
pub enum SeriesReader<S> {
    V1(V1Reader<S>),
    V2(V2Reader<S>),
}

impl<S: HttpSession> SeriesReader<S> {
    pub fn version(&self) -> ApiVersion {
        match self {
            SeriesReader::V1(r) => r.version(),
            SeriesReader::V2(r) => r.version(),
        }
    }

    pub fn query(&self) -> &Query {
        match self {
            SeriesReader::V1(r) => r.query(),
            SeriesReader::V2(r) => r.query(),
        }
    }

    pub fn params(&self) -> QueryParams {
        match self {
            SeriesReader::V1(r) => r.params(),
            SeriesReader::V2(r) => r.params(),
        }
    }

    pub fn fetch(&self) -> Result<Value, BlsError> {
        match self {
            SeriesReader::V1(r) => r.fetch(),
            SeriesReader::V2(r) => r.fetch(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::executor::RetryPolicy;
    use crate::http::HttpResponse;
    use crate::test_support::ScriptedSession;

    const URL: &str = "http://localhost:3000/publicAPI/v2/timeseries/data/";

    fn executor(session: &ScriptedSession) -> QueryExecutor<&ScriptedSession> {
        QueryExecutor::new(session, URL, RetryPolicy::new(3, Duration::ZERO))
    }

    fn request() -> SeriesRequest {
        SeriesRequest::new("CUUR0000SA0").start(2019).end(2021)
    }

    #[test]
    fn v1_params_have_no_key() {
        let session = ScriptedSession::default();
        let reader = V1Reader::v1(request(), executor(&session)).unwrap();
        let params = serde_json::to_value(reader.params()).unwrap();
        assert_eq!(
            params,
            json!({"seriesid": ["CUUR0000SA0"], "startyear": "2019", "endyear": "2021"})
        );
        assert_eq!(reader.version(), ApiVersion::V1);
        assert_eq!(reader.limits(), Limits::V1);
    }

    #[test]
    fn v2_params_include_key() {
        let session = ScriptedSession::default();
        let reader = V2Reader::v2(request(), "secret", executor(&session)).unwrap();
        let params = serde_json::to_value(reader.params()).unwrap();
        assert_eq!(params["registrationkey"], "secret");
        assert!(params.get("catalog").is_none());
        assert!(params.get("calculations").is_none());
        assert!(params.get("annualaverage").is_none());
    }

    #[test]
    fn v2_catalog_flag_gates_all_enrichments() {
        let session = ScriptedSession::default();
        let reader = V2Reader::v2(request().catalog(true), "secret", executor(&session)).unwrap();
        let params = reader.params();
        assert_eq!(params.catalog, Some(true));
        assert_eq!(params.calculations, Some(true));
        assert_eq!(params.annualaverage, Some(true));

        // calculations alone is not sent
        let reader = V2Reader::v2(
            request().calculations(true).annual_average(true),
            "secret",
            executor(&session),
        )
        .unwrap();
        let params = reader.params();
        assert_eq!(params.calculations, None);
        assert_eq!(params.annualaverage, None);
    }

    #[test]
    fn v2_requires_non_empty_key() {
        let session = ScriptedSession::default();
        let err = V2Reader::v2(request(), "  ", executor(&session)).unwrap_err();
        assert!(matches!(err, BlsError::InvalidInput(_)));
    }

    #[test]
    fn v2_debug_hides_key() {
        let v2 = V2::new("secret").unwrap();
        assert!(!format!("{v2:?}").contains("secret"));
    }

    #[test]
    fn construction_rejects_too_many_series_for_version() {
        let session = ScriptedSession::default();
        let ids: Vec<String> = (0..30).map(|i| format!("S{i}")).collect();
        let err = V1Reader::v1(SeriesRequest::new(ids.clone()), executor(&session)).unwrap_err();
        assert!(matches!(err, BlsError::InvalidInput(_)));
        assert!(V2Reader::v2(SeriesRequest::new(ids), "k", executor(&session)).is_ok());
        assert_eq!(session.attempts(), 0);
    }

    #[test]
    fn construction_rejects_wide_year_range_for_v1_only() {
        let session = ScriptedSession::default();
        let wide = || SeriesRequest::new("A").start(2000).end(2015);
        assert!(V1Reader::v1(wide(), executor(&session)).is_err());
        assert!(V2Reader::v2(wide(), "k", executor(&session)).is_ok());
    }

    #[test]
    fn v1_not_processed_is_query_error() {
        let session = ScriptedSession::replying(json!({"status": "REQUEST_NOT_PROCESSED", "message": []}));
        let reader = V1Reader::v1(request(), executor(&session)).unwrap();
        assert!(matches!(reader.fetch(), Err(BlsError::Query(_))));
    }

    #[test]
    fn v2_not_processed_is_auth_error_with_key() {
        let session = ScriptedSession::replying(json!({"status": "REQUEST_NOT_PROCESSED", "message": []}));
        let reader = V2Reader::v2(request(), "bad-key", executor(&session)).unwrap();
        let err = reader.fetch().unwrap_err();
        assert!(matches!(err, BlsError::Auth { key } if key == "bad-key"));
    }

    #[test]
    fn fetch_reports_bad_series() {
        let session = ScriptedSession::replying(json!({
            "status": "REQUEST_SUCCEEDED",
            "message": ["Series does not exist for Series BADSERIES"]
        }));
        let reader = V1Reader::v1(SeriesRequest::new(vec!["MPU4900012", "BADSERIES"]), executor(&session)).unwrap();
        let err = reader.fetch().unwrap_err();
        assert!(matches!(err, BlsError::Series { series } if series == "BADSERIES"));
    }

    #[test]
    fn fetch_posts_params_and_returns_body() {
        let body = json!({"status": "REQUEST_SUCCEEDED", "message": [], "Results": {"series": []}});
        let session = ScriptedSession::replying(body.clone());
        let reader = V2Reader::v2(request(), "secret", executor(&session)).unwrap();
        assert_eq!(reader.fetch().unwrap(), body);

        let sent = session.requests.borrow();
        assert_eq!(sent.len(), 1);
        let posted: QueryParams = serde_json::from_str(&sent[0].body).unwrap();
        assert_eq!(posted, reader.params());
    }

    #[test]
    fn series_reader_dispatches() {
        let session = ScriptedSession::new(vec![Ok(HttpResponse::ok(
            json!({"status": "REQUEST_NOT_PROCESSED"}).to_string(),
        ))]);
        let reader = SeriesReader::V2(V2Reader::v2(request(), "k2", executor(&session)).unwrap());
        assert_eq!(reader.version(), ApiVersion::V2);
        assert_eq!(reader.query().series, vec!["CUUR0000SA0"]);
        assert!(matches!(reader.fetch(), Err(BlsError::Auth { .. })));
    }
}
