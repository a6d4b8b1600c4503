//! Blocking client for the BLS public timeseries API.
//!
//! # Overview
//! Builds a query from series IDs and a year range, validates it against the
//! limits of the chosen API version, posts it with bounded retries and
//! classifies the JSON reply. The parsed body is returned unchanged on
//! success.
//!
//! # Design
//! - v1 is keyless (25 series / 10 years per query); v2 needs a registration
//!   key (50 series / 20 years) and supports catalog enrichments.
//! - Validation happens when a reader is built; `fetch` only does I/O and
//!   response classification.
//! - The network sits behind `HttpSession`. `UreqSession` is the default.
//! - `get_series` picks the version: v2 when `Config` carries a key, v1
//!   otherwise.
//!
//! ```no_run
//! use bls_core::{get_series, Config, SeriesRequest, UreqSession};
//!
//! let config = Config::from_env();
//! let request = SeriesRequest::new(vec!["CUUR0000SA0", "LNS14000000"]).start(2020).end(2023);
//! let reader = get_series(request, &config, UreqSession::new())?;
//! let body = reader.fetch()?;
//! println!("{}", body["status"]);
//! # Ok::<(), bls_core::BlsError>(())
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod query;
pub mod reader;
pub mod session;
pub mod types;
pub mod version;

#[cfg(test)]
mod test_support;

use tracing::info;

pub use config::{Config, SeriesRequest, API_KEY_ENV, DEFAULT_BASE_URL};
pub use error::{BlsError, SessionError};
pub use executor::{validate_response, QueryExecutor, RetryPolicy};
pub use http::{HttpRequest, HttpResponse, HttpSession};
pub use query::{sanitize_dates, sanitize_dates_at, validate_series, Query, SeriesInput, Year};
pub use reader::{ApiVariant, Reader, SeriesReader, V1Reader, V2Reader, V1, V2};
pub use session::UreqSession;
pub use types::{QueryParams, ResponseStatus};
pub use version::{ApiVersion, Limits};

/// Build a reader for `request`, choosing v2 when `config` has an API key.
pub fn get_series<S: HttpSession>(
    request: SeriesRequest,
    config: &Config,
    session: S,
) -> Result<SeriesReader<S>, BlsError> {
    let executor = QueryExecutor::new(session, config.base_url.clone(), config.retry);
    match &config.api_key {
        Some(key) => {
            info!(version = %ApiVersion::V2, "using registered API");
            Ok(SeriesReader::V2(V2Reader::v2(request, key.clone(), executor)?))
        }
        None => {
            info!(version = %ApiVersion::V1, "no API key configured, using keyless API");
            Ok(SeriesReader::V1(V1Reader::v1(request, executor)?))
        }
    }
}

/// `get_series` with configuration from the environment and a fresh `UreqSession`.
pub fn get_series_default(request: SeriesRequest) -> Result<SeriesReader<UreqSession>, BlsError> {
    get_series(request, &Config::from_env(), UreqSession::new())
}
