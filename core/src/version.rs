//! API versions and their per-query limits.

use std::fmt;

/// Per-version ceilings on a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub series_per_query: usize,
    pub years_per_query: i32,
}

impl Limits {
    pub const V1: Limits = Limits {
        series_per_query: 25,
        years_per_query: 10,
    };

    pub const V2: Limits = Limits {
        series_per_query: 50,
        years_per_query: 20,
    };
}

/// Public API version. v1 is keyless; v2 requires a registration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    pub const fn limits(self) -> Limits {
        match self {
            ApiVersion::V1 => Limits::V1,
            ApiVersion::V2 => Limits::V2,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::V1 => write!(f, "1.0"),
            ApiVersion::V2 => write!(f, "2.0"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v2_limits_are_wider_than_v1() {
        assert_eq!(ApiVersion::V1.limits(), Limits { series_per_query: 25, years_per_query: 10 });
        assert_eq!(ApiVersion::V2.limits(), Limits { series_per_query: 50, years_per_query: 20 });
        assert!(ApiVersion::V2 > ApiVersion::V1);
    }

    #[test]
    fn displays_as_decimal_version() {
        assert_eq!(ApiVersion::V1.to_string(), "1.0");
        assert_eq!(ApiVersion::V2.to_string(), "2.0");
    }
}
