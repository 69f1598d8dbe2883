//! Paging parameters for the quarantine-building listing.

use crate::error::RequestError;

/// First id returned when the caller does not give `start`.
pub const DEFAULT_START: u64 = 1;

/// Page size used when the caller does not give `count`.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Largest page size served in a single request. Larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// A validated page request: rows with `id >= start`, optionally restricted
/// to one district, at most `limit` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingPage {
    pub start: u64,
    pub limit: u32,
    pub district: Option<String>,
}

impl Default for BuildingPage {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            limit: DEFAULT_PAGE_SIZE,
            district: None,
        }
    }
}

impl BuildingPage {
    /// Build a page from raw query-string values.
    ///
    /// Missing or empty values fall back to the defaults. `start` and `count`
    /// must be plain digit strings; `count` must be non-zero and is clamped to
    /// [`MAX_PAGE_SIZE`].
    pub fn from_params(
        start: Option<&str>,
        count: Option<&str>,
        district: Option<&str>,
    ) -> Result<Self, RequestError> {
        let start = match non_empty(start) {
            Some(raw) => parse_digits("start", raw)?,
            None => DEFAULT_START,
        };

        let limit = match non_empty(count) {
            Some(raw) => {
                let requested = parse_digits("count", raw)?;
                if requested == 0 {
                    return Err(RequestError::ZeroLimit { param: "count" });
                }
                requested.min(u64::from(MAX_PAGE_SIZE)) as u32
            }
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            start,
            limit,
            district: non_empty(district).map(str::to_string),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_digits(param: &'static str, raw: &str) -> Result<u64, RequestError> {
    let invalid = || RequestError::NotAnInteger {
        param,
        value: raw.to_string(),
    };
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse().map_err(|_| invalid())
}
