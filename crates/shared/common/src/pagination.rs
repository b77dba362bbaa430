//! Pagination query handling for list endpoints.
//!
//! List endpoints never reject pagination input: anything out of range or
//! unparsable silently falls back to the defaults.

use domain::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::Deserialize;

/// Raw `page` / `page_size` query parameters, kept as text so that bad
/// values can be replaced instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Normalized page request: `page >= 1`, `1 <= page_size <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Clamp raw query values into a usable page request.
    pub fn from_query(query: &PaginationQuery) -> Self {
        let page = query
            .page
            .as_deref()
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map_or(DEFAULT_PAGE_NUMBER, |p| p.unsigned_abs());

        let page_size = query
            .page_size
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|s| (1..=MAX_PAGE_SIZE as i64).contains(s))
            .map_or(DEFAULT_PAGE_SIZE, |s| s.unsigned_abs());

        Self { page, page_size }
    }
}
