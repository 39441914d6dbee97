//! Page windows and pagination metadata shared by Pawstay API envelopes.
//!
//! List endpoints accept `page` and `limit` query parameters and answer with
//! a `pagination` block alongside the data array. [`PageRequest`] parses and
//! clamps the query side; [`Pagination`] is the wire shape of the block.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Page number used when a query omits `page`.
pub const DEFAULT_PAGE: u64 = 1;
/// Page size used when a query omits `limit`.
pub const DEFAULT_LIMIT: u64 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u64 = 100;

/// Errors raised when constructing a page request from explicit values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page numbers are one-based.
    #[error("page must be at least 1, got {page}")]
    PageOutOfRange {
        /// Rejected page number.
        page: u64,
    },
    /// Page size must lie within `1..=MAX_LIMIT`.
    #[error("limit must be between 1 and {max}, got {limit}")]
    LimitOutOfRange {
        /// Rejected page size.
        limit: u64,
        /// Upper bound for page sizes.
        max: u64,
    },
}

/// A one-based page number and page size.
///
/// # Examples
///
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::from_query(Some("page=2&limit=5"));
/// assert_eq!(request.page(), 2);
/// assert_eq!(request.window(12), 5..10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a page request, rejecting out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` is zero or `limit` falls
    /// outside `1..=MAX_LIMIT`.
    pub const fn new(page: u64, limit: u64) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange { page });
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange {
                limit,
                max: MAX_LIMIT,
            });
        }
        Ok(Self { page, limit })
    }

    /// Parse `page` and `limit` from a raw query string.
    ///
    /// Missing or unparseable values fall back to the defaults; a zero page
    /// becomes page 1 and the limit is clamped into `1..=MAX_LIMIT`.
    #[must_use]
    pub fn from_query(query: Option<&str>) -> Self {
        let mut request = Self::default();
        let Some(raw) = query else {
            return request;
        };
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let parsed = value.trim().parse::<u64>().ok();
            match (key.as_ref(), parsed) {
                ("page", Some(page)) => request.page = page.max(1),
                ("limit", Some(limit)) => request.limit = limit.clamp(1, MAX_LIMIT),
                _ => {}
            }
        }
        request
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Zero-based index of the first item on this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Item index range covered by this page given `total_items`.
    ///
    /// Pages past the end yield an empty range anchored at `total_items`.
    #[must_use]
    pub fn window(&self, total_items: u64) -> Range<u64> {
        let start = self.offset().min(total_items);
        let end = start.saturating_add(self.limit).min(total_items);
        start..end
    }

    /// Pagination metadata for this page over `total_items`.
    #[must_use]
    pub const fn paginate(&self, total_items: u64) -> Pagination {
        Pagination {
            current_page: self.page,
            page_size: self.limit,
            total_items,
            total_pages: total_items.div_ceil(self.limit),
        }
    }
}

/// Pagination block attached to list envelopes.
///
/// # Examples
///
/// ```
/// use pagination::PageRequest;
///
/// let meta = PageRequest::default().paginate(15);
/// assert_eq!(meta.total_pages, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// One-based page number.
    pub current_page: u64,
    /// Requested page size.
    pub page_size: u64,
    /// Number of items across all pages.
    pub total_items: u64,
    /// Number of pages needed for `total_items`.
    pub total_pages: u64,
}

impl Pagination {
    /// Whether a page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for query parsing and window arithmetic.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::missing(None, 1, 10)]
    #[case::explicit(Some("page=3&limit=20"), 3, 20)]
    #[case::zero_page(Some("page=0"), 1, 10)]
    #[case::oversized_limit(Some("limit=5000"), 1, MAX_LIMIT)]
    #[case::garbage(Some("page=abc&limit=-1"), 1, 10)]
    #[case::unrelated_keys(Some("status=active&page=2"), 2, 10)]
    fn parses_query_with_defaults(
        #[case] query: Option<&str>,
        #[case] page: u64,
        #[case] limit: u64,
    ) {
        let request = PageRequest::from_query(query);
        assert_eq!(request.page(), page);
        assert_eq!(request.limit(), limit);
    }

    #[rstest]
    #[case(1, 10, 15, 0..10)]
    #[case(2, 10, 15, 10..15)]
    #[case(3, 10, 15, 15..15)]
    #[case(1, 10, 0, 0..0)]
    fn windows_are_clamped_to_total(
        #[case] page: u64,
        #[case] limit: u64,
        #[case] total: u64,
        #[case] expected: Range<u64>,
    ) {
        let request = PageRequest::new(page, limit).expect("valid request");
        assert_eq!(request.window(total), expected);
    }

    #[test]
    fn paginate_rounds_total_pages_up() {
        let meta = PageRequest::default().paginate(15);
        assert_eq!(meta.total_items, 15);
        assert_eq!(meta.total_pages, 2);
        assert!(meta.has_next());
    }

    #[test]
    fn rejects_zero_page_and_limit() {
        assert_eq!(
            PageRequest::new(0, 10),
            Err(PageRequestError::PageOutOfRange { page: 0 })
        );
        assert!(matches!(
            PageRequest::new(1, 0),
            Err(PageRequestError::LimitOutOfRange { .. })
        ));
    }

    #[test]
    fn serialises_in_camel_case() {
        let meta = PageRequest::default().paginate(42);
        let value = serde_json::to_value(meta).expect("serialise pagination");
        assert_eq!(value["totalItems"], 42);
        assert_eq!(value["currentPage"], 1);
        assert_eq!(value["pageSize"], 10);
        assert_eq!(value["totalPages"], 5);
    }
}
