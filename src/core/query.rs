//! Query parameters, pagination and the persistence result object

use serde::{Deserialize, Serialize};

/// Default page size when a request asks for `limit=0`
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Sort direction on the primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Raw `page` / `limit` query parameters
///
/// Both are kept as strings so that a malformed value degrades to 0 instead
/// of rejecting the request.
///
/// # Example
/// ```text
/// GET /api/v1/note.page?page=2&limit=10
/// GET /api/v1/note.page?page=abc      -> page 0, then paged as page 1
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    /// Requested page, 0 when missing or unparsable
    pub fn page(&self) -> usize {
        parse_or_zero(self.page.as_deref())
    }

    /// Requested limit, 0 when missing or unparsable
    pub fn limit(&self) -> usize {
        parse_or_zero(self.limit.as_deref())
    }
}

fn parse_or_zero(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// A normalized page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (starts at 1)
    pub page: usize,

    /// Page size (never 0)
    pub limit: usize,
}

impl PageRequest {
    /// Normalize raw values: page below 1 becomes 1, limit 0 becomes `default_limit`
    pub fn new(page: usize, limit: usize, default_limit: usize) -> Self {
        let limit = if limit == 0 {
            default_limit.max(1)
        } else {
            limit
        };
        Self {
            page: page.max(1),
            limit,
        }
    }

    /// Records skipped before this page, saturating at `usize::MAX`
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Page of records plus navigation metadata
///
/// Returned unmodified by the `.page` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Paginator<T> {
    pub total_record: usize,
    pub total_page: usize,
    pub records: Vec<T>,
    pub offset: usize,
    pub limit: usize,
    pub page: usize,
    pub prev_page: usize,
    pub next_page: usize,
}

impl<T> Paginator<T> {
    pub fn new(request: PageRequest, total_record: usize, records: Vec<T>) -> Self {
        let PageRequest { page, limit } = request;
        let total_page = total_record.div_ceil(limit);

        Self {
            total_record,
            total_page,
            records,
            offset: request.offset(),
            limit,
            page,
            prev_page: if page > 1 { page - 1 } else { page },
            next_page: if page == total_page {
                page
            } else {
                page.saturating_add(1)
            },
        }
    }
}

/// The persistence result object
///
/// Save responds with it on success and on failure alike; the other
/// handlers fall back to it when the backend reports an error.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult<T> {
    pub value: Option<T>,
    pub error: Option<String>,
    pub rows_affected: u64,
}

impl<T> QueryResult<T> {
    pub fn ok(value: T, rows_affected: u64) -> Self {
        Self {
            value: Some(value),
            error: None,
            rows_affected,
        }
    }

    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            value: None,
            error: Some(error.to_string()),
            rows_affected: 0,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
