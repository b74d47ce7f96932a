//! Keyset pagination over ascending ids.
//!
//! A page is fetched by asking storage for `limit + 1` rows with
//! `id > cursor`. The extra row only signals that another page exists and is
//! never returned.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

/// Rows that can be paged by their numeric id.
pub trait Identified {
    fn id(&self) -> i64;
}

/// Requested page: at most `limit` rows with `id > cursor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PageRequest {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "cursor must not be negative"))]
    pub cursor: i64,
}

impl PageRequest {
    pub fn new(limit: i64, cursor: i64) -> Self {
        Self { limit, cursor }
    }

    /// Number of rows to ask storage for.
    pub fn fetch_size(&self) -> i64 {
        self.limit + 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT, 0)
    }
}

/// One page of results.
///
/// `cursor` is the id of the last returned row when `has_next` is set, and
/// `0` once the listing is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
    pub cursor: i64,
}

impl<T: Identified> Page<T> {
    /// Build a page from the rows returned for `request.fetch_size()`.
    pub fn from_fetched(mut rows: Vec<T>, request: &PageRequest) -> Self {
        let limit = usize::try_from(request.limit).unwrap_or(0);
        if rows.len() > limit {
            rows.truncate(limit);
            let cursor = rows.last().map(Identified::id).unwrap_or(0);
            return Self {
                items: rows,
                has_next: true,
                cursor,
            };
        }
        Self {
            items: rows,
            has_next: false,
            cursor: 0,
        }
    }
}
