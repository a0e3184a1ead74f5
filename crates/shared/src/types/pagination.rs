//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default number of rows per page.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Upper bound on rows per page.
pub const MAX_PER_PAGE: u32 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Creates a normalized page request.
    #[must_use]
    pub const fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }.normalized()
    }

    /// Clamps out-of-range values: page 0 becomes 1, per_page 0 becomes the
    /// default and anything above the maximum is capped.
    #[must_use]
    pub const fn normalized(self) -> Self {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = match self.per_page {
            0 => DEFAULT_PER_PAGE,
            n if n > MAX_PER_PAGE => MAX_PER_PAGE,
            n => n,
        };
        Self { page, per_page }
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages, `ceil(total / per_page)`.
    pub total_pages: u64,
}

impl PageMeta {
    /// Computes metadata for a page of `total` matching rows.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        let per_page = if request.per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            request.per_page
        };
        Self {
            page: request.page,
            per_page,
            total,
            total_pages: total.div_ceil(u64::from(per_page)),
        }
    }
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta::new(request, total),
        }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
