//! Pagination types for list endpoints
//!
//! The list endpoint is page/limit based; storage works in limit/offset.

use serde::Deserialize;

use crate::config::PaginationConfig;

/// Pagination parameters (from query string)
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (1-indexed)
    pub page: Option<i64>,
    /// Items per page
    pub limit: Option<i64>,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Apply defaults and bounds
    ///
    /// A page below 1 is read as the first page; the limit is clamped to
    /// `1..=max_limit`.
    pub fn resolve(&self, config: &PaginationConfig) -> Pagination {
        let max_limit = config.max_limit.max(1);
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(config.default_limit)
            .clamp(1, max_limit);

        Pagination {
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }
}

/// Storage-level window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = PageRequest::default().resolve(&PaginationConfig::default());
        assert_eq!(p, Pagination::new(20, 0));
    }

    #[test]
    fn test_page_offset() {
        let p = PageRequest::new(3, 10).resolve(&PaginationConfig::default());
        assert_eq!(p.limit, 10);
        assert_eq!(p.offset, 20);
    }

    #[test]
    fn test_bounds() {
        let config = PaginationConfig::default();

        let p = PageRequest::new(0, 0).resolve(&config);
        assert_eq!(p, Pagination::new(1, 0));

        let p = PageRequest::new(-4, 10_000).resolve(&config);
        assert_eq!(p, Pagination::new(config.max_limit, 0));

        let p = PageRequest::new(i64::MAX, 50).resolve(&config);
        assert_eq!(p.offset, i64::MAX);
    }
}
