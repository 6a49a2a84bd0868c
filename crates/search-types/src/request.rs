//! Search request and its normalized form.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Default number of hits per page.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Default width of the visible page-number window.
pub const DEFAULT_PAGES_PER_SET: u64 = 10;

/// Host-configured defaults applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDefaults {
    /// Page size used when the request leaves it unset (0 = unpaginated)
    pub page_size: u64,
    /// Pager window width used when the request leaves it unset
    pub pages_per_set: u64,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            pages_per_set: DEFAULT_PAGES_PER_SET,
        }
    }
}

/// Caller-supplied search options.
///
/// `page_size` distinguishes "unset" (`None`, use the configured default)
/// from an explicit `Some(0)`, which asks for every hit on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub pages_per_set: Option<u64>,
    pub order_by: Option<String>,
    pub limit_to: Option<String>,
    pub limit_low: Option<String>,
    pub limit_high: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_pages_per_set(mut self, pages_per_set: u64) -> Self {
        self.pages_per_set = Some(pages_per_set);
        self
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn with_range(
        mut self,
        field: impl Into<String>,
        low: impl Into<String>,
        high: impl Into<String>,
    ) -> Self {
        self.limit_to = Some(field.into());
        self.limit_low = Some(low.into());
        self.limit_high = Some(high.into());
        self
    }

    /// Validate and apply defaults.
    ///
    /// Pure: no engine is consulted, so every caller-input error surfaces
    /// here before a search context exists.
    pub fn normalize(&self, defaults: &SearchDefaults) -> Result<ResolvedRequest, SearchError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidRequest("query is required".into()));
        }

        let range = match self.limit_to.as_deref().map(str::trim) {
            Some(field) if !field.is_empty() => {
                match (self.limit_low.as_ref(), self.limit_high.as_ref()) {
                    (Some(low), Some(high)) => Some(RangeLimit {
                        field: field.to_string(),
                        low: low.clone(),
                        high: high.clone(),
                    }),
                    _ => {
                        return Err(SearchError::InvalidRequest(
                            "limit_high/limit_low required with limit_to".into(),
                        ))
                    }
                }
            }
            _ => None,
        };

        let order_by = self
            .order_by
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ResolvedRequest {
            query: query.to_string(),
            page: self.page.filter(|p| *p > 0).unwrap_or(1),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            pages_per_set: self
                .pages_per_set
                .filter(|p| *p > 0)
                .unwrap_or(defaults.pages_per_set)
                .max(1),
            order_by,
            range,
        })
    }
}

/// Range restriction on one index field, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLimit {
    pub field: String,
    pub low: String,
    pub high: String,
}

/// A validated request with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub query: String,
    pub page: u64,
    pub page_size: u64,
    pub pages_per_set: u64,
    pub order_by: Option<String>,
    pub range: Option<RangeLimit>,
}

impl ResolvedRequest {
    /// Whether results are split into pages.
    pub fn is_paginated(&self) -> bool {
        self.page_size > 0
    }

    /// Zero-based offset of the first hit on the requested page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}
