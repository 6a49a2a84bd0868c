//! Search result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pager::Pager;
use crate::sort::SortKey;

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// 1-based position in the full ordered result list
    pub position: u64,
    /// Relevance score reported by the engine
    pub score: f32,
    /// Name of the index the document came from
    pub index: String,
    /// Stored field values by field name
    pub fields: BTreeMap<String, String>,
}

impl Hit {
    pub fn new(position: u64, score: f32, index: impl Into<String>) -> Self {
        Self {
            position,
            score,
            index: index.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Stored value of a field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Everything a search returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Absent when the request asked for an unpaginated result
    pub pager: Option<Pager>,
    /// Hits on the requested page
    pub hits: Vec<Hit>,
    /// Query terms as the engine interpreted them (primary index)
    pub parsed_terms: Vec<String>,
    /// Effective ordering, never empty
    pub resolved_order: Vec<SortKey>,
    /// Matching documents across all pages
    pub total_hits: u64,
    /// Seconds spent until the engine finished executing the query
    pub search_duration: f64,
    /// Seconds spent until the page was assembled
    pub build_duration: f64,
}

impl SearchResult {
    pub fn is_paginated(&self) -> bool {
        self.pager.is_some()
    }

    /// Number of hits on this page.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
