//! # search-types
//!
//! Shared types for index-search.
//!
//! This crate holds everything the search orchestrator and its hosts agree
//! on without touching an index engine:
//! - `SearchRequest` / `SearchResult` and the hit record type
//! - The sort specification parser (`"rank desc title asc"`)
//! - The sliding-window pager
//! - Error types for request validation, engine failures and connects
//! - Layered settings loading

pub mod config;
pub mod error;
pub mod pager;
pub mod request;
pub mod result;
pub mod sort;

pub use config::Settings;
pub use error::{ConfigError, ConnectError, EngineError, EngineErrorCode, SearchError};
pub use pager::Pager;
pub use request::{RangeLimit, ResolvedRequest, SearchDefaults, SearchRequest};
pub use result::{Hit, SearchResult};
pub use sort::{
    default_order, format_sort_spec, parse_sort_spec, resolve_order, SortDirection, SortKey,
    RANK_FIELD,
};
