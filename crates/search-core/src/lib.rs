//! # search-core
//!
//! Search execution and pagination over a pre-built full-text index.
//!
//! The index engine itself is reached only through the traits in
//! [`engine`]; this crate decides how a request is normalized, how the
//! engine is driven (context, range limit, sort, execute, iterate), how the
//! page slice is taken and how the search is timed.
//!
//! ## Components
//! - [`orchestrator`]: the `search` operation
//! - [`handle`]: shared, reconnectable engine handle
//! - [`service`]: sync and async entry points for hosts
//! - [`mock`]: deterministic in-memory engine for tests

pub mod cancel;
pub mod engine;
pub mod handle;
pub mod mock;
pub mod orchestrator;
pub mod service;

pub use cancel::CancelFlag;
pub use engine::{Connector, IndexEngine, ResultCursor, SearchContext};
pub use handle::IndexHandle;
pub use mock::{MockCalls, MockConnector, MockDocument, MockEngine, MockFailures};
pub use orchestrator::{execute, search};
pub use service::SearchService;

pub use search_types::{
    EngineError, EngineErrorCode, Hit, Pager, SearchDefaults, SearchError, SearchRequest,
    SearchResult, SortDirection, SortKey,
};
