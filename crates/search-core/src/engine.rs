//! Index engine contract.
//!
//! Every engine call returns a `Result`; there is no engine-wide
//! "last error" to poll. One [`SearchContext`] and one [`ResultCursor`]
//! belong to exactly one search and are never shared.

use std::sync::Arc;

use search_types::{ConnectError, EngineError, Hit};

/// A connection to one or more pre-built indexes.
///
/// Shared across concurrent searches; implementations must keep
/// per-context state isolated so no locking is needed around a search.
pub trait IndexEngine: Send + Sync {
    /// Start an independent search context.
    fn new_search_context(&self) -> Result<Box<dyn SearchContext>, EngineError>;

    /// Names of the connected indexes. The first one is the primary index.
    fn index_names(&self) -> Vec<String>;
}

/// Per-search state: filters, sort order, then execution.
pub trait SearchContext: Send {
    /// Restrict results to documents whose `field` lies in `[low, high]`.
    fn set_range_limit(&mut self, field: &str, low: &str, high: &str) -> Result<(), EngineError>;

    /// Record a sort spec. Interpretation (and its errors) happen at execute.
    fn set_sort(&mut self, spec: &str);

    /// Run the query, producing a cursor over ordered results.
    fn execute(&mut self, query: &str) -> Result<Box<dyn ResultCursor>, EngineError>;
}

/// Forward iterator over the ranked results of one executed search.
pub trait ResultCursor: Send {
    /// Matching documents across the whole result list.
    fn total_hits(&self) -> u64;

    /// Position the cursor so the next hit is the one at `offset` (0-based).
    fn seek(&mut self, offset: u64) -> Result<(), EngineError>;

    /// Next hit, or None once the results are exhausted.
    fn next_hit(&mut self) -> Result<Option<Hit>, EngineError>;

    /// Query terms as parsed against the named index.
    fn parsed_terms(&self, index_name: &str) -> Vec<String>;
}

/// Opens an engine; called at startup and on every reconnect.
pub trait Connector: Send + Sync {
    fn connect(&self) -> Result<Arc<dyn IndexEngine>, ConnectError>;
}
