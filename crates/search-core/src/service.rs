//! Host-facing search service.
//!
//! Bundles the shared index handle with the configured defaults. The
//! search itself is blocking (engine I/O), so async hosts go through
//! `search_async`, which runs it on the blocking pool.

use std::sync::Arc;
use std::time::Duration;

use search_types::{SearchDefaults, SearchError, SearchRequest, SearchResult};
use tracing::debug;

use crate::cancel::CancelFlag;
use crate::handle::IndexHandle;
use crate::orchestrator;

#[derive(Clone)]
pub struct SearchService {
    handle: Arc<IndexHandle>,
    defaults: SearchDefaults,
}

impl SearchService {
    pub fn new(handle: Arc<IndexHandle>, defaults: SearchDefaults) -> Self {
        Self { handle, defaults }
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        self.run(request, None)
    }

    /// Search that stops early (with `Cancelled`) once `cancel` is raised.
    pub fn search_cancellable(
        &self,
        request: &SearchRequest,
        cancel: &CancelFlag,
    ) -> Result<SearchResult, SearchError> {
        self.run(request, Some(cancel))
    }

    /// Run the search on the blocking pool, optionally bounded by `timeout`.
    ///
    /// When the deadline passes the search is cancelled and `Timeout` is
    /// returned; the blocking task stops at its next cancellation check.
    pub async fn search_async(
        &self,
        request: SearchRequest,
        timeout: Option<Duration>,
    ) -> Result<SearchResult, SearchError> {
        let cancel = CancelFlag::new();
        let service = self.clone();
        let task_cancel = cancel.clone();
        let task = tokio::task::spawn_blocking(move || {
            service.search_cancellable(&request, &task_cancel)
        });

        let joined = match timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    cancel.cancel();
                    debug!(?limit, "Search timed out");
                    return Err(SearchError::Timeout(limit));
                }
            },
            None => task.await,
        };

        joined.map_err(|e| SearchError::Internal(format!("Search task failed: {}", e)))?
    }

    /// Rebuild the index handle. Returns the new generation.
    pub fn reconnect(&self) -> Result<u64, SearchError> {
        self.handle.reconnect()
    }

    fn run(
        &self,
        request: &SearchRequest,
        cancel: Option<&CancelFlag>,
    ) -> Result<SearchResult, SearchError> {
        let resolved = request.normalize(&self.defaults)?;
        let engine = self.handle.current()?;

        let result = orchestrator::execute(engine.as_ref(), &resolved, cancel);
        match &result {
            Ok(r) => debug!(
                query = %resolved.query,
                page = resolved.page,
                hits = r.hits.len(),
                total_hits = r.total_hits,
                search_secs = r.search_duration,
                build_secs = r.build_duration,
                "Search complete"
            ),
            Err(e) => debug!(query = %resolved.query, error = %e, "Search failed"),
        }
        result
    }
}
