//! Shared, reconnectable index handle.
//!
//! Searches clone the current engine `Arc` under a short read lock and run
//! without holding any lock. `reconnect` takes the write lock only while it
//! drops the old engine and opens a new one, so no search ever sees a
//! half-built engine; searches already running keep their `Arc` to the old
//! engine and finish against it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use search_types::{ConnectError, SearchError};
use tracing::{info, warn};

use crate::engine::{Connector, IndexEngine};

pub struct IndexHandle {
    connector: Arc<dyn Connector>,
    engine: RwLock<Option<Arc<dyn IndexEngine>>>,
    generation: AtomicU64,
}

impl IndexHandle {
    /// Connect once at startup.
    pub fn connect(connector: Arc<dyn Connector>) -> Result<Self, ConnectError> {
        let engine = connector.connect()?;
        info!(indexes = ?engine.index_names(), "Connected index handle");

        Ok(Self {
            connector,
            engine: RwLock::new(Some(engine)),
            generation: AtomicU64::new(1),
        })
    }

    /// The engine searches should run against.
    pub fn current(&self) -> Result<Arc<dyn IndexEngine>, SearchError> {
        let guard = self
            .engine
            .read()
            .map_err(|e| SearchError::Internal(format!("index handle lock poisoned: {}", e)))?;
        guard.clone().ok_or(SearchError::NotConnected)
    }

    /// Whether an engine is available.
    pub fn is_connected(&self) -> bool {
        self.engine.read().map(|g| g.is_some()).unwrap_or(false)
    }

    /// Number of successful connects so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Tear down the current engine and open a fresh one.
    ///
    /// On failure the handle stays disconnected until a later reconnect
    /// succeeds. Returns the new generation.
    pub fn reconnect(&self) -> Result<u64, SearchError> {
        let mut guard = self
            .engine
            .write()
            .map_err(|e| SearchError::Internal(format!("index handle lock poisoned: {}", e)))?;

        *guard = None;

        match self.connector.connect() {
            Ok(engine) => {
                let indexes = engine.index_names();
                *guard = Some(engine);
                let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                info!(generation, ?indexes, "Reconnected index handle");
                Ok(generation)
            }
            Err(e) => {
                warn!(error = %e, "Reconnect failed, index handle unavailable");
                Err(e.into())
            }
        }
    }
}
