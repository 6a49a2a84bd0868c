//! Cursor over an ordered, merged result list.

use std::sync::Arc;

use search_core::ResultCursor;
use search_types::{EngineError, Hit};
use tantivy::{Searcher, TantivyDocument};

use crate::error::TantivyEngineError;
use crate::index::OpenIndex;
use crate::order::Candidate;

/// Holds the searchers the query ran against, so hits are read from the
/// same point-in-time view that produced the ranking. Stored fields are
/// only loaded for hits actually returned.
pub struct TantivyCursor {
    indexes: Arc<Vec<OpenIndex>>,
    searchers: Vec<Searcher>,
    candidates: Vec<Candidate>,
    position: usize,
    /// Parsed term texts per index name
    terms: Vec<(String, Vec<String>)>,
}

impl TantivyCursor {
    pub(crate) fn new(
        indexes: Arc<Vec<OpenIndex>>,
        searchers: Vec<Searcher>,
        candidates: Vec<Candidate>,
        terms: Vec<(String, Vec<String>)>,
    ) -> Self {
        Self {
            indexes,
            searchers,
            candidates,
            position: 0,
            terms,
        }
    }

    fn load_hit(&self, candidate: &Candidate, position: u64) -> Result<Hit, TantivyEngineError> {
        let doc: TantivyDocument = self.searchers[candidate.ordinal].doc(candidate.address)?;
        let open = &self.indexes[candidate.ordinal];

        let mut hit = Hit::new(position, candidate.score, open.name());
        hit.fields.extend(open.catalog().stored_values(&doc));
        Ok(hit)
    }
}

impl ResultCursor for TantivyCursor {
    fn total_hits(&self) -> u64 {
        self.candidates.len() as u64
    }

    fn seek(&mut self, offset: u64) -> Result<(), EngineError> {
        let total = self.total_hits();
        if offset > total {
            return Err(TantivyEngineError::SeekOutOfRange { offset, total }.into());
        }
        self.position = offset as usize;
        Ok(())
    }

    fn next_hit(&mut self) -> Result<Option<Hit>, EngineError> {
        let Some(candidate) = self.candidates.get(self.position).copied() else {
            return Ok(None);
        };
        let hit = self.load_hit(&candidate, self.position as u64 + 1)?;
        self.position += 1;
        Ok(Some(hit))
    }

    fn parsed_terms(&self, index_name: &str) -> Vec<String> {
        self.terms
            .iter()
            .find(|(name, _)| name == index_name)
            .map(|(_, terms)| terms.clone())
            .unwrap_or_default()
    }
}
