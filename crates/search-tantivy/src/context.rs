//! Per-search context: range limit, sort spec and execution.

use std::ops::Bound;
use std::sync::Arc;

use search_core::{ResultCursor, SearchContext};
use search_types::{parse_sort_spec, EngineError, SortKey};
use tantivy::collector::{Count, TopDocs};
use tantivy::query::{BooleanQuery, ConstScoreQuery, Occur, Query, RangeQuery};
use tantivy::Term;
use tracing::debug;

use crate::cursor::TantivyCursor;
use crate::error::TantivyEngineError;
use crate::index::OpenIndex;
use crate::order::{order_candidates, Candidate};
use crate::ranking::{query_terms, term_texts};
use crate::schema::BoundValue;

/// Inclusive range limit resolved against every index.
#[derive(Debug, Clone)]
struct RangeFilter {
    field: String,
    /// Bounds per index, None where the index lacks the field
    bounds: Vec<Option<(Term, Term)>>,
}

pub struct TantivyContext {
    indexes: Arc<Vec<OpenIndex>>,
    range: Option<RangeFilter>,
    sort: Option<String>,
}

impl TantivyContext {
    pub(crate) fn new(indexes: Arc<Vec<OpenIndex>>) -> Self {
        Self {
            indexes,
            range: None,
            sort: None,
        }
    }

    fn resolve_range(
        &self,
        field: &str,
        low: &str,
        high: &str,
    ) -> Result<RangeFilter, TantivyEngineError> {
        let mut bounds = Vec::with_capacity(self.indexes.len());
        let mut known = false;

        for open in self.indexes.iter() {
            let Some((handle, entry)) = open.catalog().field(field) else {
                bounds.push(None);
                continue;
            };
            known = true;

            if !entry.is_indexed() && !entry.is_fast() {
                return Err(TantivyEngineError::invalid_range(
                    field,
                    "field is neither indexed nor fast",
                ));
            }
            let low_value = BoundValue::parse(entry, low)
                .map_err(|message| TantivyEngineError::invalid_range(field, message))?;
            let high_value = BoundValue::parse(entry, high)
                .map_err(|message| TantivyEngineError::invalid_range(field, message))?;
            if low_value > high_value {
                return Err(TantivyEngineError::invalid_range(
                    field,
                    format!("low bound '{}' is above high bound '{}'", low, high),
                ));
            }

            bounds.push(Some((low_value.to_term(handle), high_value.to_term(handle))));
        }

        if !known {
            return Err(TantivyEngineError::UnknownField(field.to_string()));
        }
        Ok(RangeFilter {
            field: field.to_string(),
            bounds,
        })
    }

    /// Parse the recorded sort spec and check every field can be sorted on.
    fn sort_keys(&self) -> Result<Vec<SortKey>, TantivyEngineError> {
        let Some(spec) = &self.sort else {
            return Ok(Vec::new());
        };
        let keys = parse_sort_spec(spec);

        for key in keys.iter().filter(|key| !key.is_rank()) {
            let entries: Vec<_> = self
                .indexes
                .iter()
                .filter_map(|open| open.catalog().field(&key.field))
                .collect();
            if entries.is_empty() {
                return Err(TantivyEngineError::UnknownField(key.field.clone()));
            }
            if !entries.iter().any(|(_, entry)| entry.is_stored()) {
                return Err(TantivyEngineError::InvalidSort {
                    field: key.field.clone(),
                    message: "field is not stored".to_string(),
                });
            }
        }
        Ok(keys)
    }

    /// Final query for one index, or None when the range limit excludes
    /// the whole index.
    fn index_query(&self, ordinal: usize, scored: Box<dyn Query>) -> Option<Box<dyn Query>> {
        let Some(filter) = &self.range else {
            return Some(scored);
        };
        let (low, high) = filter.bounds.get(ordinal)?.as_ref()?;

        let range = RangeQuery::new(Bound::Included(low.clone()), Bound::Included(high.clone()));
        Some(Box::new(BooleanQuery::new(vec![
            (Occur::Must, scored),
            (
                Occur::Must,
                Box::new(ConstScoreQuery::new(Box::new(range), 0.0)),
            ),
        ])))
    }

    fn run(&self, text: &str) -> Result<TantivyCursor, TantivyEngineError> {
        let keys = self.sort_keys()?;

        let mut searchers = Vec::with_capacity(self.indexes.len());
        let mut terms = Vec::with_capacity(self.indexes.len());
        let mut candidates = Vec::new();

        for (ordinal, open) in self.indexes.iter().enumerate() {
            let searcher = open.searcher();
            let parsed = open.parse_query(text)?;
            let parsed_terms = query_terms(parsed.as_ref());
            terms.push((open.name().to_string(), term_texts(&parsed_terms)));

            let scored = open.rank_scheme().scoring_query(parsed, &parsed_terms);
            if let Some(query) = self.index_query(ordinal, scored) {
                // TopDocs rejects a zero limit, so count first.
                let count = searcher.search(&query, &Count)?;
                if count > 0 {
                    let top_docs = searcher.search(&query, &TopDocs::with_limit(count))?;
                    candidates.extend(top_docs.into_iter().map(|(score, address)| Candidate {
                        ordinal,
                        score,
                        address,
                    }));
                }
                debug!(index = %open.name(), count, "Index searched");
            }
            searchers.push(searcher);
        }

        order_candidates(&mut candidates, &keys, &self.indexes, &searchers)?;
        debug!(
            query = text,
            hits = candidates.len(),
            range = ?self.range.as_ref().map(|r| r.field.as_str()),
            sort = ?self.sort,
            "Search executed"
        );

        Ok(TantivyCursor::new(
            self.indexes.clone(),
            searchers,
            candidates,
            terms,
        ))
    }
}

impl SearchContext for TantivyContext {
    fn set_range_limit(&mut self, field: &str, low: &str, high: &str) -> Result<(), EngineError> {
        self.range = Some(self.resolve_range(field, low, high)?);
        Ok(())
    }

    fn set_sort(&mut self, spec: &str) {
        self.sort = Some(spec.to_string());
    }

    fn execute(&mut self, query: &str) -> Result<Box<dyn ResultCursor>, EngineError> {
        Ok(Box::new(self.run(query)?))
    }
}
