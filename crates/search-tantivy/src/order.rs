//! Ordering of merged candidates.
//!
//! Tantivy can sort a single collector by one fast field. Sort specs here
//! may name several keys across several indexes, so candidates are
//! gathered first and ordered in memory.

use std::cmp::Ordering;

use search_types::{SortDirection, SortKey};
use tantivy::schema::{Field, Value};
use tantivy::{DocAddress, Searcher, TantivyDocument};

use crate::error::TantivyEngineError;
use crate::index::OpenIndex;

/// One matching document before ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    /// Position of the index in connect order
    pub ordinal: usize,
    pub score: f32,
    pub address: DocAddress,
}

/// A stored value reduced to something comparable.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SortValue {
    Number(f64),
    Text(String),
    Missing,
}

impl SortValue {
    fn from_value<'a, V: Value<'a>>(value: V) -> Self {
        if let Some(n) = value.as_u64() {
            SortValue::Number(n as f64)
        } else if let Some(n) = value.as_i64() {
            SortValue::Number(n as f64)
        } else if let Some(n) = value.as_f64() {
            SortValue::Number(n)
        } else if let Some(dt) = value.as_datetime() {
            SortValue::Number(dt.into_timestamp_secs() as f64)
        } else if let Some(b) = value.as_bool() {
            SortValue::Number(if b { 1.0 } else { 0.0 })
        } else if let Some(s) = value.as_str() {
            SortValue::Text(s.to_lowercase())
        } else {
            SortValue::Missing
        }
    }

    /// Compare in `direction`; missing values go last either way.
    pub(crate) fn compare(&self, other: &Self, direction: SortDirection) -> Ordering {
        let ordering = match (self, other) {
            (SortValue::Missing, SortValue::Missing) => return Ordering::Equal,
            (SortValue::Missing, _) => return Ordering::Greater,
            (_, SortValue::Missing) => return Ordering::Less,
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Relevance order: score descending, then index order, then document order.
fn by_relevance(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.ordinal.cmp(&b.ordinal))
        .then(a.address.cmp(&b.address))
}

/// Put `candidates` in final result order.
///
/// With no keys this is relevance order. Otherwise candidates are stably
/// sorted by the keys in turn, relevance order breaking remaining ties.
pub(crate) fn order_candidates(
    candidates: &mut Vec<Candidate>,
    keys: &[SortKey],
    indexes: &[OpenIndex],
    searchers: &[Searcher],
) -> Result<(), TantivyEngineError> {
    candidates.sort_by(by_relevance);
    if keys.is_empty() {
        return Ok(());
    }

    // Per key, the field handle in each index (None where absent).
    let fields: Vec<Vec<Option<Field>>> = keys
        .iter()
        .map(|key| {
            indexes
                .iter()
                .map(|open| {
                    if key.is_rank() {
                        None
                    } else {
                        open.catalog().field(&key.field).map(|(field, _)| field)
                    }
                })
                .collect()
        })
        .collect();

    let needs_docs = keys.iter().any(|key| !key.is_rank());
    let mut rows: Vec<(Candidate, Vec<SortValue>)> = Vec::with_capacity(candidates.len());
    for candidate in candidates.iter() {
        let doc: Option<TantivyDocument> = if needs_docs {
            Some(searchers[candidate.ordinal].doc(candidate.address)?)
        } else {
            None
        };

        let values = keys
            .iter()
            .zip(&fields)
            .map(|(key, per_index)| {
                if key.is_rank() {
                    return SortValue::Number(candidate.score as f64);
                }
                match (&doc, per_index[candidate.ordinal]) {
                    (Some(doc), Some(field)) => doc
                        .get_first(field)
                        .map(SortValue::from_value)
                        .unwrap_or(SortValue::Missing),
                    _ => SortValue::Missing,
                }
            })
            .collect();
        rows.push((*candidate, values));
    }

    rows.sort_by(|(_, a), (_, b)| {
        for ((key, x), y) in keys.iter().zip(a).zip(b) {
            let ordering = x.compare(y, key.direction);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });

    *candidates = rows.into_iter().map(|(candidate, _)| candidate).collect();
    Ok(())
}
