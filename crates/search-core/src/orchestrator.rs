//! The search operation.
//!
//! Normalizes the request, drives the engine through context / range
//! limit / sort / execute, slices the requested page out of the cursor,
//! builds pager metadata and reports timings. Any engine error aborts the
//! whole search; no partial result is ever returned.

use std::time::Instant;

use search_types::{
    resolve_order, Hit, Pager, ResolvedRequest, SearchDefaults, SearchError, SearchRequest,
    SearchResult,
};

use crate::cancel::CancelFlag;
use crate::engine::{IndexEngine, ResultCursor};

/// Validate `request`, apply `defaults`, and run it against `engine`.
///
/// Input errors (empty query, range field without both bounds) are
/// returned before the engine is touched.
pub fn search(
    engine: &dyn IndexEngine,
    defaults: &SearchDefaults,
    request: &SearchRequest,
    cancel: Option<&CancelFlag>,
) -> Result<SearchResult, SearchError> {
    let resolved = request.normalize(defaults)?;
    execute(engine, &resolved, cancel)
}

/// Run an already normalized request.
pub fn execute(
    engine: &dyn IndexEngine,
    request: &ResolvedRequest,
    cancel: Option<&CancelFlag>,
) -> Result<SearchResult, SearchError> {
    let started = Instant::now();

    check_cancelled(cancel)?;
    let mut context = engine.new_search_context()?;

    if let Some(range) = &request.range {
        context.set_range_limit(&range.field, &range.low, &range.high)?;
    }

    if let Some(order_by) = &request.order_by {
        context.set_sort(order_by);
    }

    check_cancelled(cancel)?;
    let mut cursor = context.execute(&request.query)?;
    let search_duration = started.elapsed().as_secs_f64();

    let total_hits = cursor.total_hits();
    let hits = collect_page(cursor.as_mut(), request, total_hits, cancel)?;
    let pager = Pager::new(
        total_hits,
        request.page_size,
        request.page,
        request.pages_per_set,
    );

    let build_duration = started.elapsed().as_secs_f64();

    let resolved_order = resolve_order(request.order_by.as_deref());
    let parsed_terms = engine
        .index_names()
        .first()
        .map(|primary| cursor.parsed_terms(primary))
        .unwrap_or_default();

    Ok(SearchResult {
        pager,
        hits,
        parsed_terms,
        resolved_order,
        total_hits,
        search_duration,
        build_duration,
    })
}

/// Pull the requested page from the cursor.
///
/// With a page size of 0 every hit is collected. Otherwise the cursor is
/// moved to the page offset (unless that offset is already past the last
/// hit, which yields an empty page) and at most `page_size` hits are read.
fn collect_page(
    cursor: &mut dyn ResultCursor,
    request: &ResolvedRequest,
    total_hits: u64,
    cancel: Option<&CancelFlag>,
) -> Result<Vec<Hit>, SearchError> {
    let mut hits = Vec::new();

    let limit = if request.is_paginated() {
        let offset = request.offset();
        if offset >= total_hits {
            return Ok(hits);
        }
        cursor.seek(offset)?;
        let remaining = total_hits - offset;
        hits.reserve(request.page_size.min(remaining) as usize);
        Some(request.page_size)
    } else {
        hits.reserve(total_hits as usize);
        None
    };

    loop {
        if limit.is_some_and(|cap| hits.len() as u64 >= cap) {
            break;
        }
        check_cancelled(cancel)?;
        match cursor.next_hit()? {
            Some(hit) => hits.push(hit),
            None => break,
        }
    }

    Ok(hits)
}

fn check_cancelled(cancel: Option<&CancelFlag>) -> Result<(), SearchError> {
    match cancel {
        Some(flag) if flag.is_cancelled() => Err(SearchError::Cancelled),
        _ => Ok(()),
    }
}
