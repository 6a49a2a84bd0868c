//! Mock index engine for testing.
//!
//! Holds documents in memory and implements the full engine contract:
//! word matching on field values, inclusive range limits, multi-key sort
//! specs and seekable cursors. Failures can be injected at every protocol
//! step, and call counters show which steps actually ran.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use search_types::{
    parse_sort_spec, ConnectError, EngineError, EngineErrorCode, Hit, SortDirection, SortKey,
};

use crate::engine::{Connector, IndexEngine, ResultCursor, SearchContext};

/// A document with a fixed relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct MockDocument {
    pub score: f32,
    pub fields: BTreeMap<String, String>,
}

impl MockDocument {
    pub fn new(score: f32) -> Self {
        Self {
            score,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    fn matches(&self, terms: &[String]) -> bool {
        self.fields.values().any(|value| {
            value
                .split_whitespace()
                .any(|word| terms.iter().any(|t| word.eq_ignore_ascii_case(t)))
        })
    }
}

/// Steps at which the mock reports an engine error.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockFailures {
    pub context: bool,
    pub range_limit: bool,
    pub execute: bool,
    pub iterate: bool,
}

/// Counters of engine calls made against a mock.
#[derive(Debug, Default)]
pub struct MockCalls {
    contexts: AtomicUsize,
    range_limits: AtomicUsize,
    sorts: AtomicUsize,
    executes: AtomicUsize,
    seeks: AtomicUsize,
    hits_read: AtomicUsize,
}

impl MockCalls {
    pub fn contexts(&self) -> usize {
        self.contexts.load(AtomicOrdering::SeqCst)
    }

    pub fn range_limits(&self) -> usize {
        self.range_limits.load(AtomicOrdering::SeqCst)
    }

    pub fn sorts(&self) -> usize {
        self.sorts.load(AtomicOrdering::SeqCst)
    }

    pub fn executes(&self) -> usize {
        self.executes.load(AtomicOrdering::SeqCst)
    }

    pub fn seeks(&self) -> usize {
        self.seeks.load(AtomicOrdering::SeqCst)
    }

    pub fn hits_read(&self) -> usize {
        self.hits_read.load(AtomicOrdering::SeqCst)
    }

    /// Total calls of any kind.
    pub fn total(&self) -> usize {
        self.contexts()
            + self.range_limits()
            + self.sorts()
            + self.executes()
            + self.seeks()
            + self.hits_read()
    }

    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, AtomicOrdering::SeqCst);
    }
}

/// In-memory engine with a single index.
#[derive(Debug, Clone)]
pub struct MockEngine {
    name: String,
    documents: Arc<Vec<MockDocument>>,
    failures: MockFailures,
    hit_delay: Option<Duration>,
    calls: Arc<MockCalls>,
}

impl MockEngine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Arc::new(Vec::new()),
            failures: MockFailures::default(),
            hit_delay: None,
            calls: Arc::new(MockCalls::default()),
        }
    }

    /// `count` documents containing `term`, scored in descending order,
    /// each with `title` (`doc-001`...) and `year` fields.
    pub fn with_matching(name: impl Into<String>, term: &str, count: usize) -> Self {
        let documents = (0..count)
            .map(|i| {
                MockDocument::new((count - i) as f32)
                    .with_field("title", format!("doc-{:03}", i + 1))
                    .with_field("text", format!("{} number {}", term, i + 1))
                    .with_field("year", (1990 + i % 20).to_string())
            })
            .collect();
        Self::new(name).with_documents(documents)
    }

    pub fn with_documents(mut self, documents: Vec<MockDocument>) -> Self {
        self.documents = Arc::new(documents);
        self
    }

    pub fn with_failures(mut self, failures: MockFailures) -> Self {
        self.failures = failures;
        self
    }

    /// Sleep this long before returning each hit (simulates slow I/O).
    pub fn with_hit_delay(mut self, delay: Duration) -> Self {
        self.hit_delay = Some(delay);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn calls(&self) -> Arc<MockCalls> {
        self.calls.clone()
    }
}

impl IndexEngine for MockEngine {
    fn new_search_context(&self) -> Result<Box<dyn SearchContext>, EngineError> {
        MockCalls::bump(&self.calls.contexts);
        if self.failures.context {
            return Err(EngineError::new(
                EngineErrorCode::Index,
                "mock context failure",
            ));
        }
        Ok(Box::new(MockContext {
            engine: self.clone(),
            range: None,
            sort: None,
        }))
    }

    fn index_names(&self) -> Vec<String> {
        vec![self.name.clone()]
    }
}

struct MockContext {
    engine: MockEngine,
    range: Option<(String, String, String)>,
    sort: Option<String>,
}

impl SearchContext for MockContext {
    fn set_range_limit(&mut self, field: &str, low: &str, high: &str) -> Result<(), EngineError> {
        MockCalls::bump(&self.engine.calls.range_limits);
        if self.engine.failures.range_limit {
            return Err(EngineError::new(
                EngineErrorCode::InvalidRange,
                "mock range failure",
            ));
        }
        self.range = Some((field.to_string(), low.to_string(), high.to_string()));
        Ok(())
    }

    fn set_sort(&mut self, spec: &str) {
        MockCalls::bump(&self.engine.calls.sorts);
        self.sort = Some(spec.to_string());
    }

    fn execute(&mut self, query: &str) -> Result<Box<dyn ResultCursor>, EngineError> {
        MockCalls::bump(&self.engine.calls.executes);
        if self.engine.failures.execute {
            return Err(EngineError::new(
                EngineErrorCode::QueryParse,
                "mock execute failure",
            ));
        }

        let terms: Vec<String> = query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();

        let mut matched: Vec<&MockDocument> = self
            .engine
            .documents
            .iter()
            .filter(|doc| doc.matches(&terms))
            .filter(|doc| match &self.range {
                Some((field, low, high)) => doc.fields.get(field).is_some_and(|v| {
                    compare_values(v, low) != Ordering::Less
                        && compare_values(v, high) != Ordering::Greater
                }),
                None => true,
            })
            .collect();

        matched.sort_by(|a, b| b.score.total_cmp(&a.score));
        if let Some(spec) = &self.sort {
            let keys = parse_sort_spec(spec);
            matched.sort_by(|a, b| compare_by_keys(a, b, &keys));
        }

        Ok(Box::new(MockCursor {
            index: self.engine.name.clone(),
            hits: matched.into_iter().cloned().collect(),
            position: 0,
            terms,
            fail_iteration: self.engine.failures.iterate,
            hit_delay: self.engine.hit_delay,
            calls: self.engine.calls.clone(),
        }))
    }
}

fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

fn compare_by_keys(a: &MockDocument, b: &MockDocument, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ordering = if key.is_rank() {
            a.score.total_cmp(&b.score)
        } else {
            match (a.fields.get(&key.field), b.fields.get(&key.field)) {
                (Some(x), Some(y)) => compare_values(x, y),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        };
        let ordering = match key.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

struct MockCursor {
    index: String,
    hits: Vec<MockDocument>,
    position: usize,
    terms: Vec<String>,
    fail_iteration: bool,
    hit_delay: Option<Duration>,
    calls: Arc<MockCalls>,
}

impl ResultCursor for MockCursor {
    fn total_hits(&self) -> u64 {
        self.hits.len() as u64
    }

    fn seek(&mut self, offset: u64) -> Result<(), EngineError> {
        MockCalls::bump(&self.calls.seeks);
        if offset > self.hits.len() as u64 {
            return Err(EngineError::new(
                EngineErrorCode::SeekOutOfRange,
                format!("seek to {} past {} hits", offset, self.hits.len()),
            ));
        }
        self.position = offset as usize;
        Ok(())
    }

    fn next_hit(&mut self) -> Result<Option<Hit>, EngineError> {
        if self.fail_iteration {
            return Err(EngineError::new(
                EngineErrorCode::Index,
                "mock iteration failure",
            ));
        }
        let Some(doc) = self.hits.get(self.position) else {
            return Ok(None);
        };
        if let Some(delay) = self.hit_delay {
            std::thread::sleep(delay);
        }
        MockCalls::bump(&self.calls.hits_read);
        self.position += 1;

        Ok(Some(Hit {
            position: self.position as u64,
            score: doc.score,
            index: self.index.clone(),
            fields: doc.fields.clone(),
        }))
    }

    fn parsed_terms(&self, index_name: &str) -> Vec<String> {
        if index_name == self.index {
            self.terms.clone()
        } else {
            Vec::new()
        }
    }
}

/// Connector handing out a configurable mock engine.
#[derive(Debug)]
pub struct MockConnector {
    engine: Mutex<MockEngine>,
    fail: Mutex<bool>,
    connects: AtomicUsize,
}

impl MockConnector {
    pub fn new(engine: MockEngine) -> Self {
        Self {
            engine: Mutex::new(engine),
            fail: Mutex::new(false),
            connects: AtomicUsize::new(0),
        }
    }

    /// Engine returned by subsequent connects.
    pub fn replace_engine(&self, engine: MockEngine) {
        if let Ok(mut current) = self.engine.lock() {
            *current = engine;
        }
    }

    /// Make subsequent connects fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut fail) = self.fail.lock() {
            *fail = failing;
        }
    }

    /// Number of connect attempts so far.
    pub fn connects(&self) -> usize {
        self.connects.load(AtomicOrdering::SeqCst)
    }
}

impl Connector for MockConnector {
    fn connect(&self) -> Result<Arc<dyn IndexEngine>, ConnectError> {
        self.connects.fetch_add(1, AtomicOrdering::SeqCst);

        let failing = self.fail.lock().map(|f| *f).unwrap_or(true);
        if failing {
            return Err(ConnectError::IndexNotFound("mock://unavailable".into()));
        }

        let engine = self.engine.lock().map_err(|e| ConnectError::Open {
            path: "mock".into(),
            message: e.to_string(),
        })?;
        Ok(Arc::new(engine.clone()))
    }
}
