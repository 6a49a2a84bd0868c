//! End-to-end test infrastructure for index-search.
//!
//! Provides a shared TestHarness that builds real Tantivy indexes in a
//! temp directory and wires them to a search service, so tests cover
//! the path from request validation to stored fields on disk.

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tantivy::schema::{Schema, FAST, INDEXED, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexWriter};

use search_core::{IndexHandle, SearchService};
use search_tantivy::{TantivyConfig, TantivyConnector, IGNORE_WORD_COUNT_PROPERTY};
use search_types::SearchDefaults;

/// A document in the test book collection.
#[derive(Debug, Clone)]
pub struct Book {
    pub title: String,
    pub body: String,
    pub category: String,
    pub year: u64,
}

impl Book {
    pub fn new(title: &str, body: &str, category: &str, year: u64) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            category: category.to_string(),
            year,
        }
    }
}

/// How an index is built.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Commit payload stored with the index
    pub payload: Option<String>,
    /// Shuffle documents with this seed before writing
    pub shuffle_seed: Option<u64>,
}

impl IndexOptions {
    /// Ask the engine to rank by term presence rather than BM25.
    pub fn ignoring_word_count() -> Self {
        Self {
            payload: Some(format!(r#"{{"{}": true}}"#, IGNORE_WORD_COUNT_PROPERTY)),
            shuffle_seed: None,
        }
    }
}

/// Shared test harness for E2E tests.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Directory holding every index the harness builds
    pub root: PathBuf,
}

impl TestHarness {
    /// Create a new test harness with an empty temp directory.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Path of the named index.
    pub fn index_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Build the named index from `books` in a single commit.
    pub fn build_index(&self, name: &str, books: &[Book], options: IndexOptions) -> PathBuf {
        let path = self.index_path(name);
        std::fs::create_dir_all(&path).expect("Failed to create index dir");
        let index = Index::create_in_dir(&path, book_schema()).expect("Failed to create index");

        let mut books = books.to_vec();
        if let Some(seed) = options.shuffle_seed {
            books.shuffle(&mut StdRng::seed_from_u64(seed));
        }
        write_books(&index, &books, options.payload.as_deref());
        path
    }

    /// Add `books` to an existing index as a new commit.
    pub fn append_books(&self, name: &str, books: &[Book]) {
        let index = Index::open_in_dir(self.index_path(name)).expect("Failed to open index");
        write_books(&index, books, None);
    }

    /// Connector over the named indexes, in order.
    pub fn connector(&self, names: &[&str]) -> Arc<TantivyConnector> {
        let config = names
            .iter()
            .fold(TantivyConfig::default(), |config, name| {
                config.with_index(self.index_path(name))
            });
        Arc::new(TantivyConnector::new(config))
    }

    /// Search service over the named indexes with default page settings.
    pub fn service(&self, names: &[&str]) -> SearchService {
        self.service_with(names, SearchDefaults::default())
    }

    pub fn service_with(&self, names: &[&str], defaults: SearchDefaults) -> SearchService {
        let handle =
            IndexHandle::connect(self.connector(names)).expect("Failed to connect indexes");
        SearchService::new(Arc::new(handle), defaults)
    }

    /// Index name as reported in hits (the path string).
    pub fn index_name(&self, name: &str) -> String {
        self.index_path(name).display().to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Schema of the test book collection.
pub fn book_schema() -> Schema {
    let mut builder = Schema::builder();
    builder.add_text_field("title", TEXT | STORED);
    builder.add_text_field("body", TEXT | STORED);
    builder.add_text_field("category", STRING | STORED);
    builder.add_u64_field("year", INDEXED | STORED | FAST);
    builder.build()
}

/// `matching` books mentioning "cat", then `other` books that do not.
///
/// Matching book `i` (1-based) repeats "cat" `min(i, 20)` times in a
/// 20-word body, so relevance rises with `i`. Years cycle through
/// 1990..=2009 and categories alternate poetry/fiction.
pub fn cat_books(matching: usize, other: usize) -> Vec<Book> {
    let mut books = Vec::with_capacity(matching + other);
    for i in 1..=matching {
        let mut words = vec!["cat"; i.min(20)];
        words.resize(20, "word");
        books.push(Book {
            title: format!("cat tale {:03}", i),
            body: words.join(" "),
            category: if i % 2 == 0 { "fiction" } else { "poetry" }.to_string(),
            year: 1990 + (i as u64 % 20),
        });
    }
    for i in 1..=other {
        books.push(Book {
            title: format!("dog tale {:03}", i),
            body: "the dog ran across the yard".to_string(),
            category: "fiction".to_string(),
            year: 2000,
        });
    }
    books
}

fn write_books(index: &Index, books: &[Book], payload: Option<&str>) {
    let schema = index.schema();
    let title = schema.get_field("title").expect("title field");
    let body = schema.get_field("body").expect("body field");
    let category = schema.get_field("category").expect("category field");
    let year = schema.get_field("year").expect("year field");

    let mut writer: IndexWriter = index
        .writer_with_num_threads(1, 50_000_000)
        .expect("Failed to create writer");
    for book in books {
        writer
            .add_document(doc!(
                title => book.title.as_str(),
                body => book.body.as_str(),
                category => book.category.as_str(),
                year => book.year,
            ))
            .expect("Failed to add document");
    }

    let mut prepared = writer.prepare_commit().expect("Failed to prepare commit");
    if let Some(payload) = payload {
        prepared.set_payload(payload);
    }
    prepared.commit().expect("Failed to commit");
    writer
        .wait_merging_threads()
        .expect("Failed to wait for merges");
}
