//! Small on-disk indexes for unit tests.

use std::path::Path;

use tantivy::schema::{Schema, FAST, INDEXED, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexWriter};

use crate::ranking::IGNORE_WORD_COUNT_PROPERTY;

#[derive(Debug, Clone)]
pub struct FixtureDoc {
    pub title: String,
    pub body: String,
    pub category: String,
    pub year: u64,
}

/// `matching` documents mentioning "cat" followed by `other` that do not.
///
/// Matching document `i` (1-based) mentions "cat" `i` times in a body of
/// fixed length, so BM25 ranks later documents higher.
pub fn cat_corpus(matching: usize, other: usize) -> Vec<FixtureDoc> {
    let mut docs = Vec::with_capacity(matching + other);
    for i in 1..=matching {
        let cats = i.min(20);
        let mut words = vec!["cat"; cats];
        words.resize(20, "word");
        docs.push(FixtureDoc {
            title: format!("cat tale {:03}", i),
            body: words.join(" "),
            category: if i % 2 == 0 { "fiction" } else { "poetry" }.to_string(),
            year: 1990 + (i as u64 % 20),
        });
    }
    for i in 1..=other {
        docs.push(FixtureDoc {
            title: format!("dog tale {:03}", i),
            body: "the dog ran across the yard".to_string(),
            category: "fiction".to_string(),
            year: 2000,
        });
    }
    docs
}

pub fn fixture_schema() -> Schema {
    let mut builder = Schema::builder();
    builder.add_text_field("title", TEXT | STORED);
    builder.add_text_field("body", TEXT | STORED);
    builder.add_text_field("category", STRING | STORED);
    builder.add_u64_field("year", INDEXED | STORED | FAST);
    builder.build()
}

pub fn payload_ignoring_word_count() -> String {
    format!(r#"{{"{}": true}}"#, IGNORE_WORD_COUNT_PROPERTY)
}

/// Create an index in `path` holding `docs` in one commit.
pub fn build_index(path: &Path, docs: &[FixtureDoc], payload: Option<&str>) {
    std::fs::create_dir_all(path).unwrap();
    let index = Index::create_in_dir(path, fixture_schema()).unwrap();
    write_docs(&index, docs, payload);
}

/// Add `docs` to the index already in `path`.
pub fn append_docs(path: &Path, docs: &[FixtureDoc]) {
    let index = Index::open_in_dir(path).unwrap();
    write_docs(&index, docs, None);
}

fn write_docs(index: &Index, docs: &[FixtureDoc], payload: Option<&str>) {
    let schema = index.schema();
    let title = schema.get_field("title").unwrap();
    let body = schema.get_field("body").unwrap();
    let category = schema.get_field("category").unwrap();
    let year = schema.get_field("year").unwrap();

    let mut writer: IndexWriter = index.writer_with_num_threads(1, 50_000_000).unwrap();
    for d in docs {
        writer
            .add_document(doc!(
                title => d.title.as_str(),
                body => d.body.as_str(),
                category => d.category.as_str(),
                year => d.year,
            ))
            .unwrap();
    }
    let mut prepared = writer.prepare_commit().unwrap();
    if let Some(payload) = payload {
        prepared.set_payload(payload);
    }
    prepared.commit().unwrap();
    writer.wait_merging_threads().unwrap();
}
