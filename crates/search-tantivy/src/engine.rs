//! Engine over a fixed set of opened indexes.

use std::sync::Arc;

use search_core::{Connector, IndexEngine, SearchContext};
use search_types::{ConnectError, EngineError};
use serde::Serialize;
use tracing::info;

use crate::config::TantivyConfig;
use crate::context::TantivyContext;
use crate::index::OpenIndex;

/// Summary of one connected index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexInfo {
    pub name: String,
    pub num_docs: u64,
    pub rank_scheme: String,
    pub fields: Vec<String>,
}

/// All configured indexes, opened together.
///
/// Cheap to share: contexts hold an `Arc` to the index list, so a search
/// keeps its indexes alive even after a reconnect replaces the engine.
pub struct TantivyEngine {
    indexes: Arc<Vec<OpenIndex>>,
}

impl TantivyEngine {
    /// Open every index in `config`. Any failure fails the whole connect.
    pub fn open(config: &TantivyConfig) -> Result<Self, ConnectError> {
        if config.index_paths.is_empty() {
            return Err(ConnectError::NoIndexes);
        }

        let indexes = config
            .index_paths
            .iter()
            .map(|path| OpenIndex::open(path))
            .collect::<Result<Vec<_>, _>>()?;

        info!(count = indexes.len(), "Opened indexes");
        Ok(Self {
            indexes: Arc::new(indexes),
        })
    }

    pub fn info(&self) -> Vec<IndexInfo> {
        self.indexes
            .iter()
            .map(|open| IndexInfo {
                name: open.name().to_string(),
                num_docs: open.num_docs(),
                rank_scheme: open.rank_scheme().as_str().to_string(),
                fields: open
                    .catalog()
                    .schema()
                    .fields()
                    .map(|(_, entry)| entry.name().to_string())
                    .collect(),
            })
            .collect()
    }
}

impl IndexEngine for TantivyEngine {
    fn new_search_context(&self) -> Result<Box<dyn SearchContext>, EngineError> {
        Ok(Box::new(TantivyContext::new(self.indexes.clone())))
    }

    fn index_names(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|open| open.name().to_string())
            .collect()
    }
}

/// Opens a [`TantivyEngine`] from a fixed configuration.
#[derive(Debug, Clone)]
pub struct TantivyConnector {
    config: TantivyConfig,
}

impl TantivyConnector {
    pub fn new(config: TantivyConfig) -> Self {
        Self { config }
    }
}

impl Connector for TantivyConnector {
    fn connect(&self) -> Result<Arc<dyn IndexEngine>, ConnectError> {
        let engine = TantivyEngine::open(&self.config)?;
        Ok(Arc::new(engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        append_docs, build_index, cat_corpus, payload_ignoring_word_count, FixtureDoc,
    };
    use search_core::{IndexHandle, ResultCursor};
    use search_types::EngineErrorCode;
    use tempfile::TempDir;

    fn open_one(docs: &[FixtureDoc]) -> (TempDir, TantivyEngine) {
        let temp_dir = TempDir::new().unwrap();
        build_index(temp_dir.path(), docs, None);
        let engine = TantivyEngine::open(&TantivyConfig::default().with_index(temp_dir.path()))
            .unwrap();
        (temp_dir, engine)
    }

    fn execute(engine: &TantivyEngine, query: &str) -> Box<dyn ResultCursor> {
        engine.new_search_context().unwrap().execute(query).unwrap()
    }

    fn drain(cursor: &mut Box<dyn ResultCursor>) -> Vec<search_types::Hit> {
        let mut hits = Vec::new();
        while let Some(hit) = cursor.next_hit().unwrap() {
            hits.push(hit);
        }
        hits
    }

    #[test]
    fn test_open_requires_indexes() {
        let err = TantivyEngine::open(&TantivyConfig::default()).err().unwrap();
        assert!(matches!(err, ConnectError::NoIndexes));
    }

    #[test]
    fn test_open_fails_if_any_index_missing() {
        let temp_dir = TempDir::new().unwrap();
        build_index(&temp_dir.path().join("a"), &cat_corpus(1, 0), None);
        let config = TantivyConfig::default()
            .with_index(temp_dir.path().join("a"))
            .with_index(temp_dir.path().join("b"));

        let err = TantivyEngine::open(&config).err().unwrap();
        assert!(matches!(err, ConnectError::IndexNotFound(_)));
    }

    #[test]
    fn test_execute_counts_and_orders_by_score() {
        let (_dir, engine) = open_one(&cat_corpus(12, 5));
        let mut cursor = execute(&engine, "cat");
        assert_eq!(cursor.total_hits(), 12);

        let hits = drain(&mut cursor);
        assert_eq!(hits.len(), 12);
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
        // More mentions rank higher.
        assert_eq!(hits[0].field("title"), Some("cat tale 012"));
        assert_eq!(hits[0].position, 1);
        assert_eq!(hits[11].position, 12);
        assert_eq!(hits[0].field("year"), Some("2002"));
        assert_eq!(hits[0].field("category"), Some("fiction"));
    }

    #[test]
    fn test_zero_matches() {
        let (_dir, engine) = open_one(&cat_corpus(3, 3));
        let mut cursor = execute(&engine, "giraffe");
        assert_eq!(cursor.total_hits(), 0);
        assert!(cursor.next_hit().unwrap().is_none());
    }

    #[test]
    fn test_seek() {
        let (_dir, engine) = open_one(&cat_corpus(25, 0));
        let mut cursor = execute(&engine, "cat");

        cursor.seek(20).unwrap();
        let hits = drain(&mut cursor);
        assert_eq!(hits.len(), 5);
        assert_eq!(hits[0].position, 21);

        cursor.seek(25).unwrap();
        assert!(cursor.next_hit().unwrap().is_none());

        let err = cursor.seek(26).unwrap_err();
        assert_eq!(err.code, EngineErrorCode::SeekOutOfRange);
    }

    #[test]
    fn test_query_parse_error() {
        let (_dir, engine) = open_one(&cat_corpus(3, 0));
        let err = engine
            .new_search_context()
            .unwrap()
            .execute("colour:red")
            .err()
            .unwrap();
        assert_eq!(err.code, EngineErrorCode::QueryParse);
    }

    #[test]
    fn test_parsed_terms() {
        let (dir, engine) = open_one(&cat_corpus(3, 0));
        let cursor = execute(&engine, "Cat OR dog");
        let name = dir.path().display().to_string();

        assert_eq!(cursor.parsed_terms(&name), vec!["cat".to_string(), "dog".to_string()]);
        assert!(cursor.parsed_terms("other").is_empty());
    }

    #[test]
    fn test_range_limit_numeric() {
        let (_dir, engine) = open_one(&cat_corpus(25, 5));
        let mut context = engine.new_search_context().unwrap();
        context.set_range_limit("year", "1995", "1999").unwrap();
        let mut cursor = context.execute("cat").unwrap();

        let hits = drain(&mut cursor);
        assert_eq!(cursor.total_hits(), hits.len() as u64);
        assert!(!hits.is_empty());
        for hit in &hits {
            let year: u64 = hit.field("year").unwrap().parse().unwrap();
            assert!((1995..=1999).contains(&year), "year {year}");
        }
    }

    #[test]
    fn test_range_limit_text() {
        let (_dir, engine) = open_one(&cat_corpus(10, 0));
        let mut context = engine.new_search_context().unwrap();
        context.set_range_limit("category", "fiction", "fiction").unwrap();
        let mut cursor = context.execute("cat").unwrap();

        assert_eq!(cursor.total_hits(), 5);
        assert!(drain(&mut cursor)
            .iter()
            .all(|hit| hit.field("category") == Some("fiction")));
    }

    #[test]
    fn test_range_limit_errors() {
        let (_dir, engine) = open_one(&cat_corpus(3, 0));
        let mut context = engine.new_search_context().unwrap();

        let err = context.set_range_limit("colour", "a", "b").unwrap_err();
        assert_eq!(err.code, EngineErrorCode::UnknownField);

        let err = context.set_range_limit("year", "recent", "2000").unwrap_err();
        assert_eq!(err.code, EngineErrorCode::InvalidRange);

        let err = context.set_range_limit("year", "2000", "1990").unwrap_err();
        assert_eq!(err.code, EngineErrorCode::InvalidRange);
    }

    #[test]
    fn test_sort_by_stored_field() {
        let (_dir, engine) = open_one(&cat_corpus(25, 0));
        let mut context = engine.new_search_context().unwrap();
        context.set_sort("year asc rank desc");
        let mut cursor = context.execute("cat").unwrap();

        let hits = drain(&mut cursor);
        let years: Vec<u64> = hits
            .iter()
            .map(|hit| hit.field("year").unwrap().parse().unwrap())
            .collect();
        let mut sorted = years.clone();
        sorted.sort();
        assert_eq!(years, sorted);

        // Within a year, higher scores come first.
        for pair in hits.windows(2) {
            if pair[0].field("year") == pair[1].field("year") {
                assert!(pair[0].score >= pair[1].score);
            }
        }
    }

    #[test]
    fn test_sort_by_text_descending() {
        let (_dir, engine) = open_one(&cat_corpus(4, 0));
        let mut context = engine.new_search_context().unwrap();
        context.set_sort("title desc");
        let mut cursor = context.execute("cat").unwrap();

        let titles: Vec<String> = drain(&mut cursor)
            .iter()
            .map(|hit| hit.field("title").unwrap().to_string())
            .collect();
        assert_eq!(
            titles,
            vec!["cat tale 004", "cat tale 003", "cat tale 002", "cat tale 001"]
        );
    }

    #[test]
    fn test_sort_unknown_field() {
        let (_dir, engine) = open_one(&cat_corpus(3, 0));
        let mut context = engine.new_search_context().unwrap();
        context.set_sort("colour asc");
        let err = context.execute("cat").err().unwrap();
        assert_eq!(err.code, EngineErrorCode::UnknownField);
    }

    #[test]
    fn test_multiple_indexes_merge() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        build_index(&first, &cat_corpus(3, 2), None);
        build_index(&second, &cat_corpus(4, 0), None);

        let engine =
            TantivyEngine::open(&TantivyConfig::default().with_index(&first).with_index(&second))
                .unwrap();
        assert_eq!(
            engine.index_names(),
            vec![first.display().to_string(), second.display().to_string()]
        );

        let mut cursor = execute(&engine, "cat");
        assert_eq!(cursor.total_hits(), 7);
        let hits = drain(&mut cursor);
        assert_eq!(
            hits.iter().filter(|hit| hit.index == second.display().to_string()).count(),
            4
        );
        let positions: Vec<u64> = hits.iter().map(|hit| hit.position).collect();
        assert_eq!(positions, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_range_on_field_missing_from_one_index() {
        let temp_dir = TempDir::new().unwrap();
        let books = temp_dir.path().join("books");
        let notes = temp_dir.path().join("notes");
        build_index(&books, &cat_corpus(5, 0), None);

        // Second index without a year field.
        std::fs::create_dir_all(&notes).unwrap();
        let mut builder = tantivy::schema::Schema::builder();
        let text = builder.add_text_field("text", tantivy::schema::TEXT | tantivy::schema::STORED);
        let index = tantivy::Index::create_in_dir(&notes, builder.build()).unwrap();
        let mut writer: tantivy::IndexWriter = index.writer_with_num_threads(1, 50_000_000).unwrap();
        writer.add_document(tantivy::doc!(text => "a cat note")).unwrap();
        writer.commit().unwrap();

        let engine =
            TantivyEngine::open(&TantivyConfig::default().with_index(&books).with_index(&notes))
                .unwrap();

        assert_eq!(execute(&engine, "cat").total_hits(), 6);

        let mut context = engine.new_search_context().unwrap();
        context.set_range_limit("year", "1990", "2010").unwrap();
        let mut cursor = context.execute("cat").unwrap();
        assert_eq!(cursor.total_hits(), 5);
        assert!(drain(&mut cursor)
            .iter()
            .all(|hit| hit.index == books.display().to_string()));
    }

    #[test]
    fn test_term_presence_ignores_frequency() {
        let temp_dir = TempDir::new().unwrap();
        let docs = vec![
            FixtureDoc {
                title: "one".into(),
                body: "cat cat cat cat cat cat".into(),
                category: "a".into(),
                year: 2001,
            },
            FixtureDoc {
                title: "two".into(),
                body: "cat and dog".into(),
                category: "a".into(),
                year: 2002,
            },
        ];
        build_index(temp_dir.path(), &docs, Some(&payload_ignoring_word_count()));
        let engine = TantivyEngine::open(&TantivyConfig::default().with_index(temp_dir.path()))
            .unwrap();
        assert_eq!(engine.info()[0].rank_scheme, "term_presence");

        let mut cursor = execute(&engine, "cat dog");
        let hits = drain(&mut cursor);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].field("title"), Some("two"));
        assert_eq!(hits[0].score, 2.0);
        assert_eq!(hits[1].score, 1.0);
    }

    #[test]
    fn test_bm25_rewards_frequency() {
        let (_dir, engine) = open_one(&[
            FixtureDoc {
                title: "one".into(),
                body: "cat cat cat cat cat cat".into(),
                category: "a".into(),
                year: 2001,
            },
            FixtureDoc {
                title: "two".into(),
                body: "cat and a very long sentence about other things entirely".into(),
                category: "a".into(),
                year: 2002,
            },
        ]);
        let hits = drain(&mut execute(&engine, "cat"));
        assert_eq!(hits[0].field("title"), Some("one"));
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_info() {
        let (dir, engine) = open_one(&cat_corpus(4, 2));
        let info = engine.info();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].name, dir.path().display().to_string());
        assert_eq!(info[0].num_docs, 6);
        assert_eq!(info[0].rank_scheme, "bm25");
        assert_eq!(info[0].fields, vec!["title", "body", "category", "year"]);
    }

    #[test]
    fn test_reconnect_sees_new_documents() {
        let temp_dir = TempDir::new().unwrap();
        build_index(temp_dir.path(), &cat_corpus(3, 0), None);
        let connector = Arc::new(TantivyConnector::new(
            TantivyConfig::default().with_index(temp_dir.path()),
        ));
        let handle = IndexHandle::connect(connector).unwrap();

        let count = |handle: &IndexHandle| {
            handle
                .current()
                .unwrap()
                .new_search_context()
                .unwrap()
                .execute("cat")
                .unwrap()
                .total_hits()
        };
        assert_eq!(count(&handle), 3);

        append_docs(temp_dir.path(), &cat_corpus(2, 0));
        // The open engine keeps its point-in-time view.
        assert_eq!(count(&handle), 3);

        handle.reconnect().unwrap();
        assert_eq!(count(&handle), 5);
    }
}
