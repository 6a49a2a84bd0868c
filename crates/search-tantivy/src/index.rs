//! Opening pre-built indexes.
//!
//! Indexes are opened read-only. The reader never reloads on its own; a
//! reconnect opens the directories afresh and so sees new commits.

use std::path::Path;

use search_types::ConnectError;
use tantivy::query::{Query, QueryParser, QueryParserError};
use tantivy::{Index, IndexReader, ReloadPolicy, Searcher};
use tracing::{debug, info};

use crate::ranking::RankScheme;
use crate::schema::FieldCatalog;

/// One opened index with everything a search needs.
pub struct OpenIndex {
    name: String,
    index: Index,
    reader: IndexReader,
    catalog: FieldCatalog,
    rank_scheme: RankScheme,
}

impl OpenIndex {
    /// Open the index stored in `path`.
    pub fn open(path: &Path) -> Result<Self, ConnectError> {
        let name = path.display().to_string();
        if !path.join("meta.json").exists() {
            return Err(ConnectError::IndexNotFound(name));
        }

        let open_error = |message: String| ConnectError::Open {
            path: name.clone(),
            message,
        };

        let index = Index::open_in_dir(path).map_err(|e| open_error(e.to_string()))?;
        let catalog = FieldCatalog::from_schema(index.schema()).map_err(|message| {
            ConnectError::Schema {
                path: name.clone(),
                message,
            }
        })?;

        let metas = index.load_metas().map_err(|e| open_error(e.to_string()))?;
        let rank_scheme = RankScheme::from_payload(metas.payload.as_deref());

        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e: tantivy::TantivyError| open_error(e.to_string()))?;

        info!(
            path = ?path,
            docs = reader.searcher().num_docs(),
            rank_scheme = rank_scheme.as_str(),
            "Opened search index"
        );

        Ok(Self {
            name,
            index,
            reader,
            catalog,
            rank_scheme,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn rank_scheme(&self) -> RankScheme {
        self.rank_scheme
    }

    /// Point-in-time view of the index.
    pub fn searcher(&self) -> Searcher {
        self.reader.searcher()
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Parse query text against this index's text fields.
    pub fn parse_query(&self, text: &str) -> Result<Box<dyn Query>, QueryParserError> {
        let parser = QueryParser::for_index(&self.index, self.catalog.text_fields().to_vec());
        let query = parser.parse_query(text)?;
        debug!(index = %self.name, query = text, "Parsed query");
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{build_index, cat_corpus, payload_ignoring_word_count};
    use tempfile::TempDir;

    #[test]
    fn test_open_index() {
        let temp_dir = TempDir::new().unwrap();
        build_index(temp_dir.path(), &cat_corpus(5, 3), None);

        let index = OpenIndex::open(temp_dir.path()).unwrap();
        assert_eq!(index.num_docs(), 8);
        assert_eq!(index.rank_scheme(), RankScheme::Bm25);
        assert_eq!(index.name(), temp_dir.path().display().to_string());
        assert_eq!(index.catalog().text_fields().len(), 2);
    }

    #[test]
    fn test_missing_index() {
        let temp_dir = TempDir::new().unwrap();
        let err = OpenIndex::open(&temp_dir.path().join("nope")).err().unwrap();
        assert!(matches!(err, ConnectError::IndexNotFound(_)));
    }

    #[test]
    fn test_rank_scheme_from_payload() {
        let temp_dir = TempDir::new().unwrap();
        build_index(
            temp_dir.path(),
            &cat_corpus(2, 0),
            Some(&payload_ignoring_word_count()),
        );

        let index = OpenIndex::open(temp_dir.path()).unwrap();
        assert_eq!(index.rank_scheme(), RankScheme::TermPresence);
    }

    #[test]
    fn test_parse_query_error() {
        let temp_dir = TempDir::new().unwrap();
        build_index(temp_dir.path(), &cat_corpus(1, 0), None);
        let index = OpenIndex::open(temp_dir.path()).unwrap();

        assert!(index.parse_query("cat").is_ok());
        assert!(index.parse_query("colour:red").is_err());
    }
}
