//! # search-tantivy
//!
//! Tantivy implementation of the index engine contract.
//!
//! Opens one or more pre-built Tantivy index directories read-only and
//! serves ranked, range-limited, sortable searches across all of them.
//!
//! ## Features
//! - Multiple indexes merged into one ranked result list
//! - Inclusive range limits on text, numeric, bool and date fields
//! - Multi-key sort specs (`"year desc rank desc"`) over stored values
//! - Per-index rank scheme chosen from the index's commit payload

pub mod config;
pub mod context;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod index;
mod order;
pub mod ranking;
pub mod schema;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::TantivyConfig;
pub use engine::{IndexInfo, TantivyConnector, TantivyEngine};
pub use error::TantivyEngineError;
pub use index::OpenIndex;
pub use ranking::{RankScheme, IGNORE_WORD_COUNT_PROPERTY};
pub use schema::{BoundValue, FieldCatalog};
