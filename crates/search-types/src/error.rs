//! Error types for index-search.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of an index engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineErrorCode {
    /// Underlying file or directory access failed
    Io,
    /// The engine's index structures reported an error
    Index,
    /// The query text could not be parsed
    QueryParse,
    /// A range or sort field does not exist in any index
    UnknownField,
    /// Range bounds could not be interpreted for the field type
    InvalidRange,
    /// The sort specification could not be applied
    InvalidSort,
    /// A cursor seek went past the end of the result list
    SeekOutOfRange,
    /// Anything else
    Other,
}

impl EngineErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineErrorCode::Io => "io",
            EngineErrorCode::Index => "index",
            EngineErrorCode::QueryParse => "query_parse",
            EngineErrorCode::UnknownField => "unknown_field",
            EngineErrorCode::InvalidRange => "invalid_range",
            EngineErrorCode::InvalidSort => "invalid_sort",
            EngineErrorCode::SeekOutOfRange => "seek_out_of_range",
            EngineErrorCode::Other => "other",
        }
    }
}

impl fmt::Display for EngineErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported by the index engine during a search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code})")]
pub struct EngineError {
    pub code: EngineErrorCode,
    pub message: String,
}

impl EngineError {
    pub fn new(code: EngineErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Errors raised while opening (or reopening) the indexes.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// No index paths configured
    #[error("No index paths configured")]
    NoIndexes,

    /// Index directory missing or not an index
    #[error("Index not found at path: {0}")]
    IndexNotFound(String),

    /// Index exists but could not be opened
    #[error("Failed to open index {path}: {message}")]
    Open { path: String, message: String },

    /// Index schema unusable for searching
    #[error("Schema error in index {path}: {message}")]
    Schema { path: String, message: String },
}

/// Configuration loading / validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sources could not be read or deserialized
    #[error("Configuration error: {0}")]
    Load(String),

    /// Values were read but are not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors returned by a search or reconnect.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Caller input rejected before the engine was touched
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The index engine failed; no partial result is returned
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Opening the indexes failed
    #[error("Connect error: {0}")]
    Connect(#[from] ConnectError),

    /// The index handle lost its engine after a failed reconnect
    #[error("Index handle is not connected")]
    NotConnected,

    /// The caller cancelled the search
    #[error("Search cancelled")]
    Cancelled,

    /// The caller's deadline passed
    #[error("Search timed out after {0:?}")]
    Timeout(Duration),

    /// Lock poisoning, task join failures
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// True when the error stems from caller input rather than the engine.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, SearchError::InvalidRequest(_))
    }

    /// Engine error code, if this is an engine failure.
    pub fn engine_code(&self) -> Option<EngineErrorCode> {
        match self {
            SearchError::Engine(e) => Some(e.code),
            _ => None,
        }
    }
}
