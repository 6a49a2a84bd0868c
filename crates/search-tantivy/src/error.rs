//! Engine error types.

use search_types::{EngineError, EngineErrorCode};
use tantivy::TantivyError;
use thiserror::Error;

/// Errors raised inside the Tantivy engine while serving a search.
///
/// Converted to the engine-neutral [`EngineError`] at the contract boundary.
#[derive(Debug, Error)]
pub enum TantivyEngineError {
    /// Tantivy index error
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] TantivyError),

    /// Query parse error
    #[error("Query parse error: {0}")]
    QueryParse(#[from] tantivy::query::QueryParserError),

    /// Field missing from every connected index
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Range bounds unusable for the field
    #[error("Invalid range on {field}: {message}")]
    InvalidRange { field: String, message: String },

    /// Field exists but cannot be sorted on
    #[error("Cannot sort on {field}: {message}")]
    InvalidSort { field: String, message: String },

    /// Cursor seek past the result list
    #[error("Seek to {offset} past {total} hits")]
    SeekOutOfRange { offset: u64, total: u64 },
}

impl TantivyEngineError {
    pub fn code(&self) -> EngineErrorCode {
        match self {
            TantivyEngineError::Tantivy(TantivyError::IoError(_)) => EngineErrorCode::Io,
            TantivyEngineError::Tantivy(TantivyError::FieldNotFound(_)) => {
                EngineErrorCode::UnknownField
            }
            TantivyEngineError::Tantivy(_) => EngineErrorCode::Index,
            TantivyEngineError::QueryParse(_) => EngineErrorCode::QueryParse,
            TantivyEngineError::UnknownField(_) => EngineErrorCode::UnknownField,
            TantivyEngineError::InvalidRange { .. } => EngineErrorCode::InvalidRange,
            TantivyEngineError::InvalidSort { .. } => EngineErrorCode::InvalidSort,
            TantivyEngineError::SeekOutOfRange { .. } => EngineErrorCode::SeekOutOfRange,
        }
    }

    pub(crate) fn invalid_range(field: &str, message: impl Into<String>) -> Self {
        TantivyEngineError::InvalidRange {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<TantivyEngineError> for EngineError {
    fn from(err: TantivyEngineError) -> Self {
        EngineError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let err = TantivyEngineError::UnknownField("colour".into());
        assert_eq!(err.code(), EngineErrorCode::UnknownField);

        let err = TantivyEngineError::invalid_range("year", "low above high");
        let engine: EngineError = err.into();
        assert_eq!(engine.code, EngineErrorCode::InvalidRange);
        assert!(engine.message.contains("year"));

        let err = TantivyEngineError::SeekOutOfRange { offset: 30, total: 25 };
        assert_eq!(err.code(), EngineErrorCode::SeekOutOfRange);
    }

    #[test]
    fn test_tantivy_errors() {
        let err = TantivyEngineError::from(TantivyError::FieldNotFound("colour".into()));
        assert_eq!(err.code(), EngineErrorCode::UnknownField);

        let err = TantivyEngineError::from(TantivyError::InvalidArgument("bad".into()));
        assert_eq!(err.code(), EngineErrorCode::Index);
    }
}
