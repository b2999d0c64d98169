//! Error types for the ordering engine

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Store not initialized at the given path
    #[error("store not initialized at {path}")]
    NotInitialized { path: PathBuf },

    /// Task not found
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Column not found
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Column still holds tasks
    #[error("column {id} is not empty: {count} tasks")]
    ColumnNotEmpty { id: String, count: usize },

    /// Duplicate ID
    #[error("duplicate {item_type} ID: {id}")]
    DuplicateId { item_type: String, id: String },

    /// Missing required field
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// A rank string outside the rank alphabet
    #[error("invalid rank {value:?}: {message}")]
    InvalidRank { value: String, message: String },

    /// No rank fits even after rebalancing the column
    #[error("could not generate a rank in column {column} after rebalancing")]
    RankExhausted { column: String },

    /// Backend failure reported by a store implementation
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Lock is held by another process
    #[error("lock busy - another operation in progress")]
    LockBusy,

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid rank error
    pub fn invalid_rank(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRank {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate ID error
    pub fn duplicate_id(item_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            item_type: item_type.into(),
            id: id.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::TaskNotFound {
            id: "abc123".into(),
        };
        assert_eq!(err.to_string(), "task not found: abc123");
    }

    #[test]
    fn test_rank_errors() {
        let err = BoardError::invalid_rank("a-b", "invalid rank character: '-'");
        assert!(err.to_string().contains("\"a-b\""));

        let err = BoardError::RankExhausted {
            column: "todo".into(),
        };
        assert!(err.to_string().contains("todo"));
    }

    #[test]
    fn test_column_not_empty_display() {
        let err = BoardError::ColumnNotEmpty {
            id: "doing".into(),
            count: 2,
        };
        assert_eq!(err.to_string(), "column doing is not empty: 2 tasks");
    }

    #[test]
    fn test_retryable() {
        assert!(BoardError::LockBusy.is_retryable());
        assert!(!BoardError::RankExhausted { column: "x".into() }.is_retryable());
        assert!(!BoardError::storage("disk full").is_retryable());
    }
}
