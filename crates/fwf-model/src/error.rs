//! Error types for tape construction and persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, mutating, or loading a tape.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Field range is empty or inverted.
    #[error("field '{field}' has invalid range {start}..{end}: end must be greater than start")]
    InvalidRange {
        field: String,
        start: usize,
        end: usize,
    },

    /// Field name is empty or whitespace-only.
    #[error("field name must not be empty")]
    EmptyName,

    /// Field is not part of the tape.
    #[error("unknown field: {field}")]
    UnknownField { field: String },

    /// Serialized tape does not have the expected structure.
    #[error("malformed tape: {message}")]
    MalformedTape { message: String },

    /// Storage type text could not be parsed.
    #[error("invalid storage type: '{value}'")]
    InvalidStorageType { value: String },

    /// Tape file could not be opened or created.
    #[error("tape file {path}: {source}")]
    TapeFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tape operations.
pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    /// Create an InvalidRange error.
    pub fn invalid_range(field: impl Into<String>, start: usize, end: usize) -> Self {
        Self::InvalidRange {
            field: field.into(),
            start,
            end,
        }
    }

    /// Create an UnknownField error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Create a MalformedTape error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedTape {
            message: message.into(),
        }
    }

    /// Create an InvalidStorageType error.
    pub fn invalid_storage_type(value: impl Into<String>) -> Self {
        Self::InvalidStorageType {
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::invalid_range("name", 14, 4);
        assert_eq!(
            format!("{err}"),
            "field 'name' has invalid range 14..4: end must be greater than start"
        );

        let err = ModelError::malformed("expected an object");
        assert_eq!(format!("{err}"), "malformed tape: expected an object");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: ModelError = io_err.into();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
