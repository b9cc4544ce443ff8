//! Error types for decoding and conversion.

use std::path::PathBuf;
use thiserror::Error;

use fwf_model::ModelError;

/// Errors that can occur while reading fixed-width sources.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source file could not be opened.
    #[error("source not available: {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Sink file could not be created.
    #[error("sink not available: {path}: {source}")]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the source failed mid-stream.
    #[error("failed to read {path} at line {line}: {source}")]
    SourceRead {
        path: PathBuf,
        line: u64,
        #[source]
        source: std::io::Error,
    },

    /// Writing the sink failed mid-stream.
    #[error("failed to write {path} at line {line}: {source}")]
    SinkWrite {
        path: PathBuf,
        line: u64,
        #[source]
        source: std::io::Error,
    },

    /// Conversion needs at least one field.
    #[error("tape has no fields; nothing to convert")]
    EmptyTape,

    /// Strict inference found no usable values for a field.
    #[error("cannot infer a type for field '{field}': no non-blank values in sample")]
    AmbiguousTypeInference { field: String },

    /// Tape update failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type alias for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    pub(crate) fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn sink_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SinkUnavailable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn source_read(path: impl Into<PathBuf>, line: u64, source: std::io::Error) -> Self {
        Self::SourceRead {
            path: path.into(),
            line,
            source,
        }
    }

    pub(crate) fn sink_write(path: impl Into<PathBuf>, line: u64, source: std::io::Error) -> Self {
        Self::SinkWrite {
            path: path.into(),
            line,
            source,
        }
    }
}
