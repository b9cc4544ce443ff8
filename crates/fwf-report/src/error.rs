//! Error types for script generation.

use std::path::PathBuf;
use thiserror::Error;

use fwf_ingest::IngestError;
use fwf_model::ModelError;

#[derive(Debug, Error)]
pub enum ScriptError {
    /// Sampling the source for type inference failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A default type could not be assigned.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The script file could not be written.
    #[error("failed to write SQL script {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScriptError>;

impl ScriptError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
