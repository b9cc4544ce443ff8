use std::path::PathBuf;

use fwf_ingest::{ConversionSummary, InferredTypes, Row};
use fwf_model::Tape;

/// Result of one `fwf` subcommand, printed by `summary::print_outcome`.
#[derive(Debug)]
pub enum Outcome {
    Tape(TapeResult),
    Convert(ConvertResult),
    Infer(InferResult),
    Sql(SqlResult),
    Preview(PreviewResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapeChange {
    Added(String),
    Replaced(String),
    Altered(String),
    Removed(String),
    NotFound(String),
}

#[derive(Debug)]
pub struct TapeResult {
    pub path: PathBuf,
    pub tape: Tape,
    pub change: Option<TapeChange>,
}

#[derive(Debug)]
pub struct ConvertResult {
    pub source: PathBuf,
    pub summary: ConversionSummary,
}

#[derive(Debug)]
pub struct InferResult {
    pub tape: Tape,
    pub inferred: InferredTypes,
    pub saved_to: Option<PathBuf>,
}

#[derive(Debug)]
pub struct SqlResult {
    pub table_name: String,
    pub script: String,
    pub written_to: Option<PathBuf>,
}

#[derive(Debug)]
pub struct PreviewResult {
    pub tape: Tape,
    pub rows: Vec<Row>,
}
