//! CLI argument definitions for `fwf`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use fwf_ingest::DEFAULT_SAMPLE_SIZE;
use fwf_model::StorageType;

#[derive(Parser)]
#[command(
    name = "fwf",
    version,
    about = "Convert fixed-width files to CSV and SQL load scripts",
    long_about = "Convert fixed-width text files using a tape: a JSON layout of named\n\
                  character ranges.\n\n\
                  Produces CSV files, infers column types from a sample, and generates\n\
                  CREATE TABLE / LOAD DATA scripts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Inspect or edit a tape file.
    #[command(subcommand)]
    Tape(TapeCommand),

    /// Convert a fixed-width file to CSV.
    Convert(ConvertArgs),

    /// Infer column types from a sample of the source.
    Infer(InferArgs),

    /// Generate a CREATE TABLE and LOAD DATA script.
    Sql(SqlArgs),

    /// Decode the first lines of a source and print them as a table.
    Preview(PreviewArgs),
}

#[derive(Subcommand)]
pub enum TapeCommand {
    /// Print the fields of a tape.
    Show(TapeFileArg),

    /// Add a field, or replace a field with the same name.
    Add(TapeAddArgs),

    /// Move an existing field to a new range.
    Alter(TapeAlterArgs),

    /// Remove a field.
    Remove(TapeRemoveArgs),
}

#[derive(Args)]
pub struct TapeFileArg {
    /// Tape file (JSON).
    #[arg(long = "tape", short = 't', value_name = "TAPE")]
    pub tape: PathBuf,
}

#[derive(Args)]
pub struct TapeAddArgs {
    #[command(flatten)]
    pub tape: TapeFileArg,

    /// Field name.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// First character offset (0-based, inclusive).
    #[arg(value_name = "START")]
    pub start: usize,

    /// End character offset (exclusive).
    #[arg(value_name = "END")]
    pub end: usize,

    /// Declared SQL type, e.g. INT, FLOAT, CHAR(10), DATE.
    #[arg(long = "type", value_name = "TYPE")]
    pub declared_type: Option<StorageType>,
}

#[derive(Args)]
pub struct TapeAlterArgs {
    #[command(flatten)]
    pub tape: TapeFileArg,

    /// Field name.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// New start offset.
    #[arg(value_name = "START")]
    pub start: usize,

    /// New end offset.
    #[arg(value_name = "END")]
    pub end: usize,
}

#[derive(Args)]
pub struct TapeRemoveArgs {
    #[command(flatten)]
    pub tape: TapeFileArg,

    /// Field name.
    #[arg(value_name = "NAME")]
    pub name: String,
}

#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub tape: TapeFileArg,

    /// Fixed-width source file.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Output CSV file (default: SOURCE with a .csv extension).
    #[arg(long = "output", short = 'o', value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Report progress every N lines (100000 when given without a value).
    #[arg(
        long = "progress",
        value_name = "LINES",
        num_args = 0..=1,
        default_missing_value = "100000"
    )]
    pub progress: Option<u64>,

    /// Output field delimiter.
    #[arg(long = "delimiter", value_name = "CHAR", default_value = ",")]
    pub delimiter: char,
}

#[derive(Args)]
pub struct SampleArgs {
    /// Number of lines to sample.
    #[arg(long = "sample-size", value_name = "N", default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Fail instead of falling back to CHAR when a field has only blank values.
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Args)]
pub struct InferArgs {
    #[command(flatten)]
    pub tape: TapeFileArg,

    /// Fixed-width source file.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    #[command(flatten)]
    pub sample: SampleArgs,

    /// Save the inferred types back into the tape file.
    #[arg(long = "write")]
    pub write: bool,
}

#[derive(Args)]
pub struct SqlArgs {
    #[command(flatten)]
    pub tape: TapeFileArg,

    /// Fixed-width source file.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Table name (default: source file stem).
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,

    /// Write the script to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Infer types for untyped fields (default).
    #[arg(long = "infer", overrides_with = "no_infer")]
    pub infer: bool,

    /// Type untyped fields as CHAR(width) without reading the source.
    #[arg(long = "no-infer", overrides_with = "infer")]
    pub no_infer: bool,

    #[command(flatten)]
    pub sample: SampleArgs,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub tape: TapeFileArg,

    /// Fixed-width source file.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Number of lines to show.
    #[arg(long = "rows", short = 'n', value_name = "N", default_value_t = 10)]
    pub rows: usize,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
