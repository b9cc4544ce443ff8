//! Streaming fixed-width to CSV conversion.
//!
//! The source is read strictly line by line and each line is written out
//! before the next one is read, so memory use does not depend on file size.
//!
//! # Usage
//!
//! ```ignore
//! use fwf_ingest::{ConvertOptions, convert_to_tabular};
//!
//! let options = ConvertOptions::default().with_progress_interval(Some(100_000));
//! let summary = convert_to_tabular(&source, &sink, &tape, &options)?;
//! println!("{} lines -> {}", summary.lines, summary.sink_path.display());
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fwf_model::Tape;

use crate::decode::{Row, decode_fields, decode_line};
use crate::error::{IngestError, Result};
use crate::lines::open_source;
use crate::progress::{LogProgress, ProgressSink};

/// Progress cadence used when a caller asks for progress without a count.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// Options for CSV conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Report cumulative line counts every N lines.
    /// Defaults to no reporting.
    pub progress_interval: Option<u64>,

    /// Output field delimiter.
    /// Defaults to `,`.
    pub delimiter: u8,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            progress_interval: None,
            delimiter: b',',
        }
    }
}

impl ConvertOptions {
    /// Set the progress reporting interval.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: Option<u64>) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set the output delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Outcome of a completed conversion.
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub sink_path: PathBuf,
    /// Number of input lines, which equals the number of data rows written.
    pub lines: u64,
    pub duration: Duration,
}

/// Convert a fixed-width file to CSV, logging progress through `tracing`.
///
/// See [`convert_to_tabular_with_progress`].
pub fn convert_to_tabular(
    source_path: impl AsRef<Path>,
    sink_path: impl AsRef<Path>,
    tape: &Tape,
    options: &ConvertOptions,
) -> Result<ConversionSummary> {
    let source_path = source_path.as_ref();
    let mut progress = LogProgress::new(source_path.display().to_string());
    convert_to_tabular_with_progress(source_path, sink_path, tape, options, &mut progress)
}

/// Convert a fixed-width file to CSV.
///
/// Writes a header row of field names followed by one row per input line,
/// in input order. An empty source produces a header-only file.
///
/// # Errors
///
/// - [`IngestError::EmptyTape`] if the tape has no fields. Nothing is opened.
/// - [`IngestError::SourceUnavailable`] if the source cannot be opened. The
///   sink is not created in that case.
/// - [`IngestError::SinkUnavailable`] if the sink cannot be created, or if it
///   resolves to the source file itself.
/// - [`IngestError::SourceRead`] / [`IngestError::SinkWrite`] on I/O faults
///   mid-stream. The sink is left truncated and must be treated as invalid.
pub fn convert_to_tabular_with_progress(
    source_path: impl AsRef<Path>,
    sink_path: impl AsRef<Path>,
    tape: &Tape,
    options: &ConvertOptions,
    progress: &mut dyn ProgressSink,
) -> Result<ConversionSummary> {
    let source_path = source_path.as_ref();
    let sink_path = sink_path.as_ref();
    let started = Instant::now();
    debug!(
        source = %source_path.display(),
        sink = %sink_path.display(),
        fields = tape.len(),
        "starting conversion"
    );

    if tape.is_empty() {
        return Err(IngestError::EmptyTape);
    }

    let mut reader = open_source(source_path)?;
    if same_file(source_path, sink_path) {
        return Err(IngestError::sink_unavailable(
            sink_path,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "sink is the source file; refusing to overwrite it",
            ),
        ));
    }
    let file = File::create(sink_path)
        .map_err(|source| IngestError::sink_unavailable(sink_path, source))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(BufWriter::new(file));

    writer
        .write_record(tape.names())
        .map_err(|error| IngestError::sink_write(sink_path, 0, io::Error::from(error)))?;

    let interval = options.progress_interval.filter(|&n| n > 0);
    let mut lines = 0u64;
    loop {
        let line = match reader.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(source) => return Err(IngestError::source_read(source_path, lines + 1, source)),
        };
        writer
            .write_record(decode_fields(line, tape))
            .map_err(|error| {
                IngestError::sink_write(sink_path, lines + 1, io::Error::from(error))
            })?;
        lines += 1;
        if let Some(every) = interval
            && lines % every == 0
        {
            progress.lines_processed(lines);
        }
    }
    writer
        .flush()
        .map_err(|source| IngestError::sink_write(sink_path, lines, source))?;
    if interval.is_some() {
        progress.finish(lines);
    }

    let duration = started.elapsed();
    info!(
        source = %source_path.display(),
        sink = %sink_path.display(),
        lines,
        duration_ms = duration.as_millis(),
        "conversion finished"
    );
    Ok(ConversionSummary {
        sink_path: sink_path.to_path_buf(),
        lines,
        duration,
    })
}

/// True when both paths resolve to the same existing file.
fn same_file(source_path: &Path, sink_path: &Path) -> bool {
    match (fs::canonicalize(source_path), fs::canonicalize(sink_path)) {
        (Ok(source), Ok(sink)) => source == sink,
        _ => false,
    }
}

/// Decode up to `limit` lines from the start of a source.
pub fn read_rows(source_path: impl AsRef<Path>, tape: &Tape, limit: usize) -> Result<Vec<Row>> {
    let source_path = source_path.as_ref();
    let mut reader = open_source(source_path)?;
    let mut rows = Vec::with_capacity(limit.min(1024));
    while rows.len() < limit {
        match reader.next_line() {
            Ok(Some(line)) => rows.push(decode_line(line, tape)),
            Ok(None) => break,
            Err(source) => {
                let line = rows.len() as u64 + 1;
                return Err(IngestError::source_read(source_path, line, source));
            }
        }
    }
    debug!(source = %source_path.display(), rows = rows.len(), limit, "sampled rows");
    Ok(rows)
}
