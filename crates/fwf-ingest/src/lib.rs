//! Decoding of fixed-width files driven by a [`fwf_model::Tape`].
//!
//! - [`decode_line`] slices one line into a [`Row`].
//! - [`convert_to_tabular`] streams a whole file into CSV.
//! - [`infer_types`] samples a file and assigns storage types to untyped fields.

mod convert;
mod decode;
mod error;
mod inference;
mod lines;
mod progress;

pub use convert::{
    ConversionSummary, ConvertOptions, DEFAULT_PROGRESS_INTERVAL, convert_to_tabular,
    convert_to_tabular_with_progress, read_rows,
};
pub use decode::{Row, decode_fields, decode_line, slice_chars};
pub use error::{IngestError, Result};
pub use inference::{
    DEFAULT_SAMPLE_SIZE, InferenceMode, InferenceOptions, InferredTypes, classify_values,
    infer_types, infer_types_with_options, parse_f64, parse_i64,
};
pub use lines::{LineReader, open_source};
pub use progress::{LogProgress, NoProgress, ProgressSink};
