//! Sampling-based storage type inference.
//!
//! Only fields without a declared type are inferred. For each such field the
//! sampled values are trimmed, blanks are dropped, and the remaining values
//! decide the type:
//!
//! 1. no values left -> `CHAR(width)`
//! 2. every value is an integer -> `INT`
//! 3. every value is a finite float -> `FLOAT`
//! 4. anything else -> `CHAR(width)`
//!
//! A single non-numeric value rules out both numeric types.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fwf_model::{StorageType, Tape};

use crate::convert::read_rows;
use crate::error::{IngestError, Result};

/// Number of lines sampled when no size is given.
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// How to treat fields whose sample has no usable values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InferenceMode {
    /// Fall back to a fixed-length character type.
    #[default]
    Lenient,
    /// Fail with [`IngestError::AmbiguousTypeInference`].
    Strict,
}

/// Options for type inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceOptions {
    /// Maximum number of lines to sample.
    /// Defaults to 1000.
    pub sample_size: usize,

    /// Fallback policy for all-blank samples.
    pub mode: InferenceMode,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            mode: InferenceMode::default(),
        }
    }
}

impl InferenceOptions {
    /// Set the sample size.
    #[must_use]
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    /// Set the fallback mode.
    #[must_use]
    pub fn with_mode(mut self, mode: InferenceMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Types assigned by one inference run, in tape order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferredTypes {
    entries: Vec<(String, StorageType)>,
}

impl InferredTypes {
    pub fn get(&self, name: &str) -> Option<&StorageType> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, storage)| storage)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StorageType)> + '_ {
        self.entries
            .iter()
            .map(|(name, storage)| (name.as_str(), storage))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses a trimmed value as an integer, `None` for blanks and non-integers.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Parses a trimmed value as a finite float, `None` for blanks, NaN and infinities.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Classify sampled values for a field of the given width.
///
/// Returns `None` when every value is blank.
pub fn classify_values<'a, I>(values: I, width: usize) -> Option<StorageType>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = 0usize;
    let mut all_integer = true;
    let mut all_float = true;
    for value in values {
        if value.trim().is_empty() {
            continue;
        }
        seen += 1;
        if all_integer && parse_i64(value).is_none() {
            all_integer = false;
        }
        if all_float && parse_f64(value).is_none() {
            all_float = false;
        }
        if !all_integer && !all_float {
            break;
        }
    }
    if seen == 0 {
        return None;
    }
    Some(if all_integer {
        StorageType::Integer
    } else if all_float {
        StorageType::Float
    } else {
        StorageType::char_for_width(width)
    })
}

/// Infer types for untyped fields from the first `sample_size` lines.
///
/// Uses [`InferenceMode::Lenient`]. See [`infer_types_with_options`].
pub fn infer_types(
    tape: &mut Tape,
    source_path: impl AsRef<Path>,
    sample_size: usize,
) -> Result<InferredTypes> {
    let options = InferenceOptions::default().with_sample_size(sample_size);
    infer_types_with_options(tape, source_path, &options)
}

/// Infer types for untyped fields and write them into the tape.
///
/// Fields that already have a declared type are never touched. With a zero
/// sample size, an empty tape, or no untyped field, nothing is read and an
/// empty result is returned.
///
/// # Errors
///
/// Returns [`IngestError::SourceUnavailable`] if the source cannot be read,
/// and [`IngestError::AmbiguousTypeInference`] in strict mode when a field
/// has only blank values. The tape is unchanged on error.
pub fn infer_types_with_options(
    tape: &mut Tape,
    source_path: impl AsRef<Path>,
    options: &InferenceOptions,
) -> Result<InferredTypes> {
    let source_path = source_path.as_ref();
    if options.sample_size == 0 || tape.is_fully_typed() {
        return Ok(InferredTypes::default());
    }

    let rows = read_rows(source_path, tape, options.sample_size)?;
    let mut entries = Vec::new();
    for (index, field) in tape.fields().iter().enumerate() {
        if field.declared_type().is_some() {
            continue;
        }
        let values = rows.iter().map(|row| row.get(index).unwrap_or(""));
        let storage = match classify_values(values, field.width()) {
            Some(storage) => storage,
            None if options.mode == InferenceMode::Strict => {
                return Err(IngestError::AmbiguousTypeInference {
                    field: field.name().to_string(),
                });
            }
            None => {
                warn!(
                    field = %field.name(),
                    sampled = rows.len(),
                    "no non-blank values, falling back to character type"
                );
                StorageType::char_for_width(field.width())
            }
        };
        debug!(field = %field.name(), storage = %storage, "inferred type");
        entries.push((field.name().to_string(), storage));
    }

    for (name, storage) in &entries {
        tape.set_declared_type(name, Some(storage.clone()))?;
    }
    Ok(InferredTypes { entries })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_win() {
        assert_eq!(
            classify_values(["10", "20", "30"], 4),
            Some(StorageType::Integer)
        );
        assert_eq!(
            classify_values([" -7 ", "+3", "0042"], 4),
            Some(StorageType::Integer)
        );
    }

    #[test]
    fn one_decimal_makes_float() {
        assert_eq!(
            classify_values(["10", "2.5", "30"], 4),
            Some(StorageType::Float)
        );
        assert_eq!(classify_values(["1e3", ".5"], 4), Some(StorageType::Float));
    }

    #[test]
    fn one_word_makes_char() {
        assert_eq!(
            classify_values(["10", "abc"], 8),
            Some(StorageType::Char(8))
        );
        assert_eq!(
            classify_values(["2.5", "NaN"], 3),
            Some(StorageType::Char(3))
        );
        assert_eq!(classify_values(["inf"], 3), Some(StorageType::Char(3)));
    }

    #[test]
    fn blanks_are_ignored() {
        assert_eq!(
            classify_values(["", "  ", "12", "      "], 6),
            Some(StorageType::Integer)
        );
        assert_eq!(classify_values(["", "   ", "\t"], 6), None);
        assert_eq!(classify_values(std::iter::empty::<&str>(), 6), None);
    }

    #[test]
    fn parse_helpers() {
        assert_eq!(parse_i64(" 12 "), Some(12));
        assert_eq!(parse_i64("1.0"), None);
        assert_eq!(parse_i64(""), None);
        assert_eq!(parse_f64("1.5"), Some(1.5));
        assert_eq!(parse_f64("infinity"), None);
        assert_eq!(parse_f64("   "), None);
    }

    #[test]
    fn zero_sample_size_reads_nothing() {
        let mut tape = Tape::from_fields([("id", 0, 4, None)]).unwrap();
        let result = infer_types(&mut tape, "/definitely/not/here.txt", 0).unwrap();
        assert!(result.is_empty());
        assert!(tape.get("id").unwrap().declared_type().is_none());
    }

    #[test]
    fn empty_tape_reads_nothing() {
        let mut tape = Tape::new();
        let result = infer_types(&mut tape, "/definitely/not/here.txt", 10).unwrap();
        assert!(result.is_empty());
    }
}
