//! Rendering of `CREATE TABLE` and bulk-load statements.
//!
//! Identifiers are emitted as given. Callers supply SQL-safe table and field
//! names.

use std::path::Path;

use tracing::debug;

use fwf_ingest::{DEFAULT_SAMPLE_SIZE, InferenceMode, InferenceOptions, infer_types_with_options};
use fwf_model::{StorageType, Tape};

use crate::error::Result;

const ROW_FORMAT: &str = "FIELDS TERMINATED BY '\\n' ESCAPED BY ''\nLINES TERMINATED BY '\\n'";

/// How untyped fields get a type before a script is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPolicy {
    /// Sample the source and infer types.
    Infer {
        sample_size: usize,
        mode: InferenceMode,
    },
    /// Use `CHAR(width)` without reading the source.
    DefaultChar,
}

impl Default for TypingPolicy {
    fn default() -> Self {
        Self::Infer {
            sample_size: DEFAULT_SAMPLE_SIZE,
            mode: InferenceMode::Lenient,
        }
    }
}

/// Give every untyped field a declared type.
///
/// Does nothing when the tape is already fully typed. Fields that inference
/// leaves untyped (a zero sample size) fall back to `CHAR(width)`.
pub fn ensure_typed(tape: &mut Tape, source_path: &Path, policy: TypingPolicy) -> Result<()> {
    if tape.is_fully_typed() {
        return Ok(());
    }
    if let TypingPolicy::Infer { sample_size, mode } = policy {
        let options = InferenceOptions::default()
            .with_sample_size(sample_size)
            .with_mode(mode);
        let inferred = infer_types_with_options(tape, source_path, &options)?;
        debug!(
            source = %source_path.display(),
            inferred = inferred.len(),
            "typed fields by inference"
        );
    }
    default_to_char(tape)
}

fn default_to_char(tape: &mut Tape) -> Result<()> {
    let defaulted: Vec<(String, usize)> = tape
        .untyped_fields()
        .map(|field| (field.name().to_string(), field.width()))
        .collect();
    if defaulted.is_empty() {
        return Ok(());
    }
    debug!(fields = defaulted.len(), "typed fields as CHAR");
    for (name, width) in defaulted {
        tape.set_declared_type(&name, Some(StorageType::char_for_width(width)))?;
    }
    Ok(())
}

/// Render a `CREATE TABLE` statement with one column per field.
///
/// Untyped fields render as `CHAR(width)`.
pub fn render_create_table(table_name: &str, tape: &Tape) -> String {
    let columns: Vec<String> = tape
        .iter()
        .map(|(name, field)| format!("    {name} {}", field.storage_type_or_default()))
        .collect();
    format!("CREATE TABLE {table_name} (\n{}\n);", columns.join(",\n"))
}

/// Render a `LOAD DATA INFILE` statement that cuts each column out of the
/// staged line with `SUBSTR(@row, start + 1, width)`.
///
/// The whole line lands in `@row`: the field terminator is the line
/// terminator and escape processing is off, so tabs and backslashes in the
/// data do not move the offsets.
pub fn render_bulk_load(table_name: &str, source_path: &Path, tape: &Tape) -> String {
    let mut sql = format!(
        "LOAD DATA INFILE '{}'\nINTO TABLE {table_name}\n{ROW_FORMAT}\n(@row)",
        escape_literal(&source_path.to_string_lossy())
    );
    if !tape.is_empty() {
        let assignments: Vec<String> = tape
            .iter()
            .map(|(name, field)| {
                format!(
                    "    {name} = SUBSTR(@row, {}, {})",
                    field.start() + 1,
                    field.width()
                )
            })
            .collect();
        sql.push_str("\nSET\n");
        sql.push_str(&assignments.join(",\n"));
    }
    sql.push(';');
    sql
}

/// Both statements separated by a blank line, ending with a newline.
pub fn render_script(table_name: &str, source_path: &Path, tape: &Tape) -> String {
    format!(
        "{}\n\n{}\n",
        render_create_table(table_name, tape),
        render_bulk_load(table_name, source_path, tape)
    )
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "''")
}
