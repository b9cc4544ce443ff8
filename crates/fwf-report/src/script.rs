//! Complete SQL scripts: typing, rendering and writing to disk.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::info;

use fwf_model::Tape;

use crate::error::{Result, ScriptError};
use crate::sql::{TypingPolicy, ensure_typed, render_script};

/// Options for SQL script generation.
#[derive(Debug, Clone)]
pub struct SqlScriptOptions {
    /// Fixed-width file named in `LOAD DATA INFILE`, also sampled for inference.
    pub source_path: PathBuf,
    /// Target table. Derived from the source file stem when `None`.
    pub table_name: Option<String>,
    /// How untyped fields are typed before rendering.
    pub typing: TypingPolicy,
    /// Prepend `-- Generated` comment lines.
    pub include_header: bool,
}

impl SqlScriptOptions {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            table_name: None,
            typing: TypingPolicy::default(),
            include_header: true,
        }
    }

    #[must_use]
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    #[must_use]
    pub fn with_typing(mut self, typing: TypingPolicy) -> Self {
        self.typing = typing;
        self
    }

    #[must_use]
    pub fn with_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }

    /// The explicit table name, or one derived from the source path.
    pub fn resolved_table_name(&self) -> String {
        self.table_name
            .clone()
            .unwrap_or_else(|| table_name_from_path(&self.source_path))
    }
}

/// Type the tape as needed and render the full script.
///
/// Types assigned while typing are written into `tape`, so callers can save
/// them afterwards.
pub fn generate_sql_script(tape: &mut Tape, options: &SqlScriptOptions) -> Result<String> {
    ensure_typed(tape, &options.source_path, options.typing)?;
    let table_name = options.resolved_table_name();
    let body = render_script(&table_name, &options.source_path, tape);
    if !options.include_header {
        return Ok(body);
    }
    let generated = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    Ok(format!(
        "-- Generated by fwf\n-- Generated: {generated}\n-- Source: {}\n\n{body}",
        options.source_path.display()
    ))
}

/// Write a rendered script, creating parent directories as needed.
pub fn write_sql_script(path: &Path, script: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ScriptError::write(path, source))?;
    }
    fs::write(path, script).map_err(|source| ScriptError::write(path, source))?;
    info!(path = %path.display(), bytes = script.len(), "wrote SQL script");
    Ok(())
}

/// Table name from a file stem, with characters outside `[A-Za-z0-9_]`
/// replaced by `_`.
pub fn table_name_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(OsStr::to_string_lossy)
        .unwrap_or_default();
    let name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() {
        "fixed_width".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_from_stem() {
        assert_eq!(table_name_from_path(Path::new("data/people.txt")), "people");
        assert_eq!(
            table_name_from_path(Path::new("/x/HR extract-2024.dat")),
            "HR_extract_2024"
        );
        assert_eq!(table_name_from_path(Path::new("")), "fixed_width");
    }

    #[test]
    fn explicit_table_name_wins() {
        let options = SqlScriptOptions::new("data/people.txt").with_table_name("staff");
        assert_eq!(options.resolved_table_name(), "staff");
        let options = SqlScriptOptions::new("data/people.txt");
        assert_eq!(options.resolved_table_name(), "people");
    }
}
