//! SQL script generation for fixed-width sources.
//!
//! A script has two statements: a `CREATE TABLE` with one column per tape
//! field, and a `LOAD DATA INFILE` that stages each line in `@row` and cuts
//! every column out of it with `SUBSTR`.

mod error;
mod script;
mod sql;

pub use error::{Result, ScriptError};
pub use script::{SqlScriptOptions, generate_sql_script, table_name_from_path, write_sql_script};
pub use sql::{TypingPolicy, ensure_typed, render_bulk_load, render_create_table, render_script};
