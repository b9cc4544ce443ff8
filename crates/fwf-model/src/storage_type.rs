//! Storage-type tags attached to tape fields.
//!
//! The canonical renderings are `INT`, `FLOAT` and `CHAR(n)`. Any other
//! declared type is kept verbatim as [`StorageType::Custom`] so a tape that
//! is loaded and saved again reproduces the declared text.
//!
//! Fields only ever hold [`StorageType::normalized`] values, whose rendering
//! parses back to the same value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Column storage type for a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StorageType {
    /// Whole numbers (`INT`).
    Integer,
    /// Floating-point numbers (`FLOAT`).
    Float,
    /// Fixed-length character data (`CHAR(n)`).
    Char(usize),
    /// Any other user-declared SQL type, rendered as written.
    Custom(String),
}

impl StorageType {
    /// Fixed-length character type sized to a field width.
    pub fn char_for_width(width: usize) -> Self {
        StorageType::Char(width)
    }

    /// The value this type has after a render/parse round trip.
    ///
    /// A `Custom` spelling of a canonical type becomes that type
    /// (`Custom("INT")` is `Integer`).
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidStorageType`] for types with no parseable
    /// rendering: `CHAR(0)`, blank custom text, or custom text such as
    /// `CHAR(05)`.
    pub fn normalized(self) -> Result<Self, ModelError> {
        match self {
            StorageType::Char(0) => Err(ModelError::invalid_storage_type("CHAR(0)")),
            StorageType::Custom(text) => text.parse(),
            other => Ok(other),
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Integer => f.write_str("INT"),
            StorageType::Float => f.write_str("FLOAT"),
            StorageType::Char(length) => write!(f, "CHAR({length})"),
            StorageType::Custom(text) => f.write_str(text),
        }
    }
}

impl FromStr for StorageType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ModelError::invalid_storage_type(s));
        }
        match s {
            "INT" => return Ok(StorageType::Integer),
            "FLOAT" => return Ok(StorageType::Float),
            _ => {}
        }
        if let Some(length) = s
            .strip_prefix("CHAR(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_char_length(length)
                .map(StorageType::Char)
                .ok_or_else(|| ModelError::invalid_storage_type(s));
        }
        Ok(StorageType::Custom(s.to_string()))
    }
}

/// Digits only, no sign and no leading zero, so the rendering is unique.
fn parse_char_length(text: &str) -> Option<usize> {
    if text.is_empty() || text.starts_with('0') || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl TryFrom<String> for StorageType {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StorageType> for String {
    fn from(value: StorageType) -> Self {
        value.to_string()
    }
}
