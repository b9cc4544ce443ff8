//! Tape persistence as JSON.
//!
//! A tape is stored as a JSON object whose keys are field names in tape
//! order:
//!
//! ```json
//! {
//!   "id": { "start": 0, "end": 4, "declared_type": "INT" },
//!   "name": { "start": 4, "end": 14, "declared_type": null }
//! }
//! ```
//!
//! The legacy pair form `"id": [0, 4]` is accepted on load. Saving always
//! writes the record form.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{ModelError, Result};
use crate::storage_type::StorageType;
use crate::tape::Tape;

#[derive(Serialize)]
struct FieldRecordRef<'a> {
    start: usize,
    end: usize,
    declared_type: Option<&'a StorageType>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldRecord {
    start: usize,
    end: usize,
    #[serde(default)]
    declared_type: Option<StorageType>,
}

impl Serialize for Tape {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, field) in self {
            map.serialize_entry(
                name,
                &FieldRecordRef {
                    start: field.start(),
                    end: field.end(),
                    declared_type: field.declared_type(),
                },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Tape {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TapeVisitor)
    }
}

struct TapeVisitor;

impl<'de> Visitor<'de> for TapeVisitor {
    type Value = Tape;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of field names to {start, end, declared_type} records")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut tape = Tape::new();
        while let Some(name) = map.next_key::<String>()? {
            let value: Value = map.next_value()?;
            let record = field_record(value)
                .map_err(|error| de::Error::custom(format!("field '{name}': {error}")))?;
            tape.add_or_replace(name, record.start, record.end, record.declared_type)
                .map_err(de::Error::custom)?;
        }
        Ok(tape)
    }
}

/// Decode one field value: the record form, or a legacy `[start, end]` pair.
fn field_record(value: Value) -> serde_json::Result<FieldRecord> {
    if value.is_array() {
        let (start, end) = serde_json::from_value::<(usize, usize)>(value)?;
        return Ok(FieldRecord {
            start,
            end,
            declared_type: None,
        });
    }
    serde_json::from_value(value)
}

impl Tape {
    /// Load a tape from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MalformedTape`] when the input is not a valid
    /// tape. No partially populated tape is ever returned.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|error| {
            if error.is_io() {
                ModelError::Io(io::Error::from(error))
            } else {
                ModelError::malformed(error.to_string())
            }
        })
    }

    /// Parse a tape from a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::load(text.as_bytes())
    }

    /// Write the tape as pretty-printed JSON followed by a newline.
    pub fn save<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(io::Error::from)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Render the tape as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.save(&mut buffer)?;
        String::from_utf8(buffer).map_err(|error| ModelError::malformed(error.to_string()))
    }

    /// Load a tape from a JSON file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ModelError::TapeFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(BufReader::new(file)).map_err(|error| match error {
            ModelError::MalformedTape { message } => {
                ModelError::malformed(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    /// Save the tape to a JSON file, replacing any existing content.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ModelError::TapeFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
