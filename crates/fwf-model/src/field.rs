use std::ops::Range;

use crate::error::{ModelError, Result};
use crate::storage_type::StorageType;

/// One named entry of a tape: a character range plus an optional type.
///
/// `start` is inclusive and `end` exclusive, both counted in characters from
/// the beginning of the line. A field always satisfies `start < end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    start: usize,
    end: usize,
    declared_type: Option<StorageType>,
}

impl Field {
    /// Create a field, validating its name and range.
    pub fn new(name: impl Into<String>, start: usize, end: usize) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if end <= start {
            return Err(ModelError::invalid_range(name, start, end));
        }
        Ok(Self {
            name,
            start,
            end,
            declared_type: None,
        })
    }

    /// Attach a declared storage type, normalized so it survives a save/load
    /// round trip.
    pub fn with_declared_type(mut self, declared_type: Option<StorageType>) -> Result<Self> {
        self.set_declared_type(declared_type)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn declared_type(&self) -> Option<&StorageType> {
        self.declared_type.as_ref()
    }

    /// Number of characters the field spans (`end - start`).
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Declared type, or a fixed-length character type sized to the width.
    pub fn storage_type_or_default(&self) -> StorageType {
        self.declared_type
            .clone()
            .unwrap_or_else(|| StorageType::char_for_width(self.width()))
    }

    pub(crate) fn relocate(&mut self, start: usize, end: usize) -> Result<()> {
        if end <= start {
            return Err(ModelError::invalid_range(self.name.clone(), start, end));
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    pub(crate) fn set_declared_type(&mut self, declared_type: Option<StorageType>) -> Result<()> {
        self.declared_type = declared_type.map(StorageType::normalized).transpose()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_inverted_ranges() {
        assert!(matches!(
            Field::new("id", 4, 4),
            Err(ModelError::InvalidRange { start: 4, end: 4, .. })
        ));
        assert!(matches!(
            Field::new("id", 10, 2),
            Err(ModelError::InvalidRange { .. })
        ));
        assert!(matches!(Field::new("  ", 0, 2), Err(ModelError::EmptyName)));
    }

    #[test]
    fn width_and_default_type() {
        let field = Field::new("name", 4, 14).unwrap();
        assert_eq!(field.width(), 10);
        assert_eq!(field.range(), 4..14);
        assert_eq!(field.storage_type_or_default(), StorageType::Char(10));

        let typed = field
            .with_declared_type(Some(StorageType::Integer))
            .unwrap();
        assert_eq!(typed.storage_type_or_default(), StorageType::Integer);
    }

    #[test]
    fn declared_type_is_normalized() {
        let field = Field::new("id", 0, 4)
            .unwrap()
            .with_declared_type(Some(StorageType::Custom("FLOAT".to_string())))
            .unwrap();
        assert_eq!(field.declared_type(), Some(&StorageType::Float));

        let err = Field::new("id", 0, 4)
            .unwrap()
            .with_declared_type(Some(StorageType::Char(0)))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidStorageType { .. }));
    }

    #[test]
    fn relocate_keeps_old_range_on_error() {
        let mut field = Field::new("id", 0, 4).unwrap();
        assert!(field.relocate(8, 3).is_err());
        assert_eq!(field.range(), 0..4);
        field.relocate(2, 6).unwrap();
        assert_eq!(field.range(), 2..6);
    }
}
