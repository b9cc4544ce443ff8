//! The tape: an ordered, name-addressable collection of fields.
//!
//! Order is significant. It fixes the CSV column order and the SQL column
//! order, so the tape keeps fields in a `Vec` and maintains a separate
//! name -> position index. Replacing a field keeps its position; adding a new
//! name appends.

use std::collections::HashMap;
use std::slice;

use crate::error::{ModelError, Result};
use crate::field::Field;
use crate::storage_type::StorageType;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl Tape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tape from `(name, start, end, declared_type)` tuples.
    ///
    /// Later tuples replace earlier ones with the same name. Any invalid
    /// tuple fails the whole build.
    pub fn from_fields<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, usize, usize, Option<StorageType>)>,
        S: Into<String>,
    {
        let mut tape = Self::new();
        for (name, start, end, declared_type) in fields {
            tape.add_or_replace(name, start, end, declared_type)?;
        }
        Ok(tape)
    }

    /// Insert a field, or replace the existing field with the same name in place.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidRange`] when `end <= start`,
    /// [`ModelError::EmptyName`] for a blank name and
    /// [`ModelError::InvalidStorageType`] for a type with no parseable
    /// rendering. The tape is unchanged on error.
    pub fn add_or_replace(
        &mut self,
        name: impl Into<String>,
        start: usize,
        end: usize,
        declared_type: Option<StorageType>,
    ) -> Result<()> {
        let field = Field::new(name, start, end)?.with_declared_type(declared_type)?;
        self.upsert(field);
        Ok(())
    }

    fn upsert(&mut self, field: Field) {
        if let Some(position) = self.position(field.name()) {
            self.fields[position] = field;
            return;
        }
        self.index.insert(field.name().to_string(), self.fields.len());
        self.fields.push(field);
    }

    /// Move an existing field to a new range, keeping its position and type.
    pub fn alter(&mut self, name: &str, start: usize, end: usize) -> Result<()> {
        let field = self.get_mut(name)?;
        field.relocate(start, end)
    }

    /// Set or clear the declared type of an existing field.
    pub fn set_declared_type(
        &mut self,
        name: &str,
        declared_type: Option<StorageType>,
    ) -> Result<()> {
        self.get_mut(name)?.set_declared_type(declared_type)
    }

    /// Remove a field by name. Removing an absent name is a no-op.
    pub fn remove(&mut self, name: &str) -> Option<Field> {
        let position = self.index.remove(name)?;
        let removed = self.fields.remove(position);
        for field in &self.fields[position..] {
            if let Some(slot) = self.index.get_mut(field.name()) {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&position| &self.fields[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of a field in tape order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Iterate `(name, field)` pairs in tape order.
    ///
    /// The iterator borrows the tape; call again to restart.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.fields.iter(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(Field::name)
    }

    /// Fields that have no declared type yet, in tape order.
    pub fn untyped_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields
            .iter()
            .filter(|field| field.declared_type().is_none())
    }

    pub fn is_fully_typed(&self) -> bool {
        self.untyped_fields().next().is_none()
    }

    /// Largest field end offset, i.e. the minimum record width the tape covers.
    pub fn record_width(&self) -> Option<usize> {
        self.fields.iter().map(Field::end).max()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Field> {
        match self.index.get(name) {
            Some(&position) => Ok(&mut self.fields[position]),
            None => Err(ModelError::unknown_field(name)),
        }
    }
}

/// Iterator over `(name, field)` pairs in tape order.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: slice::Iter<'a, Field>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Field);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|field| (field.name(), field))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Tape {
    type Item = (&'a str, &'a Field);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
