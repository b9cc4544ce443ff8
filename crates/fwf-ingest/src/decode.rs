//! Slicing a fixed-width line into field values.

use fwf_model::Tape;

/// One decoded record: the values sliced from a single line, in tape order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for Row {
    fn from(values: Vec<String>) -> Self {
        Self::new(values)
    }
}

/// Decode a line into one value per tape field.
///
/// Offsets past the end of the line give a shorter or empty value, never an
/// error.
pub fn decode_line(line: &str, tape: &Tape) -> Row {
    Row::new(decode_fields(line, tape).map(str::to_string).collect())
}

/// Borrowing variant of [`decode_line`]; yields slices of `line`.
pub fn decode_fields<'a>(line: &'a str, tape: &'a Tape) -> impl Iterator<Item = &'a str> + 'a {
    let ascii = line.is_ascii();
    tape.fields()
        .iter()
        .map(move |field| slice_with(line, field.start(), field.end(), ascii))
}

/// Characters `start..end` of `line`, clamped to the line length.
pub fn slice_chars(line: &str, start: usize, end: usize) -> &str {
    slice_with(line, start, end, line.is_ascii())
}

fn slice_with(line: &str, start: usize, end: usize, ascii: bool) -> &str {
    if ascii {
        let from = start.min(line.len());
        let to = end.min(line.len()).max(from);
        return &line[from..to];
    }
    let from = byte_offset(line, start);
    let to = byte_offset(line, end).max(from);
    &line[from..to]
}

fn byte_offset(line: &str, chars: usize) -> usize {
    line.char_indices()
        .nth(chars)
        .map_or(line.len(), |(offset, _)| offset)
}
