//! Tape data model for fixed-width record layouts.
//!
//! A [`Tape`] is an ordered list of named [`Field`]s. Each field binds a
//! character range (`start` inclusive, `end` exclusive) within every input
//! line and may carry a declared [`StorageType`].
//!
//! # Example
//!
//! ```
//! use fwf_model::{StorageType, Tape};
//!
//! let mut tape = Tape::new();
//! tape.add_or_replace("id", 0, 4, Some(StorageType::Integer)).unwrap();
//! tape.add_or_replace("name", 4, 14, None).unwrap();
//!
//! let names: Vec<&str> = tape.names().collect();
//! assert_eq!(names, vec!["id", "name"]);
//! assert_eq!(tape.get("name").unwrap().width(), 10);
//! ```

mod error;
mod field;
mod persist;
mod storage_type;
mod tape;

pub use error::{ModelError, Result};
pub use field::Field;
pub use storage_type::StorageType;
pub use tape::{Iter, Tape};
