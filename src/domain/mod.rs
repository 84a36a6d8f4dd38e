//! Domain types for locating and matching payroll rows.
//!
//! This module holds the small value types the redaction pipeline is
//! parameterised by: which column to read and write, which worksheet to
//! target, and how a cell's text is tested against the search phrase.

pub mod column;
pub mod matcher;
pub mod selector;

pub use column::Column;
pub use matcher::{CellMatcher, PhraseMatcher, DEFAULT_PHRASE};
pub use selector::SheetSelector;
