//! Spreadsheet editing service abstraction.
//!
//! The redaction pipeline never touches a file format directly. It talks to
//! a [`SpreadsheetService`] that opens [`Document`]s, which expose one
//! [`Worksheet`] at a time for cell reads and writes. This keeps the scanner
//! and session logic independent of the backend and lets tests substitute
//! [`MemoryService`] for the real editing service.
//!
//! # Backends
//!
//! - [`NativeService`]: `umya-spreadsheet` for packed XML workbooks, with a
//!   headless LibreOffice conversion step for legacy binary workbooks
//! - [`MemoryService`]: in-memory double that records every call

pub mod libreoffice;
pub mod memory;
pub mod native;

pub use libreoffice::LibreOffice;
pub use memory::{
    MemoryDocument, MemoryService, MemorySheet, MemoryState, MemoryValue, MemoryWorkbook,
    SavedWorkbook,
};
pub use native::{NativeConfig, NativeDocument, NativeService};

use crate::domain::{Column, SheetSelector};
use crate::error::RedactorResult;
use crate::output::SaveFormat;
use std::path::Path;

/// One worksheet of an open document, addressed by 1-based row and column.
pub trait Worksheet {
    fn sheet_name(&self) -> &str;

    /// Highest row holding a non-empty value in `column`, or `None` when the
    /// column is empty.
    fn last_used_row(&self, column: Column) -> Option<u32>;

    /// Text form of the cell, `None` when the cell is empty.
    ///
    /// Numbers, booleans and dates are returned in their textual form.
    fn read_cell(&self, row: u32, column: Column) -> Option<String>;

    fn write_cell(&mut self, row: u32, column: Column, value: &str) -> RedactorResult<()>;
}

/// An open workbook, exclusively owned by whoever opened it.
pub trait Document {
    /// Path the document was opened from.
    fn source(&self) -> &Path;

    fn sheet_names(&self) -> Vec<String>;

    /// Resolves `selector` and returns that worksheet.
    ///
    /// Fails with [`crate::RedactorError::WorksheetNotFound`] when no sheet
    /// matches.
    fn select_sheet(&mut self, selector: &SheetSelector) -> RedactorResult<&mut dyn Worksheet>;

    /// Writes the document, with all edits, to `path` in `format`.
    fn save_as(&mut self, path: &Path, format: SaveFormat) -> RedactorResult<()>;

    /// Releases the document, discarding unsaved changes. The source file is
    /// left as it was.
    fn close(self) -> RedactorResult<()>;
}

/// A long-lived editing session able to open many documents in turn.
pub trait SpreadsheetService {
    type Document: Document;

    /// Returns a human-readable name for this backend.
    fn name(&self) -> &str;

    fn open(&mut self, path: &Path) -> RedactorResult<Self::Document>;

    /// Shuts the service down. Consuming `self` makes a second shutdown
    /// impossible.
    fn quit(self) -> RedactorResult<()>;
}
