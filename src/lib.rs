//! Batch redaction of payroll spreadsheets.
//!
//! Payroll card exports list one payment per row. Salary rows carry a fixed
//! description ("Выплата заработной платы по ведомости ...") in one column
//! and the employee's name in the next. This library finds those rows and
//! overwrites the name cell with a placeholder, saving every workbook as a
//! new file so the source stays untouched and its formatting is preserved.
//!
//! # Architecture
//!
//! - [`domain`]: columns, sheet selectors and phrase matching
//! - [`service`]: the spreadsheet editing service seam and its backends
//! - [`redaction`]: worksheet scan, single-workbook session, batch runner
//! - [`output`]: collision-free output naming and format selection
//! - [`config`]: optional TOML configuration
//! - [`error`]: error handling
//!
//! # Quick Start
//!
//! ```no_run
//! use sheet_redactor::{BatchRunner, NativeConfig, NativeService, RedactionRequest};
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = NativeService::start(NativeConfig::default())?;
//! let runner = BatchRunner::new(RedactionRequest::new("anon_output"));
//!
//! let outcome = runner.run(service, &[PathBuf::from("card.xlsx")], |progress, file| {
//!     println!("{}/{}: {}", progress.completed, progress.total, file.input.display());
//! })?;
//! println!("{} rows redacted", outcome.total_changed);
//! # Ok(())
//! # }
//! ```
//!
//! # Scanning a worksheet directly
//!
//! ```
//! use sheet_redactor::domain::{Column, PhraseMatcher};
//! use sheet_redactor::service::memory::MemorySheet;
//! use sheet_redactor::scan;
//!
//! let mut sheet = MemorySheet::new("Sheet1")
//!     .with_cell(1, Column::B, "Выплата заработной платы по ведомости за май");
//! let matcher = PhraseMatcher::default();
//!
//! let result = scan(&mut sheet, Column::B, Column::C, &matcher, "ФИО <...><...>").unwrap();
//! assert_eq!(result.rows_changed, 1);
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod redaction;
pub mod service;

pub use config::RedactorConfig;
pub use domain::{CellMatcher, Column, PhraseMatcher, SheetSelector};
pub use error::{RedactorError, RedactorResult};
pub use output::{OutputNamer, SaveFormat};
pub use redaction::{
    process_file, scan, BatchOutcome, BatchRunner, FileOutcome, ProcessedFile, Progress,
    RedactionRequest, ScanResult,
};
pub use service::{
    Document, MemoryService, NativeConfig, NativeService, SpreadsheetService, Worksheet,
};
