//! The redaction pipeline: scan a worksheet, process one workbook, run a batch.
//!
//! All inputs of a run travel in one [`RedactionRequest`], so the pipeline
//! does not depend on where they came from (CLI flags, a config file, tests).

pub mod batch;
pub mod scanner;
pub mod session;

pub use batch::{BatchOutcome, BatchRunner, FileOutcome, Progress};
pub use scanner::{scan, ScanResult};
pub use session::{process_file, ProcessedFile};

use crate::domain::{Column, PhraseMatcher, SheetSelector};
use crate::error::{RedactorError, RedactorResult};
use crate::output::OutputNamer;
use std::path::PathBuf;

/// Marker written over the employee name on matching rows.
pub const DEFAULT_REPLACEMENT: &str = "ФИО <...><...>";

/// Everything one batch needs to know besides the file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionRequest {
    pub sheet: SheetSelector,
    pub matcher: PhraseMatcher,
    pub replacement: String,
    pub target_column: Column,
    pub write_column: Column,
    pub output_dir: PathBuf,
    pub namer: OutputNamer,
}

impl RedactionRequest {
    /// Creates a request with the payroll defaults: first sheet, the salary
    /// phrase searched in column B, the marker written to column C.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            sheet: SheetSelector::default(),
            matcher: PhraseMatcher::default(),
            replacement: DEFAULT_REPLACEMENT.to_string(),
            target_column: Column::B,
            write_column: Column::C,
            output_dir: output_dir.into(),
            namer: OutputNamer::default(),
        }
    }

    pub fn with_sheet(mut self, sheet: SheetSelector) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn with_phrase(mut self, phrase: impl Into<String>) -> RedactorResult<Self> {
        self.matcher = PhraseMatcher::new(phrase)?;
        Ok(self)
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = replacement.into();
        self
    }

    /// Sets the scanned and written columns, which must differ.
    pub fn with_columns(mut self, target: Column, write: Column) -> RedactorResult<Self> {
        if target == write {
            return Err(RedactorError::InvalidInput {
                parameter: "write_column".to_string(),
                reason: format!("column {} cannot be both scanned and written", target),
            });
        }
        self.target_column = target;
        self.write_column = write;
        Ok(self)
    }

    pub fn with_namer(mut self, namer: OutputNamer) -> Self {
        self.namer = namer;
        self
    }
}
