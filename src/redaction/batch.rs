//! Sequential processing of a list of workbooks on one service session.

use super::session::{process_file, ProcessedFile};
use super::RedactionRequest;
use crate::error::{RedactorError, RedactorResult};
use crate::service::SpreadsheetService;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of processing one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub input: PathBuf,

    /// The saved output, or a description of why the file failed.
    pub result: Result<ProcessedFile, String>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&str> {
        self.result.as_ref().err().map(String::as_str)
    }
}

/// Position in the batch, reported after each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Files finished so far, including the one just reported.
    pub completed: usize,
    pub total: usize,
}

/// Aggregated statistics of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub succeeded: usize,
    pub failed: usize,

    /// Rows changed across all successful files.
    pub total_changed: u64,

    /// One entry per input, in input order.
    pub files: Vec<FileOutcome>,
}

impl BatchOutcome {
    /// Returns true if every file was processed without error.
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, outcome: FileOutcome) {
        match &outcome.result {
            Ok(processed) => {
                self.succeeded += 1;
                self.total_changed += u64::from(processed.scan.rows_changed);
            }
            Err(_) => self.failed += 1,
        }
        self.files.push(outcome);
    }
}

/// Runs a [`RedactionRequest`] over a list of files.
///
/// Files are processed one at a time in the given order. A failing file is
/// recorded and the batch moves on; only service start-up and shutdown
/// failures reach the caller.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    request: RedactionRequest,
}

impl BatchRunner {
    pub fn new(request: RedactionRequest) -> Self {
        Self { request }
    }

    /// Processes `files` on `service`, then shuts the service down exactly
    /// once, whatever happened to the individual files.
    ///
    /// `progress` is called synchronously after every file.
    pub fn run<S, F>(
        &self,
        mut service: S,
        files: &[PathBuf],
        mut progress: F,
    ) -> RedactorResult<BatchOutcome>
    where
        S: SpreadsheetService,
        F: FnMut(Progress, &FileOutcome),
    {
        let output_dir = &self.request.output_dir;
        let outcome = fs::create_dir_all(output_dir)
            .map_err(|e| RedactorError::io(output_dir, e))
            .map(|()| self.process_all(&mut service, files, &mut progress));

        let backend = service.name().to_string();
        let shutdown = service.quit();

        let outcome = outcome?;
        if let Err(e) = shutdown {
            warn!(
                "{} service failed to stop after {} succeeded, {} failed",
                backend, outcome.succeeded, outcome.failed
            );
            return Err(e);
        }

        info!(
            "Batch finished: {} succeeded, {} failed, {} rows changed",
            outcome.succeeded, outcome.failed, outcome.total_changed
        );
        Ok(outcome)
    }

    fn process_all<S, F>(&self, service: &mut S, files: &[PathBuf], progress: &mut F) -> BatchOutcome
    where
        S: SpreadsheetService,
        F: FnMut(Progress, &FileOutcome),
    {
        let mut outcome = BatchOutcome::default();
        let total = files.len();

        for (index, input) in files.iter().enumerate() {
            let file = self.process_one(service, input);
            progress(
                Progress {
                    completed: index + 1,
                    total,
                },
                &file,
            );
            outcome.record(file);
        }

        outcome
    }

    fn process_one<S: SpreadsheetService>(&self, service: &mut S, input: &Path) -> FileOutcome {
        let result = match process_file(service, input, &self.request) {
            Ok(processed) => {
                info!(
                    "{}: {} of {} rows changed -> {}",
                    input.display(),
                    processed.scan.rows_changed,
                    processed.scan.rows_examined,
                    processed.output_path.display()
                );
                Ok(processed)
            }
            Err(e) => {
                warn!("{}: {}", input.display(), e);
                Err(e.to_string())
            }
        };

        FileOutcome {
            input: input.to_path_buf(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;
    use crate::service::memory::{MemoryService, MemorySheet, MemoryWorkbook};
    use tempfile::TempDir;

    fn payroll(rows: &[&str]) -> MemoryWorkbook {
        let sheet = MemorySheet::new("Sheet1").with_column(Column::B, rows.iter().map(|r| Some(*r)));
        MemoryWorkbook::new().with_sheet(sheet)
    }

    #[test]
    fn test_missing_file_does_not_abort() {
        let out = TempDir::new().unwrap();
        let service = MemoryService::new().with_workbook(
            "b.xlsx",
            payroll(&["Выплата заработной платы по ведомости"]),
        );
        let state = service.state();
        let files = vec![PathBuf::from("a.xlsx"), PathBuf::from("b.xlsx")];

        let outcome = BatchRunner::new(RedactionRequest::new(out.path()))
            .run(service, &files, |_, _| {})
            .unwrap();

        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.total_changed, 1);
        assert!(outcome.files[0].error().is_some());
        assert_eq!(state.borrow().quit_count, 1);
    }

    #[test]
    fn test_creates_output_dir() {
        let root = TempDir::new().unwrap();
        let out = root.path().join("anon_output");
        let service = MemoryService::new();

        let outcome = BatchRunner::new(RedactionRequest::new(&out))
            .run(service, &[], |_, _| {})
            .unwrap();

        assert!(out.is_dir());
        assert!(outcome.is_complete_success());
    }
}
