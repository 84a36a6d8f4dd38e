//! Error types for the spreadsheet redaction library.
//!
//! Errors are split by how far they travel: service-level failures abort a
//! whole batch, per-file failures are recorded and the batch moves on, and
//! close failures are only ever logged.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for redaction operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

/// Error type for all redaction operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// The spreadsheet editing service could not be started.
    #[error("{backend} service unavailable: {reason}")]
    ServiceUnavailable { backend: String, reason: String },

    /// The spreadsheet editing service failed to shut down cleanly.
    #[error("{backend} service shutdown failed: {reason}")]
    ServiceShutdown { backend: String, reason: String },

    /// The sheet selector does not resolve to a worksheet in the workbook.
    #[error("Worksheet '{selector}' not found in '{}'", path.display())]
    WorksheetNotFound { selector: String, path: PathBuf },

    /// Error occurred while reading or writing files
    #[error("IO error for path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Closing a document failed after its processing was complete.
    #[error("Failed to close '{}': {reason}", path.display())]
    CloseFailure { path: PathBuf, reason: String },

    /// The requested file format cannot be read or written by the backend.
    #[error("Unsupported format for '{}': {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Backend-specific error (umya-spreadsheet, LibreOffice, ...)
    #[error("{backend} backend error: {message}")]
    Backend { backend: String, message: String },

    /// Invalid configuration or parameters
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// Configuration file could not be read or parsed.
    #[error("Config error in '{}': {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl RedactorError {
    /// Wraps an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error should abort a whole batch rather than one file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable { .. } | Self::ServiceShutdown { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RedactorError::WorksheetNotFound {
            selector: "Payroll".to_string(),
            path: PathBuf::from("card.xls"),
        };
        assert_eq!(
            err.to_string(),
            "Worksheet 'Payroll' not found in 'card.xls'"
        );
    }

    #[test]
    fn test_fatal_classification() {
        let err = RedactorError::ServiceUnavailable {
            backend: "native".to_string(),
            reason: "missing".to_string(),
        };
        assert!(err.is_fatal());

        let err = RedactorError::io("a.xlsx", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(!err.is_fatal());
    }
}
