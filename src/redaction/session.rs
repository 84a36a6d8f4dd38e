//! Processing of a single workbook.

use super::scanner::{scan, ScanResult};
use super::RedactionRequest;
use crate::error::{RedactorError, RedactorResult};
use crate::output::SaveFormat;
use crate::service::{Document, SpreadsheetService};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// A workbook that was scanned and saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub output_path: PathBuf,
    pub scan: ScanResult,
}

/// Opens `input`, marks matching rows on the selected sheet and saves the
/// result as a new file in the request's output directory.
///
/// The document is closed without saving on every path, after success and
/// after failure alike. A failing close is logged and never replaces the
/// result; the source file is never written.
pub fn process_file<S: SpreadsheetService>(
    service: &mut S,
    input: &Path,
    request: &RedactionRequest,
) -> RedactorResult<ProcessedFile> {
    let mut document = service.open(input)?;

    let result = redact_and_save(&mut document, input, request);

    if let Err(e) = document.close() {
        warn!("Failed to close workbook '{}': {}", input.display(), e);
    }

    result
}

fn redact_and_save<D: Document>(
    document: &mut D,
    input: &Path,
    request: &RedactionRequest,
) -> RedactorResult<ProcessedFile> {
    debug!("Opened '{}'", document.source().display());
    let scanned = {
        let sheet = document.select_sheet(&request.sheet)?;
        debug!("Scanning sheet '{}'", sheet.sheet_name());
        scan(
            sheet,
            request.target_column,
            request.write_column,
            &request.matcher,
            &request.replacement,
        )?
    };

    let file_name = input
        .file_name()
        .ok_or_else(|| RedactorError::InvalidInput {
            parameter: "input".to_string(),
            reason: format!("'{}' has no file name", input.display()),
        })?;
    let output_path = request.namer.resolve(&request.output_dir, Path::new(file_name));
    let format = SaveFormat::for_path(&output_path);

    debug!("Saving '{}' as {:?}", output_path.display(), format);
    document.save_as(&output_path, format)?;

    Ok(ProcessedFile {
        output_path,
        scan: scanned,
    })
}
