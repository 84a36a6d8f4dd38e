//! Column scan that marks matching rows.

use crate::domain::{CellMatcher, Column};
use crate::error::RedactorResult;
use crate::service::Worksheet;
use log::debug;

/// Statistics about one worksheet scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Rows visited: 1 through the last used row of the scanned column.
    pub rows_examined: u32,

    /// Rows whose write column received the replacement.
    pub rows_changed: u32,
}

impl ScanResult {
    /// Returns true if any row was changed.
    pub fn has_changes(&self) -> bool {
        self.rows_changed > 0
    }
}

/// Scans `target` top to bottom and writes `replacement` into `write` on
/// every row whose `target` text matches.
///
/// Rows that do not match are left alone, including their `write` cell.
/// An empty `target` column examines nothing.
pub fn scan(
    sheet: &mut dyn Worksheet,
    target: Column,
    write: Column,
    matcher: &dyn CellMatcher,
    replacement: &str,
) -> RedactorResult<ScanResult> {
    let last_row = match sheet.last_used_row(target) {
        Some(row) => row,
        None => {
            debug!("Column {} of '{}' is empty", target, sheet.sheet_name());
            return Ok(ScanResult::default());
        }
    };

    let mut result = ScanResult {
        rows_examined: last_row,
        rows_changed: 0,
    };

    for row in 1..=last_row {
        let Some(text) = sheet.read_cell(row, target) else {
            continue;
        };
        if matcher.matches(&text) {
            sheet.write_cell(row, write, replacement)?;
            result.rows_changed += 1;
            debug!("Row {}: '{}' marked in column {}", row, matcher.describe(), write);
        }
    }

    Ok(result)
}
