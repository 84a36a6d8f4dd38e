//! Custom assertions for saved workbooks.

use std::path::Path;
use umya_spreadsheet::Spreadsheet;

/// Reads an `.xlsx` file, panicking with the path on failure.
pub fn read_workbook(path: &Path) -> Spreadsheet {
    umya_spreadsheet::reader::xlsx::read(path)
        .unwrap_or_else(|e| panic!("Failed to read workbook '{}': {}", path.display(), e))
}

/// Returns the text of `cell` on `sheet`, empty when unset.
pub fn cell_text(path: &Path, sheet: &str, cell: &str) -> String {
    let book = read_workbook(path);
    let ws = book
        .get_sheet_by_name(sheet)
        .unwrap_or_else(|| panic!("Sheet '{}' missing in '{}'", sheet, path.display()));
    ws.get_value(cell)
}

/// Asserts that a cell holds exactly `expected`.
pub fn assert_cell(path: &Path, sheet: &str, cell: &str, expected: &str) {
    let actual = cell_text(path, sheet, cell);
    assert_eq!(
        actual,
        expected,
        "Cell {}!{} in '{}' should be '{}' but was '{}'",
        sheet,
        cell,
        path.display(),
        expected,
        actual
    );
}

/// Asserts that a cell is empty.
pub fn assert_cell_empty(path: &Path, sheet: &str, cell: &str) {
    assert_cell(path, sheet, cell, "");
}

/// Asserts that a cell is formatted bold.
pub fn assert_bold(path: &Path, sheet: &str, cell: &str) {
    let book = read_workbook(path);
    let ws = book
        .get_sheet_by_name(sheet)
        .unwrap_or_else(|| panic!("Sheet '{}' missing in '{}'", sheet, path.display()));
    let bold: bool = ws
        .get_cell(cell)
        .and_then(|c| c.get_style().get_font())
        .map(|font| font.get_bold().to_owned())
        .unwrap_or(false);
    assert!(
        bold,
        "Cell {}!{} in '{}' should be bold",
        sheet,
        cell,
        path.display()
    );
}
