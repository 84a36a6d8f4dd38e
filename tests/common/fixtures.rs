//! Test fixtures and workbook builders.
//!
//! Builds real `.xlsx` files with `umya-spreadsheet` and in-memory
//! workbooks for the service double.

use anyhow::{anyhow, Result};
use sheet_redactor::domain::Column;
use sheet_redactor::service::{MemorySheet, MemoryWorkbook};
use std::path::{Path, PathBuf};

pub const PHRASE: &str = "Выплата заработной платы по ведомости";
pub const MARKER: &str = "ФИО <...><...>";

/// Column B of the reference payroll card: rows 2 and 4 are salary rows.
pub fn sample_rows() -> Vec<Option<&'static str>> {
    vec![
        Some("foo"),
        Some("Выплата заработной платы по ведомости за март"),
        None,
        Some("Выплата заработной платы по ведомости за апрель"),
    ]
}

/// In-memory single-sheet workbook holding `rows` in column B.
pub fn memory_payroll(sheet: &str, rows: Vec<Option<&str>>) -> MemoryWorkbook {
    MemoryWorkbook::new().with_sheet(MemorySheet::new(sheet).with_column(Column::B, rows))
}

/// Builder for `.xlsx` payroll fixtures.
///
/// # Example
///
/// ```no_run
/// let path = TestWorkbookBuilder::new()
///     .with_rows(sample_rows())
///     .with_bold("C2")
///     .build(&dir.path().join("card.xlsx"))?;
/// ```
#[derive(Debug, Clone)]
pub struct TestWorkbookBuilder {
    sheet_name: String,
    extra_sheets: Vec<String>,
    column_b: Vec<Option<String>>,
    numbers: Vec<(String, f64)>,
    dates: Vec<(String, f64, String)>,
    texts: Vec<(String, String)>,
    bold: Vec<String>,
}

impl TestWorkbookBuilder {
    pub fn new() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            extra_sheets: Vec::new(),
            column_b: Vec::new(),
            numbers: Vec::new(),
            dates: Vec::new(),
            texts: Vec::new(),
            bold: Vec::new(),
        }
    }

    /// Renames the first worksheet.
    pub fn with_sheet_name(mut self, name: &str) -> Self {
        self.sheet_name = name.to_string();
        self
    }

    /// Appends an empty worksheet after the first.
    pub fn with_extra_sheet(mut self, name: &str) -> Self {
        self.extra_sheets.push(name.to_string());
        self
    }

    /// Fills column B from row 1 downwards.
    pub fn with_rows(mut self, rows: Vec<Option<&str>>) -> Self {
        self.column_b = rows.into_iter().map(|r| r.map(str::to_string)).collect();
        self
    }

    pub fn with_number(mut self, cell: &str, value: f64) -> Self {
        self.numbers.push((cell.to_string(), value));
        self
    }

    /// Stores a date serial number displayed through `format_code`.
    pub fn with_date(mut self, cell: &str, serial: f64, format_code: &str) -> Self {
        self.dates
            .push((cell.to_string(), serial, format_code.to_string()));
        self
    }

    pub fn with_text(mut self, cell: &str, value: &str) -> Self {
        self.texts.push((cell.to_string(), value.to_string()));
        self
    }

    /// Makes a cell bold, to check that styles survive the round trip.
    pub fn with_bold(mut self, cell: &str) -> Self {
        self.bold.push(cell.to_string());
        self
    }

    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let mut book = umya_spreadsheet::new_file();
        {
            let sheet = book
                .get_sheet_by_name_mut("Sheet1")
                .ok_or_else(|| anyhow!("new workbook has no Sheet1"))?;
            sheet.set_name(self.sheet_name.clone());

            for (row, value) in (1u32..).zip(&self.column_b) {
                if let Some(text) = value {
                    sheet.get_cell_mut((2u32, row)).set_value(text.clone());
                }
            }
            for (cell, value) in &self.numbers {
                sheet.get_cell_mut(cell.as_str()).set_value_number(*value);
            }
            for (cell, serial, code) in &self.dates {
                let cell = sheet.get_cell_mut(cell.as_str());
                cell.set_value_number(*serial);
                cell.get_style_mut()
                    .get_number_format_mut()
                    .set_format_code(code.clone());
            }
            for (cell, value) in &self.texts {
                sheet.get_cell_mut(cell.as_str()).set_value(value.clone());
            }
            for cell in &self.bold {
                sheet
                    .get_style_mut(cell.as_str())
                    .get_font_mut()
                    .set_bold(true);
            }
        }

        for name in &self.extra_sheets {
            book.new_sheet(name.clone()).map_err(|e| anyhow!(e))?;
        }

        umya_spreadsheet::writer::xlsx::write(&book, output_path)
            .map_err(|e| anyhow!("failed to write fixture: {}", e))?;
        Ok(output_path.to_path_buf())
    }
}
