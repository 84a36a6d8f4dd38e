//! Native backend built on `umya-spreadsheet`.
//!
//! Packed XML workbooks are loaded and written by `umya-spreadsheet`, which
//! keeps styles, merged cells and column widths intact across a round trip.
//! Legacy binary workbooks go through [`LibreOffice`]: converted to packed
//! XML in a scratch directory on open, and converted back on a legacy save.

use super::libreoffice::LibreOffice;
use super::{Document, SpreadsheetService, Worksheet};
use crate::domain::{Column, SheetSelector};
use crate::error::{RedactorError, RedactorResult};
use crate::output::SaveFormat;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use umya_spreadsheet::{Cell, Spreadsheet, Worksheet as UmyaWorksheet};

const BACKEND: &str = "umya-spreadsheet";

/// Extensions `umya-spreadsheet` reads directly.
const PACKED_XML_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xltx", "xltm"];

/// Settings for [`NativeService::start`].
#[derive(Debug, Clone, Default)]
pub struct NativeConfig {
    /// LibreOffice executable for legacy workbooks. Searched on `PATH` when
    /// unset.
    pub soffice: Option<PathBuf>,
}

/// Spreadsheet service backed by `umya-spreadsheet` and, for legacy
/// workbooks, LibreOffice.
#[derive(Debug)]
pub struct NativeService {
    converter: Option<LibreOffice>,
}

impl NativeService {
    /// Starts the service.
    ///
    /// Fails with [`RedactorError::ServiceUnavailable`] when an explicitly
    /// configured LibreOffice executable does not exist. Without one, legacy
    /// workbooks are rejected file by file.
    pub fn start(config: NativeConfig) -> RedactorResult<Self> {
        let converter = match config.soffice {
            Some(program) => Some(LibreOffice::at(program)?),
            None => LibreOffice::discover(),
        };

        match &converter {
            Some(lo) => info!("Legacy workbooks converted with {}", lo.program().display()),
            None => info!("LibreOffice not found; legacy workbooks are unsupported"),
        }

        Ok(Self { converter })
    }

    /// Returns true if legacy binary workbooks can be opened and saved.
    pub fn supports_legacy(&self) -> bool {
        self.converter.is_some()
    }
}

impl SpreadsheetService for NativeService {
    type Document = NativeDocument;

    fn name(&self) -> &str {
        "native"
    }

    fn open(&mut self, path: &Path) -> RedactorResult<NativeDocument> {
        fs::metadata(path).map_err(|e| RedactorError::io(path, e))?;

        if is_packed_xml(path) {
            debug!("Reading '{}' with {}", path.display(), BACKEND);
            return Ok(NativeDocument {
                source: path.to_path_buf(),
                book: read_xlsx(path)?,
                scratch: None,
                converter: self.converter.clone(),
            });
        }

        let converter = self
            .converter
            .as_ref()
            .ok_or_else(|| legacy_unsupported(path))?;
        let scratch = scratch_dir()?;
        let converted = converter.convert(path, SaveFormat::OpenXml, scratch.path())?;
        debug!(
            "Converted '{}' to '{}' for editing",
            path.display(),
            converted.display()
        );

        Ok(NativeDocument {
            source: path.to_path_buf(),
            book: read_xlsx(&converted)?,
            scratch: Some(scratch),
            converter: Some(converter.clone()),
        })
    }

    fn quit(self) -> RedactorResult<()> {
        debug!("Native spreadsheet service stopped");
        Ok(())
    }
}

/// A workbook loaded into memory by [`NativeService`].
pub struct NativeDocument {
    source: PathBuf,
    book: Spreadsheet,
    /// Holds the converted copy of a legacy source.
    scratch: Option<TempDir>,
    converter: Option<LibreOffice>,
}

impl Document for NativeDocument {
    fn source(&self) -> &Path {
        &self.source
    }

    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection_no_check()
            .iter()
            .map(|sheet| sheet.get_name().to_string())
            .collect()
    }

    fn select_sheet(&mut self, selector: &SheetSelector) -> RedactorResult<&mut dyn Worksheet> {
        let names = self.sheet_names();
        let not_found = || RedactorError::WorksheetNotFound {
            selector: selector.to_string(),
            path: self.source.clone(),
        };
        let position = selector.position(&names).ok_or_else(not_found)?;

        let sheet: &mut dyn Worksheet = self
            .book
            .get_sheet_collection_mut()
            .get_mut(position)
            .ok_or_else(not_found)?;
        Ok(sheet)
    }

    fn save_as(&mut self, path: &Path, format: SaveFormat) -> RedactorResult<()> {
        match format {
            SaveFormat::OpenXml => write_xlsx(&self.book, path),
            SaveFormat::LegacyBinary => {
                let converter = self
                    .converter
                    .as_ref()
                    .ok_or_else(|| legacy_unsupported(path))?;
                let staging = scratch_dir()?;
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "workbook".to_string());
                let staged = staging.path().join(format!("{}.xlsx", stem));

                write_xlsx(&self.book, &staged)?;
                let converted = converter.convert(&staged, SaveFormat::LegacyBinary, staging.path())?;

                copy_to_new(&converted, path)
            }
        }
    }

    fn close(self) -> RedactorResult<()> {
        let Self { source, scratch, .. } = self;
        match scratch {
            Some(dir) => dir.close().map_err(|e| RedactorError::CloseFailure {
                path: source,
                reason: format!("failed to remove scratch directory: {}", e),
            }),
            None => Ok(()),
        }
    }
}

impl Worksheet for UmyaWorksheet {
    fn sheet_name(&self) -> &str {
        self.get_name()
    }

    fn last_used_row(&self, column: Column) -> Option<u32> {
        let col = column.index();
        (1..=self.get_highest_row())
            .rev()
            .find(|&row| !self.get_value((col, row)).is_empty())
    }

    fn read_cell(&self, row: u32, column: Column) -> Option<String> {
        let cell = self.get_cell((column.index(), row))?;
        let value = cell.get_value();
        if value.is_empty() {
            return None;
        }
        // Dates are stored as serial numbers; match them as displayed.
        if value.parse::<f64>().is_ok() && has_date_format(cell) {
            return Some(cell.get_formatted_value());
        }
        Some(value.to_string())
    }

    fn write_cell(&mut self, row: u32, column: Column, value: &str) -> RedactorResult<()> {
        self.get_cell_mut((column.index(), row)).set_value(value);
        Ok(())
    }
}

fn has_date_format(cell: &Cell) -> bool {
    cell.get_style()
        .get_number_format()
        .map(|format| is_date_format(format.get_format_code()))
        .unwrap_or(false)
}

/// True if a number format code shows day, month or year parts.
fn is_date_format(code: &str) -> bool {
    // Quoted text, bracketed colours/locales and escaped characters.
    static LITERALS: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#""[^"]*"|\[[^\]]*\]|\\."#).expect("Valid regex pattern")
    });
    static DATE_PARTS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[dDmMyY]").expect("Valid regex pattern"));

    DATE_PARTS.is_match(&LITERALS.replace_all(code, ""))
}

fn is_packed_xml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| PACKED_XML_EXTENSIONS.iter().any(|x| ext.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

fn legacy_unsupported(path: &Path) -> RedactorError {
    RedactorError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: "legacy workbooks need LibreOffice (soffice on PATH or --soffice)".to_string(),
    }
}

fn scratch_dir() -> RedactorResult<TempDir> {
    tempfile::Builder::new()
        .prefix("sheet-redactor-")
        .tempdir()
        .map_err(|e| RedactorError::io(std::env::temp_dir(), e))
}

fn read_xlsx(path: &Path) -> RedactorResult<Spreadsheet> {
    umya_spreadsheet::reader::xlsx::read(path).map_err(|e| RedactorError::Backend {
        backend: BACKEND.to_string(),
        message: format!("failed to read '{}': {}", path.display(), e),
    })
}

/// Opens `path` for writing, failing if anything already exists there.
fn create_new(path: &Path) -> RedactorResult<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| RedactorError::io(path, e))
}

/// Runs `write` against a freshly created `path`, removing the file again if
/// anything fails so no truncated workbook is left behind.
fn write_new<F>(path: &Path, write: F) -> RedactorResult<()>
where
    F: FnOnce(File) -> RedactorResult<()>,
{
    let result = write(create_new(path)?);
    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}

fn write_xlsx(book: &Spreadsheet, path: &Path) -> RedactorResult<()> {
    write_new(path, |file| write_book(book, path, file))
}

/// Serialises `book` into `sink`. The final flush is checked here; a
/// `BufWriter` dropped with pending bytes would swallow the error.
fn write_book<W: Write + Seek>(book: &Spreadsheet, path: &Path, sink: W) -> RedactorResult<()> {
    let mut writer = BufWriter::new(sink);
    umya_spreadsheet::writer::xlsx::write_writer(book, &mut writer).map_err(|e| {
        RedactorError::Backend {
            backend: BACKEND.to_string(),
            message: format!("failed to write '{}': {}", path.display(), e),
        }
    })?;
    writer.flush().map_err(|e| RedactorError::io(path, e))
}

fn copy_to_new(from: &Path, to: &Path) -> RedactorResult<()> {
    let mut source = File::open(from).map_err(|e| RedactorError::io(from, e))?;
    write_new(to, |mut file| {
        io::copy(&mut source, &mut file).map_err(|e| RedactorError::io(to, e))?;
        file.flush().map_err(|e| RedactorError::io(to, e))
    })
}
