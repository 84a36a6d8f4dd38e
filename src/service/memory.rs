//! In-memory spreadsheet service.
//!
//! Workbooks live in a shared [`MemoryState`] keyed by path. Opening one
//! hands out a private copy, so edits never reach the registered original;
//! saving records the copy and drops an empty marker file at the destination
//! so output naming sees the collision exactly as it would on real files.

use super::{Document, SpreadsheetService, Worksheet};
use crate::domain::{Column, SheetSelector};
use crate::error::{RedactorError, RedactorResult};
use crate::output::SaveFormat;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl fmt::Display for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<&str> for MemoryValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MemoryValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for MemoryValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for MemoryValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A worksheet held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    name: String,
    cells: BTreeMap<(u32, u32), MemoryValue>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Sets a cell, builder style.
    pub fn with_cell(mut self, row: u32, column: Column, value: impl Into<MemoryValue>) -> Self {
        self.set(row, column, value);
        self
    }

    /// Fills `column` from row 1 downwards; `None` leaves a row empty.
    pub fn with_column<V: Into<MemoryValue>>(
        mut self,
        column: Column,
        values: impl IntoIterator<Item = Option<V>>,
    ) -> Self {
        for (row, value) in (1u32..).zip(values) {
            if let Some(value) = value {
                self.set(row, column, value);
            }
        }
        self
    }

    pub fn set(&mut self, row: u32, column: Column, value: impl Into<MemoryValue>) {
        self.cells.insert((row, column.index()), value.into());
    }

    pub fn value(&self, row: u32, column: Column) -> Option<&MemoryValue> {
        self.cells.get(&(row, column.index()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Worksheet for MemorySheet {
    fn sheet_name(&self) -> &str {
        &self.name
    }

    fn last_used_row(&self, column: Column) -> Option<u32> {
        self.cells
            .iter()
            .filter(|((_, col), value)| *col == column.index() && !value.to_string().is_empty())
            .map(|((row, _), _)| *row)
            .max()
    }

    fn read_cell(&self, row: u32, column: Column) -> Option<String> {
        self.value(row, column)
            .map(|v| v.to_string())
            .filter(|text| !text.is_empty())
    }

    fn write_cell(&mut self, row: u32, column: Column, value: &str) -> RedactorResult<()> {
        self.set(row, column, value);
        Ok(())
    }
}

/// A workbook held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: MemorySheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn sheets(&self) -> &[MemorySheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// A workbook recorded by a `save_as` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedWorkbook {
    pub path: PathBuf,
    pub format: SaveFormat,
    pub workbook: MemoryWorkbook,
}

/// Everything a [`MemoryService`] has seen, plus failure switches.
#[derive(Debug, Default)]
pub struct MemoryState {
    pub workbooks: HashMap<PathBuf, MemoryWorkbook>,
    pub opened: Vec<PathBuf>,
    pub saved: Vec<SavedWorkbook>,
    pub closed: Vec<PathBuf>,
    pub quit_count: usize,
    /// Every `close` reports a failure after releasing the document.
    pub fail_close: bool,
    /// Every `save_as` fails with a permission error.
    pub fail_save: bool,
    /// `quit` fails.
    pub fail_quit: bool,
}

/// Spreadsheet service double backed by [`MemoryState`].
#[derive(Debug, Clone, Default)]
pub struct MemoryService {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a workbook to be served for `path`.
    pub fn with_workbook(self, path: impl Into<PathBuf>, workbook: MemoryWorkbook) -> Self {
        self.state.borrow_mut().workbooks.insert(path.into(), workbook);
        self
    }

    /// Shared handle to the recorded state; stays valid after `quit`.
    pub fn state(&self) -> Rc<RefCell<MemoryState>> {
        Rc::clone(&self.state)
    }
}

impl SpreadsheetService for MemoryService {
    type Document = MemoryDocument;

    fn name(&self) -> &str {
        "memory"
    }

    fn open(&mut self, path: &Path) -> RedactorResult<MemoryDocument> {
        let mut state = self.state.borrow_mut();
        let workbook = state.workbooks.get(path).cloned().ok_or_else(|| {
            RedactorError::io(
                path,
                io::Error::new(io::ErrorKind::NotFound, "no such workbook"),
            )
        })?;
        state.opened.push(path.to_path_buf());

        Ok(MemoryDocument {
            source: path.to_path_buf(),
            workbook,
            state: Rc::clone(&self.state),
        })
    }

    fn quit(self) -> RedactorResult<()> {
        let mut state = self.state.borrow_mut();
        state.quit_count += 1;
        if state.fail_quit {
            return Err(RedactorError::ServiceShutdown {
                backend: "memory".to_string(),
                reason: "injected quit failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Private copy of a registered workbook.
#[derive(Debug)]
pub struct MemoryDocument {
    source: PathBuf,
    workbook: MemoryWorkbook,
    state: Rc<RefCell<MemoryState>>,
}

impl Document for MemoryDocument {
    fn source(&self) -> &Path {
        &self.source
    }

    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn select_sheet(&mut self, selector: &SheetSelector) -> RedactorResult<&mut dyn Worksheet> {
        let position = selector
            .position(&self.sheet_names())
            .ok_or_else(|| RedactorError::WorksheetNotFound {
                selector: selector.to_string(),
                path: self.source.clone(),
            })?;
        let sheet: &mut dyn Worksheet = &mut self.workbook.sheets[position];
        Ok(sheet)
    }

    fn save_as(&mut self, path: &Path, format: SaveFormat) -> RedactorResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_save {
            return Err(RedactorError::io(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "injected save failure"),
            ));
        }

        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| RedactorError::io(path, e))?;

        state.saved.push(SavedWorkbook {
            path: path.to_path_buf(),
            format,
            workbook: self.workbook.clone(),
        });
        Ok(())
    }

    fn close(self) -> RedactorResult<()> {
        let mut state = self.state.borrow_mut();
        state.closed.push(self.source.clone());
        if state.fail_close {
            return Err(RedactorError::CloseFailure {
                path: self.source,
                reason: "injected close failure".to_string(),
            });
        }
        Ok(())
    }
}
