//! Worksheet selection.

use std::fmt;

/// Identifies the one worksheet targeted in every workbook of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    /// 1-based ordinal position.
    Index(usize),
    /// Exact sheet name.
    Name(String),
}

impl SheetSelector {
    /// Parses user input: blank means the first sheet, all digits means an
    /// ordinal, anything else is a sheet name.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::Index(1);
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            // Digit strings too long for usize can never name a valid ordinal.
            return Self::Index(trimmed.parse().unwrap_or(usize::MAX));
        }
        Self::Name(trimmed.to_string())
    }

    /// Resolves the selector against the sheet names of one workbook,
    /// returning the 0-based position.
    pub fn position<S: AsRef<str>>(&self, names: &[S]) -> Option<usize> {
        match self {
            Self::Index(n) if *n >= 1 && *n <= names.len() => Some(n - 1),
            Self::Index(_) => None,
            Self::Name(name) => names.iter().position(|s| s.as_ref() == name),
        }
    }
}

impl Default for SheetSelector {
    fn default() -> Self {
        Self::Index(1)
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(n) => write!(f, "{}", n),
            Self::Name(name) => write!(f, "{}", name),
        }
    }
}
