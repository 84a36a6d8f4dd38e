//! Spreadsheet column addressing.

use crate::error::{RedactorError, RedactorResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Highest column index supported by the packed XML format (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;

/// A 1-based spreadsheet column.
///
/// Parsed either from a number (`"2"`) or from column letters (`"B"`, `"aa"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "ColumnSpec")]
pub struct Column(u32);

impl Column {
    /// Column `B`, scanned for the payroll phrase by default.
    pub const B: Column = Column(2);

    /// Column `C`, receiving the redaction marker by default.
    pub const C: Column = Column(3);

    /// Creates a column from a 1-based index.
    pub fn new(index: u32) -> RedactorResult<Self> {
        if index == 0 || index > MAX_COLUMN {
            return Err(RedactorError::InvalidInput {
                parameter: "column".to_string(),
                reason: format!("column index {} is outside 1..={}", index, MAX_COLUMN),
            });
        }
        Ok(Self(index))
    }

    /// Returns the 1-based index.
    pub fn index(self) -> u32 {
        self.0
    }

    /// Returns the column letters, e.g. `3` -> `"C"`.
    pub fn letters(self) -> String {
        let mut n = self.0;
        let mut out = Vec::new();
        while n > 0 {
            let rem = ((n - 1) % 26) as u8;
            out.push(b'A' + rem);
            n = (n - 1) / 26;
        }
        out.reverse();
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl FromStr for Column {
    type Err = RedactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let index = s.parse::<u32>().map_err(|e| RedactorError::InvalidInput {
                parameter: "column".to_string(),
                reason: format!("'{}': {}", s, e),
            })?;
            return Self::new(index);
        }

        if (1..=3).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphabetic()) {
            let index = s
                .to_ascii_uppercase()
                .bytes()
                .fold(0u32, |acc, b| acc * 26 + u32::from(b - b'A' + 1));
            return Self::new(index);
        }

        Err(RedactorError::InvalidInput {
            parameter: "column".to_string(),
            reason: format!("'{}' is neither a column number nor column letters", s),
        })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letters())
    }
}

/// Column as written in a config file: `2` or `"B"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnSpec {
    Index(u32),
    Letters(String),
}

impl TryFrom<ColumnSpec> for Column {
    type Error = RedactorError;

    fn try_from(spec: ColumnSpec) -> Result<Self, Self::Error> {
        match spec {
            ColumnSpec::Index(index) => Column::new(index),
            ColumnSpec::Letters(letters) => letters.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_letters_and_numbers() {
        assert_eq!("B".parse::<Column>().unwrap(), Column::B);
        assert_eq!("c".parse::<Column>().unwrap(), Column::C);
        assert_eq!("2".parse::<Column>().unwrap(), Column::B);
        assert_eq!("AA".parse::<Column>().unwrap().index(), 27);
        assert_eq!("XFD".parse::<Column>().unwrap().index(), MAX_COLUMN);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!("0".parse::<Column>().is_err());
        assert!("XFE".parse::<Column>().is_err());
        assert!("B2".parse::<Column>().is_err());
        assert!("".parse::<Column>().is_err());
        assert!("ABCD".parse::<Column>().is_err());
        assert!("-2".parse::<Column>().is_err());
        assert!("Б".parse::<Column>().is_err());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(" c ".parse::<Column>().unwrap(), Column::C);
        assert_eq!("\t3\n".parse::<Column>().unwrap(), Column::C);
    }

    #[test]
    fn test_letters() {
        assert_eq!(Column::C.letters(), "C");
        assert_eq!(Column::new(26).unwrap().letters(), "Z");
        assert_eq!(Column::new(28).unwrap().letters(), "AB");
        assert_eq!(Column::new(MAX_COLUMN).unwrap().to_string(), "XFD");
    }
}
