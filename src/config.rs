//! File-based configuration.
//!
//! A config file lets a site fix its own phrase, marker and column layout
//! instead of passing flags on every run. Every key is optional; anything
//! left out keeps the built-in payroll defaults.
//!
//! ```toml
//! phrase = "Выплата заработной платы по ведомости"
//! replacement = "ФИО <...><...>"
//! sheet = "1"
//! target_column = "B"
//! write_column = 3
//! suffix = "__anon"
//! soffice = "/usr/bin/soffice"
//! ```

use crate::domain::{Column, SheetSelector};
use crate::error::{RedactorError, RedactorResult};
use crate::output::OutputNamer;
use crate::redaction::RedactionRequest;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from a TOML file. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedactorConfig {
    pub phrase: Option<String>,
    pub replacement: Option<String>,
    pub sheet: Option<String>,
    pub target_column: Option<Column>,
    pub write_column: Option<Column>,
    pub suffix: Option<String>,
    pub soffice: Option<PathBuf>,
}

impl RedactorConfig {
    /// Loads and parses a config file.
    pub fn load(path: &Path) -> RedactorResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| RedactorError::io(path, e))?;
        let config = Self::parse(&text).map_err(|reason| RedactorError::Config {
            path: path.to_path_buf(),
            reason,
        })?;
        debug!("Loaded config from '{}': {:?}", path.display(), config);
        Ok(config)
    }

    fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Overlays `other` on top of `self`; keys set in `other` win.
    pub fn merge(self, other: RedactorConfig) -> Self {
        Self {
            phrase: other.phrase.or(self.phrase),
            replacement: other.replacement.or(self.replacement),
            sheet: other.sheet.or(self.sheet),
            target_column: other.target_column.or(self.target_column),
            write_column: other.write_column.or(self.write_column),
            suffix: other.suffix.or(self.suffix),
            soffice: other.soffice.or(self.soffice),
        }
    }

    /// Builds the request for a batch writing into `output_dir`.
    pub fn to_request(
        &self,
        output_dir: impl Into<PathBuf>,
    ) -> RedactorResult<RedactionRequest> {
        let mut request = RedactionRequest::new(output_dir);

        if let Some(sheet) = &self.sheet {
            request = request.with_sheet(SheetSelector::parse(sheet));
        }
        if let Some(phrase) = &self.phrase {
            request = request.with_phrase(phrase.clone())?;
        }
        if let Some(replacement) = &self.replacement {
            request = request.with_replacement(replacement.clone());
        }
        if let Some(suffix) = &self.suffix {
            request = request.with_namer(OutputNamer::new(suffix.clone()));
        }

        let target = self.target_column.unwrap_or(request.target_column);
        let write = self.write_column.unwrap_or(request.write_column);
        request.with_columns(target, write)
    }
}
