//! Output naming and file format selection.
//!
//! Redacted copies are written next to each other in one output directory.
//! An existing file there is never overwritten: the namer walks a fixed
//! sequence of candidate names and returns the first one that is free.

use std::path::{Path, PathBuf};

/// Suffix inserted before the extension when the plain name is taken.
pub const DEFAULT_SUFFIX: &str = "__anon";

/// Extension used when the source filename has none.
pub const DEFAULT_EXTENSION: &str = "xls";

/// On-disk format of a saved workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    /// Packed XML workbook (`.xlsx`).
    OpenXml,
    /// Legacy binary workbook (`.xls`).
    LegacyBinary,
}

impl SaveFormat {
    /// Picks the format from the destination extension alone: `.xlsx` is
    /// packed XML, everything else is the legacy binary format.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Self::OpenXml,
            _ => Self::LegacyBinary,
        }
    }

    /// Extension LibreOffice uses as the conversion target for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::OpenXml => "xlsx",
            Self::LegacyBinary => "xls",
        }
    }
}

/// Resolves collision-free output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNamer {
    suffix: String,
}

impl OutputNamer {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns the first free path among `<name><ext>`, `<name><suffix><ext>`
    /// and `<name><suffix>_<n><ext>` for n = 1, 2, ...
    ///
    /// Only checks for existence; nothing is created.
    pub fn resolve(&self, output_dir: &Path, source_filename: &Path) -> PathBuf {
        let name = source_filename
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = source_filename
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        let candidate = output_dir.join(format!("{}.{}", name, ext));
        if !candidate.exists() {
            return candidate;
        }

        let candidate = output_dir.join(format!("{}{}.{}", name, self.suffix, ext));
        if !candidate.exists() {
            return candidate;
        }

        (1u64..)
            .map(|n| output_dir.join(format!("{}{}_{}.{}", name, self.suffix, n, ext)))
            .find(|candidate| !candidate.exists())
            .unwrap_or_else(|| output_dir.join(format!("{}{}.{}", name, self.suffix, ext)))
    }
}

impl Default for OutputNamer {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIX)
    }
}
