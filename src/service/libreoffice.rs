//! Headless LibreOffice format conversion.
//!
//! Legacy binary workbooks are converted to and from the packed XML format by
//! running `soffice --headless --convert-to`. Each conversion uses a private
//! user profile inside the scratch directory so it cannot collide with a
//! LibreOffice instance the user already has open.

use crate::error::{RedactorError, RedactorResult};
use crate::output::SaveFormat;
use log::debug;
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const BACKEND: &str = "LibreOffice";

/// Executable names tried, in order, when discovering LibreOffice on `PATH`.
const PROGRAM_NAMES: &[&str] = &["soffice", "libreoffice"];

/// Handle to a LibreOffice executable used for one-shot conversions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibreOffice {
    program: PathBuf,
}

impl LibreOffice {
    /// Uses an explicitly configured executable.
    pub fn at(program: impl Into<PathBuf>) -> RedactorResult<Self> {
        let program = program.into();
        if !program.is_file() {
            return Err(RedactorError::ServiceUnavailable {
                backend: BACKEND.to_string(),
                reason: format!("executable not found at '{}'", program.display()),
            });
        }
        Ok(Self { program })
    }

    /// Searches `PATH` for a LibreOffice executable.
    pub fn discover() -> Option<Self> {
        let paths = env::var_os("PATH")?;
        env::split_paths(&paths)
            .filter(|dir| !dir.as_os_str().is_empty())
            .flat_map(|dir| {
                PROGRAM_NAMES.iter().flat_map(move |name| {
                    let base = dir.join(name);
                    [base.with_extension("exe"), base]
                })
            })
            .find(|candidate| candidate.is_file())
            .map(|program| Self { program })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Converts `input` into `format`, writing the result into `out_dir`.
    ///
    /// Returns the path of the converted file, `<out_dir>/<stem>.<ext>`.
    pub fn convert(&self, input: &Path, format: SaveFormat, out_dir: &Path) -> RedactorResult<PathBuf> {
        let stem = input.file_stem().ok_or_else(|| RedactorError::InvalidInput {
            parameter: "input".to_string(),
            reason: format!("'{}' has no file name", input.display()),
        })?;
        let expected = out_dir.join(format!("{}.{}", stem.to_string_lossy(), format.extension()));
        let profile = out_dir.join(".profile");

        let mut cmd = Command::new(&self.program);
        cmd.arg("--headless")
            .arg("--invisible")
            .arg("--nocrashreport")
            .arg("--nodefault")
            .arg("--nologo")
            .arg("--nofirststartwizard")
            .arg("--norestore")
            .arg(format!("-env:UserInstallation={}", file_url(&profile)))
            .arg("--convert-to")
            .arg(format.extension())
            .arg("--outdir")
            .arg(out_dir)
            .arg(input)
            .stdin(Stdio::null());

        debug!("Running LibreOffice conversion: {:?}", cmd);
        let output = cmd.output().map_err(|e| RedactorError::Backend {
            backend: BACKEND.to_string(),
            message: format!("failed to run '{}': {}", self.program.display(), e),
        })?;

        if !output.status.success() || !expected.is_file() {
            return Err(RedactorError::Backend {
                backend: BACKEND.to_string(),
                message: format!(
                    "conversion of '{}' to {} failed ({}): {}",
                    input.display(),
                    format.extension(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(expected)
    }
}

/// Formats an absolute path as a `file://` URL for `-env:UserInstallation`.
fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    if raw.starts_with('/') {
        format!("file://{}", raw)
    } else {
        format!("file:///{}", raw)
    }
}
