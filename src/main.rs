//! Spreadsheet Redaction CLI Application.
//!
//! This binary drives the redaction library over a list of payroll
//! workbooks, printing one log block per file and a final summary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use sheet_redactor::{
    BatchOutcome, BatchRunner, Column, Document, FileOutcome, NativeConfig, NativeService,
    Progress, RedactorConfig, SpreadsheetService,
};

/// Directory created next to the first input when no output folder is given.
const DEFAULT_OUTPUT_DIR: &str = "anon_output";

/// Payroll Spreadsheet Redaction Tool
///
/// Finds rows whose description column contains the salary phrase and writes
/// a placeholder into the name column. Results are saved as new files; the
/// originals and their formatting are left untouched.
#[derive(Parser)]
#[command(name = "sheet-redactor")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Spreadsheet files to redact (.xls/.xlsx)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Folder for the redacted copies [default: anon_output next to the first file]
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Worksheet to process: 1-based number or sheet name [default: 1]
    #[arg(short, long, value_name = "SHEET")]
    sheet: Option<String>,

    /// Phrase that marks a row for redaction (case-sensitive substring)
    #[arg(long, value_name = "TEXT")]
    phrase: Option<String>,

    /// Text written into the redacted cell
    #[arg(long, value_name = "TEXT")]
    replacement: Option<String>,

    /// Column searched for the phrase, as letters or number [default: B]
    #[arg(long, value_name = "COLUMN")]
    target_column: Option<Column>,

    /// Column receiving the replacement, as letters or number [default: C]
    #[arg(long, value_name = "COLUMN")]
    write_column: Option<Column>,

    /// Suffix added to output names that already exist [default: __anon]
    #[arg(long, value_name = "SUFFIX")]
    suffix: Option<String>,

    /// TOML config file with defaults for the options above
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// LibreOffice executable used for legacy .xls files
    #[arg(long, value_name = "PATH")]
    soffice: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the worksheets of a workbook (for choosing --sheet)
    Sheets {
        /// Workbook file path
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// LibreOffice executable used for legacy .xls files
        #[arg(long, value_name = "PATH")]
        soffice: Option<PathBuf>,
    },
}

impl Cli {
    /// Settings given as flags, in config-file shape so they can be merged.
    fn overrides(&self) -> RedactorConfig {
        RedactorConfig {
            phrase: self.phrase.clone(),
            replacement: self.replacement.clone(),
            sheet: self.sheet.clone(),
            target_column: self.target_column,
            write_column: self.write_column,
            suffix: self.suffix.clone(),
            soffice: self.soffice.clone(),
        }
    }
}

/// Redaction command handler.
struct RedactionHandler {
    verbose: bool,
}

impl RedactionHandler {
    fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Runs a batch over `files` and prints per-file results and a summary.
    fn redact(
        &self,
        files: Vec<PathBuf>,
        out_dir: Option<PathBuf>,
        config: RedactorConfig,
    ) -> Result<BatchOutcome> {
        let files = dedup_files(files);
        if files.is_empty() {
            anyhow::bail!("No input files specified.");
        }

        let out_dir = out_dir.unwrap_or_else(|| default_output_dir(&files[0]));
        let request = config
            .to_request(&out_dir)
            .with_context(|| "Invalid redaction settings")?;

        if self.verbose {
            println!("Output:  {}", out_dir.display());
            println!("Sheet:   {}", request.sheet);
            println!("Phrase:  {}", request.matcher.phrase());
            println!(
                "Columns: {} -> {}",
                request.target_column, request.write_column
            );
        }

        let service = NativeService::start(NativeConfig {
            soffice: config.soffice.clone(),
        })
        .with_context(|| "Failed to start spreadsheet service")?;

        println!("=== Start ===");
        let outcome = BatchRunner::new(request)
            .run(service, &files, print_file_outcome)
            .with_context(|| "Redaction failed")?;
        println!("=== Done ===");

        print_summary(&outcome);
        Ok(outcome)
    }

    /// Prints the worksheet names of one workbook.
    fn list_sheets(&self, input: &Path, soffice: Option<PathBuf>) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }

        let mut service = NativeService::start(NativeConfig { soffice })
            .with_context(|| "Failed to start spreadsheet service")?;
        let document = service
            .open(input)
            .with_context(|| format!("Failed to open {}", input.display()))?;

        for (i, name) in document.sheet_names().iter().enumerate() {
            println!("{}: {}", i + 1, name);
        }

        if let Err(e) = document.close() {
            log::warn!("Failed to close workbook '{}': {}", input.display(), e);
        }
        service.quit()?;
        Ok(())
    }
}

fn print_file_outcome(progress: Progress, file: &FileOutcome) {
    println!("{}/{}: {}", progress.completed, progress.total, file.input.display());
    match &file.result {
        Ok(processed) => {
            println!("  → {} replacement(s)", processed.scan.rows_changed);
            println!("  → {}", processed.output_path.display());
        }
        Err(e) => println!("  ✖ Error: {}", e),
    }
}

fn print_summary(outcome: &BatchOutcome) {
    let mark = if outcome.is_complete_success() { "✓" } else { "⚠" };
    println!(
        "{} Succeeded: {}, failed: {}, replaced total: {}",
        mark, outcome.succeeded, outcome.failed, outcome.total_changed
    );
}

/// Drops repeated paths, keeping the first occurrence.
fn dedup_files(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|f| seen.insert(f.clone()))
        .collect()
}

fn default_output_dir(first_input: &Path) -> PathBuf {
    first_input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_OUTPUT_DIR)
}

fn init_logger(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let handler = RedactionHandler::new(cli.verbose);

    match &cli.command {
        Some(Commands::Sheets { input, soffice }) => {
            handler.list_sheets(input, soffice.clone())?;
        }
        None => {
            let base = match &cli.config {
                Some(path) => RedactorConfig::load(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => RedactorConfig::default(),
            };
            let config = base.merge(cli.overrides());
            handler.redact(cli.files.clone(), cli.out_dir.clone(), config)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let files = vec![
            PathBuf::from("b.xls"),
            PathBuf::from("a.xls"),
            PathBuf::from("b.xls"),
        ];
        assert_eq!(
            dedup_files(files),
            vec![PathBuf::from("b.xls"), PathBuf::from("a.xls")]
        );
    }

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Path::new("/data/cards/card.xls")),
            PathBuf::from("/data/cards/anon_output")
        );
        assert_eq!(
            default_output_dir(Path::new("card.xls")),
            PathBuf::from("anon_output")
        );
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "sheet-redactor",
            "--phrase",
            "Аванс",
            "--target-column",
            "D",
            "card.xls",
        ]);
        let config = RedactorConfig {
            phrase: Some("from file".to_string()),
            sheet: Some("Лист2".to_string()),
            ..Default::default()
        }
        .merge(cli.overrides());

        assert_eq!(config.phrase.as_deref(), Some("Аванс"));
        assert_eq!(config.sheet.as_deref(), Some("Лист2"));
        assert_eq!(config.target_column, Some(Column::new(4).unwrap()));
        assert_eq!(cli.files, vec![PathBuf::from("card.xls")]);
    }
}
