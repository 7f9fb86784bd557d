//! Rendering of an [`AuditReport`] and delivery of the rendered text.
//!
//! Each renderer walks the per-file results first and the flat finding list
//! second, so a file that could not be read still shows up even though it
//! produced no findings. [`render`] picks the renderer for an
//! [`OutputFormat`]; [`write_report`] sends its text to a file or stdout.

pub mod json;
pub mod pretty;
pub mod sarif;

use std::io::{self, Write};
use std::path::Path;

use crate::finding::AuditReport;

/// Report format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Per-file status lines, located findings and a result line.
    Pretty,
    /// The report fields plus a severity summary.
    Json,
    /// One SARIF 2.1.0 run; every rule key that fired is listed once.
    Sarif,
}

/// Renders `report` as text in `format`.
///
/// ```rust,no_run
/// use yaml_key_audit::output::{render, OutputFormat};
/// # use yaml_key_audit::finding::AuditReport;
/// # fn example(report: &AuditReport) {
/// print!("{}", render(report, OutputFormat::Json));
/// # }
/// ```
pub fn render(report: &AuditReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format(report),
        OutputFormat::Json => json::format(report),
        OutputFormat::Sarif => sarif::format(report),
    }
}

/// Writes the rendered report to `path`, or to stdout when there is none.
///
/// A file receives the text unchanged, so JSON and SARIF stay parseable.
pub fn write_report(report: &AuditReport, format: OutputFormat, path: Option<&Path>) -> io::Result<()> {
    let text = render(report, format);
    match path {
        Some(path) => {
            std::fs::write(path, &text)?;
            log::info!(
                "Wrote {format:?} report for {} files to {}",
                report.files_scanned,
                path.display()
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
