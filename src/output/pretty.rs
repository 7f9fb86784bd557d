//! Human-readable colored text formatter.
//!
//! Produces a terminal-friendly report with ANSI color codes, showing the
//! status of every analyzed file, individual findings with source locations,
//! and a one-line summary.

use crate::finding::{AuditReport, AuditStatus, FileResult, Severity};
use colored::Colorize;

/// Formats an [`AuditReport`] as human-readable, ANSI-colored text.
///
/// Sections rendered (in order):
/// 1. **Header**: audited path and timestamp.
/// 2. **Files**: per-file pass/fail status.
/// 3. **Findings**: findings with severity, rule, message and `file:line:column`.
/// 4. **Summary**: overall status and severity counts.
pub fn format(report: &AuditReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{}\n",
        format!("  YAML Key Audit: {}  ", report.target)
            .bold()
            .on_blue()
            .white()
    ));
    out.push_str(&format!("  Timestamp: {}\n\n", report.audit_timestamp));

    if !report.file_results.is_empty() {
        out.push_str(&format!("{}\n", "Files".bold().underline()));
        for result in &report.file_results {
            out.push_str(&file_line(result));
        }
        out.push('\n');
    }

    if !report.findings.is_empty() {
        out.push_str(&format!("{}\n", "Findings".bold().underline()));
        for finding in &report.findings {
            let severity_str = match finding.severity {
                Severity::Error => "ERROR".red().bold().to_string(),
                Severity::Warning => " WARN".yellow().bold().to_string(),
                Severity::Info => " INFO".blue().to_string(),
            };

            out.push_str(&format!(
                "  [{severity_str}] {rule_key:<25} {message}\n",
                rule_key = finding.rule_key.dimmed(),
                message = finding.message,
            ));
            if let Some(ref file) = finding.file {
                let location = format!("{}:{}:{}", file.display(), finding.line, finding.column);
                out.push_str(&format!("         {}\n", location.dimmed()));
            }
        }
        out.push('\n');
    }

    let status_str = match report.status {
        AuditStatus::Passed => "PASSED".green().bold().to_string(),
        AuditStatus::Warning => "WARNING".yellow().bold().to_string(),
        AuditStatus::Failed => "FAILED".red().bold().to_string(),
    };

    let (errors, warnings, info) = report.count_by_severity();
    out.push_str(&format!(
        "Result: {status_str}  |  {} files, {} errors, {} warnings, {} info\n",
        report.files_scanned, errors, warnings, info,
    ));

    out
}

fn file_line(result: &FileResult) -> String {
    let icon = if result.error.is_some() {
        "SKIP".dimmed().to_string()
    } else if result.syntax_error.is_some() {
        "PARSE".red().bold().to_string()
    } else {
        let (has_err, has_warn) =
            result
                .findings
                .iter()
                .fold((false, false), |(e, w), f| match f.severity {
                    Severity::Error => (true, w),
                    Severity::Warning => (e, true),
                    Severity::Info => (e, w),
                });
        if has_err {
            "FAIL".red().bold().to_string()
        } else if has_warn {
            "WARN".yellow().bold().to_string()
        } else {
            "PASS".green().bold().to_string()
        }
    };

    let detail = match &result.error {
        Some(reason) => reason.dimmed().to_string(),
        None => format!("{} findings", result.findings.len()),
    };

    format!(
        "  [{icon}] {name}  {detail}\n",
        name = result.file.display(),
    )
}
