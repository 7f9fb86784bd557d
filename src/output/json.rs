//! JSON output formatter.
//!
//! Produces a pretty-printed JSON document containing audit metadata, a
//! severity summary, per-file results and the findings.

use crate::finding::{AuditReport, AuditStatus, FileResult, Finding};

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    target: &'a str,
    audit_timestamp: &'a str,
    status: &'a AuditStatus,
    passed: bool,
    summary: Summary,
    files: &'a [FileResult],
    findings: &'a [Finding],
}

#[derive(serde::Serialize)]
struct Summary {
    files: usize,
    errors: usize,
    warnings: usize,
    info: usize,
}

/// Formats an [`AuditReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid data).
pub fn format(report: &AuditReport) -> String {
    let (errors, warnings, info) = report.count_by_severity();
    let output = JsonOutput {
        target: &report.target,
        audit_timestamp: &report.audit_timestamp,
        status: &report.status,
        passed: report.passed,
        summary: Summary {
            files: report.files_scanned,
            errors,
            warnings,
            info,
        },
        files: &report.file_results,
        findings: &report.findings,
    };

    serde_json::to_string_pretty(&output).expect("JSON serialization failed")
}
