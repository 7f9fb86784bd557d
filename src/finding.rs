use crate::token::Mark;
use crate::source::SyntaxError;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A violation raised by a check. Line and column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Issue {
    pub rule_key: String,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Issue {
    pub fn new(rule_key: &str, message: impl Into<String>, line: usize, column: usize) -> Self {
        Issue {
            rule_key: rule_key.to_string(),
            message: message.into(),
            line,
            column,
        }
    }

    /// An issue located at a 0-based token mark.
    pub fn at(rule_key: &str, message: impl Into<String>, mark: Mark) -> Self {
        Self::new(rule_key, message, mark.line + 1, mark.column + 1)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Finding {
    pub rule_key: String,
    pub message: String,
    pub severity: Severity,
    pub file: Option<PathBuf>,
    pub line: usize,
    pub column: usize,
}

impl Finding {
    pub fn from_issue(issue: Issue, severity: Severity, file: Option<&Path>) -> Self {
        Finding {
            rule_key: issue.rule_key,
            message: issue.message,
            severity,
            file: file.map(Path::to_path_buf),
            line: issue.line,
            column: issue.column,
        }
    }
}

/// Outcome of analyzing one file.
#[derive(Debug, serde::Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub findings: Vec<Finding>,
    pub syntax_error: Option<SyntaxError>,
    /// Set when the file could not be read.
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl FileResult {
    pub fn unreadable(file: &Path, reason: &str) -> Self {
        FileResult {
            file: file.to_path_buf(),
            findings: vec![],
            syntax_error: None,
            error: Some(reason.to_string()),
            duration_ms: 0,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AuditReport {
    pub target: String,
    pub audit_timestamp: String,
    pub status: AuditStatus,
    pub files_scanned: usize,
    pub file_results: Vec<FileResult>,
    pub findings: Vec<Finding>,
    pub passed: bool,
}

impl AuditReport {
    /// Assembles a report from per-file results, keeping their order.
    pub fn from_results(target: &str, results: Vec<FileResult>, strict: bool) -> Self {
        let findings: Vec<Finding> = results
            .iter()
            .flat_map(|r| r.findings.iter().cloned())
            .collect();

        let status = compute_status(&findings, strict);
        let passed = matches!(status, AuditStatus::Passed);

        AuditReport {
            target: target.to_string(),
            audit_timestamp: chrono::Utc::now().to_rfc3339(),
            status,
            files_scanned: results.iter().filter(|r| r.error.is_none()).count(),
            file_results: results,
            findings,
            passed,
        }
    }

    /// Count errors, warnings, and info findings in a single pass.
    ///
    /// Returns `(errors, warnings, info)`.
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.findings
            .iter()
            .fold((0, 0, 0), |(e, w, i), f| match f.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Passed,
    Warning,
    Failed,
}

fn compute_status(findings: &[Finding], strict: bool) -> AuditStatus {
    let (has_errors, has_warnings) =
        findings
            .iter()
            .fold((false, false), |(e, w), f| match f.severity {
                Severity::Error => (true, w),
                Severity::Warning => (e, true),
                Severity::Info => (e, w),
            });

    if has_errors || (has_warnings && strict) {
        AuditStatus::Failed
    } else if has_warnings {
        AuditStatus::Warning
    } else {
        AuditStatus::Passed
    }
}
