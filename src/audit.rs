//! Audit orchestration.
//!
//! The [`run_audit`] function is the main entry-point for auditing a YAML
//! file or a directory tree. It collects the files to analyze, runs every
//! [`CompiledRule`] over each of them (files in parallel via [rayon]), and
//! produces a final [`AuditReport`].

use crate::checks::CompiledRule;
use crate::config::{Config, FilesConfig, ParsingErrorConfig};
use crate::finding::{AuditReport, FileResult, Finding, Issue};
use crate::source::YamlSource;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Rule key of the findings raised for documents that fail to load.
pub const PARSING_ERROR_RULE: &str = "parsing-error";

/// Runs a complete audit on a file or directory.
///
/// # Pipeline
///
/// 1. Collects the files to analyze (see [`collect_files`]).
/// 2. Analyzes the files **in parallel** using [rayon]; every file gets its
///    own [`YamlSource`] and every check its own scan state.
/// 3. Assembles the final [`AuditReport`], in file order.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use yaml_key_audit::{audit, config::Config};
///
/// let config = Config::load(None).unwrap();
/// let rules = config.compile().unwrap();
/// let report = audit::run_audit(Path::new("./manifests"), &rules, &config);
///
/// std::process::exit(if report.passed { 0 } else { 1 });
/// ```
pub fn run_audit(path: &Path, rules: &[CompiledRule], config: &Config) -> AuditReport {
    let target = path.display().to_string();
    let strict = config.strict.enabled;

    if rules.is_empty() && !config.parsing_error.enabled {
        log::info!("No active rules found, skipping analysis of {target}");
        return AuditReport::from_results(&target, vec![], strict);
    }

    let files = collect_files(path, &config.files);
    log::debug!("{} file(s) to analyze under {target}", files.len());

    let results: Vec<FileResult> = files
        .par_iter()
        .map(|file| analyze_file(file, rules, config))
        .collect();

    AuditReport::from_results(&target, results, strict)
}

/// Lists the files to analyze, sorted by path.
///
/// A file given directly is always analyzed; a directory is walked
/// recursively and only files matching the configured suffixes are kept.
pub fn collect_files(path: &Path, files: &FilesConfig) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && files.matches(e.path()))
        .map(|e| e.into_path())
        .collect()
}

/// Reads and analyzes one file.
///
/// A file that cannot be read is logged and yields no findings.
pub fn analyze_file(path: &Path, rules: &[CompiledRule], config: &Config) -> FileResult {
    let start = Instant::now();
    log::debug!("Analyzing {}", path.display());

    let source = match YamlSource::read(path, config.files.filter_utf8_line_breaks) {
        Ok(source) => source,
        Err(e) => {
            log::warn!("Cannot read source code {}: {e}", path.display());
            return FileResult::unreadable(path, &e.to_string());
        }
    };

    let findings = analyze_source(&source, rules, &config.parsing_error);

    FileResult {
        file: path.to_path_buf(),
        findings,
        syntax_error: source.syntax_error().cloned(),
        error: None,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Runs every rule over an already loaded document.
///
/// Findings are grouped by rule, in rule order, each group in document order.
pub fn analyze_source(
    source: &YamlSource,
    rules: &[CompiledRule],
    parsing_error: &ParsingErrorConfig,
) -> Vec<Finding> {
    let file = source.path();
    let mut findings = Vec::new();

    if let Some(error) = source.syntax_error() {
        let name = file.map_or_else(|| "<input>".to_string(), |p| p.display().to_string());
        log::warn!("Unable to parse file: {name}");
        log::warn!("Cause: {error}");
        if parsing_error.enabled {
            let issue = Issue::new(
                PARSING_ERROR_RULE,
                format!("Parse error: {}", error.message),
                error.line,
                error.column,
            );
            findings.push(Finding::from_issue(issue, parsing_error.severity, file));
        }
    }

    for rule in rules {
        log::debug!("Checking rule: {}", rule.rule_key());
        let mut issues = Vec::new();
        rule.check.validate(source, &mut issues);
        findings.extend(
            issues
                .into_iter()
                .map(|issue| Finding::from_issue(issue, rule.severity, file)),
        );
    }

    findings
}
