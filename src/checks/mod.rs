//! Structural checks over the YAML token stream.
//!
//! Every check implements the [`Check`] trait. Two engines back the five
//! built-in check templates:
//!
//! - [`forbidden`]: `forbidden-key`, `forbidden-value`, `int-value-in-range`
//!   and `duration-in-range`.
//! - [`required`]: `required-key`.
//!
//! Checks are configured in the TOML file (see [`crate::config`]) and compiled
//! once into [`CompiledRule`] values before any document is scanned. Use
//! [`all_rules`] to list the templates and their parameters.

pub mod ancestors;
pub mod filter;
pub mod forbidden;
pub mod required;
pub mod stream;
pub mod value;

use crate::finding::{Issue, Severity};
use crate::source::YamlSource;

/// A configured structural check.
///
/// Implementers **must** be [`Send`] + [`Sync`] because
/// [`audit::run_audit`](crate::audit::run_audit) analyzes files in parallel
/// via [rayon]. A check holds only immutable, pre-compiled configuration;
/// all scan state lives inside a single [`validate`](Check::validate) call.
pub trait Check: Send + Sync {
    /// The rule key reported on every issue this check raises.
    fn rule_key(&self) -> &str;

    /// Scans one document and appends the issues found, in document order.
    ///
    /// Documents with a syntax error produce no issues.
    fn validate(&self, source: &YamlSource, issues: &mut Vec<Issue>);
}

/// A check paired with the severity its findings are reported with.
pub struct CompiledRule {
    pub severity: Severity,
    pub check: Box<dyn Check>,
}

impl CompiledRule {
    pub fn new(severity: Severity, check: Box<dyn Check>) -> Self {
        CompiledRule { severity, check }
    }

    pub fn rule_key(&self) -> &str {
        self.check.rule_key()
    }
}

impl std::fmt::Debug for CompiledRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledRule")
            .field("rule_key", &self.rule_key())
            .field("severity", &self.severity)
            .finish()
    }
}

/// Returns `false`, after logging, when `source` cannot be scanned.
pub(crate) fn can_scan(source: &YamlSource) -> bool {
    match source.syntax_error() {
        Some(error) => {
            log::warn!(
                "Syntax error found, cannot continue checking keys: {}",
                error.message
            );
            false
        }
        None => true,
    }
}

/// Metadata for a check template.
///
/// Returned by [`all_rules`] and used by the `list-rules` and `explain` CLI
/// commands.
pub struct RuleInfo {
    /// Template name used in the `check` field of a `[[rules]]` entry.
    pub id: &'static str,
    /// Severity applied when a rule does not set one.
    pub severity: &'static str,
    /// Message of the issues raised.
    pub message: &'static str,
    /// What the check looks for.
    pub description: &'static str,
    /// `(name, meaning)` for every parameter; required ones are marked.
    pub parameters: &'static [(&'static str, &'static str)],
}

const ANCESTOR_PARAMETERS: [(&str, &str); 2] = [
    (
        "included-ancestors",
        "Regex the ancestor path (e.g. <root>:spec:template) must match",
    ),
    (
        "excluded-ancestors",
        "Regex the ancestor path must not match",
    ),
];

const FORBIDDEN_KEY_PARAMETERS: [(&str, &str); 3] = [
    ("key-name (required)", "Regex matched against the whole key name"),
    ANCESTOR_PARAMETERS[0],
    ANCESTOR_PARAMETERS[1],
];

const FORBIDDEN_VALUE_PARAMETERS: [(&str, &str); 4] = [
    ("key-name (required)", "Regex matched against the whole key name"),
    ("value (required)", "Regex searched for in the key's scalar value"),
    ANCESTOR_PARAMETERS[0],
    ANCESTOR_PARAMETERS[1],
];

const INT_RANGE_PARAMETERS: [(&str, &str); 5] = [
    ("key-name (required)", "Regex matched against the whole key name"),
    ("min-value (required)", "Smallest accepted integer"),
    ("max-value (required)", "Largest accepted integer"),
    ANCESTOR_PARAMETERS[0],
    ANCESTOR_PARAMETERS[1],
];

const DURATION_RANGE_PARAMETERS: [(&str, &str); 5] = [
    ("key-name (required)", "Regex matched against the whole key name"),
    ("min-millis (required)", "Shortest accepted duration, in milliseconds"),
    ("max-millis (required)", "Longest accepted duration, in milliseconds"),
    ANCESTOR_PARAMETERS[0],
    ANCESTOR_PARAMETERS[1],
];

const REQUIRED_KEY_PARAMETERS: [(&str, &str); 6] = [
    ("required-key-name (required)", "Regex matched against the whole key name"),
    ("parent-key-name", "Regex of the key whose value opens a scope"),
    ("parent-key-value", "Regex searched for in the parent key's value"),
    ("parent-key-name-root", "yes, not or anywhere (default anywhere)"),
    ANCESTOR_PARAMETERS[0],
    ANCESTOR_PARAMETERS[1],
];

/// Lists every check template.
pub fn all_rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "forbidden-key",
            severity: "warning",
            message: "Forbidden key found",
            description: "Reports every key whose name matches, at the matching ancestor paths.",
            parameters: &FORBIDDEN_KEY_PARAMETERS,
        },
        RuleInfo {
            id: "forbidden-value",
            severity: "warning",
            message: "Forbidden value found",
            description: "Reports matching keys whose scalar value contains the value pattern.",
            parameters: &FORBIDDEN_VALUE_PARAMETERS,
        },
        RuleInfo {
            id: "int-value-in-range",
            severity: "warning",
            message: "Value out of range found",
            description: "Reports matching keys whose integer value lies outside [min-value, max-value], \
                          and values that are not integers.",
            parameters: &INT_RANGE_PARAMETERS,
        },
        RuleInfo {
            id: "duration-in-range",
            severity: "warning",
            message: "Duration out of range found",
            description: "Reports matching keys whose duration (500ms, 3s, 2m, ...) lies outside \
                          [min-millis, max-millis], and values that are not durations.",
            parameters: &DURATION_RANGE_PARAMETERS,
        },
        RuleInfo {
            id: "required-key",
            severity: "warning",
            message: "Required <required-key-name> key not found",
            description: "Reports every scope that lacks the required key. A scope opens at a parent \
                          key with a matching value and/or while the ancestor path matches; without \
                          either, the whole document is the scope.",
            parameters: &REQUIRED_KEY_PARAMETERS,
        },
    ]
}
