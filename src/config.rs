//! Configuration loading and rule compilation.
//!
//! The configuration is a TOML file, `yaml-key-audit.toml` in the current
//! working directory by default. It selects which files are analyzed and
//! declares the rules: each `[[rules]]` entry instantiates one of the check
//! templates listed by [`crate::checks::all_rules`].
//!
//! ```toml
//! [files]
//! suffixes = [".yaml", ".yml"]
//!
//! [[rules]]
//! check = "forbidden-key"
//! key = "no-host-network"
//! key-name = "hostNetwork"
//! included-ancestors = "<root>:spec.*"
//!
//! [[rules]]
//! check = "required-key"
//! severity = "error"
//! parent-key-name = "kind"
//! parent-key-value = "^Deployment$"
//! parent-key-name-root = "yes"
//! required-key-name = "readinessProbe"
//! ```
//!
//! [`Config::load`] only deserializes; [`Config::compile`] validates the
//! parameters of every rule and compiles its patterns once, before any
//! document is scanned.

use crate::audit::PARSING_ERROR_RULE;
use crate::checks::filter::{self, AncestorFilter, KeyFilter};
use crate::checks::forbidden::{ForbiddenCheck, ForbiddenRule};
use crate::checks::required::{ParentKey, RequiredKeyCheck, RootPosition};
use crate::checks::CompiledRule;
use crate::finding::Severity;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "yaml-key-audit.toml";

/// Errors raised while loading or compiling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    /// A parameter the rule's check needs is absent.
    #[error("Rule '{rule}': missing parameter '{parameter}'")]
    MissingParameter {
        rule: String,
        parameter: &'static str,
    },

    #[error("Rule '{rule}': invalid regex in '{parameter}': {source}")]
    InvalidRegex {
        rule: String,
        parameter: &'static str,
        source: regex::Error,
    },

    #[error("Rule '{rule}': minimum {min} is greater than maximum {max}")]
    InvertedRange { rule: String, min: i64, max: i64 },

    /// Two rules report under the same key; set `key` on one of them.
    #[error("Duplicate rule key '{0}'")]
    DuplicateRuleKey(String),
}

/// Main configuration.
///
/// All fields carry defaults so the config file can be omitted entirely; a
/// configuration without rules only reports parse errors.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// Which files are analyzed and how they are read.
    pub files: FilesConfig,
    /// The built-in rule reporting documents that fail to load.
    pub parsing_error: ParsingErrorConfig,
    /// When strict mode is enabled, warnings are promoted to failures.
    pub strict: StrictConfig,
    /// Configured checks, in reporting order.
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilesConfig {
    /// File name suffixes analyzed when auditing a directory
    /// (case-insensitive).
    pub suffixes: Vec<String>,
    /// Strip U+0085, U+2028 and U+2029 before analysis.
    pub filter_utf8_line_breaks: bool,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            suffixes: vec![".yaml".to_string(), ".yml".to_string(), ".raml".to_string()],
            filter_utf8_line_breaks: false,
        }
    }
}

impl FilesConfig {
    /// Returns `true` when `path`'s file name ends with a configured suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use yaml_key_audit::config::FilesConfig;
    ///
    /// let files = FilesConfig::default();
    /// assert!(files.matches(Path::new("deploy/app.YML")));
    /// assert!(!files.matches(Path::new("README.md")));
    /// ```
    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_lowercase();
        self.suffixes
            .iter()
            .any(|suffix| name.ends_with(&suffix.to_lowercase()))
    }
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParsingErrorConfig {
    pub enabled: bool,
    pub severity: Severity,
}

impl Default for ParsingErrorConfig {
    fn default() -> Self {
        ParsingErrorConfig {
            enabled: true,
            severity: Severity::Error,
        }
    }
}

/// Strict-mode configuration.
///
/// When [`enabled`](StrictConfig::enabled) is `true`, any finding with
/// [`Severity::Warning`] will cause the audit to fail.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrictConfig {
    pub enabled: bool,
}

/// The check template a rule instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckKind {
    ForbiddenKey,
    ForbiddenValue,
    IntValueInRange,
    DurationInRange,
    RequiredKey,
}

impl CheckKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckKind::ForbiddenKey => "forbidden-key",
            CheckKind::ForbiddenValue => "forbidden-value",
            CheckKind::IntValueInRange => "int-value-in-range",
            CheckKind::DurationInRange => "duration-in-range",
            CheckKind::RequiredKey => "required-key",
        }
    }
}

/// One `[[rules]]` entry.
///
/// Which parameters are required depends on [`check`](RuleConfig::check);
/// parameters a check does not use are ignored.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct RuleConfig {
    pub check: CheckKind,
    /// Rule key reported on findings. Defaults to the check name.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub key_name: Option<String>,
    #[serde(default)]
    pub included_ancestors: Option<String>,
    #[serde(default)]
    pub excluded_ancestors: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub min_value: Option<i64>,
    #[serde(default)]
    pub max_value: Option<i64>,
    #[serde(default)]
    pub min_millis: Option<i64>,
    #[serde(default)]
    pub max_millis: Option<i64>,
    #[serde(default)]
    pub parent_key_name: Option<String>,
    #[serde(default)]
    pub parent_key_value: Option<String>,
    #[serde(default)]
    pub parent_key_name_root: RootPosition,
    #[serde(default)]
    pub required_key_name: Option<String>,
}

impl RuleConfig {
    /// A rule of the given kind with every parameter unset.
    pub fn new(check: CheckKind) -> Self {
        RuleConfig {
            check,
            key: None,
            severity: Severity::default(),
            key_name: None,
            included_ancestors: None,
            excluded_ancestors: None,
            value: None,
            min_value: None,
            max_value: None,
            min_millis: None,
            max_millis: None,
            parent_key_name: None,
            parent_key_value: None,
            parent_key_name_root: RootPosition::default(),
            required_key_name: None,
        }
    }

    pub fn rule_key(&self) -> &str {
        self.key.as_deref().unwrap_or(self.check.as_str())
    }

    fn missing(&self, parameter: &'static str) -> ConfigError {
        ConfigError::MissingParameter {
            rule: self.rule_key().to_string(),
            parameter,
        }
    }

    fn range(
        &self,
        min: Option<i64>,
        max: Option<i64>,
        names: (&'static str, &'static str),
    ) -> Result<(i64, i64), ConfigError> {
        let min = min.ok_or_else(|| self.missing(names.0))?;
        let max = max.ok_or_else(|| self.missing(names.1))?;
        if min > max {
            return Err(ConfigError::InvertedRange {
                rule: self.rule_key().to_string(),
                min,
                max,
            });
        }
        Ok((min, max))
    }

    fn pattern(&self, parameter: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
        filter::full_match(pattern).map_err(|source| ConfigError::InvalidRegex {
            rule: self.rule_key().to_string(),
            parameter,
            source,
        })
    }

    fn key_filter(&self) -> Result<KeyFilter, ConfigError> {
        let key_name = self.key_name.as_deref().ok_or_else(|| self.missing("key-name"))?;
        Ok(KeyFilter::from_parts(
            self.pattern("key-name", key_name)?,
            self.ancestor_filter()?,
        ))
    }

    fn ancestor_filter(&self) -> Result<AncestorFilter, ConfigError> {
        let included = match self.included_ancestors.as_deref() {
            Some(p) => Some(self.pattern("included-ancestors", p)?),
            None => None,
        };
        let excluded = match self.excluded_ancestors.as_deref() {
            Some(p) => Some(self.pattern("excluded-ancestors", p)?),
            None => None,
        };
        Ok(AncestorFilter::from_parts(included, excluded))
    }

    /// Validates the parameters and compiles the rule.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the rule when a required parameter is
    /// missing, a pattern does not compile, or a range is inverted.
    pub fn compile(&self) -> Result<CompiledRule, ConfigError> {
        let key = self.rule_key();
        let check: Box<dyn crate::checks::Check> = match self.check {
            CheckKind::ForbiddenKey => Box::new(ForbiddenCheck::new(
                key,
                self.key_filter()?,
                ForbiddenRule::ForbiddenKey,
            )),
            CheckKind::ForbiddenValue => {
                let key_filter = self.key_filter()?;
                let value = self.value.as_deref().ok_or_else(|| self.missing("value"))?;
                let value = filter::search(value).map_err(|source| ConfigError::InvalidRegex {
                    rule: key.to_string(),
                    parameter: "value",
                    source,
                })?;
                Box::new(ForbiddenCheck::new(
                    key,
                    key_filter,
                    ForbiddenRule::ForbiddenValue { value },
                ))
            }
            CheckKind::IntValueInRange => {
                let key_filter = self.key_filter()?;
                let (min, max) =
                    self.range(self.min_value, self.max_value, ("min-value", "max-value"))?;
                Box::new(ForbiddenCheck::new(
                    key,
                    key_filter,
                    ForbiddenRule::IntValueInRange { min, max },
                ))
            }
            CheckKind::DurationInRange => {
                let key_filter = self.key_filter()?;
                let (min_millis, max_millis) =
                    self.range(self.min_millis, self.max_millis, ("min-millis", "max-millis"))?;
                Box::new(ForbiddenCheck::new(
                    key,
                    key_filter,
                    ForbiddenRule::DurationInRange {
                        min_millis,
                        max_millis,
                    },
                ))
            }
            CheckKind::RequiredKey => {
                let required = self
                    .required_key_name
                    .as_deref()
                    .ok_or_else(|| self.missing("required-key-name"))?;
                let parent = match self.parent_key_name.as_deref() {
                    Some(name) => Some(ParentKey {
                        name: KeyFilter::from_parts(
                            self.pattern("parent-key-name", name)?,
                            AncestorFilter::default(),
                        ),
                        value: self
                            .parent_key_value
                            .as_deref()
                            .map(filter::search)
                            .transpose()
                            .map_err(|source| ConfigError::InvalidRegex {
                                rule: key.to_string(),
                                parameter: "parent-key-value",
                                source,
                            })?,
                        position: self.parent_key_name_root,
                    }),
                    None => None,
                };
                Box::new(RequiredKeyCheck::new(
                    key,
                    self.pattern("required-key-name", required)?,
                    required,
                    parent,
                    self.ancestor_filter()?,
                ))
            }
        };
        Ok(CompiledRule::new(self.severity, check))
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try `yaml-key-audit.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the explicit path does not exist, the file
    /// cannot be read, or the TOML content fails to parse.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use std::path::Path;
    /// use yaml_key_audit::config::Config;
    ///
    /// let cfg = Config::load(Some(Path::new("my-config.toml")))?;
    /// let rules = cfg.compile()?;
    /// # Ok::<(), yaml_key_audit::config::ConfigError>(())
    /// ```
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let config_path = match path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => return Err(ConfigError::NotFound(p.display().to_string())),
            None => Some(Path::new(DEFAULT_CONFIG_FILE).to_path_buf()).filter(|p| p.exists()),
        };

        match config_path {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                let content =
                    std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                        path: path.display().to_string(),
                        source,
                    })?;
                parse(&content, &path.display().to_string())
            }
            None => Ok(Config::default()),
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Examples
    ///
    /// ```
    /// use yaml_key_audit::config::Config;
    ///
    /// let config = Config::from_toml(r#"
    /// [[rules]]
    /// check = "forbidden-key"
    /// key-name = "password"
    /// "#).unwrap();
    /// assert_eq!(config.rules.len(), 1);
    /// assert!(config.parsing_error.enabled);
    /// ```
    pub fn from_toml(content: &str) -> Result<Config, ConfigError> {
        parse(content, "<inline>")
    }

    /// Compiles every configured rule, in declaration order.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid rule, or when two rules share a rule key
    /// (`parsing-error` is reserved).
    pub fn compile(&self) -> Result<Vec<CompiledRule>, ConfigError> {
        let mut seen = HashSet::from([PARSING_ERROR_RULE]);
        self.rules
            .iter()
            .map(|rule| {
                if !seen.insert(rule.rule_key()) {
                    return Err(ConfigError::DuplicateRuleKey(rule.rule_key().to_string()));
                }
                rule.compile()
            })
            .collect()
    }
}

fn parse(content: &str, origin: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: origin.to_string(),
        source,
    })
}
