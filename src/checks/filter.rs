//! Key and ancestor-path filters.
//!
//! Key names and ancestor paths are matched against the *whole* string, value
//! patterns are searched for anywhere in the (possibly multi-line) scalar.
//! All patterns are compiled once when a rule is built.

use regex::Regex;

/// Compiles `pattern` so that it only matches an entire string.
pub fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// Compiles `pattern` for searching, with `^` and `$` matching at line
/// boundaries.
pub fn search(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?m){pattern}"))
}

/// Included/excluded constraints on the ancestor path.
///
/// A missing pattern places no constraint.
#[derive(Debug, Clone, Default)]
pub struct AncestorFilter {
    included: Option<Regex>,
    excluded: Option<Regex>,
}

impl AncestorFilter {
    pub fn new(included: Option<&str>, excluded: Option<&str>) -> Result<Self, regex::Error> {
        Ok(AncestorFilter {
            included: included.map(full_match).transpose()?,
            excluded: excluded.map(full_match).transpose()?,
        })
    }

    pub fn from_parts(included: Option<Regex>, excluded: Option<Regex>) -> Self {
        AncestorFilter { included, excluded }
    }

    pub fn is_constrained(&self) -> bool {
        self.included.is_some() || self.excluded.is_some()
    }

    pub fn admit(&self, path: &str) -> bool {
        self.included.as_ref().map_or(true, |re| re.is_match(path))
            && !self.excluded.as_ref().is_some_and(|re| re.is_match(path))
    }
}

/// Decides whether a key, at a given ancestor path, is subject to a rule.
///
/// # Examples
///
/// ```
/// use yaml_key_audit::checks::filter::KeyFilter;
///
/// let filter = KeyFilter::new("forbidden", Some("<root>:a:b.*"), Some(".*:b:c")).unwrap();
/// assert!(filter.admit("forbidden", "<root>:a:b:d"));
/// assert!(!filter.admit("forbidden", "<root>:a:b:c"));
/// assert!(!filter.admit("forbidden_key", "<root>:a:b:d"));
/// ```
#[derive(Debug, Clone)]
pub struct KeyFilter {
    key_name: Regex,
    ancestors: AncestorFilter,
}

impl KeyFilter {
    pub fn new(
        key_name: &str,
        included: Option<&str>,
        excluded: Option<&str>,
    ) -> Result<Self, regex::Error> {
        Ok(KeyFilter {
            key_name: full_match(key_name)?,
            ancestors: AncestorFilter::new(included, excluded)?,
        })
    }

    /// Builds a filter from already compiled patterns; `key_name` must be
    /// anchored (see [`full_match`]).
    pub fn from_parts(key_name: Regex, ancestors: AncestorFilter) -> Self {
        KeyFilter {
            key_name,
            ancestors,
        }
    }

    pub fn matches_key(&self, key: &str) -> bool {
        self.key_name.is_match(key)
    }

    pub fn admit(&self, key: &str, path: &str) -> bool {
        self.matches_key(key) && self.ancestors.admit(path)
    }
}
