//! Required keys.
//!
//! A required key must appear at least once in every *scope*. A scope is
//! opened by a parent key whose value matches (e.g. `kind: Deployment`),
//! and/or lasts while the ancestor path matches the ancestor filter. With
//! neither configured the whole document is a single scope. When both are
//! configured, the key counts only while both are open.
//!
//! Issues are raised when a scope without the required key ends: when the
//! next matching parent key opens a new scope, when the ancestor path stops
//! matching, or at the end of the stream. A parent key whose value does not
//! match closes the scope silently. Issues are reported on the line that
//! opened the scope, column 1.

use super::filter::{AncestorFilter, KeyFilter};
use super::stream::Cursor;
use super::value::extract_value;
use super::{can_scan, Check};
use crate::finding::Issue;
use crate::token::Token;
use crate::source::YamlSource;
use regex::Regex;

/// Where a parent key may sit: at the document root (column 0), anywhere
/// else, or anywhere at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootPosition {
    Yes,
    Not,
    #[default]
    Anywhere,
}

impl RootPosition {
    pub fn accepts(self, column: usize) -> bool {
        match self {
            RootPosition::Yes => column == 0,
            RootPosition::Not => column != 0,
            RootPosition::Anywhere => true,
        }
    }
}

/// The key/value pair that opens a scope.
#[derive(Debug, Clone)]
pub struct ParentKey {
    /// Matched against the whole key name.
    pub name: KeyFilter,
    /// Searched for in the key's value. `None` accepts any value.
    pub value: Option<Regex>,
    pub position: RootPosition,
}

#[derive(Debug, Clone)]
pub struct RequiredKeyCheck {
    rule_key: String,
    required_key: KeyFilter,
    required_key_name: String,
    parent: Option<ParentKey>,
    ancestors: Option<AncestorFilter>,
}

/// Per-scan state; a fresh one is built for every document.
#[derive(Debug)]
struct ScopeState {
    parent_match: bool,
    ancestors_match: bool,
    required_key_present: bool,
    // 0-based line of the key that opened the current scope.
    issue_line: usize,
}

impl RequiredKeyCheck {
    /// `required_key` matches whole key names; `required_key_name` is the
    /// pattern as written, quoted in the issue message.
    pub fn new(
        rule_key: impl Into<String>,
        required_key: Regex,
        required_key_name: &str,
        parent: Option<ParentKey>,
        ancestors: AncestorFilter,
    ) -> Self {
        RequiredKeyCheck {
            rule_key: rule_key.into(),
            required_key: KeyFilter::from_parts(required_key, AncestorFilter::default()),
            required_key_name: required_key_name.to_string(),
            parent,
            ancestors: Some(ancestors).filter(AncestorFilter::is_constrained),
        }
    }

    fn message(&self) -> String {
        format!("Required {} key not found", self.required_key_name)
    }

    fn report(&self, line: usize, issues: &mut Vec<Issue>) {
        issues.push(Issue::new(&self.rule_key, self.message(), line + 1, 1));
    }

    fn ancestors_admit(&self, cursor: &Cursor<'_>) -> bool {
        self.ancestors
            .as_ref()
            .map_or(true, |filter| filter.admit(&cursor.path()))
    }

    /// Tracks the ancestor scope opening and closing around this key.
    fn on_ancestors(&self, cursor: &Cursor<'_>, state: &mut ScopeState, issues: &mut Vec<Issue>) {
        if self.ancestors.is_none() {
            return;
        }
        let now = self.ancestors_admit(cursor);
        if state.ancestors_match && !now {
            if state.parent_match && !state.required_key_present {
                self.report(state.issue_line, issues);
            }
            state.required_key_present = false;
        } else if !state.ancestors_match && now {
            state.issue_line = cursor.ancestors().innermost().map_or(0, |a| a.line);
            state.required_key_present = false;
        }
        state.ancestors_match = now;
    }

    /// Handles a key matching the parent key name. `key` is the key's scalar.
    fn on_parent_key(
        &self,
        parent: &ParentKey,
        cursor: &mut Cursor<'_>,
        key: &Token,
        state: &mut ScopeState,
        issues: &mut Vec<Issue>,
    ) {
        let value = extract_value(cursor).and_then(Token::scalar);
        let new_parent_match = match &parent.value {
            Some(pattern) => value.is_some_and(|v| pattern.is_match(v)),
            None => true,
        };
        if !parent.position.accepts(key.start.column) {
            return;
        }

        // Only a new matching parent ends the current scope.
        if state.parent_match
            && new_parent_match
            && state.ancestors_match
            && !state.required_key_present
        {
            self.report(state.issue_line, issues);
        }
        state.parent_match = new_parent_match;
        state.required_key_present = !new_parent_match && state.required_key_present;
        if new_parent_match {
            state.issue_line = key.start.line;
        }
    }
}

impl Check for RequiredKeyCheck {
    fn rule_key(&self) -> &str {
        &self.rule_key
    }

    fn validate(&self, source: &YamlSource, issues: &mut Vec<Issue>) {
        if !can_scan(source) {
            return;
        }

        let mut state = ScopeState {
            parent_match: self.parent.is_none(),
            ancestors_match: self.ancestors.is_none(),
            required_key_present: false,
            issue_line: 0,
        };

        let mut cursor = Cursor::new(source.tokens());
        while let Some(token) = cursor.next_token() {
            if !token.is_key() {
                continue;
            }
            let Some(key) = cursor.peek_token() else {
                break;
            };
            let Some(name) = key.scalar() else {
                continue;
            };

            self.on_ancestors(&cursor, &mut state, issues);

            match &self.parent {
                Some(parent) if parent.name.matches_key(name) => {
                    self.on_parent_key(parent, &mut cursor, key, &mut state, issues);
                }
                _ => {
                    if self.required_key.matches_key(name)
                        && state.parent_match
                        && state.ancestors_match
                    {
                        state.required_key_present = true;
                    }
                }
            }
        }

        if state.parent_match && state.ancestors_match && !state.required_key_present {
            self.report(state.issue_line, issues);
        }
    }
}
