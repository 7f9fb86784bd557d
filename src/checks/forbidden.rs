//! Forbidden keys, forbidden values and value ranges.
//!
//! One engine drives all four checks: it walks the token stream once and, for
//! every key admitted by the rule's [`KeyFilter`], dispatches on the closed
//! [`ForbiddenRule`] variant.

use super::filter::KeyFilter;
use super::stream::Cursor;
use super::value::{extract_value, parse_duration_millis, parse_int};
use super::{can_scan, Check};
use crate::finding::Issue;
use crate::token::Token;
use crate::source::YamlSource;
use regex::Regex;

pub const FORBIDDEN_KEY_MESSAGE: &str = "Forbidden key found";
pub const FORBIDDEN_VALUE_MESSAGE: &str = "Forbidden value found";
pub const NON_INTEGER_MESSAGE: &str =
    "Parse error: Non-integer value found for int-value-in-range check";
pub const NON_DURATION_MESSAGE: &str =
    "Parse error: Non-duration value found for duration-in-range check";

/// What happens when a key is admitted.
#[derive(Debug, Clone)]
pub enum ForbiddenRule {
    /// The key itself is the violation.
    ForbiddenKey,
    /// The key's value must not contain `value`.
    ForbiddenValue { value: Regex },
    /// The key's value must be an integer in `[min, max]`.
    IntValueInRange { min: i64, max: i64 },
    /// The key's value must be a duration in `[min_millis, max_millis]`.
    DurationInRange { min_millis: i64, max_millis: i64 },
}

#[derive(Debug, Clone)]
pub struct ForbiddenCheck {
    rule_key: String,
    filter: KeyFilter,
    rule: ForbiddenRule,
}

impl ForbiddenCheck {
    pub fn new(rule_key: impl Into<String>, filter: KeyFilter, rule: ForbiddenRule) -> Self {
        ForbiddenCheck {
            rule_key: rule_key.into(),
            filter,
            rule,
        }
    }

    /// Called with the cursor just past an admitted `Key`; `key` is the key's
    /// scalar, not yet consumed.
    fn on_key(&self, cursor: &mut Cursor<'_>, key: &Token, issues: &mut Vec<Issue>) {
        let message = match &self.rule {
            ForbiddenRule::ForbiddenKey => Some(FORBIDDEN_KEY_MESSAGE.to_string()),
            ForbiddenRule::ForbiddenValue { value } => extract_value(cursor)
                .and_then(Token::scalar)
                .filter(|text| value.is_match(text))
                .map(|_| FORBIDDEN_VALUE_MESSAGE.to_string()),
            ForbiddenRule::IntValueInRange { min, max } => {
                extract_value(cursor)
                    .and_then(Token::scalar)
                    .and_then(|text| match parse_int(text) {
                        Some(v) if v < *min || v > *max => Some(format!(
                            "Value out of range found, value={v}, Range: min={min} max={max}"
                        )),
                        Some(_) => None,
                        None => Some(NON_INTEGER_MESSAGE.to_string()),
                    })
            }
            ForbiddenRule::DurationInRange {
                min_millis,
                max_millis,
            } => extract_value(cursor)
                .and_then(Token::scalar)
                .and_then(|text| match parse_duration_millis(text) {
                    Some(ms) if ms < *min_millis || ms > *max_millis => Some(format!(
                        "Duration out of range found, in milliseconds={ms}, \
                         Range: minMillis={min_millis} maxMillis={max_millis}"
                    )),
                    Some(_) => None,
                    None => Some(NON_DURATION_MESSAGE.to_string()),
                }),
        };

        if let Some(message) = message {
            issues.push(Issue::at(&self.rule_key, message, key.start));
        }
    }
}

impl Check for ForbiddenCheck {
    fn rule_key(&self) -> &str {
        &self.rule_key
    }

    fn validate(&self, source: &YamlSource, issues: &mut Vec<Issue>) {
        if !can_scan(source) {
            return;
        }

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
            if self.filter.admit(name, &cursor.path()) {
                self.on_key(&mut cursor, key, issues);
            }
        }
    }
}
