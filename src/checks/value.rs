//! Value extraction and scalar parsers.

use super::stream::Cursor;
use crate::token::Token;
use regex::Regex;
use std::sync::LazyLock;

/// Reads the scalar value of the key the cursor is positioned at.
///
/// The cursor must sit just after a `Key` token, with the key's scalar next.
/// The key scalar is consumed, then the `Value` indicator if present. The
/// value scalar itself is peeked and returned without being consumed, so a
/// nested key inside it would still be seen by the caller's loop.
///
/// Returns `None` when the key has no scalar value: a nested mapping, a
/// sequence, an alias, or a malformed shape.
pub fn extract_value<'a>(cursor: &mut Cursor<'a>) -> Option<&'a Token> {
    cursor.next_token()?;
    if cursor.peek_token().is_some_and(Token::is_value) {
        cursor.next_token();
    }
    cursor.peek_token().filter(|t| t.scalar().is_some())
}

/// Parses a base-10 integer, optionally signed.
pub fn parse_int(text: &str) -> Option<i64> {
    text.parse().ok()
}

static RE_DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?\d+)([a-zA-Z]{0,2})$").unwrap());

/// Parses a simple duration such as `500ms`, `3s`, `2m` or `250` into
/// milliseconds.
///
/// Supported units (case-insensitive) are `ns`, `us`, `ms`, `s`, `m`, `h` and
/// `d`; a bare number is read as milliseconds. Sub-millisecond amounts are
/// rounded towards negative infinity. Returns `None` for anything else,
/// including values that overflow.
///
/// # Examples
///
/// ```
/// use yaml_key_audit::checks::value::parse_duration_millis;
///
/// assert_eq!(parse_duration_millis("3s"), Some(3_000));
/// assert_eq!(parse_duration_millis("1500us"), Some(1));
/// assert_eq!(parse_duration_millis("PT3S"), None);
/// ```
pub fn parse_duration_millis(text: &str) -> Option<i64> {
    let caps = RE_DURATION.captures(text)?;
    let amount: i64 = caps[1].parse().ok()?;
    match caps[2].to_ascii_lowercase().as_str() {
        "" | "ms" => Some(amount),
        "ns" => Some(amount.div_euclid(1_000_000)),
        "us" => Some(amount.div_euclid(1_000)),
        "s" => amount.checked_mul(1_000),
        "m" => amount.checked_mul(60_000),
        "h" => amount.checked_mul(3_600_000),
        "d" => amount.checked_mul(86_400_000),
        _ => None,
    }
}
