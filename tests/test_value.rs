use yaml_key_audit::checks::stream::Cursor;
use yaml_key_audit::checks::value::{extract_value, parse_duration_millis, parse_int};
use yaml_key_audit::token::{tokenize, Token};

/// Values of every key, in document order, as seen by `extract_value`.
fn values(yaml: &str) -> Vec<(String, Option<String>)> {
    let tokens = tokenize(yaml);
    let mut cursor = Cursor::new(&tokens);
    let mut out = Vec::new();
    while let Some(token) = cursor.next_token() {
        if !token.is_key() {
            continue;
        }
        let Some(name) = cursor.peek_token().and_then(Token::scalar) else {
            continue;
        };
        let value = extract_value(&mut cursor)
            .and_then(Token::scalar)
            .map(str::to_string);
        out.push((name.to_string(), value));
    }
    out
}

// ── integers ─────────────────────────────────────────────────────────────────

#[test]
fn parses_signed_integers() {
    assert_eq!(parse_int("7"), Some(7));
    assert_eq!(parse_int("-3"), Some(-3));
    assert_eq!(parse_int("+4"), Some(4));
    assert_eq!(parse_int("0"), Some(0));
}

#[test]
fn rejects_non_integers() {
    assert_eq!(parse_int("abc"), None);
    assert_eq!(parse_int("1.5"), None);
    assert_eq!(parse_int(""), None);
    assert_eq!(parse_int(" 1"), None);
    assert_eq!(parse_int("99999999999999999999"), None);
}

// ── durations ────────────────────────────────────────────────────────────────

#[test]
fn duration_units() {
    assert_eq!(parse_duration_millis("500ms"), Some(500));
    assert_eq!(parse_duration_millis("3s"), Some(3_000));
    assert_eq!(parse_duration_millis("2m"), Some(120_000));
    assert_eq!(parse_duration_millis("1h"), Some(3_600_000));
    assert_eq!(parse_duration_millis("1d"), Some(86_400_000));
}

#[test]
fn bare_number_is_milliseconds() {
    assert_eq!(parse_duration_millis("250"), Some(250));
    assert_eq!(parse_duration_millis("-5"), Some(-5));
}

#[test]
fn units_are_case_insensitive() {
    assert_eq!(parse_duration_millis("3S"), Some(3_000));
    assert_eq!(parse_duration_millis("10MS"), Some(10));
}

#[test]
fn sub_millisecond_units_round_down() {
    assert_eq!(parse_duration_millis("1500us"), Some(1));
    assert_eq!(parse_duration_millis("999999ns"), Some(0));
    assert_eq!(parse_duration_millis("-1500us"), Some(-2));
}

#[test]
fn rejects_other_duration_shapes() {
    for text in ["PT3S", "3 s", "3sec", "3x", "s", "", "1.5s"] {
        assert_eq!(parse_duration_millis(text), None, "{text:?}");
    }
}

#[test]
fn overflowing_durations_are_rejected() {
    assert_eq!(parse_duration_millis("9223372036854775807d"), None);
    assert_eq!(parse_duration_millis("99999999999999999999"), None);
}

// ── value extraction ─────────────────────────────────────────────────────────

#[test]
fn extracts_scalar_values() {
    assert_eq!(
        values("a: 1\nb: 'two'\n"),
        vec![
            ("a".to_string(), Some("1".to_string())),
            ("b".to_string(), Some("two".to_string())),
        ]
    );
}

#[test]
fn nested_mapping_has_no_value_and_inner_keys_are_still_seen() {
    assert_eq!(
        values("outer:\n  inner: x\n"),
        vec![
            ("outer".to_string(), None),
            ("inner".to_string(), Some("x".to_string())),
        ]
    );
}

#[test]
fn sequence_and_alias_values_are_not_scalars() {
    let found = values("list:\n  - 1\nref: *anchor\n");
    assert_eq!(found[0], ("list".to_string(), None));
    assert_eq!(found[1], ("ref".to_string(), None));
}
