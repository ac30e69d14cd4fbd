//! Input sanitization applied to every string in a request body.
//!
//! Order matters: dangerous characters go first, then script schemes, then
//! inline event-handler patterns, then surrounding whitespace.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static DANGEROUS_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>"'&]"#).expect("valid character class"));

static SCRIPT_SCHEMES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)javascript:").expect("valid scheme pattern"),
        Regex::new(r"(?i)vbscript:").expect("valid scheme pattern"),
    ]
});

static EVENT_HANDLERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+=").expect("valid handler pattern"));

/// Clean a single string.
#[must_use]
pub fn sanitize_input(input: &str) -> String {
    let mut out = DANGEROUS_CHARS.replace_all(input, "").into_owned();
    for scheme in SCRIPT_SCHEMES.iter() {
        out = scheme.replace_all(&out, "").into_owned();
    }
    out = EVENT_HANDLERS.replace_all(&out, "").into_owned();
    out.trim().to_string()
}

/// Clean every string inside a JSON value. Object keys, numbers, booleans
/// and null are left alone.
#[must_use]
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_input(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, sanitize_value(v)))
                .collect(),
        ),
        other => other,
    }
}
