//! JS literal values → `serde_json::Value`.

use crate::scan::{self, split_top_level, string_literal};
use serde_json::{Map, Number, Value};

/// Read a JS literal: strings, numbers, booleans, `null`/`undefined`,
/// arrays and object literals. Anything else (identifiers, calls, JSX) is
/// `None`. Trailing TypeScript assertions (`as const`) are ignored.
pub fn parse_literal(text: &str) -> Option<Value> {
    let t = strip_type_assertion(scan::strip_outer_parens(text));

    if let Some(s) = string_literal(t) {
        return Some(Value::String(s));
    }

    match t {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        "null" | "undefined" => return Some(Value::Null),
        _ => {}
    }

    if let Some(n) = parse_number(t) {
        return Some(n);
    }

    if t.starts_with('[') && scan::balanced_end(t, 0) == Some(t.len() - 1) {
        let items = split_top_level(&t[1..t.len() - 1], ",")
            .into_iter()
            .map(parse_literal)
            .collect::<Option<Vec<_>>>()?;
        return Some(Value::Array(items));
    }

    if t.starts_with('{') && scan::balanced_end(t, 0) == Some(t.len() - 1) {
        return Some(Value::Object(parse_object_entries(&t[1..t.len() - 1])));
    }

    None
}

/// Parse the inside of an object literal, skipping entries whose value is
/// not a literal (functions, JSX, references).
pub fn parse_object_entries(inner: &str) -> Map<String, Value> {
    let mut map = Map::new();

    for entry in split_top_level(inner, ",") {
        if entry.starts_with("...") {
            continue;
        }
        let Some(colon) = scan::find_top_level(entry, ":") else {
            continue;
        };
        let key = entry[..colon].trim();
        let key = string_literal(key).unwrap_or_else(|| key.to_string());
        if key.is_empty() {
            continue;
        }
        if let Some(value) = parse_literal(&entry[colon + 1..]) {
            map.insert(key, value);
        }
    }

    map
}

fn strip_type_assertion(text: &str) -> &str {
    let t = text.trim();
    match scan::rfind_top_level(t, " as ") {
        Some(pos) if scan::is_member_path(t[pos + 4..].trim()) => t[..pos].trim(),
        _ => t,
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let t = text.replace('_', "");
    if t.is_empty() || !t.chars().next().map_or(false, |c| c.is_ascii_digit() || c == '-' || c == '.') {
        return None;
    }
    if let Ok(i) = t.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    t.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}
