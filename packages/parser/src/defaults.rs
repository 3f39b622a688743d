//! Default values: the separate defaults module and the component's own
//! parameter destructuring.

use crate::ast::DefaultValues;
use crate::literal::{parse_literal, parse_object_entries};
use crate::scan::{
    code_chars, extract_balanced_inner, find_top_level, split_top_level, strip_outer_parens,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static EXPORTED_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=]+)?=\s*\{").unwrap()
});
static TABLE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_$][\w$]*)\.([A-Za-z_$][\w$]*)$").unwrap());

/// Parse the defaults module: the exported object literal whose name
/// mentions "default", else the first exported object literal.
pub fn parse_default_args(source: &str) -> Map<String, Value> {
    let candidates: Vec<_> = EXPORTED_OBJECT_RE.captures_iter(source).collect();
    let chosen = candidates
        .iter()
        .find(|caps| {
            caps.get(1)
                .map_or(false, |m| m.as_str().to_lowercase().contains("default"))
        })
        .or_else(|| candidates.first());

    let Some(caps) = chosen else {
        return Map::new();
    };
    let Some(whole) = caps.get(0) else {
        return Map::new();
    };
    extract_balanced_inner(source, whole.end() - 1)
        .map(parse_object_entries)
        .unwrap_or_default()
}

/// Right-hand side of `name = expr` in a destructuring pattern
#[derive(Debug, Clone, PartialEq)]
pub enum ParamDefault {
    Literal(Value),
    /// `defaultArgs.kind` → `kind`
    TableRef(String),
    /// Anything else; cannot be evaluated statically
    Other(String),
}

/// `({ kind = 'primary', label, ...rest }: IProps)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Destructuring {
    /// Every destructured prop name, in order
    pub names: Vec<String>,
    pub defaults: Vec<(String, ParamDefault)>,
    /// Name bound by `...rest`
    pub rest: Option<String>,
}

impl Destructuring {
    /// Split the defaults table into actual defaults (referenced or declared
    /// in the destructuring) and example-only values.
    pub fn split_defaults(&self, table: &Map<String, Value>) -> DefaultValues {
        let mut values = DefaultValues::default();

        for (name, default) in &self.defaults {
            match default {
                ParamDefault::Literal(v) => {
                    values.actual.insert(name.clone(), v.clone());
                }
                ParamDefault::TableRef(key) => {
                    if let Some(v) = table.get(key) {
                        values.actual.insert(name.clone(), v.clone());
                    }
                }
                ParamDefault::Other(_) => {}
            }
        }

        for (key, value) in table {
            if !values.actual.contains_key(key) {
                values.examples.insert(key.clone(), value.clone());
            }
        }

        values
    }
}

/// Parse the object pattern in a parameter list. `None` when the component
/// takes a plain `props` parameter.
pub fn parse_destructuring(params: &str) -> Option<Destructuring> {
    let params = strip_outer_parens(params);
    let open = code_chars(params)
        .find(|&(_, c, depth)| depth == 0 && c == '{')
        .map(|(i, _, _)| i)?;
    let inner = extract_balanced_inner(params, open)?;
    let mut result = Destructuring::default();

    for entry in split_top_level(inner, ",") {
        if let Some(rest) = entry.strip_prefix("...") {
            result.rest = Some(rest.trim().to_string());
            continue;
        }

        let (pattern, default) = match find_assignment(entry) {
            Some(eq) => (entry[..eq].trim(), Some(entry[eq + 1..].trim())),
            None => (entry, None),
        };
        // `label: renamedLabel` keeps the prop name on the left
        let name = match find_top_level(pattern, ":") {
            Some(colon) => pattern[..colon].trim(),
            None => pattern,
        };
        if name.is_empty() {
            continue;
        }
        result.names.push(name.to_string());

        if let Some(expr) = default {
            result
                .defaults
                .push((name.to_string(), classify_default(expr)));
        }
    }

    Some(result)
}

fn classify_default(expr: &str) -> ParamDefault {
    if let Some(value) = parse_literal(expr) {
        return ParamDefault::Literal(value);
    }
    if let Some(caps) = TABLE_REF_RE.captures(expr.trim()) {
        if let (Some(object), Some(key)) = (caps.get(1), caps.get(2)) {
            if object.as_str().to_lowercase().contains("default") {
                return ParamDefault::TableRef(key.as_str().to_string());
            }
        }
    }
    ParamDefault::Other(expr.to_string())
}

/// Position of a depth-0 `=` that is an assignment, not `==`, `=>`, `<=`...
pub fn find_assignment(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    code_chars(text)
        .find(|&(i, c, depth)| {
            depth == 0
                && c == '='
                && bytes.get(i + 1).map_or(true, |&b| b != b'=' && b != b'>')
                && (i == 0 || !matches!(bytes[i - 1], b'=' | b'!' | b'<' | b'>'))
        })
        .map(|(i, _, _)| i)
}
