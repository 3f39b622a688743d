//! Quote- and nesting-aware scanning primitives.
//!
//! Everything that has to find an operator, a delimiter or a keyword inside
//! JS/TSX text goes through these helpers, so characters inside string
//! literals never count. None of them fail: malformed input yields `None` or
//! an empty result and the caller decides whether to flag it for review.

use serde_json::{Number, Value};
use std::str::CharIndices;

/// Iterator over the characters of `text` that are outside string literals.
///
/// Yields `(byte_index, char, depth)`. Opening brackets report the depth they
/// open at and closing brackets the depth they return to, so a matching pair
/// carries the same depth. Quote characters themselves are yielded (both the
/// opening and closing one) so callers can see where literals sit.
pub struct CodeChars<'a> {
    chars: CharIndices<'a>,
    depth: usize,
    quote: Option<char>,
    escaped: bool,
}

pub fn code_chars(text: &str) -> CodeChars<'_> {
    CodeChars {
        chars: text.char_indices(),
        depth: 0,
        quote: None,
        escaped: false,
    }
}

impl<'a> Iterator for CodeChars<'a> {
    type Item = (usize, char, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (i, c) = self.chars.next()?;

            if let Some(q) = self.quote {
                if self.escaped {
                    self.escaped = false;
                    continue;
                }
                if c == '\\' {
                    self.escaped = true;
                    continue;
                }
                if c == q {
                    self.quote = None;
                    return Some((i, c, self.depth));
                }
                continue;
            }

            return Some(match c {
                '\'' | '"' | '`' => {
                    self.quote = Some(c);
                    (i, c, self.depth)
                }
                '(' | '[' | '{' => {
                    let d = self.depth;
                    self.depth += 1;
                    (i, c, d)
                }
                ')' | ']' | '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    (i, c, self.depth)
                }
                _ => (i, c, self.depth),
            });
        }
    }
}

fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '`')
}

fn closing_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Split `text` at every depth-0 occurrence of `sep`.
///
/// Pieces are trimmed and empty pieces dropped, so a trailing comma in an
/// argument list does not produce a phantom argument.
pub fn split_top_level<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    if sep.is_empty() {
        if !text.trim().is_empty() {
            parts.push(text.trim());
        }
        return parts;
    }

    let mut start = 0;
    let mut skip_to = 0;
    for (i, c, depth) in code_chars(text) {
        if i < skip_to || depth != 0 || is_quote(c) {
            continue;
        }
        if text[i..].starts_with(sep) {
            parts.push(text[start..i].trim());
            start = i + sep.len();
            skip_to = start;
        }
    }
    parts.push(text[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

/// Byte index of the delimiter closing the one at `start`.
pub fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let rest = text.get(start..)?;
    let open = rest.chars().next()?;
    let close = closing_for(open)?;

    for (i, c, depth) in code_chars(rest) {
        if i > 0 && depth == 0 && c == close {
            return Some(start + i);
        }
    }
    None
}

/// The span from the opening delimiter at `start` through its match,
/// delimiters included.
pub fn extract_balanced(text: &str, start: usize) -> Option<&str> {
    let end = balanced_end(text, start)?;
    Some(&text[start..=end])
}

/// Like [`extract_balanced`] but without the delimiters.
pub fn extract_balanced_inner(text: &str, start: usize) -> Option<&str> {
    let end = balanced_end(text, start)?;
    Some(&text[start + 1..end])
}

/// First depth-0 occurrence of `needle` outside string literals.
pub fn find_top_level(text: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    code_chars(text)
        .find(|&(i, c, depth)| depth == 0 && !is_quote(c) && text[i..].starts_with(needle))
        .map(|(i, _, _)| i)
}

/// Last depth-0 occurrence of `needle` outside string literals.
pub fn rfind_top_level(text: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    code_chars(text)
        .filter(|&(i, c, depth)| depth == 0 && !is_quote(c) && text[i..].starts_with(needle))
        .map(|(i, _, _)| i)
        .last()
}

pub fn contains_top_level(text: &str, needle: &str) -> bool {
    find_top_level(text, needle).is_some()
}

fn is_ternary_question(text: &str, i: usize) -> bool {
    let next = text[i + 1..].chars().next();
    let prev = text[..i].chars().next_back();
    !matches!(next, Some('.') | Some('?')) && prev != Some('?')
}

/// Position of the `?` that starts a depth-0 conditional expression.
///
/// Optional chaining (`?.`) and nullish coalescing (`??`) are skipped.
pub fn find_ternary_question(text: &str) -> Option<usize> {
    code_chars(text)
        .find(|&(i, c, depth)| depth == 0 && c == '?' && is_ternary_question(text, i))
        .map(|(i, _, _)| i)
}

/// Position of the `:` separating the branches of a depth-0 conditional.
///
/// Colons inside object literals sit at a deeper depth and are ignored; a
/// nested conditional in the consequent consumes its own colon first.
pub fn find_ternary_separator(text: &str) -> Option<usize> {
    let question = find_ternary_question(text)?;
    let mut nested = 0usize;

    for (i, c, depth) in code_chars(text) {
        if i <= question || depth != 0 {
            continue;
        }
        match c {
            '?' if is_ternary_question(text, i) => nested += 1,
            ':' => {
                if nested == 0 {
                    return Some(i);
                }
                nested -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Split `cond ? a : b` into its three trimmed parts.
pub fn split_ternary(text: &str) -> Option<(&str, &str, &str)> {
    let question = find_ternary_question(text)?;
    let colon = find_ternary_separator(text)?;
    let condition = text[..question].trim();
    let consequent = text[question + 1..colon].trim();
    let alternate = text[colon + 1..].trim();
    if condition.is_empty() || consequent.is_empty() || alternate.is_empty() {
        return None;
    }
    Some((condition, consequent, alternate))
}

/// Remove parentheses wrapping the whole expression, repeatedly.
pub fn strip_outer_parens(text: &str) -> &str {
    let mut t = text.trim();
    while t.starts_with('(') && balanced_end(t, 0) == Some(t.len() - 1) {
        t = t[1..t.len() - 1].trim();
    }
    t
}

/// True when the whole (trimmed) text is exactly one quoted literal.
fn single_literal(text: &str) -> Option<char> {
    let t = text.trim();
    let quote = t.chars().next().filter(|c| is_quote(*c))?;
    if t.len() < 2 {
        return None;
    }

    let mut quotes = code_chars(t).filter(|&(_, c, _)| is_quote(c));
    let (open, _, _) = quotes.next()?;
    let (close, c, _) = quotes.next()?;
    if open == 0 && c == quote && close == t.len() - 1 {
        Some(quote)
    } else {
        None
    }
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// The value of a plain string literal (`'x'`, `"x"`, or a backtick string
/// without interpolation).
pub fn string_literal(text: &str) -> Option<String> {
    let t = text.trim();
    let quote = single_literal(t)?;
    let inner = &t[1..t.len() - 1];
    if quote == '`' && inner.contains("${") {
        return None;
    }
    Some(unescape(inner))
}

/// A comparison operand as a value: quoted text is a string even when it
/// looks numeric, a bare number is a number, and anything else (an enum
/// member such as `Kind.Primary`) is kept as text.
pub fn literal_value(text: &str) -> Value {
    let t = text.trim();
    if let Some(s) = string_literal(t) {
        return Value::String(s);
    }
    match t.parse::<Number>() {
        Ok(n) => Value::Number(n),
        Err(_) => Value::String(t.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Text(String),
    Expr(String),
}

/// Whether the text is a backtick literal with at least one interpolation.
pub fn is_template_literal(text: &str) -> bool {
    single_literal(text) == Some('`') && text.contains("${")
}

/// Break `` `a-${b}-c` `` into literal and interpolated parts.
pub fn template_parts(text: &str) -> Option<Vec<TemplatePart>> {
    let t = text.trim();
    if single_literal(t) != Some('`') {
        return None;
    }
    let inner = &t[1..t.len() - 1];
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while pos < inner.len() {
        let rest = &inner[pos..];
        if rest.starts_with("${") {
            let end = balanced_end(inner, pos + 1)?;
            if !literal.is_empty() {
                parts.push(TemplatePart::Text(std::mem::take(&mut literal)));
            }
            parts.push(TemplatePart::Expr(inner[pos + 2..end].trim().to_string()));
            pos = end + 1;
        } else {
            let c = rest.chars().next()?;
            literal.push(c);
            pos += c.len_utf8();
        }
    }
    if !literal.is_empty() {
        parts.push(TemplatePart::Text(literal));
    }
    Some(parts)
}

pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// `a`, `a.b`, `props.item?.label`
pub fn is_member_path(text: &str) -> bool {
    let t = text.trim();
    !t.is_empty() && t.replace("?.", ".").split('.').all(is_identifier)
}

/// Drop `//` and `/* */` comments that sit outside string literals.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    let mut quote: Option<char> = None;

    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some((_, escaped)) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        if is_quote(c) {
            quote = Some(c);
            out.push(c);
            continue;
        }

        let rest = &text[i..];
        if rest.starts_with("//") {
            let end = rest.find('\n').unwrap_or(rest.len());
            while chars.peek().map_or(false, |&(j, _)| j < i + end) {
                chars.next();
            }
            continue;
        }
        if rest.starts_with("/*") {
            let end = rest[2..].find("*/").map(|e| e + 4).unwrap_or(rest.len());
            // Keep line numbers stable for review items.
            out.extend(rest[..end].chars().filter(|&c| c == '\n'));
            while chars.peek().map_or(false, |&(j, _)| j < i + end) {
                chars.next();
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// 1-based line number of a byte offset.
pub fn line_of(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

pub fn skip_whitespace(text: &str, pos: usize) -> usize {
    match text.get(pos..) {
        Some(rest) => pos + (rest.len() - rest.trim_start().len()),
        None => text.len(),
    }
}
