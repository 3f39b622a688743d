//! JS expression to Jinja expression translation.
//!
//! Covers the subset component sources use in conditions and attribute
//! values: comparisons, logical operators, negation, ternaries, template
//! literals, member access and `.length`. Anything else is copied through
//! unchanged.

use crate::names::NameMap;
use roos_parser::scan::{balanced_end, split_ternary, strip_outer_parens, template_parts, TemplatePart};

/// Jinja spelling of the JS `children` prop
pub const CONTENT_VAR: &str = "_component_context.content";

/// Translate a JS expression, renaming identifiers through `names`.
pub fn translate(js: &str, names: &NameMap) -> String {
    let t = strip_outer_parens(js.trim());
    if t.is_empty() {
        return String::new();
    }
    if let Some((cond, yes, no)) = split_ternary(t) {
        return format!(
            "{} if {} else {}",
            branch(yes, names),
            translate(cond, names),
            branch(no, names)
        );
    }
    Translator {
        names,
        out: String::with_capacity(t.len() + 8),
    }
    .run(t)
}

/// A ternary branch; nested ternaries keep their parentheses
fn branch(text: &str, names: &NameMap) -> String {
    let translated = translate(text, names);
    if split_ternary(strip_outer_parens(text.trim())).is_some() {
        format!("({})", translated)
    } else {
        translated
    }
}

/// Quote text as a single-quoted Jinja string
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// `` `h${level}` `` → `('h' ~ level)`
pub fn template_literal(literal: &str, names: &NameMap) -> Option<String> {
    let parts = template_parts(literal)?;
    let pieces: Vec<String> = parts
        .iter()
        .map(|part| match part {
            TemplatePart::Text(text) => quote(text),
            TemplatePart::Expr(expr) => {
                let translated = translate(expr, names);
                if translated.contains(' ') {
                    format!("({})", translated)
                } else {
                    translated
                }
            }
        })
        .collect();

    Some(match pieces.len() {
        0 => "''".to_string(),
        1 => pieces.into_iter().collect(),
        _ => format!("({})", pieces.join(" ~ ")),
    })
}

struct Translator<'a> {
    names: &'a NameMap,
    out: String,
}

impl Translator<'_> {
    fn run(mut self, text: &str) -> String {
        let mut i = 0;

        while i < text.len() {
            let rest = &text[i..];
            let Some(c) = rest.chars().next() else {
                break;
            };

            if c.is_whitespace() {
                self.space();
                i += c.len_utf8();
                continue;
            }

            match c {
                '\'' | '"' | '`' => {
                    let Some(end) = string_end(text, i) else {
                        self.out.push_str(rest);
                        break;
                    };
                    let literal = &text[i..=end];
                    if c == '`' {
                        match template_literal(literal, self.names) {
                            Some(t) => self.out.push_str(&t),
                            None => self.out.push_str(&quote(&literal[1..literal.len() - 1])),
                        }
                    } else {
                        self.string(&text[i + 1..end], c);
                    }
                    i = end + 1;
                    continue;
                }
                '(' | '[' | '{' => {
                    let Some(end) = balanced_end(text, i) else {
                        self.out.push_str(rest);
                        break;
                    };
                    if c == '{' {
                        self.out.push_str(&text[i..=end]);
                    } else {
                        self.out.push(c);
                        self.out.push_str(&translate(&text[i + 1..end], self.names));
                        self.out.push_str(&text[end..=end]);
                    }
                    i = end + 1;
                    continue;
                }
                _ => {}
            }

            if let Some((js, jinja)) = OPERATORS.iter().find(|(js, _)| rest.starts_with(js)) {
                match *jinja {
                    "." => self.out.push('.'),
                    "not" => self.negation(),
                    op => self.operator(op),
                }
                i += js.len();
                continue;
            }

            if c.is_ascii_alphabetic() || c == '_' || c == '$' {
                let word: String = rest
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
                    .collect();
                i += word.len();
                i += self.word(&word, &text[i..]);
                continue;
            }

            self.out.push(c);
            i += c.len_utf8();
        }

        self.out.trim().to_string()
    }

    /// Emit an identifier; returns how many following bytes were consumed.
    fn word(&mut self, word: &str, after: &str) -> usize {
        if self.out.ends_with('.') {
            if word == "length" {
                self.out.pop();
                self.out.push_str("|length");
            } else {
                self.out.push_str(word);
            }
            return 0;
        }

        match word {
            "undefined" | "null" => self.out.push_str("none"),
            "props" if after.starts_with('.') => return 1,
            "props" if after.starts_with("?.") => return 2,
            "children" => self.out.push_str(CONTENT_VAR),
            _ => self.out.push_str(self.names.resolve(word)),
        }
        0
    }

    fn string(&mut self, content: &str, quote_char: char) {
        if quote_char == '\'' {
            self.out.push('\'');
            self.out.push_str(content);
            self.out.push('\'');
        } else {
            self.out.push_str(&quote(&content.replace("\\\"", "\"")));
        }
    }

    fn space(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with([' ', '(', '[']) {
            self.out.push(' ');
        }
    }

    fn operator(&mut self, op: &str) {
        let trimmed = self.out.trim_end().len();
        self.out.truncate(trimmed);
        if !self.out.is_empty() {
            self.out.push(' ');
        }
        self.out.push_str(op);
        self.out.push(' ');
    }

    fn negation(&mut self) {
        self.space();
        self.out.push_str("not ");
    }
}

/// Longest operators first
const OPERATORS: &[(&str, &str)] = &[
    ("===", "=="),
    ("!==", "!="),
    ("==", "=="),
    ("!=", "!="),
    (">=", ">="),
    ("<=", "<="),
    ("&&", "and"),
    ("||", "or"),
    ("??", "or"),
    ("?.", "."),
    (">", ">"),
    ("<", "<"),
    ("!", "not"),
];

/// Index of the quote closing the literal that opens at `start`
fn string_end(text: &str, start: usize) -> Option<usize> {
    let quote = text[start..].chars().next()?;
    let mut escaped = false;
    for (offset, c) in text[start + 1..].char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some(start + 1 + offset);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(js: &str) -> String {
        translate(js, &NameMap::new())
    }

    #[test]
    fn test_operators() {
        assert_eq!(t("size === 'sm' && !disabled"), "size == 'sm' and not disabled");
        assert_eq!(t("kind !== 'primary' || busy"), "kind != 'primary' or busy");
        assert_eq!(t("(a || b) && c"), "(a or b) and c");
        assert_eq!(t("value === undefined"), "value == none");
        assert_eq!(t("!(open)"), "not (open)");
    }

    #[test]
    fn test_ternary_and_templates() {
        assert_eq!(t("active ? 'on' : label"), "'on' if active else label");
        assert_eq!(t("`h${level}`"), "('h' ~ level)");
        assert_eq!(t("`rvo-icon--${props.size}`"), "('rvo-icon--' ~ size)");
        assert_eq!(
            t("a ? (b ? 'x' : 'y') : 'z'"),
            "('x' if b else 'y') if a else 'z'"
        );
    }

    #[test]
    fn test_members_and_names() {
        assert_eq!(t("items.length > 0"), "items|length > 0");
        assert_eq!(t("props.item?.label"), "item.label");
        assert_eq!(t("children"), CONTENT_VAR);
        assert_eq!(t("\"it's\""), "'it\\'s'");

        let mut names = NameMap::new();
        names.declare("loop");
        assert_eq!(translate("loop && x", &names), "loop_attr and x");
    }
}
