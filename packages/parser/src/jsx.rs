//! Tag-level JSX scanning.
//!
//! Text between tags is taken verbatim (apostrophes in copy are common, so
//! no quote tracking there); attribute values and `{...}` children are
//! delimited with the quote-aware helpers from [`crate::scan`].

use crate::ast::{Prop, PropValue};
use crate::scan::{balanced_end, skip_whitespace};

#[derive(Debug, Clone, PartialEq)]
pub struct JsxElement {
    /// Tag name; empty for a fragment (`<>`)
    pub name: String,
    pub props: Vec<Prop>,
    pub spreads: Vec<String>,
    pub children: Vec<JsxNode>,
    pub self_closing: bool,
    /// Byte offset of `<`
    pub start: usize,
    /// Byte offset just past the element
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxNode {
    Text(String),
    /// Inner text of a `{...}` child, trimmed
    Expression(String),
    Element(JsxElement),
}

impl JsxElement {
    pub fn prop(&self, name: &str) -> Option<&PropValue> {
        self.props.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    pub fn is_fragment(&self) -> bool {
        self.name.is_empty()
    }

    /// Lowercase names are HTML elements; capitalized or dotted names are
    /// components.
    pub fn is_component(&self) -> bool {
        self.name
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_uppercase())
            || self.name.contains('.')
    }

    /// Child elements, skipping text and expressions
    pub fn child_elements(&self) -> impl Iterator<Item = &JsxElement> {
        self.children.iter().filter_map(|c| match c {
            JsxNode::Element(e) => Some(e),
            _ => None,
        })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '$')
}

fn read_name(text: &str, pos: usize) -> (String, usize) {
    let name: String = text[pos..].chars().take_while(|&c| is_name_char(c)).collect();
    let end = pos + name.len();
    (name, end)
}

struct OpeningTag {
    name: String,
    props: Vec<Prop>,
    spreads: Vec<String>,
    self_closing: bool,
    end: usize,
}

fn parse_opening_tag(text: &str, start: usize) -> Option<OpeningTag> {
    if !text[start..].starts_with('<') {
        return None;
    }
    let (name, mut pos) = read_name(text, start + 1);
    let mut props = Vec::new();
    let mut spreads = Vec::new();

    loop {
        pos = skip_whitespace(text, pos);
        let rest = text.get(pos..)?;

        if rest.starts_with("/>") {
            return Some(OpeningTag {
                name,
                props,
                spreads,
                self_closing: true,
                end: pos + 2,
            });
        }
        if rest.starts_with('>') {
            return Some(OpeningTag {
                name,
                props,
                spreads,
                self_closing: false,
                end: pos + 1,
            });
        }
        if rest.starts_with('{') {
            let close = balanced_end(text, pos)?;
            let inner = text[pos + 1..close].trim();
            spreads.push(inner.trim_start_matches("...").trim().to_string());
            pos = close + 1;
            continue;
        }

        let (attr_name, after_name) = read_name(text, pos);
        if attr_name.is_empty() {
            return None;
        }
        pos = skip_whitespace(text, after_name);

        if !text[pos..].starts_with('=') {
            props.push(Prop {
                name: attr_name,
                value: PropValue::Flag,
            });
            continue;
        }

        pos = skip_whitespace(text, pos + 1);
        let quote = text[pos..].chars().next()?;
        let value = match quote {
            '"' | '\'' => {
                let close = text[pos + 1..].find(quote)? + pos + 1;
                let value = PropValue::Literal(text[pos + 1..close].to_string());
                pos = close + 1;
                value
            }
            '{' => {
                let close = balanced_end(text, pos)?;
                let value = PropValue::Expression(text[pos + 1..close].trim().to_string());
                pos = close + 1;
                value
            }
            _ => return None,
        };
        props.push(Prop {
            name: attr_name,
            value,
        });
    }
}

/// Parse the element whose `<` is at `start`, including all children.
pub fn parse_element(text: &str, start: usize) -> Option<JsxElement> {
    let tag = parse_opening_tag(text, start)?;
    let mut element = JsxElement {
        name: tag.name,
        props: tag.props,
        spreads: tag.spreads,
        children: Vec::new(),
        self_closing: tag.self_closing,
        start,
        end: tag.end,
    };
    if element.self_closing {
        return Some(element);
    }

    let mut pos = tag.end;
    let mut buffer = String::new();

    while pos < text.len() {
        let rest = &text[pos..];

        if rest.starts_with("</") {
            flush_text(&mut buffer, &mut element.children);
            let close = rest.find('>')?;
            element.end = pos + close + 1;
            return Some(element);
        }

        if rest.starts_with('<') {
            let next = rest[1..].chars().next();
            if next.map_or(false, |c| c.is_ascii_alphabetic() || c == '>') {
                if let Some(child) = parse_element(text, pos) {
                    flush_text(&mut buffer, &mut element.children);
                    pos = child.end;
                    element.children.push(JsxNode::Element(child));
                    continue;
                }
            }
        }

        if rest.starts_with('{') {
            flush_text(&mut buffer, &mut element.children);
            let close = balanced_end(text, pos)?;
            let inner = text[pos + 1..close].trim();
            if !inner.is_empty() && !is_comment(inner) {
                element.children.push(JsxNode::Expression(inner.to_string()));
            }
            pos = close + 1;
            continue;
        }

        let c = rest.chars().next()?;
        buffer.push(c);
        pos += c.len_utf8();
    }

    None
}

fn is_comment(inner: &str) -> bool {
    inner.starts_with("/*") && inner.ends_with("*/")
}

fn flush_text(buffer: &mut String, children: &mut Vec<JsxNode>) {
    let collapsed = buffer.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        children.push(JsxNode::Text(collapsed));
    }
    buffer.clear();
}

/// Byte offset of the first opening tag (`<Name` or `<>`) in `text`.
pub fn first_tag_start(text: &str) -> Option<usize> {
    text.char_indices()
        .find(|&(i, c)| {
            c == '<'
                && text[i + 1..]
                    .chars()
                    .next()
                    .map_or(false, |n| n.is_ascii_alphabetic() || n == '>')
        })
        .map(|(i, _)| i)
}

/// The first complete element in `text`.
pub fn first_element(text: &str) -> Option<JsxElement> {
    parse_element(text, first_tag_start(text)?)
}
