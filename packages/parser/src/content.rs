//! Render-body children → [`ContentElement`] tree.

use crate::ast::{ArrayMap, Branch, ComponentUsage, ContentElement, HtmlElement, Prop, PropValue};
use crate::classes::strip_props_prefix;
use crate::jsx::{self, JsxElement, JsxNode};
use crate::scan::{
    balanced_end, code_chars, contains_top_level, extract_balanced_inner, find_top_level,
    is_identifier, is_member_path, skip_whitespace, split_ternary, split_top_level,
    string_literal, strip_outer_parens,
};
use crate::source::mask_jsx;
use crate::visitor::{walk_content_children_mut, ContentVisitorMut};
use regex::Regex;
use roos_common::ManualReviewItem;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static BINDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=;]+)?(=)?").unwrap()
});
static IF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bif\s*\(").unwrap());
static CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_$][\w$.]*)\s*\(").unwrap());

const NOTHING: &[&str] = &["null", "undefined", "false", "''", "\"\""];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentExtraction {
    pub elements: Vec<ContentElement>,
    pub review: Vec<ManualReviewItem>,
}

#[derive(Default)]
pub struct ContentExtractor {
    review: Vec<ManualReviewItem>,
}

impl ContentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the children of `root`, then attach preamble bindings to the
    /// references that use them.
    pub fn extract(mut self, root: &JsxElement, preamble: &str) -> ContentExtraction {
        let mut elements = self.nodes(&root.children);
        let bindings = self.bindings(preamble);

        if !bindings.is_empty() {
            let mut resolver = BindingResolver {
                bindings: &bindings,
            };
            for element in &mut elements {
                resolver.visit_content_mut(element);
            }
        }

        debug!(
            elements = elements.len(),
            bindings = bindings.len(),
            review = self.review.len(),
            "extracted content"
        );
        ContentExtraction {
            elements,
            review: self.review,
        }
    }

    fn nodes(&mut self, nodes: &[JsxNode]) -> Vec<ContentElement> {
        let mut out = Vec::new();
        for node in nodes {
            match node {
                JsxNode::Text(text) => out.push(ContentElement::literal(text.clone())),
                JsxNode::Element(el) => out.extend(self.element(el)),
                JsxNode::Expression(expr) => out.extend(self.expression(expr)),
            }
        }
        out
    }

    /// A fragment contributes its children directly.
    fn element(&mut self, el: &JsxElement) -> Vec<ContentElement> {
        let children = self.nodes(&el.children);
        if el.is_fragment() {
            return children;
        }
        if el.is_component() {
            return vec![ContentElement::Component(ComponentUsage {
                name: el.name.clone(),
                props: el.props.clone(),
                spreads: el.spreads.clone(),
                children,
            })];
        }
        vec![ContentElement::Element(HtmlElement {
            tag: el.name.clone(),
            props: el.props.clone(),
            spreads: el.spreads.clone(),
            children,
        })]
    }

    /// An operand of `?:`, `&&` or `||`: JSX, nothing, or another expression
    fn operand(&mut self, text: &str) -> Vec<ContentElement> {
        let t = strip_outer_parens(text);
        if NOTHING.contains(&t) {
            return Vec::new();
        }
        if t.starts_with('<') {
            if let Some(el) = jsx::parse_element(t, 0) {
                if el.end == t.len() {
                    return self.element(&el);
                }
            }
        }
        self.expression(t)
    }

    fn expression(&mut self, expr: &str) -> Vec<ContentElement> {
        let e = strip_outer_parens(expr);
        if e.is_empty() {
            return Vec::new();
        }

        if let Some((cond, yes, no)) = split_ternary(e) {
            return vec![self.ternary(cond, yes, no)];
        }
        if contains_top_level(e, "||") || contains_top_level(e, "??") {
            return vec![self.fallback(e)];
        }
        if contains_top_level(e, "&&") {
            return self.conditional(e);
        }
        if find_top_level(e, ".map(").is_some() || find_top_level(e, "?.map(").is_some() {
            if let Some(map) = self.array_map(e) {
                return vec![ContentElement::ArrayMap(map)];
            }
            return vec![self.unsupported(e, "Unrecognized array iteration")];
        }
        if let Some(text) = string_literal(e) {
            return vec![ContentElement::literal(text)];
        }
        if is_member_path(e) {
            return vec![ContentElement::reference(strip_props_prefix(e))];
        }
        if let Some(call) = content_call(e) {
            return vec![call];
        }
        vec![self.unsupported(e, "Unsupported content expression")]
    }

    fn ternary(&mut self, cond: &str, yes: &str, no: &str) -> ContentElement {
        let condition = strip_props_prefix(cond);
        let when_true = self.operand(yes);
        let when_false = self.operand(no);

        if when_false.is_empty() {
            return ContentElement::Conditional {
                condition,
                body: when_true,
            };
        }
        if when_true.is_empty() {
            return ContentElement::Conditional {
                condition: format!("!({})", condition),
                body: when_false,
            };
        }

        let iterates = when_true
            .iter()
            .chain(&when_false)
            .any(ContentElement::contains_array_map);
        if !iterates {
            if let ([t], [f]) = (when_true.as_slice(), when_false.as_slice()) {
                return ContentElement::Ternary {
                    condition,
                    when_true: Box::new(t.clone()),
                    when_false: Box::new(f.clone()),
                };
            }
        }

        ContentElement::Branches {
            branches: vec![
                Branch {
                    condition: Some(condition),
                    body: when_true,
                },
                Branch {
                    condition: None,
                    body: when_false,
                },
            ],
        }
    }

    /// `a || b || c`; promoted to branches when an operand iterates.
    fn fallback(&mut self, e: &str) -> ContentElement {
        let mut operands = split_top_level(e, "||");
        if operands.len() == 1 {
            operands = split_top_level(e, "??");
        }

        let bodies: Vec<Vec<ContentElement>> = operands.iter().map(|o| self.operand(o)).collect();
        let iterates = bodies
            .iter()
            .flatten()
            .any(ContentElement::contains_array_map);
        let simple = operands
            .iter()
            .all(|o| is_member_path(o) || string_literal(o).is_some());

        if !iterates && simple {
            return ContentElement::Fallback {
                chain: operands.iter().map(|o| strip_props_prefix(o)).collect(),
            };
        }

        let last = operands.len() - 1;
        let branches = operands
            .iter()
            .zip(bodies)
            .enumerate()
            .map(|(i, (operand, body))| Branch {
                condition: (i < last).then(|| strip_props_prefix(strip_outer_parens(operand))),
                body,
            })
            .collect();
        ContentElement::Branches { branches }
    }

    fn conditional(&mut self, e: &str) -> Vec<ContentElement> {
        let parts = split_top_level(e, "&&");
        let Some((body_text, conds)) = parts.split_last() else {
            return Vec::new();
        };
        let condition = strip_props_prefix(&conds.join(" && "));
        let mut body = self.operand(body_text);

        if body.len() == 1 {
            if let ContentElement::Component(_) = &body[0] {
                if let Some(ContentElement::Component(component)) = body.pop() {
                    return vec![ContentElement::ConditionalComponent {
                        condition,
                        component,
                    }];
                }
            }
        }
        vec![ContentElement::Conditional { condition, body }]
    }

    /// `items.map((item, index) => <Item {...item} />)`
    fn array_map(&mut self, e: &str) -> Option<ArrayMap> {
        let pos = find_top_level(e, ".map(")?;
        let open = pos + ".map".len();
        let close = balanced_end(e, open)?;
        if !e[close + 1..].trim().is_empty() {
            return None;
        }
        let array = strip_props_prefix(e[..pos].trim().trim_end_matches('?'));
        let callback = &e[open + 1..close];

        let arrow = find_top_level(callback, "=>")?;
        let params = strip_outer_parens(&callback[..arrow]);
        let mut body = callback[arrow + 2..].trim();

        let mut params = split_top_level(params, ",").into_iter();
        let first = params.next()?;
        let index_var = params.next().map(|p| strip_type(p).to_string());

        let (item_var, destructured) = if first.starts_with('{') {
            let inner = extract_balanced_inner(first, 0)?;
            let names = split_top_level(inner, ",")
                .into_iter()
                .map(|n| {
                    let end = n.find([':', '=']).unwrap_or(n.len());
                    n[..end].trim().to_string()
                })
                .filter(|n| is_identifier(n))
                .collect();
            ("item".to_string(), names)
        } else {
            (strip_type(first).to_string(), Vec::new())
        };

        let returned;
        if body.starts_with('{') {
            let block = extract_balanced_inner(body, 0)?;
            returned = returned_expression(block)?;
            body = returned.as_str();
        }
        let body = strip_outer_parens(body);

        let mut map = ArrayMap {
            array,
            item_var: item_var.clone(),
            index_var,
            destructured: destructured.clone(),
            spread: false,
            props: Vec::new(),
            tag: None,
            body: Vec::new(),
        };

        let element = jsx::parse_element(body, 0).filter(|el| el.end == body.len());
        if let Some(el) = element.filter(|_| body.starts_with('<')) {
            map.spread = el.spreads.iter().any(|s| *s == item_var);
            map.props = el
                .props
                .iter()
                .filter(|p| p.name != "key")
                .map(|p| (p.name.clone(), prop_expression(&p.value)))
                .collect();
            if el.is_component() {
                map.tag = Some(el.name.clone());
            }
            map.body = self.element(&el);
        } else {
            map.body = self.expression(body);
        }

        if !destructured.is_empty() {
            let mut rewriter = ItemRewriter {
                names: &destructured,
                item: &item_var,
            };
            for (_, expr) in &mut map.props {
                *expr = rewriter.rewrite(expr);
            }
            for element in &mut map.body {
                rewriter.visit_content_mut(element);
            }
        }

        Some(map)
    }

    fn unsupported(&mut self, expr: &str, issue: &str) -> ContentElement {
        self.review.push(
            ManualReviewItem::medium(issue)
                .with_context(expr)
                .with_action("Translate this expression in the template by hand"),
        );
        ContentElement::Unsupported {
            expression: expr.to_string(),
        }
    }

    /// Named intermediates in the preamble: `const icon = <Icon />`,
    /// `let content; if (c) { content = <A /> }`, `const html = parse(x)`.
    fn bindings(&mut self, preamble: &str) -> HashMap<String, ContentElement> {
        let masked = mask_jsx(preamble);
        let mut bindings: HashMap<String, ContentElement> = HashMap::new();
        // Declared with `let` and no initializer: only conditional assignments
        let mut declared_only: Vec<String> = Vec::new();

        for caps in BINDING_RE.captures_iter(&masked) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
                continue;
            };
            let name = name.as_str().to_string();
            if caps.get(3).is_none() {
                declared_only.push(name);
                continue;
            }
            let end = statement_end(&masked, whole.end());
            let rhs = preamble[whole.end()..end].trim();
            if let Some(element) = self.binding_value(rhs) {
                bindings.insert(name, element);
            }
        }

        for caps in IF_RE.captures_iter(&masked) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let open = whole.end() - 1;
            let Some(close) = balanced_end(&masked, open) else {
                continue;
            };
            let condition = strip_props_prefix(preamble[open + 1..close].trim());
            let body_start = skip_whitespace(preamble, close + 1);
            let body_end = if masked[body_start..].starts_with('{') {
                balanced_end(&masked, body_start).unwrap_or(masked.len())
            } else {
                statement_end(&masked, body_start)
            };

            for (name, value) in self.assignments(preamble, &masked, body_start, body_end) {
                let known = bindings.contains_key(&name) || declared_only.contains(&name);
                if !known {
                    continue;
                }
                let branch = Branch {
                    condition: Some(condition.clone()),
                    body: vec![value],
                };
                let merged = match bindings.remove(&name) {
                    None => ContentElement::Conditional {
                        condition: condition.clone(),
                        body: branch.body,
                    },
                    Some(ContentElement::Branches { mut branches }) => {
                        let at = branches.iter().position(|b| b.condition.is_none()).unwrap_or(branches.len());
                        branches.insert(at, branch);
                        ContentElement::Branches { branches }
                    }
                    Some(ContentElement::Conditional {
                        condition: first,
                        body,
                    }) => ContentElement::Branches {
                        branches: vec![
                            Branch {
                                condition: Some(first),
                                body,
                            },
                            branch,
                        ],
                    },
                    Some(initial) => ContentElement::Branches {
                        branches: vec![
                            branch,
                            Branch {
                                condition: None,
                                body: vec![initial],
                            },
                        ],
                    },
                };
                bindings.insert(name, merged);
            }

            let Some((else_start, else_end)) = else_body(&masked, body_end + 1) else {
                continue;
            };
            for (name, value) in self.assignments(preamble, &masked, else_start, else_end) {
                let known = bindings.contains_key(&name) || declared_only.contains(&name);
                if !known {
                    continue;
                }
                let otherwise = Branch {
                    condition: None,
                    body: vec![value],
                };
                let merged = match bindings.remove(&name) {
                    // The `if` arm assigned nothing that renders
                    None => ContentElement::Branches {
                        branches: vec![
                            Branch {
                                condition: Some(condition.clone()),
                                body: Vec::new(),
                            },
                            otherwise,
                        ],
                    },
                    Some(ContentElement::Conditional { condition, body }) => ContentElement::Branches {
                        branches: vec![
                            Branch {
                                condition: Some(condition),
                                body,
                            },
                            otherwise,
                        ],
                    },
                    // An `else` replaces the initial value as the fallback
                    Some(ContentElement::Branches { mut branches }) => {
                        branches.retain(|b| b.condition.is_some());
                        branches.push(otherwise);
                        ContentElement::Branches { branches }
                    }
                    Some(initial) => ContentElement::Branches {
                        branches: vec![
                            Branch {
                                condition: Some(condition.clone()),
                                body: vec![initial],
                            },
                            otherwise,
                        ],
                    },
                };
                bindings.insert(name, merged);
            }
        }

        bindings
    }

    fn binding_value(&mut self, rhs: &str) -> Option<ContentElement> {
        let t = strip_outer_parens(rhs);
        if t.is_empty() || NOTHING.contains(&t) {
            return None;
        }
        // Only values that render something are bindings worth keeping
        let renders = t.starts_with('<')
            || t.contains(".map(")
            || CALL_RE.is_match(t) && !t.contains("=>")
            || (split_ternary(t).is_some() || contains_top_level(t, "&&")) && t.contains('<');
        if !renders {
            return None;
        }
        let mut elements = self.operand(t);
        match elements.len() {
            1 => elements.pop(),
            _ => None,
        }
    }

    /// `name = value;` statements between `start` and `end`
    fn assignments(
        &mut self,
        source: &str,
        masked: &str,
        start: usize,
        end: usize,
    ) -> Vec<(String, ContentElement)> {
        static ASSIGN_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"([A-Za-z_$][\w$]*)\s*=[^=>]").unwrap());

        let mut found = Vec::new();
        let region = &masked[start..end];
        for caps in ASSIGN_RE.captures_iter(region) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let rhs_start = start + whole.end() - 1;
            let rhs_end = statement_end(masked, rhs_start).min(end);
            if let Some(value) = self.binding_value(source[rhs_start..rhs_end].trim()) {
                found.push((name.as_str().to_string(), value));
            }
        }
        found
    }
}

/// Span of the block of an `else` right after `after`; `else if` is
/// left to its own `if` match.
fn else_body(masked: &str, after: usize) -> Option<(usize, usize)> {
    static ELSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*else\b\s*").unwrap());

    let found = ELSE_RE.find(masked.get(after..)?)?;
    let start = after + found.end();
    if IF_RE.find(&masked[start..]).is_some_and(|m| m.start() == 0) {
        return None;
    }
    let end = if masked[start..].starts_with('{') {
        balanced_end(masked, start).unwrap_or(masked.len())
    } else {
        statement_end(masked, start)
    };
    Some((start, end))
}

/// End of the statement starting at `start`: the first `;` or closing
/// bracket at depth 0.
fn statement_end(masked: &str, start: usize) -> usize {
    let mut depth = 0usize;
    for (i, c, _) in code_chars(&masked[start..]) {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                if depth == 0 {
                    return start + i;
                }
                depth -= 1;
            }
            ';' if depth == 0 => return start + i,
            _ => {}
        }
    }
    masked.len()
}

/// Expression of the last top-level `return` in a block body
fn returned_expression(block: &str) -> Option<String> {
    let masked = mask_jsx(block);
    let pos = code_chars(&masked)
        .filter(|&(i, c, depth)| depth == 0 && c == 'r' && masked[i..].starts_with("return"))
        .map(|(i, _, _)| i)
        .last()?;
    let start = pos + "return".len();
    let end = statement_end(&masked, start);
    Some(block[start..end].trim().to_string())
}

fn strip_type(param: &str) -> &str {
    match param.find(':') {
        Some(colon) => param[..colon].trim(),
        None => param.trim(),
    }
}

fn prop_expression(value: &PropValue) -> String {
    match value {
        PropValue::Literal(text) => format!("'{}'", text),
        PropValue::Expression(expr) => strip_props_prefix(expr),
        PropValue::Flag => "true".to_string(),
    }
}

/// `parseContentMarkup(children)`
fn content_call(e: &str) -> Option<ContentElement> {
    let caps = CALL_RE.captures(e)?;
    let function = caps.get(1)?.as_str().to_string();
    let open = caps.get(0)?.end() - 1;
    let close = balanced_end(e, open)?;
    if close != e.len() - 1 {
        return None;
    }
    Some(ContentElement::ContentCall {
        function,
        argument: strip_props_prefix(e[open + 1..close].trim()),
    })
}

/// Rewrites destructured item fields (`label`) to `item.label`.
struct ItemRewriter<'a> {
    names: &'a [String],
    item: &'a str,
}

impl ItemRewriter<'_> {
    fn rewrite(&self, expr: &str) -> String {
        let mut out = String::with_capacity(expr.len() + 8);
        let mut last = 0;
        let bytes = expr.as_bytes();

        for (i, c, _) in code_chars(expr) {
            if i < last || !(c.is_ascii_alphabetic() || c == '_' || c == '$') {
                continue;
            }
            let prev = i.checked_sub(1).map(|p| bytes[p]);
            if prev.map_or(false, |b| b == b'.' || b == b'_' || b == b'$' || b.is_ascii_alphanumeric()) {
                continue;
            }
            let word: String = expr[i..]
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
                .collect();
            let end = i + word.len();
            if self.names.contains(&word) {
                out.push_str(&expr[last..i]);
                out.push_str(self.item);
                out.push('.');
                out.push_str(&word);
                last = end;
            }
        }
        out.push_str(&expr[last..]);
        out
    }

    fn rewrite_props(&self, props: &mut [Prop]) {
        for prop in props {
            if let PropValue::Expression(expr) = &mut prop.value {
                *expr = self.rewrite(expr);
            }
        }
    }
}

impl ContentVisitorMut for ItemRewriter<'_> {
    fn visit_content_mut(&mut self, element: &mut ContentElement) {
        match element {
            ContentElement::Reference { name, .. } => *name = self.rewrite(name),
            ContentElement::Element(html) => self.rewrite_props(&mut html.props),
            ContentElement::Component(usage) => self.rewrite_props(&mut usage.props),
            ContentElement::Conditional { condition, .. } => *condition = self.rewrite(condition),
            ContentElement::ConditionalComponent {
                condition,
                component,
            } => {
                *condition = self.rewrite(condition);
                self.rewrite_props(&mut component.props);
            }
            ContentElement::Fallback { chain } => {
                for link in chain.iter_mut() {
                    *link = self.rewrite(link);
                }
            }
            ContentElement::Ternary { condition, .. } => *condition = self.rewrite(condition),
            ContentElement::Branches { branches } => {
                for branch in branches.iter_mut() {
                    if let Some(condition) = &mut branch.condition {
                        *condition = self.rewrite(condition);
                    }
                }
            }
            ContentElement::ArrayMap(map) => map.array = self.rewrite(&map.array),
            ContentElement::ContentCall { argument, .. } => *argument = self.rewrite(argument),
            ContentElement::Unsupported { expression } => *expression = self.rewrite(expression),
            ContentElement::Literal { .. } => {}
        }
        walk_content_children_mut(self, element);
    }
}

/// Attaches preamble bindings to references by name.
struct BindingResolver<'a> {
    bindings: &'a HashMap<String, ContentElement>,
}

impl ContentVisitorMut for BindingResolver<'_> {
    fn visit_content_mut(&mut self, element: &mut ContentElement) {
        if let ContentElement::Reference { name, resolved } = element {
            if resolved.is_none() {
                if let Some(binding) = self.bindings.get(name.as_str()) {
                    *resolved = Some(Box::new(binding.clone()));
                }
            }
            return;
        }
        walk_content_children_mut(self, element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(render: &str, preamble: &str) -> ContentExtraction {
        let root = jsx::first_element(render).unwrap();
        ContentExtractor::new().extract(&root, preamble)
    }

    #[test]
    fn test_text_elements_and_references() {
        let result = extract(
            r#"<div className="x">Hello <strong>{props.name}</strong>{label}</div>"#,
            "",
        );
        assert_eq!(result.elements.len(), 3);
        assert_eq!(result.elements[0], ContentElement::literal("Hello"));
        match &result.elements[1] {
            ContentElement::Element(html) => {
                assert_eq!(html.tag, "strong");
                assert_eq!(html.children, vec![ContentElement::reference("name")]);
            }
            other => panic!("expected element, got {:?}", other),
        }
        assert_eq!(result.elements[2], ContentElement::reference("label"));
        assert!(result.review.is_empty());
    }

    #[test]
    fn test_conditional_and_conditional_component() {
        let result = extract(
            "<fieldset>{legend && <FieldsetLegend>{legend}</FieldsetLegend>}{hint && <p className=\"hint\">{hint}</p>}</fieldset>",
            "",
        );
        match &result.elements[0] {
            ContentElement::ConditionalComponent { condition, component } => {
                assert_eq!(condition, "legend");
                assert_eq!(component.name, "FieldsetLegend");
            }
            other => panic!("expected conditional component, got {:?}", other),
        }
        match &result.elements[1] {
            ContentElement::Conditional { condition, body } => {
                assert_eq!(condition, "hint");
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_fallback_chain() {
        let result = extract("<span>{children || label || 'Default'}</span>", "");
        assert_eq!(
            result.elements,
            vec![ContentElement::Fallback {
                chain: vec!["children".into(), "label".into(), "'Default'".into()]
            }]
        );
    }

    #[test]
    fn test_fallback_promoted_when_iterating() {
        let result = extract(
            "<ul>{children || (items && items.map((item) => <li>{item.label}</li>))}</ul>",
            "",
        );
        match &result.elements[0] {
            ContentElement::Branches { branches } => {
                assert_eq!(branches.len(), 2);
                assert_eq!(branches[0].condition.as_deref(), Some("children"));
                assert!(branches[1].condition.is_none());
                assert!(branches[1].body[0].contains_array_map());
            }
            other => panic!("expected branches, got {:?}", other),
        }
    }

    #[test]
    fn test_ternary_and_conditional_forms() {
        let result = extract("<div>{open ? <b>open</b> : closedLabel}{busy ? <Spinner /> : null}</div>", "");
        assert!(matches!(result.elements[0], ContentElement::Ternary { .. }));
        match &result.elements[1] {
            ContentElement::Conditional { condition, body } => {
                assert_eq!(condition, "busy");
                assert!(matches!(body[0], ContentElement::Component(_)));
            }
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_array_map_with_spread_and_index() {
        let result = extract(
            "<ul>{items.map((item, index) => <MenuBarItem key={index} {...item} size={size} />)}</ul>",
            "",
        );
        match &result.elements[0] {
            ContentElement::ArrayMap(map) => {
                assert_eq!(map.array, "items");
                assert_eq!(map.item_var, "item");
                assert_eq!(map.index_var.as_deref(), Some("index"));
                assert!(map.spread);
                assert_eq!(map.tag.as_deref(), Some("MenuBarItem"));
                assert_eq!(map.props, vec![("size".to_string(), "size".to_string())]);
            }
            other => panic!("expected array map, got {:?}", other),
        }
    }

    #[test]
    fn test_array_map_destructured_is_rewritten() {
        let result = extract(
            "<ul>{links.map(({ label, href }) => (<li><a href={href}>{label}</a></li>))}</ul>",
            "",
        );
        let ContentElement::ArrayMap(map) = &result.elements[0] else {
            panic!("expected array map");
        };
        assert_eq!(map.item_var, "item");
        assert_eq!(map.destructured, vec!["label", "href"]);
        assert_eq!(map.tag, None);

        let ContentElement::Element(li) = &map.body[0] else {
            panic!("expected li");
        };
        let ContentElement::Element(a) = &li.children[0] else {
            panic!("expected a");
        };
        assert_eq!(a.props[0].value, PropValue::Expression("item.href".into()));
        assert_eq!(a.children, vec![ContentElement::reference("item.label")]);
    }

    #[test]
    fn test_content_call_and_unsupported() {
        let result = extract("<div>{parseContentMarkup(children)}{await load()}</div>", "");
        assert_eq!(
            result.elements[0],
            ContentElement::ContentCall {
                function: "parseContentMarkup".into(),
                argument: "children".into(),
            }
        );
        assert!(matches!(result.elements[1], ContentElement::Unsupported { .. }));
        assert_eq!(result.review.len(), 1);
    }

    #[test]
    fn test_preamble_bindings_attach_to_references() {
        let preamble = r#"
  const iconMarkup = <Icon icon={icon} size="md" />;
  let labelMarkup;
  if (showLabel) {
    labelMarkup = <span className="label">{label}</span>;
  }
  const html = parseContentMarkup(children);
  const count = items.length;
"#;
        let result = extract("<div>{iconMarkup}{labelMarkup}{html}{count}</div>", preamble);

        let resolved: Vec<_> = result
            .elements
            .iter()
            .map(|el| match el {
                ContentElement::Reference { resolved, .. } => resolved.as_deref().cloned(),
                _ => None,
            })
            .collect();

        assert!(matches!(resolved[0], Some(ContentElement::Component(ref c)) if c.name == "Icon"));
        assert!(matches!(
            resolved[1],
            Some(ContentElement::Conditional { ref condition, .. }) if condition == "showLabel"
        ));
        assert!(matches!(resolved[2], Some(ContentElement::ContentCall { .. })));
        assert!(resolved[3].is_none());
    }

    #[test]
    fn test_initialized_jsx_binding_keeps_its_value() {
        let preamble = r#"
  const iconMarkup: ReactNode = <Icon icon={icon} size="md" />;
  const link = (
    <a href={href}>{label}</a>
  );
"#;
        let result = extract("<div>{iconMarkup}{link}</div>", preamble);
        assert!(result.review.is_empty());
        let ContentElement::Reference { resolved: Some(icon), .. } = &result.elements[0] else {
            panic!("expected resolved reference, got {:?}", result.elements[0]);
        };
        assert!(matches!(icon.as_ref(), ContentElement::Component(c) if c.name == "Icon"));
        let ContentElement::Reference { resolved: Some(link), .. } = &result.elements[1] else {
            panic!("expected resolved reference, got {:?}", result.elements[1]);
        };
        assert!(matches!(link.as_ref(), ContentElement::Element(html) if html.tag == "a"));
    }

    #[test]
    fn test_reassigned_binding_becomes_branches() {
        let preamble = r#"
  let content = <span>{label}</span>;
  if (href) {
    content = <a href={href}>{label}</a>;
  }
"#;
        let result = extract("<div>{content}</div>", preamble);
        let ContentElement::Reference { resolved: Some(binding), .. } = &result.elements[0] else {
            panic!("expected resolved reference");
        };
        let ContentElement::Branches { branches } = binding.as_ref() else {
            panic!("expected branches, got {:?}", binding);
        };
        assert_eq!(branches[0].condition.as_deref(), Some("href"));
        assert!(branches[1].condition.is_none());
    }

    fn branch_tags(binding: &ContentElement) -> Vec<(Option<String>, String)> {
        let ContentElement::Branches { branches } = binding else {
            panic!("expected branches, got {:?}", binding);
        };
        branches
            .iter()
            .map(|b| {
                let tag = match b.body.as_slice() {
                    [ContentElement::Element(html)] => html.tag.clone(),
                    other => format!("{:?}", other),
                };
                (b.condition.clone(), tag)
            })
            .collect()
    }

    #[test]
    fn test_else_assignment_becomes_fallback_branch() {
        let preamble = r#"
  let content;
  if (href) {
    content = <a href={href}>{label}</a>;
  } else {
    content = <span>{label}</span>;
  }
"#;
        let result = extract("<div>{content}</div>", preamble);
        let ContentElement::Reference { resolved: Some(binding), .. } = &result.elements[0] else {
            panic!("expected resolved reference");
        };
        assert_eq!(
            branch_tags(binding),
            vec![
                (Some("href".to_string()), "a".to_string()),
                (None, "span".to_string()),
            ]
        );
        assert!(result.review.is_empty());
    }

    #[test]
    fn test_else_if_chain_keeps_order() {
        let preamble = r#"
  let content = <em>{label}</em>;
  if (href) {
    content = <a href={href}>{label}</a>;
  } else if (onClick) {
    content = <button onClick={onClick}>{label}</button>;
  } else {
    content = <span>{label}</span>;
  }
"#;
        let result = extract("<div>{content}</div>", preamble);
        let ContentElement::Reference { resolved: Some(binding), .. } = &result.elements[0] else {
            panic!("expected resolved reference");
        };
        assert_eq!(
            branch_tags(binding),
            vec![
                (Some("href".to_string()), "a".to_string()),
                (Some("onClick".to_string()), "button".to_string()),
                (None, "span".to_string()),
            ]
        );
    }
}
