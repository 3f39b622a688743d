use super::{classify_condition, strip_props_prefix, template_guard, template_variable, ClassExtraction};
use crate::ast::{AttributeDescriptor, ClassMapping, Trigger};
use crate::scan::{
    balanced_end, contains_top_level, extract_balanced_inner, find_top_level, is_member_path,
    is_template_literal, split_ternary, split_top_level, string_literal, strip_outer_parens,
};
use roos_common::ManualReviewItem;

const CLASS_HELPERS: &[&str] = &["clsx", "classNames", "classnames", "cx"];

/// Reads `className` expressions built with `clsx`-style helpers, class
/// arrays joined with spaces, plain strings and template literals.
pub struct ClsxExtractor<'a> {
    attributes: &'a [AttributeDescriptor],
}

impl<'a> ClsxExtractor<'a> {
    pub fn new(attributes: &'a [AttributeDescriptor]) -> Self {
        Self { attributes }
    }

    pub fn extract(&self, class_expr: &str) -> ClassExtraction {
        let mut out = ClassExtraction::default();
        self.expression(class_expr, &mut out);
        out
    }

    fn expression(&self, expr: &str, out: &mut ClassExtraction) {
        let t = strip_outer_parens(expr);

        if let Some(args) = helper_call_args(t) {
            for arg in split_top_level(args, ",") {
                self.argument(arg, out);
            }
            return;
        }
        if let Some(items) = joined_array_items(t) {
            for item in split_top_level(items, ",") {
                self.argument(item, out);
            }
            return;
        }
        self.argument(t, out);
    }

    fn argument(&self, arg: &str, out: &mut ClassExtraction) {
        let arg = strip_outer_parens(arg);
        if arg.is_empty() {
            return;
        }

        if let Some(classes) = string_literal(arg) {
            out.add_base(&classes);
            return;
        }
        if is_template_literal(arg) {
            self.template(arg, None, out);
            return;
        }
        if helper_call_args(arg).is_some() || joined_array_items(arg).is_some() {
            self.expression(arg, out);
            return;
        }
        if arg.starts_with('[') && balanced_end(arg, 0) == Some(arg.len() - 1) {
            for item in split_top_level(&arg[1..arg.len() - 1], ",") {
                self.argument(item, out);
            }
            return;
        }
        if arg.starts_with('{') && balanced_end(arg, 0) == Some(arg.len() - 1) {
            self.object(&arg[1..arg.len() - 1], out);
            return;
        }
        if let Some((cond, yes, no)) = split_ternary(arg) {
            self.branch(cond, yes, out);
            self.branch(&format!("!({})", cond), no, out);
            return;
        }
        if contains_top_level(arg, "&&") {
            let parts = split_top_level(arg, "&&");
            if let Some((class_part, conds)) = parts.split_last() {
                let cond = conds.join(" && ");
                self.branch(&cond, class_part, out);
                return;
            }
        }
        if is_member_path(arg) {
            let expr = strip_props_prefix(arg);
            if !out.computed.contains(&expr) {
                out.computed.push(expr);
            }
            return;
        }

        out.review.push(
            ManualReviewItem::medium("Unsupported class expression")
                .with_context(arg)
                .with_action("Add the class logic to the template by hand"),
        );
    }

    /// One class-producing operand under `cond`
    fn branch(&self, cond: &str, value: &str, out: &mut ClassExtraction) {
        let value = strip_outer_parens(value);
        if matches!(value, "undefined" | "null" | "false" | "''" | "\"\"") {
            return;
        }
        if let Some(classes) = string_literal(value) {
            for class in classes.split_whitespace() {
                self.conditional(cond, class, out);
            }
            return;
        }
        if is_template_literal(value) {
            self.template(value, Some(cond), out);
            return;
        }
        out.review.push(
            ManualReviewItem::medium("Unsupported conditional class value")
                .with_context(format!("{} → {}", cond, value)),
        );
    }

    fn object(&self, inner: &str, out: &mut ClassExtraction) {
        for entry in split_top_level(inner, ",") {
            if entry.starts_with("...") {
                out.review.push(
                    ManualReviewItem::medium("Spread in class object").with_context(entry),
                );
                continue;
            }
            let (key, cond) = match find_top_level(entry, ":") {
                Some(colon) => (entry[..colon].trim(), entry[colon + 1..].trim()),
                // `{ active }` shorthand
                None => (entry, entry),
            };

            if key.starts_with('[') {
                let computed = extract_balanced_inner(key, 0).unwrap_or_default();
                if is_template_literal(computed) {
                    self.template(computed, Some(cond), out);
                } else {
                    out.review.push(
                        ManualReviewItem::medium("Computed class key").with_context(entry),
                    );
                }
                continue;
            }

            let classes = string_literal(key).unwrap_or_else(|| key.to_string());
            for class in classes.split_whitespace() {
                self.conditional(cond, class, out);
            }
        }
    }

    fn conditional(&self, cond: &str, class: &str, out: &mut ClassExtraction) {
        match classify_condition(cond, self.attributes) {
            Ok(triggers) => {
                for (prop, trigger) in triggers {
                    out.mappings
                        .push(ClassMapping::new(prop, trigger, class, cond.trim()));
                }
            }
            Err(reason) => out.review.push(
                ManualReviewItem::medium(reason)
                    .with_context(format!("{} && '{}'", cond.trim(), class))
                    .with_action("List the matching values explicitly"),
            ),
        }
    }

    fn template(&self, literal: &str, cond: Option<&str>, out: &mut ClassExtraction) {
        match template_variable(literal) {
            Some((var, pattern)) => {
                let (excluded, guard) = template_guard(cond, &var);
                out.mappings.push(ClassMapping::new(
                    var,
                    Trigger::Template {
                        pattern: pattern.clone(),
                        excluded,
                        guard,
                    },
                    pattern,
                    cond.unwrap_or_default().trim(),
                ));
            }
            None => out.templates.push((
                strip_props_prefix(literal.trim()),
                cond.map(|c| strip_props_prefix(c.trim())),
            )),
        }
    }
}

/// Arguments of `clsx(...)` / `classNames(...)` / `cx(...)`
fn helper_call_args(text: &str) -> Option<&str> {
    let open = text.find('(')?;
    let name = text[..open].trim();
    if !CLASS_HELPERS.contains(&name) {
        return None;
    }
    let close = balanced_end(text, open)?;
    if close != text.len() - 1 {
        return None;
    }
    Some(&text[open + 1..close])
}

/// Items of `[...].join(' ')`, optionally with `.filter(Boolean)` between
fn joined_array_items(text: &str) -> Option<&str> {
    if !text.starts_with('[') {
        return None;
    }
    let close = balanced_end(text, 0)?;
    let rest = text[close + 1..].trim_start();
    if !rest.starts_with('.') || !rest.contains(".join(") {
        return None;
    }
    Some(&text[1..close])
}
