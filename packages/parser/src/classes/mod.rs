//! Conditional-class extraction.
//!
//! Three source idioms end up in the same [`ClassMapping`] list:
//! bracketed calls (`clsx(...)` and friends), `switch` statements feeding a
//! base-component prop, and ternaries/forwarded props on the root tag.

mod attr;
mod clsx;
mod switch;

pub use attr::AttrExtractor;
pub use clsx::ClsxExtractor;
pub use switch::{extract_switches, switch_class_mappings};

use crate::ast::{literal_key, AttributeDescriptor, AttributeType, ClassMapping, Trigger};
use crate::scan::{
    contains_top_level, find_top_level, is_identifier, literal_value, split_top_level,
    string_literal, strip_outer_parens, template_parts, TemplatePart,
};
use regex::Regex;
use roos_common::ManualReviewItem;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static PROPS_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bprops\.").unwrap());
static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_$][\w$]*").unwrap());

/// Asks the wrapped base component which classes a prop value produces.
pub trait PropClassLookup {
    fn classes_for(&self, prop: &str, value: &Value) -> Vec<String>;
}

/// Lookup used when no base component is wrapped
pub struct NoBaseClasses;

impl PropClassLookup for NoBaseClasses {
    fn classes_for(&self, _prop: &str, _value: &Value) -> Vec<String> {
        Vec::new()
    }
}

/// Everything the class extractors found for one root element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassExtraction {
    /// Always-present classes, deduplicated, in first-seen order
    pub base_classes: Vec<String>,
    pub mappings: Vec<ClassMapping>,
    /// JS expressions whose runtime value is appended (`className`)
    pub computed: Vec<String>,
    /// Template literals that could not be expanded, with their guard
    pub templates: Vec<(String, Option<String>)>,
    pub review: Vec<ManualReviewItem>,
}

impl ClassExtraction {
    pub fn add_base(&mut self, classes: &str) {
        for class in classes.split_whitespace() {
            if !self.base_classes.iter().any(|c| c == class) {
                self.base_classes.push(class.to_string());
            }
        }
    }

    pub fn merge(&mut self, other: ClassExtraction) {
        for class in other.base_classes {
            self.add_base(&class);
        }
        self.mappings.extend(other.mappings);
        for expr in other.computed {
            if !self.computed.contains(&expr) {
                self.computed.push(expr);
            }
        }
        self.templates.extend(other.templates);
        self.review.extend(other.review);
    }

    /// Props that drive at least one mapping
    pub fn mapped_props(&self) -> BTreeSet<&str> {
        self.mappings.iter().map(|m| m.prop_name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.base_classes.is_empty()
            && self.mappings.is_empty()
            && self.computed.is_empty()
            && self.templates.is_empty()
    }

    /// Expand deferred template mappings once enum values are known.
    ///
    /// `` `prefix-${size}` `` guarded by `size !== 'sm'` becomes one
    /// mapping per remaining enum value. Without enum values the template
    /// stays a runtime concatenation.
    pub fn expand_templates(&mut self, attributes: &[AttributeDescriptor]) {
        let mut expanded = Vec::with_capacity(self.mappings.len());

        for mapping in std::mem::take(&mut self.mappings) {
            if !matches!(mapping.trigger, Trigger::Template { .. }) {
                expanded.push(mapping);
                continue;
            }
            let Trigger::Template {
                pattern,
                excluded,
                guard,
            } = &mapping.trigger
            else {
                continue;
            };

            let attr = attributes
                .iter()
                .find(|a| a.name == mapping.prop_name && !a.enum_values.is_empty());

            let Some(attr) = attr else {
                let literal = format!("`{}`", pattern);
                let guard = match (guard, excluded.is_empty()) {
                    (_, false) => Some(mapping.condition.clone()),
                    (g, true) => g.clone(),
                };
                self.templates.push((literal, guard));
                continue;
            };

            for value in attr.enum_values.iter().filter(|v| !excluded.contains(v)) {
                let class = substitute_template(pattern, value);
                let trigger = match guard {
                    Some(g) => Trigger::Condition(format!(
                        "{} && {} === '{}'",
                        g, mapping.prop_name, value
                    )),
                    None => Trigger::Equals(enum_value(attr, value)),
                };
                expanded.push(ClassMapping::new(
                    mapping.prop_name.clone(),
                    trigger,
                    class,
                    format!("{} === '{}'", mapping.prop_name, value),
                ));
            }
        }

        self.mappings = expanded;
    }
}

fn substitute_template(pattern: &str, value: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        match rest[start..].find('}') {
            Some(end) => {
                out.push_str(value);
                rest = &rest[start + end + 1..];
            }
            None => {
                rest = &rest[start..];
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Drop a leading `props.` from every member access
pub(crate) fn strip_props_prefix(text: &str) -> String {
    PROPS_PREFIX_RE.replace_all(text, "").into_owned()
}

/// First identifier in a condition, skipping `!` and parentheses
pub(crate) fn first_identifier(text: &str) -> Option<String> {
    IDENT_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|w| !matches!(*w, "typeof" | "true" | "false" | "null" | "undefined"))
        .map(str::to_string)
}

/// `x === 'v'` → `("x", "v")`, also accepting `==` and reversed operands.
pub(crate) fn equality(text: &str) -> Option<(String, Value)> {
    let t = strip_outer_parens(text);
    let (pos, len) = match find_top_level(t, "===") {
        Some(p) => (p, 3),
        None => (find_top_level(t, "==")?, 2),
    };
    if t[..pos].ends_with('!') {
        return None;
    }
    let lhs = t[..pos].trim();
    let rhs = t[pos + len..].trim();
    operands(lhs, rhs).or_else(|| operands(rhs, lhs))
}

/// `x !== 'v'` → `("x", "v")`
pub(crate) fn inequality(text: &str) -> Option<(String, Value)> {
    let t = strip_outer_parens(text);
    let (pos, len) = match find_top_level(t, "!==") {
        Some(p) => (p, 3),
        None => (find_top_level(t, "!=")?, 2),
    };
    let lhs = t[..pos].trim();
    let rhs = t[pos + len..].trim();
    operands(lhs, rhs).or_else(|| operands(rhs, lhs))
}

fn operands(var: &str, value: &str) -> Option<(String, Value)> {
    if !is_identifier(var) {
        return None;
    }
    match literal_value(value) {
        Value::String(_) if string_literal(value).is_none() => None,
        value => Some((var.to_string(), value)),
    }
}

/// An enum value of `attr` as a comparison operand; numeric unions
/// (`1 | 2`) compare as numbers
pub(crate) fn enum_value(attr: &AttributeDescriptor, value: &str) -> Value {
    if attr.has_type(AttributeType::Number) {
        if let Value::Number(n) = literal_value(value) {
            return Value::Number(n);
        }
    }
    Value::String(value.to_string())
}

/// Classify a JS condition into `(prop, trigger)` pairs.
///
/// An OR of equalities on one prop yields one `Equals` per value. A `!==`
/// is rewritten to the remaining enum values when they are known; without
/// them the condition is rejected with a reason.
pub(crate) fn classify_condition(
    condition: &str,
    attributes: &[AttributeDescriptor],
) -> Result<Vec<(String, Trigger)>, String> {
    let cleaned = strip_props_prefix(condition);
    let c = strip_outer_parens(&cleaned);

    if contains_top_level(c, "||") {
        let parts = split_top_level(c, "||");
        let equalities: Option<Vec<_>> = parts.iter().map(|p| equality(p)).collect();
        if let Some(eqs) = equalities {
            if eqs.iter().all(|(var, _)| *var == eqs[0].0) {
                return Ok(eqs
                    .into_iter()
                    .map(|(var, value)| (var, Trigger::Equals(value)))
                    .collect());
            }
        }
        return compound(c);
    }
    if contains_top_level(c, "&&") {
        return compound(c);
    }

    if let Some(inner) = c.strip_prefix("!!") {
        if is_identifier(inner.trim()) {
            return Ok(vec![(inner.trim().to_string(), Trigger::Truthy)]);
        }
    }
    if let Some(inner) = c.strip_prefix('!') {
        let inner = strip_outer_parens(inner);
        if is_identifier(inner) {
            return Ok(vec![(inner.to_string(), Trigger::Falsy)]);
        }
    }
    if is_identifier(c) {
        return Ok(vec![(c.to_string(), Trigger::Truthy)]);
    }

    if let Some((var, value)) = inequality(c) {
        let Some(attr) = attributes
            .iter()
            .find(|a| a.name == var && !a.enum_values.is_empty())
        else {
            return Err(format!(
                "Inequality on '{}' without known enum values",
                var
            ));
        };
        let excluded = literal_key(&value);
        return Ok(attr
            .enum_values
            .iter()
            .filter(|v| **v != excluded)
            .map(|v| (var.clone(), Trigger::Equals(enum_value(attr, v))))
            .collect());
    }
    if let Some((var, value)) = equality(c) {
        return Ok(vec![(var, Trigger::Equals(value))]);
    }

    compound(c)
}

fn compound(c: &str) -> Result<Vec<(String, Trigger)>, String> {
    match first_identifier(c) {
        Some(prop) => Ok(vec![(prop, Trigger::Condition(c.to_string()))]),
        None => Err(format!("Condition without a prop: {}", c)),
    }
}

/// Split a conjunction guarding a template into the values excluded for
/// `var` (`var !== 'x'`) and the remaining guard text.
pub(crate) fn template_guard(
    condition: Option<&str>,
    var: &str,
) -> (Vec<String>, Option<String>) {
    let Some(condition) = condition else {
        return (Vec::new(), None);
    };
    let cleaned = strip_props_prefix(condition);
    let mut excluded = Vec::new();
    let mut rest = Vec::new();

    for part in split_top_level(strip_outer_parens(&cleaned), "&&") {
        match inequality(part) {
            Some((v, value)) if v == var => excluded.push(literal_key(&value)),
            _ => rest.push(part.to_string()),
        }
    }

    let guard = (!rest.is_empty()).then(|| rest.join(" && "));
    (excluded, guard)
}

/// The single interpolated identifier of a template literal, if that is
/// all it interpolates.
pub(crate) fn template_variable(literal: &str) -> Option<(String, String)> {
    let parts = template_parts(literal)?;
    let mut exprs = parts.iter().filter_map(|p| match p {
        TemplatePart::Expr(e) => Some(strip_props_prefix(e)),
        TemplatePart::Text(_) => None,
    });
    let var = exprs.next()?;
    if exprs.next().is_some() || !is_identifier(&var) {
        return None;
    }
    let t = literal.trim();
    let pattern = strip_props_prefix(&t[1..t.len() - 1]);
    Some((var, pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_attr() -> Vec<AttributeDescriptor> {
        vec![AttributeDescriptor::enumeration("size", &["sm", "md", "lg"])]
    }

    #[test]
    fn test_template_expansion_excludes_inequality() {
        let (excluded, guard) = template_guard(Some("size !== 'sm'"), "size");
        assert_eq!(excluded, vec!["sm"]);
        assert_eq!(guard, None);

        let mut extraction = ClassExtraction::default();
        extraction.mappings.push(ClassMapping::new(
            "size",
            Trigger::Template {
                pattern: "prefix-${size}".into(),
                excluded,
                guard,
            },
            "prefix-${size}",
            "size !== 'sm'",
        ));
        extraction.expand_templates(&size_attr());

        let classes: Vec<_> = extraction.mappings.iter().map(|m| m.css_class.as_str()).collect();
        assert_eq!(classes, vec!["prefix-md", "prefix-lg"]);
        assert_eq!(extraction.mappings[0].trigger, Trigger::Equals("md".into()));
    }

    #[test]
    fn test_template_without_enum_stays_runtime() {
        let mut extraction = ClassExtraction::default();
        extraction.mappings.push(ClassMapping::new(
            "tone",
            Trigger::Template {
                pattern: "tone-${tone}".into(),
                excluded: vec![],
                guard: Some("active".into()),
            },
            "tone-${tone}",
            "active",
        ));
        extraction.expand_templates(&[AttributeDescriptor::new("tone", AttributeType::String)]);
        assert!(extraction.mappings.is_empty());
        assert_eq!(
            extraction.templates,
            vec![("`tone-${tone}`".to_string(), Some("active".to_string()))]
        );
    }

    #[test]
    fn test_guarded_template_expansion_keeps_guard() {
        let (excluded, guard) = template_guard(Some("showIcon && size !== 'lg'"), "size");
        assert_eq!(excluded, vec!["lg"]);
        assert_eq!(guard.as_deref(), Some("showIcon"));
    }

    #[test]
    fn test_classify_polarity() {
        let attrs = vec![AttributeDescriptor::new("disabled", AttributeType::Boolean)];
        assert_eq!(
            classify_condition("disabled", &attrs).unwrap(),
            vec![("disabled".to_string(), Trigger::Truthy)]
        );
        assert_eq!(
            classify_condition("!props.disabled", &attrs).unwrap(),
            vec![("disabled".to_string(), Trigger::Falsy)]
        );
    }

    #[test]
    fn test_classify_equalities() {
        let attrs = size_attr();
        assert_eq!(
            classify_condition("size === 'sm' || size === 'md'", &attrs).unwrap(),
            vec![
                ("size".to_string(), Trigger::Equals("sm".into())),
                ("size".to_string(), Trigger::Equals("md".into())),
            ]
        );
        assert_eq!(
            classify_condition("size !== 'md'", &attrs).unwrap(),
            vec![
                ("size".to_string(), Trigger::Equals("sm".into())),
                ("size".to_string(), Trigger::Equals("lg".into())),
            ]
        );
        assert_eq!(
            classify_condition("'lg' == size", &attrs).unwrap(),
            vec![("size".to_string(), Trigger::Equals("lg".into()))]
        );
    }

    #[test]
    fn test_quoted_numbers_stay_strings() {
        assert_eq!(
            classify_condition("level === '1'", &[]).unwrap(),
            vec![("level".to_string(), Trigger::Equals(Value::String("1".into())))]
        );
        assert_eq!(
            classify_condition("level === 2", &[]).unwrap(),
            vec![("level".to_string(), Trigger::Equals(Value::from(2)))]
        );

        let mut columns = AttributeDescriptor::new("columns", AttributeType::Enum);
        columns.types.push(AttributeType::Number);
        columns.enum_values = vec!["1".into(), "2".into(), "3".into()];
        assert_eq!(
            classify_condition("columns !== 1", &[columns]).unwrap(),
            vec![
                ("columns".to_string(), Trigger::Equals(Value::from(2))),
                ("columns".to_string(), Trigger::Equals(Value::from(3))),
            ]
        );
    }

    #[test]
    fn test_inequality_without_values_is_rejected() {
        assert!(classify_condition("kind !== 'primary'", &[]).is_err());
    }

    #[test]
    fn test_compound_condition() {
        let result = classify_condition("busy && !disabled", &[]).unwrap();
        assert_eq!(
            result,
            vec![("busy".to_string(), Trigger::Condition("busy && !disabled".into()))]
        );
    }
}
