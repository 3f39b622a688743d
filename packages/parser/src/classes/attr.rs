use super::{classify_condition, enum_value, strip_props_prefix, ClassExtraction, PropClassLookup};
use crate::ast::{AttributeDescriptor, ClassMapping, Prop, PropValue, Trigger};
use crate::scan::{is_identifier, split_ternary, string_literal};
use roos_common::ManualReviewItem;
use serde_json::Value;

/// Props on the root tag that never carry class logic
const SKIPPED_PROPS: &[&str] = &["className", "children", "ref", "key", "style", "id"];

/// Class logic hidden in props passed to the wrapped base component:
/// `hint={kind === 'warning' ? 'warning' : undefined}` or a forwarded
/// `size={size}`.
pub struct AttrExtractor<'a> {
    attributes: &'a [AttributeDescriptor],
    lookup: &'a dyn PropClassLookup,
    base_classes: &'a [String],
}

impl<'a> AttrExtractor<'a> {
    pub fn new(
        attributes: &'a [AttributeDescriptor],
        lookup: &'a dyn PropClassLookup,
        base_classes: &'a [String],
    ) -> Self {
        Self {
            attributes,
            lookup,
            base_classes,
        }
    }

    /// `skip` lists props already handled elsewhere (switch results).
    pub fn extract(&self, root_props: &[Prop], skip: &[&str]) -> ClassExtraction {
        let mut out = ClassExtraction::default();

        for prop in root_props {
            let name = prop.name.as_str();
            if SKIPPED_PROPS.contains(&name) || name.starts_with("on") || skip.contains(&name) {
                continue;
            }
            let PropValue::Expression(expr) = &prop.value else {
                continue;
            };
            let expr = strip_props_prefix(expr.trim());
            if skip.contains(&expr.as_str()) {
                continue;
            }

            if let Some((cond, yes, no)) = split_ternary(&expr) {
                self.ternary(name, cond, yes, no, &mut out);
            } else if is_identifier(&expr) {
                self.forwarded(name, &expr, &mut out);
            }
        }

        out
    }

    fn classes(&self, prop: &str, value: Value) -> Vec<String> {
        self.lookup
            .classes_for(prop, &value)
            .into_iter()
            .filter(|c| !self.base_classes.contains(c))
            .collect()
    }

    fn ternary(&self, prop: &str, cond: &str, yes: &str, no: &str, out: &mut ClassExtraction) {
        let mut branches = vec![(cond.to_string(), yes)];
        if !matches!(no, "undefined" | "null") {
            branches.push((format!("!({})", cond), no));
        }

        for (condition, value) in branches {
            let Some(value) = literal_value(value) else {
                out.review.push(
                    ManualReviewItem::medium(format!("Non-literal value for base prop: {}", prop))
                        .with_context(format!("{}={{{} ? {} : {}}}", prop, cond, yes, no)),
                );
                return;
            };
            let classes = self.classes(prop, value);
            if classes.is_empty() {
                continue;
            }
            match classify_condition(&condition, self.attributes) {
                Ok(triggers) => {
                    for (var, trigger) in triggers {
                        for class in &classes {
                            out.mappings.push(ClassMapping::new(
                                var.clone(),
                                trigger.clone(),
                                class.clone(),
                                condition.clone(),
                            ));
                        }
                    }
                }
                Err(reason) => out
                    .review
                    .push(ManualReviewItem::medium(reason).with_context(condition.clone())),
            }
        }
    }

    /// `size={size}` where `size` is an enum or boolean attribute
    fn forwarded(&self, prop: &str, var: &str, out: &mut ClassExtraction) {
        let Some(attr) = self.attributes.iter().find(|a| a.name == var) else {
            return;
        };

        if !attr.enum_values.is_empty() {
            for value in &attr.enum_values {
                for class in self.classes(prop, Value::String(value.clone())) {
                    out.mappings.push(ClassMapping::new(
                        var,
                        Trigger::Equals(enum_value(attr, value)),
                        class,
                        format!("{} === '{}'", var, value),
                    ));
                }
            }
        } else if attr.is_boolean() {
            for (value, trigger) in [(true, Trigger::Truthy), (false, Trigger::Falsy)] {
                for class in self.classes(prop, Value::Bool(value)) {
                    out.mappings
                        .push(ClassMapping::new(var, trigger.clone(), class, var));
                }
            }
        }
    }
}

fn literal_value(text: &str) -> Option<Value> {
    let t = text.trim();
    if let Some(s) = string_literal(t) {
        return Some(Value::String(s));
    }
    match t {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AttributeType;

    struct AlertLookup;

    impl PropClassLookup for AlertLookup {
        fn classes_for(&self, prop: &str, value: &Value) -> Vec<String> {
            match (prop, value) {
                ("type", Value::String(v)) => vec!["utrecht-alert".into(), format!("utrecht-alert--{}", v)],
                ("hint", Value::String(v)) => vec![format!("utrecht-hint--{}", v)],
                ("busy", Value::Bool(true)) => vec!["utrecht-button--busy".into()],
                _ => Vec::new(),
            }
        }
    }

    fn prop(name: &str, expr: &str) -> Prop {
        Prop {
            name: name.into(),
            value: PropValue::Expression(expr.into()),
        }
    }

    #[test]
    fn test_ternary_with_or_equalities() {
        let attrs = vec![AttributeDescriptor::enumeration("kind", &["info", "warning", "warning-subtle"])];
        let base = vec!["utrecht-alert".to_string()];
        let extractor = AttrExtractor::new(&attrs, &AlertLookup, &base);
        let out = extractor.extract(
            &[prop("hint", "kind === 'warning' || kind === 'warning-subtle' ? 'warning' : undefined")],
            &[],
        );
        assert_eq!(out.mappings.len(), 2);
        assert!(out
            .mappings
            .iter()
            .all(|m| m.prop_name == "kind" && m.css_class == "utrecht-hint--warning"));
        assert_eq!(out.mappings[1].trigger, Trigger::Equals("warning-subtle".into()));
    }

    #[test]
    fn test_forwarded_enum_and_boolean() {
        let attrs = vec![
            AttributeDescriptor::enumeration("type", &["info", "error"]),
            AttributeDescriptor::new("busy", AttributeType::Boolean),
        ];
        let base = vec!["utrecht-alert".to_string()];
        let extractor = AttrExtractor::new(&attrs, &AlertLookup, &base);
        let out = extractor.extract(
            &[prop("type", "type"), prop("busy", "props.busy"), prop("onClick", "onClick")],
            &[],
        );
        let summary: Vec<_> = out
            .mappings
            .iter()
            .map(|m| (m.trigger.clone(), m.css_class.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Trigger::Equals("info".into()), "utrecht-alert--info"),
                (Trigger::Equals("error".into()), "utrecht-alert--error"),
                (Trigger::Truthy, "utrecht-button--busy"),
            ]
        );
    }

    #[test]
    fn test_skip_list() {
        let attrs = vec![AttributeDescriptor::enumeration("type", &["info"])];
        let extractor = AttrExtractor::new(&attrs, &AlertLookup, &[]);
        let out = extractor.extract(&[prop("type", "appearance")], &["appearance"]);
        assert!(out.mappings.is_empty());
    }
}
