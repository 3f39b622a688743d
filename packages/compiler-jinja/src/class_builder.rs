//! CSS class list construction for generated templates.

use crate::context::{CompileOptions, Context};
use crate::expr::{quote, template_literal, translate};
use crate::names::NameMap;
use roos_parser::{ClassExtraction, ClassMapping, Trigger};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum ClassEntry {
    /// Appended when a single condition holds
    Guarded { condition: String, classes: Vec<String> },
    /// Exclusive value branches of one mapping chain, first match wins
    Chain {
        name: String,
        arms: Vec<(Option<String>, Vec<String>)>,
    },
    /// A runtime value appended when truthy
    Computed { expression: String },
    /// A template literal appended as a concatenation
    Template {
        expression: String,
        guard: Option<String>,
    },
}

/// Accumulates base and conditional classes, then emits the statements
/// that build the class list in the template.
///
/// Conditions are stored already translated, so everything the builder
/// emits is valid Jinja.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassBuilder {
    base_classes: Vec<String>,
    entries: Vec<ClassEntry>,
}

impl ClassBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preloaded with everything the class extractors found
    pub fn from_extraction(extraction: &ClassExtraction, names: &NameMap) -> Self {
        let mut builder = Self::new();
        builder.add_base_classes(&extraction.base_classes);
        builder.add_mappings(&extraction.mappings, names);
        for expression in &extraction.computed {
            builder.add_computed(&translate(expression, names));
        }
        for (literal, guard) in &extraction.templates {
            let guard = guard.as_deref().map(|g| translate(g, names));
            builder.add_template(literal, guard.as_deref(), names);
        }
        builder
    }

    pub fn base_classes(&self) -> &[String] {
        &self.base_classes
    }

    pub fn add_base_classes(&mut self, classes: &[String]) {
        for class in classes {
            if !self.base_classes.contains(class) {
                self.base_classes.push(class.clone());
            }
        }
    }

    /// `condition` is a Jinja expression
    pub fn add_conditional_class(&mut self, class: &str, condition: &str) {
        for entry in &mut self.entries {
            if let ClassEntry::Guarded {
                condition: existing,
                classes,
            } = entry
            {
                if existing == condition {
                    if !classes.iter().any(|c| c == class) {
                        classes.push(class.to_string());
                    }
                    return;
                }
            }
        }
        self.entries.push(ClassEntry::Guarded {
            condition: condition.to_string(),
            classes: vec![class.to_string()],
        });
    }

    pub fn add_boolean_class(&mut self, var: &str, class: &str, negate: bool) {
        let condition = if negate {
            format!("not {}", var)
        } else {
            var.to_string()
        };
        self.add_conditional_class(class, &condition);
    }

    /// Add mappings in declaration order.
    ///
    /// Mappings that belong to a chain become one if/elif/else block per
    /// chain; everything else is an independent guarded append, even when
    /// it tests the same prop as a chain.
    pub fn add_mappings(&mut self, mappings: &[ClassMapping], names: &NameMap) {
        for mapping in mappings {
            let prop = names.resolve(&mapping.prop_name).to_string();
            match (&mapping.chain, &mapping.trigger) {
                (Some(chain), Trigger::Equals(value)) => {
                    let condition = format!("{} == {}", prop, jinja_value(value));
                    self.chain_arm(chain, Some(condition), &mapping.css_class);
                }
                (Some(chain), Trigger::Otherwise) => self.chain_arm(chain, None, &mapping.css_class),
                (_, Trigger::Template { pattern, guard, .. }) => {
                    let guard = guard.as_deref().map(|g| translate(g, names));
                    self.add_template(&format!("`{}`", pattern), guard.as_deref(), names);
                }
                (_, trigger) => {
                    if let Some(condition) = condition_for(&prop, trigger, names) {
                        self.add_conditional_class(&mapping.css_class, &condition);
                    }
                }
            }
        }
    }

    /// `expression` is a Jinja expression
    pub fn add_computed(&mut self, expression: &str) {
        let entry = ClassEntry::Computed {
            expression: expression.to_string(),
        };
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }

    /// `literal` is a JS template literal; `guard` a Jinja condition
    pub fn add_template(&mut self, literal: &str, guard: Option<&str>, names: &NameMap) {
        let expression = template_literal(literal, names).unwrap_or_else(|| quote(literal.trim_matches('`')));
        self.entries.push(ClassEntry::Template {
            expression,
            guard: guard.map(str::to_string),
        });
    }

    /// An empty `class` opens the arm without adding to it
    fn chain_arm(&mut self, name: &str, condition: Option<String>, class: &str) {
        let position = self
            .entries
            .iter()
            .position(|e| matches!(e, ClassEntry::Chain { name: n, .. } if n == name));
        let index = match position {
            Some(index) => index,
            None => {
                self.entries.push(ClassEntry::Chain {
                    name: name.to_string(),
                    arms: Vec::new(),
                });
                self.entries.len() - 1
            }
        };
        let ClassEntry::Chain { arms, .. } = &mut self.entries[index] else {
            return;
        };

        let at = match arms.iter().position(|(c, _)| *c == condition) {
            Some(at) => at,
            None => {
                arms.push((condition, Vec::new()));
                arms.len() - 1
            }
        };
        let classes = &mut arms[at].1;
        if !class.is_empty() && !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        // The fallback arm stays last
        arms.sort_by_key(|(c, _)| c.is_none());
    }

    pub fn is_empty(&self) -> bool {
        self.base_classes.is_empty() && self.entries.is_empty()
    }

    /// Write the class-building statements
    pub fn generate(&self, ctx: &mut Context) {
        let var = ctx.options.class_var.clone();
        ctx.add_line(&format!("{{% set {} = [{}] %}}", var, quoted_list(&self.base_classes)));

        for entry in &self.entries {
            match entry {
                ClassEntry::Guarded { condition, classes } => ctx.add_line(&format!(
                    "{{% if {} %}}{}{{% endif %}}",
                    condition,
                    append(&var, &quoted_list(classes))
                )),
                ClassEntry::Chain { arms, .. } => chain(ctx, &var, arms),
                ClassEntry::Computed { expression } => ctx.add_line(&format!(
                    "{{% if {} %}}{}{{% endif %}}",
                    expression,
                    append(&var, expression)
                )),
                ClassEntry::Template { expression, guard } => match guard {
                    Some(guard) => ctx.add_line(&format!(
                        "{{% if {} %}}{}{{% endif %}}",
                        guard,
                        append(&var, expression)
                    )),
                    None => ctx.add_line(&append(&var, expression)),
                },
            }
        }
    }

    pub fn to_jinja(&self) -> String {
        let mut ctx = Context::new(CompileOptions::default());
        self.generate(&mut ctx);
        ctx.get_output()
    }
}

fn chain(ctx: &mut Context, var: &str, arms: &[(Option<String>, Vec<String>)]) {
    let conditional = arms.iter().any(|(c, _)| c.is_some());
    if !conditional {
        // Only a fallback: it always applies
        for (_, classes) in arms.iter().filter(|(_, classes)| !classes.is_empty()) {
            ctx.add_line(&append(var, &quoted_list(classes)));
        }
        return;
    }

    let mut first = true;
    for (condition, classes) in arms {
        let opener = match (condition, first) {
            (Some(c), true) => format!("{{% if {} %}}", c),
            (Some(c), false) => format!("{{% elif {} %}}", c),
            (None, _) => "{% else %}".to_string(),
        };
        first = false;
        ctx.add_line(&opener);
        ctx.indent();
        if classes.is_empty() {
            ctx.add_line("{# no classes #}");
        } else {
            ctx.add_line(&append(var, &quoted_list(classes)));
        }
        ctx.dedent();
    }
    ctx.add_line("{% endif %}");
}

fn append(var: &str, items: &str) -> String {
    format!("{{% set {0} = {0} + [{1}] %}}", var, items)
}

fn quoted_list(classes: &[String]) -> String {
    classes.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", ")
}

/// Strings compare quoted even when they look numeric; numbers and
/// booleans compare bare
pub(crate) fn jinja_value(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        Value::Null => "none".to_string(),
        other => other.to_string(),
    }
}

/// Jinja condition under which a trigger applies
pub fn condition_for(prop: &str, trigger: &Trigger, names: &NameMap) -> Option<String> {
    match trigger {
        Trigger::Truthy => Some(prop.to_string()),
        Trigger::Falsy => Some(format!("not {}", prop)),
        Trigger::Equals(value) => Some(format!("{} == {}", prop, jinja_value(value))),
        Trigger::Condition(js) => Some(translate(js, names)),
        Trigger::Otherwise | Trigger::Template { .. } => None,
    }
}
