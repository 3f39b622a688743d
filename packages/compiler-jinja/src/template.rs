//! Jinja template generation.
//!
//! A generated template reads every attribute from `_component_context`,
//! builds the class list, then renders the root element with its content.

use crate::class_builder::{condition_for, jinja_value, ClassBuilder};
use crate::context::{CompileOptions, Context};
use crate::expr::{quote, template_literal, translate, CONTENT_VAR};
use crate::names::NameMap;
use roos_common::{component_tag, ManualReviewItem};
use roos_parser::scan::string_literal;
use roos_parser::{
    AttributeDescriptor, AttributeType, ClsxExtractor, ComponentUsage, ContentElement, HtmlElement,
    Prop, PropValue, Trigger,
};
use roos_resolver::{ArrayShapeMapping, BaseResolution, NestedComponentRef, Wrapper};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

const EVENT_MIXIN_IMPORT: &str = "{% import 'components/_event_mixin.j2' as events %}";
const EVENT_MIXIN: &str = "{{ events.render_extra_attributes(_component_context) }}";

/// Component attributes rendered directly onto the root element
const ROOT_ATTRIBUTES: &[&str] = &["id", "type", "disabled", "required", "readonly", "placeholder"];
const BOOLEAN_HTML_ATTRIBUTES: &[&str] = &[
    "checked", "disabled", "hidden", "multiple", "open", "readonly", "required", "selected",
];
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq)]
pub enum RootTag {
    Static(String),
    /// JS expression computing the tag name at render time
    Dynamic(String),
}

/// An attribute present only while a JS condition holds
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalAttribute {
    pub condition: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RootElement {
    pub tag: RootTag,
    /// Static attributes contributed by the base component
    pub attributes: BTreeMap<String, String>,
    pub conditional_attributes: Vec<ConditionalAttribute>,
    /// Outermost first
    pub wrappers: Vec<Wrapper>,
}

impl Default for RootElement {
    fn default() -> Self {
        Self::new("div")
    }
}

impl RootElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: RootTag::Static(tag.into()),
            attributes: BTreeMap::new(),
            conditional_attributes: Vec::new(),
            wrappers: Vec::new(),
        }
    }
}

/// A component attribute copied onto an element as another attribute
#[derive(Debug, Clone, PartialEq)]
pub struct PassThroughAttribute {
    pub name: String,
    /// Tag receiving the attribute; the root element when `None`
    pub target_element: Option<String>,
    pub target_attribute: String,
}

/// Everything one template is generated from
#[derive(Debug, Clone, Default)]
pub struct TemplateInput {
    /// Output component name
    pub name: String,
    /// Source location used in review markers
    pub source_file: String,
    pub source_line: usize,
    pub attributes: Vec<AttributeDescriptor>,
    pub root: RootElement,
    pub classes: ClassBuilder,
    pub content: Vec<ContentElement>,
    /// Replaces the generated content when set
    pub custom_content: Option<String>,
    /// Base-library components used in the content, keyed by local name
    pub inline_components: BTreeMap<String, BaseResolution>,
    pub array_shapes: BTreeMap<String, ArrayShapeMapping>,
    pub nested: Vec<NestedComponentRef>,
    pub pass_through: Vec<PassThroughAttribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub template: String,
    /// Issues found while generating, in addition to the extractors' own
    pub review: Vec<ManualReviewItem>,
}

/// Compile a template input to Jinja
#[instrument(skip(input, options), fields(component = %input.name))]
pub fn compile_to_jinja(input: &TemplateInput, options: CompileOptions) -> Compilation {
    let names = NameMap::for_attributes(&input.attributes);
    let mut generator = Generator {
        input,
        review: names.review_items(),
        names,
        ctx: Context::new(options),
        loops: Vec::new(),
    };

    generator.header();
    generator.variables();
    input.classes.generate(&mut generator.ctx);
    generator.root();

    debug!(review = generator.review.len(), "generated template");
    Compilation {
        template: generator.ctx.get_output(),
        review: generator.review,
    }
}

/// Value an attribute falls back to when the caller omits it
pub fn default_value(attr: &AttributeDescriptor) -> Option<Value> {
    if let Some(value) = attr.actual_default() {
        return (!value.is_null()).then(|| value.clone());
    }
    if attr.is_boolean() {
        return Some(Value::Bool(false));
    }
    if attr.has_type(AttributeType::Number) {
        return None;
    }
    if let Some(first) = attr.enum_values.first() {
        return Some(Value::String(first.clone()));
    }
    if attr.is_array() {
        return Some(Value::Array(Vec::new()));
    }
    None
}

/// A JSON value as a Jinja literal
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "none".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(format_value).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(entries) => format!(
            "{{{}}}",
            entries
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), format_value(v)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

struct Generator<'a> {
    input: &'a TemplateInput,
    names: NameMap,
    ctx: Context,
    review: Vec<ManualReviewItem>,
    /// Open `for` loops: (item variable, iterated array)
    loops: Vec<(String, String)>,
}

impl Generator<'_> {
    fn header(&mut self) {
        self.ctx.add_line(EVENT_MIXIN_IMPORT);
        self.ctx.add_line(&format!(
            "{{# Auto-generated from React component: {}",
            self.input.name
        ));
        self.ctx
            .add_line("   Manual edits: wrap in MANUAL_START/MANUAL_END tags to preserve #}");
    }

    fn variables(&mut self) {
        for attr in &self.input.attributes {
            if attr.is_function() || attr.name == "children" {
                continue;
            }
            let var = self.names.resolve(&attr.name);
            let source = if self.names.is_renamed(&attr.name) {
                format!("_component_context[{}]", quote(&attr.name))
            } else {
                format!("_component_context.{}", attr.name)
            };
            let line = match default_value(attr) {
                Some(value) => format!(
                    "{{% set {} = {} | default({}) %}}",
                    var,
                    source,
                    format_value(&value)
                ),
                None => format!("{{% set {} = {} %}}", var, source),
            };
            self.ctx.add_line(&line);
        }
    }

    fn root(&mut self) {
        let input = self.input;
        let root = &input.root;
        let (tag, void) = match &root.tag {
            RootTag::Static(tag) => (tag.clone(), VOID_TAGS.contains(&tag.as_str())),
            RootTag::Dynamic(js) => {
                let expr = match template_literal(js, &self.names) {
                    Some(expr) => expr,
                    None => translate(js, &self.names),
                };
                self.ctx.add_line(&format!("{{% set tag_name = {} %}}", expr));
                ("{{ tag_name }}".to_string(), false)
            }
        };

        for wrapper in &root.wrappers {
            self.ctx
                .add_line(&format!("<{}{}>", wrapper.tag, class_attribute(&wrapper.classes)));
            self.ctx.indent();
        }

        self.ctx.add_line(&format!("<{}", tag));
        self.ctx.indent();
        let attributes = self.root_attributes(&tag);
        let last = attributes.len() - 1;
        for (i, attribute) in attributes.iter().enumerate() {
            if i == last {
                self.ctx.add_line(&format!("{}>", attribute));
            } else {
                self.ctx.add_line(attribute);
            }
        }

        if !void {
            self.body();
            self.ctx.dedent();
            self.ctx.add_line(&format!("</{}>", tag));
        } else {
            self.ctx.dedent();
        }

        for wrapper in root.wrappers.iter().rev() {
            self.ctx.dedent();
            self.ctx.add_line(&format!("</{}>", wrapper.tag));
        }
    }

    fn root_attributes(&self, tag: &str) -> Vec<String> {
        let root = &self.input.root;
        let mut attributes = vec![
            format!(
                "class=\"{{{{ {} | join(' ') }}}}\"",
                self.ctx.options.class_var
            ),
            format!("data-roos-component=\"{}\"", self.input.name),
        ];

        let forwarded: Vec<(&AttributeDescriptor, String)> = self
            .input
            .attributes
            .iter()
            .filter_map(|a| {
                let html = a.name.to_ascii_lowercase();
                ROOT_ATTRIBUTES.contains(&html.as_str()).then_some((a, html))
            })
            .collect();

        for (name, value) in &root.attributes {
            if forwarded.iter().all(|(_, html)| html != name) {
                attributes.push(format!("{}=\"{}\"", name, escape_attribute(value)));
            }
        }
        for conditional in &root.conditional_attributes {
            attributes.push(format!(
                "{{% if {} %}}{}=\"{}\"{{% endif %}}",
                translate(&conditional.condition, &self.names),
                conditional.name,
                escape_attribute(&conditional.value)
            ));
        }
        for (attr, html) in &forwarded {
            let var = self.names.resolve(&attr.name);
            if attr.is_boolean() {
                attributes.push(format!("{{% if {} %}}{}{{% endif %}}", var, html));
            } else {
                attributes.push(format!("{}=\"{{{{ {} }}}}\"", html, var));
            }
        }
        for pass in &self.input.pass_through {
            if pass.target_element.as_deref().map_or(true, |t| t == tag) {
                attributes.push(self.pass_through(pass));
            }
        }

        attributes.push(EVENT_MIXIN.to_string());
        attributes
    }

    fn pass_through(&self, pass: &PassThroughAttribute) -> String {
        let var = self.names.resolve(&pass.name);
        format!(
            "{{% if {0} %}}{1}=\"{{{{ {0} }}}}\"{{% endif %}}",
            var, pass.target_attribute
        )
    }

    fn body(&mut self) {
        if let Some(custom) = self.input.custom_content.as_deref() {
            self.ctx.add_lines(custom);
            return;
        }
        if self.input.content.is_empty() {
            self.ctx.add_line("{# Content #}");
            return;
        }
        let input = self.input;
        self.content(&input.content);
    }

    fn content(&mut self, elements: &[ContentElement]) {
        for element in elements {
            self.element(element);
        }
    }

    fn element(&mut self, element: &ContentElement) {
        if let Some(line) = self.inline(element) {
            if !line.is_empty() {
                self.ctx.add_line(&line);
            }
            return;
        }

        match element {
            ContentElement::Reference {
                resolved: Some(inner),
                ..
            } => self.element(inner),
            ContentElement::Element(html) => self.html_element(html),
            ContentElement::Component(usage) => self.component(usage),
            ContentElement::Conditional { condition, body } => {
                self.branches(&[(Some(condition.as_str()), body.as_slice())]);
            }
            ContentElement::ConditionalComponent {
                condition,
                component,
            } => {
                self.ctx.add_line(&format!(
                    "{{% if {} %}}",
                    translate(condition, &self.names)
                ));
                self.ctx.indent();
                self.component(component);
                self.ctx.dedent();
                self.ctx.add_line("{% endif %}");
            }
            ContentElement::Ternary {
                condition,
                when_true,
                when_false,
            } => self.branches(&[
                (Some(condition.as_str()), std::slice::from_ref(when_true.as_ref())),
                (None, std::slice::from_ref(when_false.as_ref())),
            ]),
            ContentElement::Branches { branches } => {
                let arms: Vec<(Option<&str>, &[ContentElement])> = branches
                    .iter()
                    .map(|b| (b.condition.as_deref(), b.body.as_slice()))
                    .collect();
                self.branches(&arms);
            }
            ContentElement::ArrayMap(map) => {
                self.ctx.add_line(&format!(
                    "{{% for {} in {} %}}",
                    self.names.resolve(&map.item_var),
                    translate(&map.array, &self.names)
                ));
                self.ctx.indent();
                if let Some(index) = &map.index_var {
                    self.ctx
                        .add_line(&format!("{{% set {} = loop.index0 %}}", self.names.resolve(index)));
                }
                self.loops.push((map.item_var.clone(), map.array.clone()));
                self.content(&map.body);
                self.loops.pop();
                self.ctx.dedent();
                self.ctx.add_line("{% endfor %}");
            }
            ContentElement::Unsupported { expression } => self.todo(
                "Unsupported expression",
                expression,
                "Translate this expression by hand",
            ),
            // Inline forms are handled above
            ContentElement::Literal { .. }
            | ContentElement::Reference { .. }
            | ContentElement::Fallback { .. }
            | ContentElement::ContentCall { .. } => {}
        }
    }

    /// Single-line rendering, when the element has one
    fn inline(&self, element: &ContentElement) -> Option<String> {
        match element {
            ContentElement::Literal { text } => Some(text.trim().to_string()),
            ContentElement::Reference {
                name,
                resolved: None,
            } => Some(self.output(name)),
            ContentElement::Fallback { chain } => Some(self.fallback(chain)),
            ContentElement::ContentCall { argument, .. } => Some(format!(
                "{{{{ {} | safe }}}}",
                translate(argument, &self.names)
            )),
            ContentElement::Ternary {
                condition,
                when_true,
                when_false,
            } => {
                let yes = self.value(when_true)?;
                let no = self.value(when_false)?;
                Some(format!(
                    "{{{{ {} if {} else {} }}}}",
                    yes,
                    translate(condition, &self.names),
                    no
                ))
            }
            ContentElement::Conditional { condition, body } if body.len() == 1 => {
                let inner = self.inline(&body[0])?;
                Some(format!(
                    "{{% if {} %}}{}{{% endif %}}",
                    translate(condition, &self.names),
                    inner
                ))
            }
            ContentElement::Element(html) if !VOID_TAGS.contains(&html.tag.as_str()) => {
                let children = self.inline_children(&html.children)?;
                Some(format!(
                    "<{0}{1}>{2}</{0}>",
                    html.tag,
                    self.html_attributes(html),
                    children
                ))
            }
            _ => None,
        }
    }

    fn inline_children(&self, children: &[ContentElement]) -> Option<String> {
        let parts: Option<Vec<String>> = children.iter().map(|c| self.inline(c)).collect();
        Some(
            parts?
                .into_iter()
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    /// A ternary operand as a Jinja expression
    fn value(&self, element: &ContentElement) -> Option<String> {
        match element {
            ContentElement::Literal { text } => Some(quote(text.trim())),
            ContentElement::Reference {
                name,
                resolved: None,
            } => Some(translate(name, &self.names)),
            _ => None,
        }
    }

    fn output(&self, name: &str) -> String {
        let expr = translate(name, &self.names);
        if expr == CONTENT_VAR {
            format!("{{{{ {} | safe }}}}", expr)
        } else {
            format!("{{{{ {} }}}}", expr)
        }
    }

    /// `a || b || c` → `a if a else b if b else c`
    fn fallback(&self, chain: &[String]) -> String {
        let links: Vec<String> = chain.iter().map(|l| translate(l, &self.names)).collect();
        let Some((last, rest)) = links.split_last() else {
            return String::new();
        };
        let expr = rest
            .iter()
            .rev()
            .fold(last.clone(), |acc, link| format!("{0} if {0} else {1}", link, acc));
        if links.iter().any(|l| l == CONTENT_VAR) {
            format!("{{{{ ({}) | safe }}}}", expr)
        } else {
            format!("{{{{ {} }}}}", expr)
        }
    }

    fn branches(&mut self, arms: &[(Option<&str>, &[ContentElement])]) {
        for (i, (condition, body)) in arms.iter().enumerate() {
            let line = match condition {
                Some(c) if i == 0 => format!("{{% if {} %}}", translate(c, &self.names)),
                Some(c) => format!("{{% elif {} %}}", translate(c, &self.names)),
                None => "{% else %}".to_string(),
            };
            self.ctx.add_line(&line);
            self.ctx.indent();
            self.content(body);
            self.ctx.dedent();
        }
        self.ctx.add_line("{% endif %}");
    }

    fn html_element(&mut self, html: &HtmlElement) {
        let open = format!("<{}{}>", html.tag, self.html_attributes(html));
        if VOID_TAGS.contains(&html.tag.as_str()) {
            self.ctx.add_line(&open);
            return;
        }
        self.ctx.add_line(&open);
        self.ctx.indent();
        self.content(&html.children);
        self.ctx.dedent();
        self.ctx.add_line(&format!("</{}>", html.tag));
    }

    fn html_attributes(&self, html: &HtmlElement) -> String {
        let mut out = String::new();

        for prop in html.props.iter().filter(|p| renders(p)) {
            let name = html_name(&prop.name);
            match &prop.value {
                PropValue::Literal(value) => {
                    out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)))
                }
                PropValue::Flag => out.push_str(&format!(" {}", name)),
                PropValue::Expression(expr) if name == "class" => {
                    out.push_str(&format!(" class=\"{}\"", self.inline_class(expr)))
                }
                PropValue::Expression(expr) if expr.starts_with('{') => {
                    debug!(attribute = name, "skipped object-valued attribute");
                }
                PropValue::Expression(expr) if BOOLEAN_HTML_ATTRIBUTES.contains(&name) => {
                    out.push_str(&format!(
                        " {{% if {} %}}{}{{% endif %}}",
                        translate(expr, &self.names),
                        name
                    ))
                }
                PropValue::Expression(expr) => out.push_str(&format!(
                    " {}=\"{{{{ {} }}}}\"",
                    name,
                    translate(expr, &self.names)
                )),
            }
        }

        for pass in &self.input.pass_through {
            if pass.target_element.as_deref() == Some(html.tag.as_str()) {
                out.push(' ');
                out.push_str(&self.pass_through(pass));
            }
        }
        out
    }

    /// A `className` expression on a content element, as attribute text
    fn inline_class(&self, expr: &str) -> String {
        if let Some(classes) = string_literal(expr) {
            return classes;
        }
        let mut extraction = ClsxExtractor::new(&self.input.attributes).extract(expr);
        extraction.expand_templates(&self.input.attributes);
        if extraction.is_empty() {
            return format!("{{{{ {} }}}}", translate(expr, &self.names));
        }

        let mut out = extraction.base_classes.join(" ");
        for mapping in &extraction.mappings {
            let prop = self.names.resolve(&mapping.prop_name);
            let condition = match &mapping.trigger {
                Trigger::Otherwise => {
                    let values: Vec<String> = extraction
                        .mappings
                        .iter()
                        .filter(|m| m.prop_name == mapping.prop_name)
                        .filter_map(|m| match &m.trigger {
                            Trigger::Equals(v) => Some(jinja_value(v)),
                            _ => None,
                        })
                        .collect();
                    Some(format!("{} not in [{}]", prop, values.join(", ")))
                }
                trigger => condition_for(prop, trigger, &self.names),
            };
            if let Some(condition) = condition {
                out.push_str(&format!(
                    "{{% if {} %}} {}{{% endif %}}",
                    condition, mapping.css_class
                ));
            }
        }
        for (literal, guard) in &extraction.templates {
            let value = template_literal(literal, &self.names).unwrap_or_else(|| quote(literal));
            match guard {
                Some(guard) => out.push_str(&format!(
                    "{{% if {} %}} {{{{ {} }}}}{{% endif %}}",
                    translate(guard, &self.names),
                    value
                )),
                None => out.push_str(&format!(" {{{{ {} }}}}", value)),
            }
        }
        for computed in &extraction.computed {
            let value = translate(computed, &self.names);
            out.push_str(&format!("{{% if {0} %}} {{{{ {0} }}}}{{% endif %}}", value));
        }
        out.trim().to_string()
    }

    fn component(&mut self, usage: &ComponentUsage) {
        let input = self.input;
        if let Some(resolution) = input.inline_components.get(&usage.name) {
            self.base_component(usage, resolution);
            return;
        }

        let tag = component_tag(&usage.name);
        let mut attributes = String::new();
        for prop in usage.props.iter().filter(|p| renders(p)) {
            let rendered = match &prop.value {
                PropValue::Literal(value) => format!(" {}=\"{}\"", prop.name, escape_attribute(value)),
                PropValue::Flag => format!(" :{}=\"true\"", prop.name),
                PropValue::Expression(expr) => format!(
                    " :{}=\"{}\"",
                    prop.name,
                    translate(expr, &self.names).replace('"', "&quot;")
                ),
            };
            attributes.push_str(&rendered);
        }
        for spread in &usage.spreads {
            let looped = self
                .loops
                .iter()
                .rev()
                .find(|(item, _)| item == spread)
                .cloned();
            match looped {
                Some((item, array)) => attributes.push_str(&self.spread_props(&item, &array, usage)),
                None => debug!(spread = %spread, component = %usage.name, "spread left to the event mixin"),
            }
        }

        if usage.children.is_empty() {
            self.ctx.add_line(&format!("<{}{} />", tag, attributes));
        } else {
            self.wrap_children(&format!("<{}{}>", tag, attributes), &tag, &usage.children);
        }
    }

    /// `{...item}` inside a loop: one attribute per known item prop
    fn spread_props(&mut self, item: &str, array: &str, usage: &ComponentUsage) -> String {
        let input = self.input;
        let Some(shape) = input
            .array_shapes
            .get(array)
            .filter(|s| !s.item_props.is_empty())
        else {
            self.review.push(
                ManualReviewItem::medium(format!(
                    "Spread of '{}' into <{}> could not be resolved to item props",
                    item, usage.name
                ))
                .with_context(format!("{{...{}}}", item))
                .with_action("Pass the item fields to the nested component explicitly"),
            );
            return String::new();
        };

        let accepted = shape.component.as_ref().and_then(|m| {
            input
                .nested
                .iter()
                .find(|n| n.component_class == m.component_class && !n.props.is_empty())
        });
        let explicit: Vec<&str> = usage.props.iter().map(|p| p.name.as_str()).collect();
        shape
            .item_props
            .iter()
            .filter(|p| accepted.map_or(true, |n| n.props.contains(p)))
            .filter(|p| !explicit.contains(&p.as_str()))
            .map(|p| format!(" :{}=\"{}.{}\"", p, self.names.resolve(item), p))
            .collect()
    }

    fn base_component(&mut self, usage: &ComponentUsage, resolution: &BaseResolution) {
        if let Some(wrapper) = &resolution.wrapper {
            self.ctx
                .add_line(&format!("<{}{}>", wrapper.tag, class_attribute(&wrapper.classes)));
            self.ctx.indent();
        }

        let mut open = format!("<{}{}", resolution.tag, class_attribute(&resolution.classes));
        for (name, value) in &resolution.attributes {
            open.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
        }
        open.push('>');

        if VOID_TAGS.contains(&resolution.tag.as_str()) {
            self.ctx.add_line(&open);
        } else {
            self.wrap_children(&open, &resolution.tag, &usage.children);
        }

        if let Some(wrapper) = &resolution.wrapper {
            self.ctx.dedent();
            self.ctx.add_line(&format!("</{}>", wrapper.tag));
        }
    }

    fn wrap_children(&mut self, open: &str, tag: &str, children: &[ContentElement]) {
        if let Some(inline) = self.inline_children(children) {
            self.ctx.add_line(&format!("{}{}</{}>", open, inline, tag));
            return;
        }
        self.ctx.add_line(open);
        self.ctx.indent();
        self.content(children);
        self.ctx.dedent();
        self.ctx.add_line(&format!("</{}>", tag));
    }

    fn todo(&mut self, description: &str, pattern: &str, action: &str) {
        let marker = format!(
            "{{# TODO_CONVERSION: {}\n   Pattern: {}\n   Source: {}:{}\n   Action: {}\n#}}",
            description,
            pattern.replace("#}", "# }"),
            self.input.source_file,
            self.input.source_line,
            action
        );
        self.ctx.add_lines(&marker);
    }
}

/// Props that never reach the generated markup
fn renders(prop: &Prop) -> bool {
    let is_handler = prop.name.len() > 2
        && prop.name.starts_with("on")
        && prop.name[2..].starts_with(|c: char| c.is_ascii_uppercase());
    !matches!(prop.name.as_str(), "key" | "ref") && !is_handler
}

fn html_name(jsx_name: &str) -> &str {
    match jsx_name {
        "className" => "class",
        "htmlFor" => "for",
        "tabIndex" => "tabindex",
        "readOnly" => "readonly",
        other => other,
    }
}

fn class_attribute(classes: &[String]) -> String {
    if classes.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", classes.join(" "))
    }
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roos_parser::{ArrayMap, Branch};
    use roos_resolver::{ItemKind, ShapeMatch};
    use serde_json::json;

    fn prop(name: &str, value: PropValue) -> Prop {
        Prop {
            name: name.to_string(),
            value,
        }
    }

    fn button_input() -> TemplateInput {
        let mut classes = ClassBuilder::new();
        classes.add_base_classes(&["utrecht-button".to_string()]);
        classes.add_boolean_class("busy", "utrecht-button--busy", false);

        let mut root = RootElement::new("button");
        root.attributes.insert("type".into(), "button".into());

        TemplateInput {
            name: "button".into(),
            source_file: "button/src/template.tsx".into(),
            source_line: 12,
            attributes: vec![
                AttributeDescriptor::enumeration("kind", &["primary", "secondary"]),
                AttributeDescriptor::new("busy", AttributeType::Boolean),
                AttributeDescriptor::new("disabled", AttributeType::Boolean),
                AttributeDescriptor::new("label", AttributeType::String).with_default(json!("Click")),
                AttributeDescriptor::new("onClick", AttributeType::Function),
            ],
            root,
            classes,
            content: vec![ContentElement::reference("label")],
            ..Default::default()
        }
    }

    #[test]
    fn test_full_template() {
        let out = compile_to_jinja(&button_input(), CompileOptions::default());
        let expected = r#"{% import 'components/_event_mixin.j2' as events %}
{# Auto-generated from React component: button
   Manual edits: wrap in MANUAL_START/MANUAL_END tags to preserve #}
{% set kind = _component_context.kind | default('primary') %}
{% set busy = _component_context.busy | default(false) %}
{% set disabled = _component_context.disabled | default(false) %}
{% set label = _component_context.label | default('Click') %}
{% set css_classes = ['utrecht-button'] %}
{% if busy %}{% set css_classes = css_classes + ['utrecht-button--busy'] %}{% endif %}
<button
    class="{{ css_classes | join(' ') }}"
    data-roos-component="button"
    type="button"
    {% if disabled %}disabled{% endif %}
    {{ events.render_extra_attributes(_component_context) }}>
    {{ label }}
</button>
"#;
        assert_eq!(out.template, expected);
        assert!(out.review.is_empty());
    }

    #[test]
    fn test_empty_content_placeholder_and_wrapper() {
        let mut input = button_input();
        input.content.clear();
        input.root.wrappers.push(Wrapper {
            tag: "div".into(),
            classes: vec!["outer".into()],
        });
        let out = compile_to_jinja(&input, CompileOptions::default()).template;
        assert!(out.contains("<div class=\"outer\">\n    <button\n"));
        assert!(out.contains("        {# Content #}\n    </button>\n</div>\n"));
    }

    #[test]
    fn test_conditional_and_fallback_content() {
        let mut input = button_input();
        input.content = vec![
            ContentElement::Conditional {
                condition: "showIcon === 'before'".into(),
                body: vec![ContentElement::Element(HtmlElement {
                    tag: "span".into(),
                    props: vec![prop("className", PropValue::Literal("icon".into()))],
                    spreads: vec![],
                    children: vec![],
                })],
            },
            ContentElement::Fallback {
                chain: vec!["children".into(), "label".into()],
            },
        ];
        let out = compile_to_jinja(&input, CompileOptions::default()).template;
        assert!(out.contains(
            "    {% if showIcon == 'before' %}<span class=\"icon\"></span>{% endif %}\n"
        ));
        assert!(out.contains(
            "    {{ (_component_context.content if _component_context.content else label) | safe }}\n"
        ));
    }

    #[test]
    fn test_array_map_spread_uses_shape() {
        let mut input = button_input();
        input.content = vec![ContentElement::ArrayMap(ArrayMap {
            array: "steps".into(),
            item_var: "step".into(),
            index_var: Some("index".into()),
            destructured: vec![],
            spread: true,
            props: vec![("size".into(), "size".into())],
            tag: Some("ProgressTrackerStep".into()),
            body: vec![ContentElement::Component(ComponentUsage {
                name: "ProgressTrackerStep".into(),
                props: vec![
                    prop("key", PropValue::Expression("index".into())),
                    prop("size", PropValue::Expression("size".into())),
                ],
                spreads: vec!["step".into()],
                children: vec![],
            })],
        })];
        input.array_shapes.insert(
            "steps".into(),
            ArrayShapeMapping {
                array: "steps".into(),
                item_kind: ItemKind::Object,
                item_props: vec!["state".into(), "label".into(), "color".into()],
                component: Some(ShapeMatch {
                    name: "progress-tracker-step".into(),
                    tag_name: "c-progress-tracker-step".into(),
                    component_class: "ProgressTrackerStep".into(),
                    score: 0.72,
                }),
            },
        );
        input.nested.push(NestedComponentRef {
            component_class: "ProgressTrackerStep".into(),
            local_name: "ProgressTrackerStep".into(),
            name: "progress-tracker-step".into(),
            source_path: "./step".into(),
            resolved_path: None,
            tag_name: "c-progress-tracker-step".into(),
            interface: None,
            props: vec!["state".into(), "label".into(), "size".into()],
        });

        let out = compile_to_jinja(&input, CompileOptions::default()).template;
        assert!(out.contains(
            "    {% for step in steps %}\n\
             \x20       {% set index = loop.index0 %}\n\
             \x20       <c-progress-tracker-step :size=\"size\" :state=\"step.state\" :label=\"step.label\" />\n\
             \x20   {% endfor %}\n"
        ));
    }

    #[test]
    fn test_unresolved_spread_and_unsupported_are_flagged() {
        let mut input = button_input();
        input.content = vec![
            ContentElement::ArrayMap(ArrayMap {
                array: "items".into(),
                item_var: "item".into(),
                index_var: None,
                destructured: vec![],
                spread: true,
                props: vec![],
                tag: Some("Item".into()),
                body: vec![ContentElement::Component(ComponentUsage {
                    name: "Item".into(),
                    props: vec![],
                    spreads: vec!["item".into()],
                    children: vec![],
                })],
            }),
            ContentElement::Unsupported {
                expression: "render()".into(),
            },
        ];
        let out = compile_to_jinja(&input, CompileOptions::default());
        assert_eq!(out.review.len(), 1);
        assert!(out.template.contains("<c-item />"));
        assert!(out.template.contains(
            "    {# TODO_CONVERSION: Unsupported expression\n       Pattern: render()\n       Source: button/src/template.tsx:12\n"
        ));
    }

    #[test]
    fn test_branches_and_inline_base_component() {
        let mut input = button_input();
        input.inline_components.insert(
            "Heading".into(),
            BaseResolution {
                tag: "h2".into(),
                classes: vec!["utrecht-heading-2".into()],
                ..Default::default()
            },
        );
        input.content = vec![ContentElement::Branches {
            branches: vec![
                Branch {
                    condition: Some("title".into()),
                    body: vec![ContentElement::Component(ComponentUsage {
                        name: "Heading".into(),
                        props: vec![],
                        spreads: vec![],
                        children: vec![ContentElement::reference("title")],
                    })],
                },
                Branch {
                    condition: None,
                    body: vec![ContentElement::literal("Untitled")],
                },
            ],
        }];
        let out = compile_to_jinja(&input, CompileOptions::default()).template;
        assert!(out.contains(
            "    {% if title %}\n        <h2 class=\"utrecht-heading-2\">{{ title }}</h2>\n    {% else %}\n        Untitled\n    {% endif %}\n"
        ));
    }

    #[test]
    fn test_dynamic_tag_and_reserved_names() {
        let mut input = button_input();
        input.root.tag = RootTag::Dynamic("`h${level}`".into());
        input.attributes.push(AttributeDescriptor::new("loop", AttributeType::Boolean));
        input.content = vec![ContentElement::Conditional {
            condition: "loop".into(),
            body: vec![ContentElement::literal("again")],
        }];
        let out = compile_to_jinja(&input, CompileOptions::default());
        assert!(out.template.contains("{% set tag_name = ('h' ~ level) %}\n<{{ tag_name }}\n"));
        assert!(out
            .template
            .contains("{% set loop_attr = _component_context['loop'] | default(false) %}"));
        assert!(out.template.contains("{% if loop_attr %}again{% endif %}"));
        assert!(out.template.ends_with("</{{ tag_name }}>\n"));
        assert_eq!(out.review.len(), 1);
    }

    #[test]
    fn test_inline_class_expression() {
        let mut input = button_input();
        input.content = vec![ContentElement::Element(HtmlElement {
            tag: "span".into(),
            props: vec![prop(
                "className",
                PropValue::Expression("clsx('label', busy && 'label--busy')".into()),
            )],
            spreads: vec![],
            children: vec![ContentElement::reference("label")],
        })];
        let out = compile_to_jinja(&input, CompileOptions::default()).template;
        assert!(out.contains(
            "<span class=\"label{% if busy %} label--busy{% endif %}\">{{ label }}</span>"
        ));
    }

    #[test]
    fn test_default_values() {
        let number = AttributeDescriptor::new("count", AttributeType::Number);
        assert_eq!(default_value(&number), None);
        let list = AttributeDescriptor::new("items", AttributeType::Array);
        assert_eq!(default_value(&list), Some(json!([])));
        assert_eq!(format_value(&json!(["a", 1, {"k": true}])), "['a', 1, {'k': true}]");
    }
}
