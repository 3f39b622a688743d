//! Components described directly in JSON, without a source component.

use crate::error::{ConvertError, ConvertResult};
use roos_compiler_jinja::{ClassBuilder, RootElement, TemplateInput};
use roos_parser::{
    AttributeDescriptor, AttributeType, ContentElement, DefaultValue, HtmlElement, Prop, PropValue,
};
use roos_resolver::Wrapper;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WrapperDefinition {
    pub html_tag: String,
    #[serde(default)]
    pub css_classes: Vec<String>,
    pub wrapper: Option<Box<WrapperDefinition>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConditionalChild {
    /// Condition over the component's attributes
    pub condition: String,
    pub html_tag: String,
    #[serde(default)]
    pub css_classes: Vec<String>,
    /// Text, or `{attribute}` to render an attribute's value
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AttributeSpec {
    #[serde(rename = "type", default)]
    pub attr_type: Option<AttributeType>,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
    #[serde(default)]
    pub values: Vec<String>,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomDefinition {
    pub name: Option<String>,
    pub html_tag: String,
    #[serde(default)]
    pub css_classes: Vec<String>,
    pub wrapper: Option<WrapperDefinition>,
    #[serde(default)]
    pub conditional_children: Vec<ConditionalChild>,
    #[serde(default)]
    pub add_children_support: bool,
    #[serde(default)]
    pub attribute_additions: BTreeMap<String, AttributeSpec>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl CustomDefinition {
    pub fn from_json(text: &str, path: &std::path::Path) -> ConvertResult<Self> {
        serde_json::from_str(text).map_err(|e| ConvertError::Customization {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn attributes(&self) -> Vec<AttributeDescriptor> {
        let mut attributes: Vec<AttributeDescriptor> = self
            .attribute_additions
            .iter()
            .map(|(name, spec)| {
                let ty = spec.attr_type.unwrap_or(if spec.values.is_empty() {
                    AttributeType::String
                } else {
                    AttributeType::Enum
                });
                let mut attr = AttributeDescriptor::new(name.clone(), ty);
                attr.required = spec.required;
                attr.description = spec.description.clone();
                attr.enum_values = spec.values.clone();
                attr.default = spec.default.clone().map(DefaultValue::Actual);
                attr
            })
            .collect();

        if self.add_children_support && !attributes.iter().any(|a| a.name == "content") {
            let mut content = AttributeDescriptor::new("content", AttributeType::String);
            content.description = Some("Content rendered inside the component".to_string());
            attributes.push(content);
        }
        attributes
    }

    /// Wrappers outermost first
    fn wrappers(&self) -> Vec<Wrapper> {
        let mut out = Vec::new();
        let mut next = self.wrapper.as_ref();
        while let Some(wrapper) = next {
            out.push(Wrapper {
                tag: wrapper.html_tag.clone(),
                classes: wrapper.css_classes.clone(),
            });
            next = wrapper.wrapper.as_deref();
        }
        // Each wrapper's own wrapper sits outside it
        out.reverse();
        out
    }

    fn content(&self) -> Vec<ContentElement> {
        let mut content: Vec<ContentElement> = self
            .conditional_children
            .iter()
            .map(|child| {
                let mut props = Vec::new();
                if !child.css_classes.is_empty() {
                    props.push(Prop {
                        name: "className".to_string(),
                        value: PropValue::Literal(child.css_classes.join(" ")),
                    });
                }
                let children = child
                    .content
                    .as_deref()
                    .map(child_content)
                    .into_iter()
                    .collect();
                ContentElement::Conditional {
                    condition: child.condition.clone(),
                    body: vec![ContentElement::Element(HtmlElement {
                        tag: child.html_tag.clone(),
                        props,
                        spreads: Vec::new(),
                        children,
                    })],
                }
            })
            .collect();

        if self.add_children_support {
            content.push(ContentElement::reference("children"));
        }
        content
    }

    /// Template input for a component called `name`
    pub fn template_input(&self, name: &str, source_file: &str) -> TemplateInput {
        let mut classes = ClassBuilder::new();
        classes.add_base_classes(&self.css_classes);

        let mut root = RootElement::new(self.html_tag.clone());
        root.wrappers = self.wrappers();

        TemplateInput {
            name: name.to_string(),
            source_file: source_file.to_string(),
            source_line: 1,
            attributes: self.attributes(),
            root,
            classes,
            content: self.content(),
            ..Default::default()
        }
    }
}

/// `{label}` references an attribute; anything else is text
fn child_content(text: &str) -> ContentElement {
    let trimmed = text.trim();
    match trimmed
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
    {
        Some(name) => ContentElement::reference(name.trim()),
        None => ContentElement::literal(trimmed),
    }
}
