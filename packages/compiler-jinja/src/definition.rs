//! Component definition JSON.

use crate::error::CompileResult;
use chrono::Utc;
use roos_common::ManualReviewItem;
use roos_parser::{AttributeDescriptor, AttributeType};
use roos_resolver::{ArrayShapeMapping, ItemKind, NestedComponentRef};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseComponentRef {
    pub library: String,
    pub component: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedComponentEntry {
    pub name: String,
    pub component_class: String,
    pub tag_name: String,
    pub source_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default)]
    pub props: Vec<String>,
}

impl From<&NestedComponentRef> for NestedComponentEntry {
    fn from(nested: &NestedComponentRef) -> Self {
        Self {
            name: nested.name.clone(),
            component_class: nested.component_class.clone(),
            tag_name: nested.tag_name.clone(),
            source_path: nested.source_path.clone(),
            interface: nested.interface.clone(),
            props: nested.props.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: String,
    pub required: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_example: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_props: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps_to_component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_tag: Option<String>,
}

/// The JSON description written next to each generated template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    pub name: String,
    pub source_file: String,
    pub converted_at: String,
    pub conversion_hash: String,
    #[serde(default)]
    pub base_components: Vec<BaseComponentRef>,
    #[serde(default)]
    pub nested_components: Vec<NestedComponentEntry>,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    #[serde(default)]
    pub manual_review_items: Vec<ManualReviewItem>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub example_values: Map<String, Value>,
}

impl ComponentDefinition {
    pub fn to_json(&self) -> CompileResult<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn from_json(text: &str) -> CompileResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Everything a definition is built from
#[derive(Debug, Clone, Default)]
pub struct DefinitionInput {
    pub source_file: String,
    /// Hashed into `conversion_hash`
    pub source: String,
    pub attributes: Vec<AttributeDescriptor>,
    pub base_components: Vec<BaseComponentRef>,
    pub nested: Vec<NestedComponentRef>,
    pub array_shapes: BTreeMap<String, ArrayShapeMapping>,
    pub review: Vec<ManualReviewItem>,
    pub example_values: Map<String, Value>,
}

pub struct DefinitionGenerator {
    name: String,
}

impl DefinitionGenerator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn generate(&self, input: &DefinitionInput) -> ComponentDefinition {
        let attributes: Vec<AttributeDefinition> = input
            .attributes
            .iter()
            .filter(|a| !a.is_function())
            .map(|a| attribute_definition(a, input.array_shapes.get(&a.name)))
            .collect();
        debug!(
            component = %self.name,
            attributes = attributes.len(),
            review = input.review.len(),
            "generated definition"
        );

        ComponentDefinition {
            name: self.name.clone(),
            source_file: input.source_file.clone(),
            converted_at: timestamp(),
            conversion_hash: compute_hash(&input.source),
            base_components: input.base_components.clone(),
            nested_components: input.nested.iter().map(NestedComponentEntry::from).collect(),
            attributes,
            manual_review_items: input.review.clone(),
            example_values: input.example_values.clone(),
        }
    }
}

fn attribute_definition(
    attr: &AttributeDescriptor,
    shape: Option<&ArrayShapeMapping>,
) -> AttributeDefinition {
    let example = attr.example_value().cloned();
    let default = match attr.actual_default() {
        Some(value) => Some(value.clone()),
        None if !attr.required => Some(type_default(attr)),
        None => None,
    };

    let mut definition = AttributeDefinition {
        name: attr.name.clone(),
        attr_type: attr.primary_type().as_str().to_string(),
        required: attr.required,
        description: attr
            .description
            .clone()
            .unwrap_or_else(|| format!("{} attribute", attr.name)),
        enum_values: (!attr.enum_values.is_empty()).then(|| attr.enum_values.clone()),
        default,
        is_example: example.is_some(),
        example_value: example,
        item_type: None,
        item_props: None,
        maps_to_component: None,
        component_tag: None,
    };

    if let Some(shape) = shape {
        definition.item_type = Some(
            match shape.item_kind {
                ItemKind::Object => "object",
                ItemKind::String => "string",
                ItemKind::Number => "number",
            }
            .to_string(),
        );
        if !shape.item_props.is_empty() {
            definition.item_props = Some(shape.item_props.clone());
        }
        if let Some(component) = &shape.component {
            definition.maps_to_component = Some(component.name.clone());
            definition.component_tag = Some(component.tag_name.clone());
        }
    }
    definition
}

/// Zero value advertised for an optional attribute without a default
fn type_default(attr: &AttributeDescriptor) -> Value {
    match attr.primary_type() {
        AttributeType::Boolean => Value::Bool(false),
        AttributeType::Number => Value::from(0),
        AttributeType::Enum => attr
            .enum_values
            .first()
            .map(|v| Value::String(v.clone()))
            .unwrap_or_else(|| Value::String(String::new())),
        AttributeType::Array => Value::Array(Vec::new()),
        _ => Value::String(String::new()),
    }
}

/// SHA-256 of the component source, lowercase hex
pub fn compute_hash(source: &str) -> String {
    format!("{:x}", Sha256::digest(source.as_bytes()))
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roos_parser::DefaultValue;
    use roos_resolver::ShapeMatch;
    use serde_json::json;

    #[test]
    fn test_attribute_defaults_and_examples() {
        let mut label = AttributeDescriptor::new("label", AttributeType::String);
        label.default = Some(DefaultValue::Example(json!("Save")));
        let mut id = AttributeDescriptor::new("id", AttributeType::String);
        id.required = true;
        let input = DefinitionInput {
            source_file: "button/src/template.tsx".into(),
            source: "export const Button = () => null;".into(),
            attributes: vec![
                AttributeDescriptor::enumeration("kind", &["primary", "secondary"])
                    .with_default(json!("primary")),
                AttributeDescriptor::new("busy", AttributeType::Boolean),
                AttributeDescriptor::new("onClick", AttributeType::Function),
                label,
                id,
            ],
            ..Default::default()
        };

        let definition = DefinitionGenerator::new("button").generate(&input);
        assert_eq!(definition.attributes.len(), 4);

        let kind = definition.attribute("kind").unwrap();
        assert_eq!(kind.attr_type, "enum");
        assert_eq!(kind.default, Some(json!("primary")));
        assert_eq!(
            kind.enum_values,
            Some(vec!["primary".to_string(), "secondary".to_string()])
        );
        assert_eq!(definition.attribute("busy").unwrap().default, Some(json!(false)));

        let label = definition.attribute("label").unwrap();
        assert!(label.is_example);
        assert_eq!(label.example_value, Some(json!("Save")));
        assert_eq!(label.default, Some(json!("")));
        assert_eq!(label.description, "label attribute");

        assert_eq!(definition.attribute("id").unwrap().default, None);
        assert_eq!(definition.conversion_hash.len(), 64);
        assert!(definition.converted_at.ends_with('Z'));
    }

    #[test]
    fn test_array_mapping_fields() {
        let mut input = DefinitionInput::default();
        input.attributes.push(AttributeDescriptor::new("steps", AttributeType::Array));
        input.array_shapes.insert(
            "steps".into(),
            ArrayShapeMapping {
                array: "steps".into(),
                item_kind: ItemKind::Object,
                item_props: vec!["state".into(), "label".into()],
                component: Some(ShapeMatch {
                    name: "progress-tracker-step".into(),
                    tag_name: "c-progress-tracker-step".into(),
                    component_class: "ProgressTrackerStep".into(),
                    score: 0.72,
                }),
            },
        );

        let definition = DefinitionGenerator::new("progress-tracker").generate(&input);
        let json: Value = serde_json::from_str(&definition.to_json().unwrap()).unwrap();
        let steps = &json["attributes"][0];
        assert_eq!(steps["type"], json!("array"));
        assert_eq!(steps["default"], json!([]));
        assert_eq!(steps["item_type"], json!("object"));
        assert_eq!(steps["maps_to_component"], json!("progress-tracker-step"));
        assert_eq!(steps["component_tag"], json!("c-progress-tracker-step"));
        assert!(steps.get("is_example").is_none());
        assert!(json.get("example_values").is_none());
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(
            compute_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
