//! Per-component JSON side files that adjust the extracted attributes
//! before generation.

use crate::error::{ConvertError, ConvertResult};
use roos_common::FileSystem;
use roos_compiler_jinja::PassThroughAttribute;
use roos_parser::{AttributeDescriptor, AttributeType, DefaultValue};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const TOKENS_FILE: &str = "_tokens.json";

/// Enum values given inline or as a token reference
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ValueSource {
    Token(String),
    Literal(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Notes {
    One(String),
    Many(Vec<String>),
}

impl Default for Notes {
    fn default() -> Self {
        Notes::Many(Vec::new())
    }
}

impl Notes {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Notes::One(note) => vec![note.clone()],
            Notes::Many(notes) => notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AttributeOverride {
    pub values: Option<ValueSource>,
    pub required: Option<bool>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub attr_type: Option<AttributeType>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AttributeAddition {
    #[serde(rename = "type", default)]
    pub attr_type: Option<AttributeType>,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
    pub values: Option<ValueSource>,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PassThroughSpec {
    pub name: String,
    #[serde(rename = "type", default)]
    pub attr_type: Option<AttributeType>,
    #[serde(default)]
    pub required: bool,
    pub target_element: Option<String>,
    pub target_attribute: Option<String>,
    pub default: Option<Value>,
}

/// Contents of `<customizations>/<component>.json`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Customization {
    pub attribute_overrides: BTreeMap<String, AttributeOverride>,
    pub attribute_additions: BTreeMap<String, AttributeAddition>,
    pub default_overrides: Map<String, Value>,
    pub aliases: Vec<String>,
    pub add_children_support: bool,
    pub pass_through_attributes: Vec<PassThroughSpec>,
    pub notes: Notes,
    pub custom_content_template: Option<String>,
}

/// What a customization contributes beyond attribute edits
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedCustomization {
    pub aliases: Vec<String>,
    pub notes: Vec<String>,
    pub children_support: bool,
    pub pass_through: Vec<PassThroughAttribute>,
    pub custom_content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TokenDef {
    Static {
        values: Vec<Value>,
    },
    /// Values extracted by an external script; not resolvable here
    Reference {
        source: String,
    },
}

pub struct CustomizationLoader<'a> {
    dir: PathBuf,
    fs: &'a dyn FileSystem,
    tokens: RefCell<Option<HashMap<String, TokenDef>>>,
}

impl<'a> CustomizationLoader<'a> {
    pub fn new(dir: impl Into<PathBuf>, fs: &'a dyn FileSystem) -> Self {
        Self {
            dir: dir.into(),
            fs,
            tokens: RefCell::new(None),
        }
    }

    pub fn path_for(&self, component: &str) -> PathBuf {
        self.dir.join(format!("{}.json", component))
    }

    pub fn has_customization(&self, component: &str) -> bool {
        self.fs.exists(&self.path_for(component))
    }

    pub fn load(&self, component: &str) -> ConvertResult<Option<Customization>> {
        let path = self.path_for(component);
        if !self.fs.exists(&path) {
            return Ok(None);
        }
        let text = self
            .fs
            .read_to_string(&path)
            .map_err(|e| ConvertError::io(&path, e))?;
        let customization = serde_json::from_str(&text).map_err(|e| ConvertError::Customization {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded customization");
        Ok(Some(customization))
    }

    /// Values named by a token reference
    pub fn resolve_token(&self, reference: &str) -> ConvertResult<Vec<String>> {
        self.ensure_tokens()?;
        let tokens = self.tokens.borrow();
        match tokens.as_ref().and_then(|t| t.get(reference)) {
            Some(TokenDef::Static { values }) => Ok(values.iter().map(value_string).collect()),
            Some(TokenDef::Reference { source }) => Err(ConvertError::Customization {
                path: self.dir.join(TOKENS_FILE),
                message: format!(
                    "token '{}' is extracted by '{}'; list its values as a static token",
                    reference, source
                ),
            }),
            None => Err(ConvertError::UnknownToken(reference.to_string())),
        }
    }

    fn ensure_tokens(&self) -> ConvertResult<()> {
        if self.tokens.borrow().is_some() {
            return Ok(());
        }
        let path = self.dir.join(TOKENS_FILE);
        let tokens = if self.fs.exists(&path) {
            let text = self
                .fs
                .read_to_string(&path)
                .map_err(|e| ConvertError::io(&path, e))?;
            serde_json::from_str(&text).map_err(|e| ConvertError::Customization {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            HashMap::new()
        };
        *self.tokens.borrow_mut() = Some(tokens);
        Ok(())
    }

    fn values(&self, source: &ValueSource) -> ConvertResult<Vec<String>> {
        match source {
            ValueSource::Token(reference) => self.resolve_token(reference),
            ValueSource::Literal(values) => Ok(values.iter().map(value_string).collect()),
        }
    }

    /// Apply a customization to `attributes` in place.
    ///
    /// Order: overrides, additions, default overrides, children support,
    /// pass-through attributes.
    pub fn apply(
        &self,
        customization: &Customization,
        attributes: &mut Vec<AttributeDescriptor>,
    ) -> ConvertResult<AppliedCustomization> {
        for attr in attributes.iter_mut() {
            let Some(o) = customization.attribute_overrides.get(&attr.name) else {
                continue;
            };
            if let Some(values) = &o.values {
                attr.enum_values = self.values(values)?;
                if !attr.has_type(AttributeType::Enum) {
                    attr.types.insert(0, AttributeType::Enum);
                }
            }
            if let Some(ty) = o.attr_type {
                attr.types = vec![ty];
            }
            if let Some(required) = o.required {
                attr.required = required;
            }
            if let Some(description) = &o.description {
                attr.description = Some(description.clone());
            }
        }

        for (name, addition) in &customization.attribute_additions {
            if attributes.iter().any(|a| &a.name == name) {
                continue;
            }
            let mut attr = AttributeDescriptor::new(
                name.clone(),
                addition.attr_type.unwrap_or(AttributeType::String),
            );
            attr.required = addition.required;
            attr.description = addition.description.clone();
            if let Some(values) = &addition.values {
                attr.enum_values = self.values(values)?;
            }
            if let Some(default) = &addition.default {
                attr.default = Some(DefaultValue::Actual(default.clone()));
            }
            attributes.push(attr);
        }

        for (name, value) in &customization.default_overrides {
            if let Some(attr) = attributes.iter_mut().find(|a| &a.name == name) {
                attr.default = Some(DefaultValue::Actual(value.clone()));
            }
        }

        if customization.add_children_support && !attributes.iter().any(|a| a.name == "content") {
            let mut content = AttributeDescriptor::new("content", AttributeType::String);
            content.description = Some("Content rendered inside the component".to_string());
            attributes.push(content);
        }

        let mut pass_through = Vec::new();
        for spec in &customization.pass_through_attributes {
            if !attributes.iter().any(|a| a.name == spec.name) {
                let mut attr = AttributeDescriptor::new(
                    spec.name.clone(),
                    spec.attr_type.unwrap_or(AttributeType::String),
                );
                attr.required = spec.required;
                if let Some(default) = &spec.default {
                    attr.default = Some(DefaultValue::Actual(default.clone()));
                }
                attributes.push(attr);
            }
            pass_through.push(PassThroughAttribute {
                name: spec.name.clone(),
                target_element: spec.target_element.clone(),
                target_attribute: spec
                    .target_attribute
                    .clone()
                    .unwrap_or_else(|| spec.name.clone()),
            });
        }

        Ok(AppliedCustomization {
            aliases: customization.aliases.clone(),
            notes: customization.notes.to_vec(),
            children_support: customization.add_children_support,
            pass_through,
            custom_content: customization.custom_content_template.clone(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roos_common::MockFileSystem;
    use serde_json::json;

    fn loader_with<'a>(fs: &'a MockFileSystem, customization: &str) -> CustomizationLoader<'a> {
        fs.add_file("/c/_tokens.json", r#"{ "colors": { "type": "static", "values": ["hemelblauw", "groen"] }, "icons": { "type": "reference", "source": "extract_icons" } }"#);
        fs.add_file("/c/icon.json", customization);
        CustomizationLoader::new("/c", fs)
    }

    #[test]
    fn test_apply_overrides_and_additions() {
        let fs = MockFileSystem::new();
        let loader = loader_with(
            &fs,
            r#"{
                "attribute_overrides": { "color": { "values": "colors", "required": true } },
                "attribute_additions": {
                    "size": { "type": "enum", "values": ["sm", "md"], "default": "md" },
                    "color": { "type": "string" }
                },
                "default_overrides": { "color": "groen" },
                "add_children_support": true,
                "pass_through_attributes": [
                    { "name": "href", "target_element": "a", "target_attribute": "href" }
                ],
                "aliases": ["pictogram"],
                "notes": "Colors come from the design tokens"
            }"#,
        );

        let customization = loader.load("icon").unwrap().unwrap();
        let mut attrs = vec![AttributeDescriptor::new("color", AttributeType::String)];
        let applied = loader.apply(&customization, &mut attrs).unwrap();

        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["color", "size", "content", "href"]);
        assert_eq!(attrs[0].enum_values, vec!["hemelblauw", "groen"]);
        assert!(attrs[0].required);
        assert_eq!(attrs[0].actual_default(), Some(&json!("groen")));
        assert_eq!(attrs[1].actual_default(), Some(&json!("md")));

        assert_eq!(applied.aliases, vec!["pictogram"]);
        assert_eq!(applied.notes, vec!["Colors come from the design tokens"]);
        assert!(applied.children_support);
        assert_eq!(applied.pass_through[0].target_element.as_deref(), Some("a"));
    }

    #[test]
    fn test_missing_customization_and_tokens() {
        let fs = MockFileSystem::new();
        let loader = loader_with(&fs, "{}");
        assert!(loader.load("button").unwrap().is_none());
        assert!(matches!(
            loader.resolve_token("nope"),
            Err(ConvertError::UnknownToken(name)) if name == "nope"
        ));
        assert!(matches!(
            loader.resolve_token("icons"),
            Err(ConvertError::Customization { .. })
        ));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let fs = MockFileSystem::new();
        let loader = loader_with(&fs, "{ not json");
        assert!(matches!(
            loader.load("icon"),
            Err(ConvertError::Customization { .. })
        ));
    }
}
