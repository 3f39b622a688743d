//! Matching array attributes to the nested component their items describe.

use crate::nested::NestedComponentRef;
use roos_parser::{AttributeDescriptor, TypeScope};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Scores at or below this leave the array unmapped
const MIN_SCORE: f64 = 0.5;
const COMPONENT_WEIGHT: f64 = 0.7;
const ITEM_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Object,
    String,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeMatch {
    /// Kebab-case component name
    pub name: String,
    pub tag_name: String,
    pub component_class: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayShapeMapping {
    pub array: String,
    pub item_kind: ItemKind,
    /// Keys of the first example item, in order
    pub item_props: Vec<String>,
    pub component: Option<ShapeMatch>,
}

/// Shapes of every array attribute.
///
/// Item keys come from the first element of the default or example value;
/// an array with no example falls back to the members of its declared
/// item type.
pub fn analyze_arrays(
    values: &Map<String, Value>,
    attributes: &[AttributeDescriptor],
    types: &TypeScope,
    nested: &[NestedComponentRef],
) -> BTreeMap<String, ArrayShapeMapping> {
    let mut mappings = BTreeMap::new();

    for (name, value) in values {
        let Some(first) = value.as_array().and_then(|items| items.first()) else {
            continue;
        };
        let mapping = match first {
            Value::Object(item) => {
                let item_props: Vec<String> = item.keys().cloned().collect();
                object_mapping(name, item_props, nested)
            }
            Value::String(_) => scalar_mapping(name, ItemKind::String),
            Value::Number(_) => scalar_mapping(name, ItemKind::Number),
            _ => continue,
        };
        mappings.insert(name.clone(), mapping);
    }

    for attr in attributes.iter().filter(|a| a.is_array()) {
        if mappings.contains_key(&attr.name) {
            continue;
        }
        let Some(item_type) = attr.item_type.as_deref() else {
            continue;
        };
        let item_props = types.member_names(item_type);
        if !item_props.is_empty() {
            mappings.insert(attr.name.clone(), object_mapping(&attr.name, item_props, nested));
        }
    }

    mappings
}

fn object_mapping(array: &str, item_props: Vec<String>, nested: &[NestedComponentRef]) -> ArrayShapeMapping {
    let component = best_match(&item_props, nested);
    debug!(
        array,
        matched = component.as_ref().map(|m| m.name.as_str()).unwrap_or("none"),
        score = component.as_ref().map_or(0.0, |m| m.score),
        "analyzed array shape"
    );
    ArrayShapeMapping {
        array: array.to_string(),
        item_kind: ItemKind::Object,
        item_props,
        component,
    }
}

fn scalar_mapping(array: &str, kind: ItemKind) -> ArrayShapeMapping {
    ArrayShapeMapping {
        array: array.to_string(),
        item_kind: kind,
        item_props: Vec::new(),
        component: None,
    }
}

/// `0.7 * shared/component_props + 0.3 * shared/item_props`; the best
/// candidate wins if it scores above 0.5.
pub fn best_match(item_props: &[String], nested: &[NestedComponentRef]) -> Option<ShapeMatch> {
    let items: BTreeSet<&str> = item_props.iter().map(String::as_str).collect();
    let mut best: Option<ShapeMatch> = None;

    for component in nested.iter().filter(|c| !c.props.is_empty()) {
        let props: BTreeSet<&str> = component.props.iter().map(String::as_str).collect();
        let shared = items.intersection(&props).count() as f64;
        if shared == 0.0 {
            continue;
        }
        let score = COMPONENT_WEIGHT * shared / props.len() as f64
            + ITEM_WEIGHT * shared / items.len() as f64;

        if score > MIN_SCORE && best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(ShapeMatch {
                name: component.name.clone(),
                tag_name: component.tag_name.clone(),
                component_class: component.component_class.clone(),
                score,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn component(class: &str, props: &[&str]) -> NestedComponentRef {
        NestedComponentRef {
            component_class: class.to_string(),
            local_name: class.to_string(),
            name: roos_common::to_kebab_case(class),
            source_path: format!("./{}", class),
            resolved_path: None,
            tag_name: roos_common::component_tag(class),
            interface: None,
            props: props.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_best_match_prefers_shared_shape() {
        let nested = vec![
            component("ColorSwatch", &["color"]),
            component("ProgressTrackerStep", &["state", "label", "link", "size", "line"]),
        ];
        let matched = best_match(&strings(&["state", "label", "link"]), &nested).unwrap();
        assert_eq!(matched.component_class, "ProgressTrackerStep");
        assert!((matched.score - 0.72).abs() < 1e-9);
    }

    #[test]
    fn test_low_score_is_unmapped() {
        let nested = vec![component("Wide", &["a", "b", "c", "d", "e", "f"])];
        assert!(best_match(&strings(&["a", "x", "y"]), &nested).is_none());
    }

    #[test]
    fn test_analyze_examples_and_declared_types() {
        let types = TypeScope::parse(
            "interface IMenuItem { label: string; link: string; active?: boolean }",
        );
        let mut menu = AttributeDescriptor::new("menu", roos_parser::AttributeType::Array);
        menu.item_type = Some("IMenuItem".to_string());
        let nested = vec![component("MenuBarItem", &["label", "link", "active", "icon"])];

        let values = json!({
            "steps": [{ "label": "One", "state": "completed" }],
            "tags": ["a", "b"],
            "empty": [],
        });
        let mappings = analyze_arrays(values.as_object().unwrap(), &[menu], &types, &nested);

        assert_eq!(mappings["tags"].item_kind, ItemKind::String);
        assert!(mappings["steps"].component.is_none());
        assert!(!mappings.contains_key("empty"));

        let menu = &mappings["menu"];
        assert_eq!(menu.item_props, vec!["label", "link", "active"]);
        assert_eq!(menu.component.as_ref().unwrap().tag_name, "c-menu-bar-item");
    }
}
