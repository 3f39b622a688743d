//! Base-component resolution.
//!
//! A static table keyed by `(library, component)` says which tag a base
//! component renders and how its props turn into classes and attributes.
//! Utrecht components missing from the table are detected from the
//! library's compiled distribution instead.

use crate::dist::{detect_component, DetectedComponent};
use crate::error::{ResolverError, ResolverResult};
use roos_common::{FileSystem, ManualReviewItem};
use roos_parser::{literal_key, PropClassLookup};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, warn};

pub const UTRECHT_LIBRARY: &str = "@utrecht/component-library-react";

const BUILTIN_MAPPINGS: &str = include_str!("../data/base_components.json");

/// Props that never need a mapping
const PASS_THROUGH_PROPS: &[&str] = &["className", "children", "style", "ref", "key"];

type MappingTable = BTreeMap<String, BTreeMap<String, ComponentMapping>>;

#[derive(Debug, Clone, Deserialize)]
struct ComponentMapping {
    html_tag: String,
    #[serde(default)]
    base_classes: Vec<String>,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    #[serde(default)]
    wrapper: Option<Wrapper>,
    #[serde(default)]
    prop_mappings: BTreeMap<String, PropMapping>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PropMapping {
    Values { values: BTreeMap<String, ValueResult> },
    Boolean { boolean: BooleanMapping },
    Attribute { attribute: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ValueResult {
    Class(String),
    Classes(Vec<String>),
    Detailed {
        #[serde(default)]
        classes: Vec<String>,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
struct BooleanMapping {
    #[serde(default)]
    true_classes: Vec<String>,
    #[serde(default)]
    true_attributes: BTreeMap<String, String>,
    #[serde(default)]
    false_classes: Vec<String>,
    #[serde(default)]
    false_attributes: BTreeMap<String, String>,
}

/// Element a base component wraps its primary element in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wrapper {
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
}

/// What a base component renders for a given set of props
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BaseResolution {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub wrapper: Option<Wrapper>,
    /// Props with no mapping that are not known pass-throughs
    pub unmapped_props: Vec<String>,
    pub review: Vec<ManualReviewItem>,
}

impl BaseResolution {
    fn unknown(library: &str, component: &str) -> Self {
        Self {
            tag: "div".to_string(),
            review: vec![ManualReviewItem::medium(format!(
                "Unknown base component: {}/{}",
                library, component
            ))
            .with_action("Add a mapping for this component to the base mappings file")],
            ..Default::default()
        }
    }

    fn add_classes(&mut self, classes: &[String]) {
        for class in classes {
            if !self.classes.contains(class) {
                self.classes.push(class.clone());
            }
        }
    }
}

pub struct BaseComponentResolver {
    mappings: MappingTable,
    /// Text of the Utrecht `dist/index.esm.js`, when available
    distribution: Option<String>,
    detected: RefCell<HashMap<String, Option<Rc<DetectedComponent>>>>,
}

impl Default for BaseComponentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseComponentResolver {
    /// Resolver over the built-in table only
    pub fn new() -> Self {
        let mappings = match serde_json::from_str(BUILTIN_MAPPINGS) {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, "built-in base mappings are invalid");
                MappingTable::new()
            }
        };
        Self {
            mappings,
            distribution: None,
            detected: RefCell::new(HashMap::new()),
        }
    }

    /// Extend the table with a JSON mappings file. Entries in the file
    /// replace built-in entries for the same component.
    pub fn with_mappings_file(mut self, path: &Path, fs: &dyn FileSystem) -> ResolverResult<Self> {
        let text = fs
            .read_to_string(path)
            .map_err(|e| ResolverError::MappingFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let extra: MappingTable =
            serde_json::from_str(&text).map_err(|e| ResolverError::MappingFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        for (library, components) in extra {
            debug!(library = %library, count = components.len(), "loaded base mappings");
            self.mappings.entry(library).or_default().extend(components);
        }
        Ok(self)
    }

    /// Enable auto-detection from `<node_modules>/@utrecht/component-library-react/dist/index.esm.js`.
    /// A missing distribution only disables detection.
    pub fn with_distribution(mut self, node_modules: &Path, fs: &dyn FileSystem) -> Self {
        let path = node_modules
            .join(UTRECHT_LIBRARY)
            .join("dist")
            .join("index.esm.js");
        match fs.read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), bytes = text.len(), "loaded base library distribution");
                self.distribution = Some(text);
            }
            Err(e) => debug!(path = %path.display(), error = %e, "no base library distribution"),
        }
        self
    }

    pub fn with_distribution_text(mut self, text: impl Into<String>) -> Self {
        self.distribution = Some(text.into());
        self
    }

    /// Whether `component` from `library` can be resolved at all
    pub fn is_base_component(&self, library: &str, component: &str) -> bool {
        self.mapping(library, component).is_some() || library == UTRECHT_LIBRARY
    }

    pub fn supported_libraries(&self) -> impl Iterator<Item = &str> {
        self.mappings.keys().map(String::as_str)
    }

    pub fn resolve(&self, library: &str, component: &str, props: &Map<String, Value>) -> BaseResolution {
        if let Some(mapping) = self.mapping(library, component) {
            return resolve_static(mapping, props);
        }
        if library == UTRECHT_LIBRARY {
            if let Some(detected) = self.detect(component) {
                debug!(component, tag = %detected.primary().tag, "resolved base component from distribution");
                return detected_resolution(&detected);
            }
        }

        warn!(library, component, "unknown base component");
        BaseResolution::unknown(library, component)
    }

    fn mapping(&self, library: &str, component: &str) -> Option<&ComponentMapping> {
        self.mappings.get(library)?.get(component)
    }

    /// Detection results are cached per component name, misses included
    fn detect(&self, component: &str) -> Option<Rc<DetectedComponent>> {
        if let Some(cached) = self.detected.borrow().get(component) {
            return cached.clone();
        }
        let detected = self
            .distribution
            .as_deref()
            .and_then(|dist| detect_component(dist, component))
            .map(Rc::new);
        self.detected
            .borrow_mut()
            .insert(component.to_string(), detected.clone());
        detected
    }
}

fn resolve_static(mapping: &ComponentMapping, props: &Map<String, Value>) -> BaseResolution {
    let mut out = BaseResolution {
        tag: mapping.html_tag.clone(),
        classes: mapping.base_classes.clone(),
        attributes: mapping.attributes.clone(),
        wrapper: mapping.wrapper.clone(),
        ..Default::default()
    };

    for (prop, value) in props {
        let Some(prop_mapping) = mapping.prop_mappings.get(prop) else {
            if !prop.starts_with("on") && !PASS_THROUGH_PROPS.contains(&prop.as_str()) {
                out.unmapped_props.push(prop.clone());
            }
            continue;
        };

        match prop_mapping {
            PropMapping::Values { values } => {
                let key = literal_key(value);
                match values.get(&key) {
                    Some(ValueResult::Class(class)) => out.add_classes(std::slice::from_ref(class)),
                    Some(ValueResult::Classes(classes)) => out.add_classes(classes),
                    Some(ValueResult::Detailed {
                        classes,
                        attributes,
                    }) => {
                        out.add_classes(classes);
                        out.attributes.extend(attributes.clone());
                    }
                    None => out.review.push(
                        ManualReviewItem::medium(format!("Unknown value for {}: {}", prop, key))
                            .with_context(format!("{}={}", prop, value)),
                    ),
                }
            }
            PropMapping::Boolean { boolean } => {
                let (classes, attributes) = if is_truthy(value) {
                    (&boolean.true_classes, &boolean.true_attributes)
                } else {
                    (&boolean.false_classes, &boolean.false_attributes)
                };
                out.add_classes(classes);
                out.attributes.extend(attributes.clone());
            }
            PropMapping::Attribute { attribute } => {
                out.attributes.insert(attribute.clone(), literal_key(value));
            }
        }
    }

    out
}

fn detected_resolution(detected: &DetectedComponent) -> BaseResolution {
    let primary = detected.primary();
    BaseResolution {
        tag: primary.tag.clone(),
        classes: primary.classes.clone(),
        attributes: primary.attributes.clone(),
        wrapper: detected.wrapper().map(|outer| Wrapper {
            tag: outer.tag.clone(),
            classes: outer.classes.clone(),
        }),
        ..Default::default()
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// [`PropClassLookup`] over one base component, for the class extractors
pub struct BaseLookup<'a> {
    resolver: &'a BaseComponentResolver,
    library: &'a str,
    component: &'a str,
}

impl<'a> BaseLookup<'a> {
    pub fn new(resolver: &'a BaseComponentResolver, library: &'a str, component: &'a str) -> Self {
        Self {
            resolver,
            library,
            component,
        }
    }
}

impl PropClassLookup for BaseLookup<'_> {
    fn classes_for(&self, prop: &str, value: &Value) -> Vec<String> {
        if let Some(mapping) = self.resolver.mapping(self.library, self.component) {
            let mut props = Map::new();
            props.insert(prop.to_string(), value.clone());
            return resolve_static(mapping, &props).classes;
        }
        if self.library == UTRECHT_LIBRARY {
            if let Some(detected) = self.resolver.detect(self.component) {
                return detected.classes_for(prop, value);
            }
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roos_common::MockFileSystem;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_static_value_and_boolean_mappings() {
        let resolver = BaseComponentResolver::new();
        let resolution = resolver.resolve(
            UTRECHT_LIBRARY,
            "Button",
            &props(json!({ "appearance": "primary-action-button", "busy": true, "type": "submit" })),
        );
        assert_eq!(resolution.tag, "button");
        assert_eq!(
            resolution.classes,
            vec!["utrecht-button", "utrecht-button--primary-action", "utrecht-button--busy"]
        );
        assert_eq!(resolution.attributes.get("aria-busy").map(String::as_str), Some("true"));
        assert_eq!(resolution.attributes.get("type").map(String::as_str), Some("submit"));
        assert!(resolution.review.is_empty());
    }

    #[test]
    fn test_unmapped_and_unknown_values() {
        let resolver = BaseComponentResolver::new();
        let resolution = resolver.resolve(
            UTRECHT_LIBRARY,
            "Button",
            &props(json!({ "appearance": "shiny", "size": "md", "onClick": null, "className": "x" })),
        );
        assert_eq!(resolution.unmapped_props, vec!["size"]);
        assert_eq!(resolution.review.len(), 1);
        assert_eq!(resolution.review[0].issue, "Unknown value for appearance: shiny");
    }

    #[test]
    fn test_unknown_component_is_div_with_review() {
        let resolver = BaseComponentResolver::new();
        let resolution = resolver.resolve("@acme/ui", "Widget", &Map::new());
        assert_eq!(resolution.tag, "div");
        assert_eq!(resolution.review[0].issue, "Unknown base component: @acme/ui/Widget");
        assert!(!resolver.is_base_component("@acme/ui", "Widget"));
        assert!(resolver.is_base_component(UTRECHT_LIBRARY, "Anything"));
    }

    #[test]
    fn test_wrapper_from_table() {
        let resolver = BaseComponentResolver::new();
        let resolution = resolver.resolve(UTRECHT_LIBRARY, "Fieldset", &Map::new());
        assert_eq!(resolution.tag, "fieldset");
        assert_eq!(resolution.wrapper.unwrap().tag, "div");
    }

    #[test]
    fn test_mappings_file_overrides_builtin() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "/project/mappings.json",
            r#"{ "@utrecht/component-library-react": { "Paragraph": { "html_tag": "div", "base_classes": ["p"] } },
                 "@acme/ui": { "Widget": { "html_tag": "section" } } }"#,
        );
        let resolver = BaseComponentResolver::new()
            .with_mappings_file(Path::new("/project/mappings.json"), &fs)
            .unwrap();

        assert_eq!(resolver.resolve(UTRECHT_LIBRARY, "Paragraph", &Map::new()).tag, "div");
        assert_eq!(resolver.resolve("@acme/ui", "Widget", &Map::new()).tag, "section");
        assert_eq!(resolver.resolve(UTRECHT_LIBRARY, "Link", &Map::new()).tag, "a");
    }

    #[test]
    fn test_invalid_mappings_file() {
        let fs = MockFileSystem::new();
        fs.add_file("/m.json", "{ not json");
        let err = BaseComponentResolver::new()
            .with_mappings_file(Path::new("/m.json"), &fs)
            .err()
            .unwrap();
        assert!(matches!(err, ResolverError::MappingFile { .. }));
    }

    #[test]
    fn test_lookup_projects_prop_values() {
        let resolver = BaseComponentResolver::new();
        let lookup = BaseLookup::new(&resolver, UTRECHT_LIBRARY, "Button");
        assert_eq!(
            lookup.classes_for("hint", &json!("danger")),
            vec!["utrecht-button", "utrecht-button--danger"]
        );
        assert_eq!(lookup.classes_for("busy", &json!(false)), vec!["utrecht-button"]);
    }

    #[test]
    fn test_detection_is_cached() {
        let dist = r#"
var Separator = /*#__PURE__*/forwardRef(function Separator(_ref, ref) {
  return jsx("hr", _objectSpread(_objectSpread({}, restProps), {}, {
    ref: ref,
    className: clsx("utrecht-separator", invisible && "utrecht-separator--invisible", className)
  }));
});
Separator.displayName = 'Separator';
"#;
        let resolver = BaseComponentResolver::new().with_distribution_text(dist);
        let first = resolver.resolve(UTRECHT_LIBRARY, "Separator", &Map::new());
        assert_eq!(first.tag, "hr");
        assert_eq!(first.classes, vec!["utrecht-separator"]);
        assert_eq!(resolver.detected.borrow().len(), 1);

        let lookup = BaseLookup::new(&resolver, UTRECHT_LIBRARY, "Separator");
        assert_eq!(
            lookup.classes_for("invisible", &json!(true)),
            vec!["utrecht-separator", "utrecht-separator--invisible"]
        );
        assert_eq!(resolver.detected.borrow().len(), 1);
    }
}
