//! Structure detection from a compiled component library.
//!
//! Reads the `jsx("tag", {...})` calls of one component in an ESM bundle
//! and reports the elements it renders. The innermost non-generic element
//! is the primary one; a surrounding `div`/`span` becomes a wrapper.

use crate::base::is_truthy;
use regex::Regex;
use roos_parser::scan::{
    balanced_end, code_chars, extract_balanced, find_top_level, split_top_level, string_literal,
};
use roos_parser::{literal_key, ClassMapping, ClsxExtractor, Trigger};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

static JSX_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bjsxs?\(\s*"([a-z][\w-]*)"\s*,\s*"#).unwrap());

/// How far past the definition start the end marker search begins
const DEFINITION_LOOKAHEAD: usize = 100;
/// Definition length assumed when no end marker is found
const DEFINITION_FALLBACK_LEN: usize = 2000;

const SKIPPED_KEYS: &[&str] = &["className", "children", "ref", "key"];

#[derive(Debug, Clone, PartialEq)]
pub struct DetectedElement {
    pub tag: String,
    /// Unconditional classes
    pub classes: Vec<String>,
    /// Classes toggled by the base component's own props
    pub conditional: Vec<ClassMapping>,
    /// Attributes with literal values
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectedComponent {
    pub name: String,
    /// Every rendered element, outermost first
    pub elements: Vec<DetectedElement>,
    primary: usize,
}

impl DetectedComponent {
    pub fn primary(&self) -> &DetectedElement {
        &self.elements[self.primary]
    }

    /// The outer element when it is a generic container around a different
    /// primary element
    pub fn wrapper(&self) -> Option<&DetectedElement> {
        let outer = self.elements.first()?;
        let primary = self.primary();
        (self.primary != 0 && matches!(outer.tag.as_str(), "div" | "span") && outer.tag != primary.tag)
            .then_some(outer)
    }

    /// Classes the primary element carries when `prop` has `value`
    pub fn classes_for(&self, prop: &str, value: &Value) -> Vec<String> {
        let primary = self.primary();
        let mut classes = primary.classes.clone();
        for mapping in primary.conditional.iter().filter(|m| m.prop_name == prop) {
            let applies = match &mapping.trigger {
                Trigger::Truthy => is_truthy(value),
                Trigger::Falsy => !is_truthy(value),
                Trigger::Equals(expected) => literal_key(value) == literal_key(expected),
                Trigger::Template { excluded, guard: None, .. } => {
                    let key = literal_key(value);
                    if is_truthy(value) && !excluded.contains(&key) {
                        classes.push(mapping.css_class.replace(&format!("${{{}}}", prop), &key));
                    }
                    false
                }
                _ => false,
            };
            if applies && !classes.contains(&mapping.css_class) {
                classes.push(mapping.css_class.clone());
            }
        }
        classes
    }
}

/// Detect `component` in the compiled library text.
pub fn detect_component(dist: &str, component: &str) -> Option<DetectedComponent> {
    let definition = component_definition(dist, component)?;
    let elements = jsx_elements(definition);
    if elements.is_empty() {
        debug!(component, "no jsx calls in component definition");
        return None;
    }

    let primary = primary_index(&elements);
    debug!(
        component,
        elements = elements.len(),
        primary = %elements[primary].tag,
        "detected base component structure"
    );
    Some(DetectedComponent {
        name: component.to_string(),
        elements,
        primary,
    })
}

fn component_definition<'a>(dist: &'a str, component: &str) -> Option<&'a str> {
    let name = regex::escape(component);
    let start_re = Regex::new(&format!(
        r"var {}\s*=\s*(?:/\*.*?\*/\s*)?(?:(?:\w+\.)?forwardRef|function)",
        name
    ))
    .ok()?;
    let start = start_re.find(dist)?.start();

    let search_from = char_boundary(dist, start + DEFINITION_LOOKAHEAD);
    let end_re = Regex::new(&format!(r"(?m){}\.displayName|^\s*var [A-Z]", name)).ok()?;
    let end = match end_re.find(&dist[search_from..]) {
        Some(m) => search_from + m.start(),
        None => char_boundary(dist, start + DEFINITION_FALLBACK_LEN),
    };
    Some(&dist[start..end])
}

fn char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

fn jsx_elements(definition: &str) -> Vec<DetectedElement> {
    let mut elements = Vec::new();

    for caps in JSX_CALL_RE.captures_iter(definition) {
        let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let rest = &definition[whole.end()..];
        let props = if rest.starts_with("_objectSpread") {
            object_spread_props(rest)
        } else if rest.starts_with('{') {
            extract_balanced(rest, 0)
        } else {
            None
        };

        if let Some(props) = props {
            elements.push(parse_props(tag.as_str(), props));
        }
    }

    elements
}

/// The props object of `_objectSpread(_objectSpread({}, rest), {}, {...})`:
/// the last non-empty object, preferring one that sets `className`
fn object_spread_props(text: &str) -> Option<&str> {
    let open = text.find('(')?;
    let close = balanced_end(text, open)?;
    let inner = &text[open + 1..close];

    let mut objects = Vec::new();
    let mut skip_to = 0;
    for (i, c, _) in code_chars(inner) {
        if i < skip_to || c != '{' {
            continue;
        }
        if let Some(object) = extract_balanced(inner, i) {
            if object.len() > 2 {
                objects.push(object);
            }
            skip_to = i + object.len();
        }
    }

    objects
        .iter()
        .rev()
        .find(|o| o.contains("className"))
        .or_else(|| objects.last())
        .copied()
}

fn parse_props(tag: &str, object: &str) -> DetectedElement {
    let mut element = DetectedElement {
        tag: tag.to_string(),
        classes: Vec::new(),
        conditional: Vec::new(),
        attributes: BTreeMap::new(),
    };

    for entry in split_top_level(&object[1..object.len() - 1], ",") {
        if entry.starts_with("...") {
            continue;
        }
        let Some(colon) = find_top_level(entry, ":") else {
            continue;
        };
        let raw_key = entry[..colon].trim();
        let key = string_literal(raw_key).unwrap_or_else(|| raw_key.to_string());
        let value = entry[colon + 1..].trim();

        if key == "className" {
            let extraction = ClsxExtractor::new(&[]).extract(value);
            element.classes = extraction.base_classes;
            element.conditional = extraction.mappings;
        } else if !SKIPPED_KEYS.contains(&key.as_str()) {
            if let Some(literal) = string_literal(value) {
                element.attributes.insert(key, literal);
            }
        }
    }

    element
}

/// A lone element is primary unless it renders a child element; otherwise
/// the innermost element that is not a generic container.
fn primary_index(elements: &[DetectedElement]) -> usize {
    if elements.len() == 1 {
        return 0;
    }
    elements
        .iter()
        .rposition(|e| !matches!(e.tag.as_str(), "div" | "span"))
        .unwrap_or(elements.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const DIST: &str = r#"
var _excluded = ["invalid", "className"];
var Fieldset = /*#__PURE__*/forwardRef(function Fieldset(_ref, ref) {
  var invalid = _ref.invalid,
    className = _ref.className,
    restProps = _objectWithoutProperties(_ref, _excluded);
  return jsx("div", _objectSpread(_objectSpread({}, restProps), {}, {
    className: clsx("utrecht-form-fieldset", invalid && "utrecht-form-fieldset--invalid", "utrecht-form-fieldset--html-div", className),
    children: jsx("fieldset", {
      "aria-invalid": invalid || undefined,
      className: clsx("utrecht-form-fieldset__fieldset", "utrecht-form-fieldset--html-fieldset"),
      role: "group",
      ref: ref,
      children: children
    })
  }));
});
Fieldset.displayName = 'Fieldset';
var Heading1 = /*#__PURE__*/forwardRef(function Heading1(_ref, ref) {
  return jsx("h1", _objectSpread(_objectSpread({}, restProps), {}, {
    ref: ref,
    className: clsx("utrecht-heading-1", className)
  }));
});
Heading1.displayName = 'Heading1';
"#;

    #[test]
    fn test_detect_wrapper_and_primary() {
        let detected = detect_component(DIST, "Fieldset").unwrap();
        assert_eq!(detected.elements.len(), 2);

        let primary = detected.primary();
        assert_eq!(primary.tag, "fieldset");
        assert_eq!(
            primary.classes,
            vec!["utrecht-form-fieldset__fieldset", "utrecht-form-fieldset--html-fieldset"]
        );
        assert_eq!(primary.attributes.get("role").map(String::as_str), Some("group"));
        assert!(!primary.attributes.contains_key("aria-invalid"));

        let wrapper = detected.wrapper().unwrap();
        assert_eq!(wrapper.tag, "div");
        assert_eq!(wrapper.conditional.len(), 1);
        assert_eq!(wrapper.conditional[0].css_class, "utrecht-form-fieldset--invalid");
    }

    #[test]
    fn test_single_element_component() {
        let detected = detect_component(DIST, "Heading1").unwrap();
        assert_eq!(detected.primary().tag, "h1");
        assert!(detected.wrapper().is_none());
        assert_eq!(detected.classes_for("level", &json!(1)), vec!["utrecht-heading-1"]);
    }

    #[test]
    fn test_missing_component() {
        assert!(detect_component(DIST, "Textarea").is_none());
    }
}
