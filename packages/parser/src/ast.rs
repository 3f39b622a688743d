//! Intermediate representation shared by the extractors, the resolver and
//! the template generators.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type set member of a component attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Number,
    Boolean,
    Enum,
    Function,
    Array,
    Object,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Number => "number",
            AttributeType::Boolean => "boolean",
            AttributeType::Enum => "enum",
            AttributeType::Function => "function",
            AttributeType::Array => "array",
            AttributeType::Object => "object",
        }
    }
}

/// Where a default value came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "lowercase")]
pub enum DefaultValue {
    /// Declared in the component's parameter destructuring; the component
    /// really renders with it.
    Actual(Value),
    /// Only present in the separate defaults table (story/example data).
    Example(Value),
}

/// One attribute of a component's props interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub name: String,
    /// Ordered, deduplicated
    pub types: Vec<AttributeType>,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// Element type name of an array attribute (`IMenuItem` for `IMenuItem[]`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

impl AttributeDescriptor {
    pub fn new(name: impl Into<String>, ty: AttributeType) -> Self {
        Self {
            name: name.into(),
            types: vec![ty],
            required: false,
            enum_values: Vec::new(),
            description: None,
            default: None,
            item_type: None,
        }
    }

    pub fn enumeration(name: impl Into<String>, values: &[&str]) -> Self {
        let mut attr = Self::new(name, AttributeType::Enum);
        attr.types.push(AttributeType::String);
        attr.enum_values = values.iter().map(|v| v.to_string()).collect();
        attr
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Actual(value));
        self
    }

    pub fn has_type(&self, ty: AttributeType) -> bool {
        self.types.contains(&ty)
    }

    pub fn is_function(&self) -> bool {
        self.has_type(AttributeType::Function)
    }

    pub fn is_boolean(&self) -> bool {
        self.has_type(AttributeType::Boolean)
    }

    pub fn is_array(&self) -> bool {
        self.has_type(AttributeType::Array)
    }

    /// Type reported in definitions: `enum` wins, then the first declared type
    pub fn primary_type(&self) -> AttributeType {
        if !self.enum_values.is_empty() || self.has_type(AttributeType::Enum) {
            return AttributeType::Enum;
        }
        self.types
            .iter()
            .copied()
            .find(|t| *t != AttributeType::Enum)
            .unwrap_or(AttributeType::String)
    }

    pub fn actual_default(&self) -> Option<&Value> {
        match &self.default {
            Some(DefaultValue::Actual(v)) => Some(v),
            _ => None,
        }
    }

    pub fn example_value(&self) -> Option<&Value> {
        match &self.default {
            Some(DefaultValue::Example(v)) => Some(v),
            _ => None,
        }
    }
}

/// Default values split by provenance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultValues {
    pub actual: Map<String, Value>,
    pub examples: Map<String, Value>,
}

impl DefaultValues {
    pub fn is_empty(&self) -> bool {
        self.actual.is_empty() && self.examples.is_empty()
    }

    /// Record each value on the matching attribute. Actual defaults win over
    /// examples.
    pub fn apply_to(&self, attributes: &mut [AttributeDescriptor]) {
        for attr in attributes.iter_mut() {
            if let Some(v) = self.actual.get(&attr.name) {
                attr.default = Some(DefaultValue::Actual(v.clone()));
            } else if let Some(v) = self.examples.get(&attr.name) {
                attr.default = Some(DefaultValue::Example(v.clone()));
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedName {
    pub imported: String,
    pub local: String,
}

/// One `import ... from '...'` statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub source: String,
    pub default_import: Option<String>,
    pub names: Vec<ImportedName>,
    pub namespace: Option<String>,
    pub type_only: bool,
}

impl ImportDecl {
    pub fn is_relative(&self) -> bool {
        self.source.starts_with("./") || self.source.starts_with("../")
    }

    /// Every local binding the import introduces
    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.default_import
            .as_deref()
            .into_iter()
            .chain(self.names.iter().map(|n| n.local.as_str()))
    }

    /// The exported name behind a local binding
    pub fn imported_name<'a>(&'a self, local: &'a str) -> Option<&'a str> {
        if self.default_import.as_deref() == Some(local) {
            return Some(local);
        }
        self.names
            .iter()
            .find(|n| n.local == local)
            .map(|n| n.imported.as_str())
    }
}

/// When a class mapping applies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Trigger {
    /// The prop is truthy
    Truthy,
    /// The prop is falsy
    Falsy,
    /// The prop equals a literal value; `'1'` and `1` stay distinct
    Equals(Value),
    /// No earlier value branch for the prop matched
    Otherwise,
    /// A compound JS condition, translated at generation time
    Condition(String),
    /// A template literal interpolating the prop, expanded once its enum
    /// values are known
    Template {
        pattern: String,
        excluded: Vec<String>,
        guard: Option<String>,
    },
}

/// Normalized record of when a CSS class is present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMapping {
    pub prop_name: String,
    pub trigger: Trigger,
    pub css_class: String,
    /// Original condition text, for diagnostics
    pub condition: String,
    /// Mappings sharing a chain are exclusive value branches (a `switch`);
    /// an empty `css_class` marks a branch that adds nothing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
}

impl ClassMapping {
    pub fn new(
        prop_name: impl Into<String>,
        trigger: Trigger,
        css_class: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            prop_name: prop_name.into(),
            trigger,
            css_class: css_class.into(),
            condition: condition.into(),
            chain: None,
        }
    }

    pub fn in_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub values: Vec<Value>,
    pub result: String,
}

/// `let r; switch (v) { case 'a': case 'b': r = 'x'; break; ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchMapping {
    pub switch_var: String,
    pub result_var: String,
    /// Declaration order; the first matching case wins
    pub cases: Vec<SwitchCase>,
    pub default: Option<String>,
}

impl SwitchMapping {
    /// The result the switch produces for `value`
    pub fn select(&self, value: &str) -> Option<&str> {
        self.cases
            .iter()
            .find(|case| case.values.iter().any(|v| literal_key(v) == value))
            .map(|case| case.result.as_str())
            .or(self.default.as_deref())
    }
}

/// A literal as a lookup key: strings bare, anything else as JSON text
pub fn literal_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A JSX attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropValue {
    /// `name="text"`
    Literal(String),
    /// `name={expr}`
    Expression(String),
    /// bare `name`
    Flag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prop {
    pub name: String,
    pub value: PropValue,
}

/// A lowercase HTML element inside rendered content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlElement {
    pub tag: String,
    pub props: Vec<Prop>,
    /// `{...rest}` spread expressions
    pub spreads: Vec<String>,
    pub children: Vec<ContentElement>,
}

/// A capitalized component used inside rendered content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentUsage {
    pub name: String,
    pub props: Vec<Prop>,
    pub spreads: Vec<String>,
    pub children: Vec<ContentElement>,
}

/// `items.map((item, index) => <Item {...item} />)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayMap {
    /// The iterated expression, usually an attribute name
    pub array: String,
    /// Loop variable; destructured parameters are rewritten to `item.prop`
    pub item_var: String,
    pub index_var: Option<String>,
    /// Names pulled out of a destructured parameter
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destructured: Vec<String>,
    /// The nested tag receives the whole item as `{...item}`
    pub spread: bool,
    /// Explicit per-item props: `(prop, expression)`
    pub props: Vec<(String, String)>,
    /// Name of the component rendered per item, if any
    pub tag: Option<String>,
    pub body: Vec<ContentElement>,
}

impl ArrayMap {
    /// Item properties the body reads, in first-use order
    pub fn accessed_item_props(&self) -> Vec<String> {
        let mut props: Vec<String> = self.destructured.clone();
        let prefix = format!("{}.", self.item_var);
        for (_, expr) in &self.props {
            let mut rest = expr.as_str();
            while let Some(pos) = rest.find(&prefix) {
                let after = &rest[pos + prefix.len()..];
                let name: String = after
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                    .collect();
                if !name.is_empty() && !props.contains(&name) {
                    props.push(name.clone());
                }
                rest = &after[name.len()..];
            }
        }
        props
    }
}

/// One branch of a promoted if/elif chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// `None` for the final `else`
    pub condition: Option<String>,
    pub body: Vec<ContentElement>,
}

/// One unit of parsed render-body content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentElement {
    /// Static text between tags
    Literal { text: String },
    /// `{label}`; `resolved` is filled when the name is bound in the preamble
    Reference {
        name: String,
        resolved: Option<Box<ContentElement>>,
    },
    Element(HtmlElement),
    Component(ComponentUsage),
    /// `{cond && <x/>}`
    Conditional {
        condition: String,
        body: Vec<ContentElement>,
    },
    /// `{cond && <Component/>}`
    ConditionalComponent {
        condition: String,
        component: ComponentUsage,
    },
    /// `{a || b || c}` rendered as the first truthy operand
    Fallback { chain: Vec<String> },
    /// `{cond ? a : b}`
    Ternary {
        condition: String,
        when_true: Box<ContentElement>,
        when_false: Box<ContentElement>,
    },
    /// Fallback chain or ternary promoted to if/elif because an operand
    /// iterates an array
    Branches { branches: Vec<Branch> },
    ArrayMap(ArrayMap),
    /// `{parseContentMarkup(children)}`
    ContentCall { function: String, argument: String },
    Unsupported { expression: String },
}

impl ContentElement {
    pub fn literal(text: impl Into<String>) -> Self {
        ContentElement::Literal { text: text.into() }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        ContentElement::Reference {
            name: name.into(),
            resolved: None,
        }
    }

    /// Whether this element (or anything below it) iterates an array
    pub fn contains_array_map(&self) -> bool {
        let mut found = false;
        crate::visitor::walk_content(self, &mut |el| {
            if matches!(el, ContentElement::ArrayMap(_)) {
                found = true;
            }
        });
        found
    }
}

/// The root tag is computed at runtime: `const Tag = \`h${level}\``
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicTag {
    /// Local name used in the JSX (`Tag`)
    pub variable: String,
    /// JS expression producing the tag name
    pub expression: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_switch_select_first_match_then_default() {
        let switch = SwitchMapping {
            switch_var: "size".to_string(),
            result_var: "headingSize".to_string(),
            cases: vec![
                SwitchCase {
                    values: vec!["a".into(), "b".into()],
                    result: "x".to_string(),
                },
                SwitchCase {
                    values: vec!["c".into(), 3.into()],
                    result: "y".to_string(),
                },
            ],
            default: Some("z".to_string()),
        };
        assert_eq!(switch.select("a"), Some("x"));
        assert_eq!(switch.select("b"), Some("x"));
        assert_eq!(switch.select("c"), Some("y"));
        assert_eq!(switch.select("3"), Some("y"));
        assert_eq!(switch.select("q"), Some("z"));
    }

    #[test]
    fn test_primary_type_prefers_enum() {
        let attr = AttributeDescriptor::enumeration("kind", &["primary", "secondary"]);
        assert_eq!(attr.primary_type(), AttributeType::Enum);
        let attr = AttributeDescriptor::new("disabled", AttributeType::Boolean);
        assert_eq!(attr.primary_type(), AttributeType::Boolean);
    }

    #[test]
    fn test_defaults_actual_wins() {
        let mut defaults = DefaultValues::default();
        defaults.actual.insert("kind".into(), json!("primary"));
        defaults.examples.insert("kind".into(), json!("secondary"));
        defaults.examples.insert("label".into(), json!("Click"));

        let mut attrs = vec![
            AttributeDescriptor::enumeration("kind", &["primary", "secondary"]),
            AttributeDescriptor::new("label", AttributeType::String),
        ];
        defaults.apply_to(&mut attrs);
        assert_eq!(attrs[0].actual_default(), Some(&json!("primary")));
        assert_eq!(attrs[1].actual_default(), None);
        assert_eq!(attrs[1].example_value(), Some(&json!("Click")));
    }

    #[test]
    fn test_accessed_item_props() {
        let map = ArrayMap {
            array: "items".into(),
            item_var: "item".into(),
            index_var: None,
            destructured: vec![],
            spread: false,
            props: vec![
                ("label".into(), "item.label".into()),
                ("href".into(), "item.link || item.label".into()),
            ],
            tag: Some("MenuItem".into()),
            body: vec![],
        };
        assert_eq!(map.accessed_item_props(), vec!["label", "link"]);
    }
}
