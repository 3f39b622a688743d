//! Attribute names that cannot be used as Jinja variables.

use roos_common::ManualReviewItem;
use roos_parser::AttributeDescriptor;
use std::collections::BTreeMap;

/// Keywords and names with a fixed meaning inside generated templates
const RESERVED: &[&str] = &[
    "and", "as", "block", "caller", "elif", "else", "endfor", "endif", "extends", "false",
    "False", "for", "from", "if", "import", "in", "include", "is", "kwargs", "loop", "macro",
    "none", "None", "not", "or", "recursive", "self", "set", "true", "True", "varargs", "with",
    // Names the generated template itself defines
    "_component_context", "css_classes", "events", "tag_name",
];

const SUFFIX: &str = "_attr";

pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

/// Renames for attributes whose names collide with reserved identifiers.
///
/// Built once per template and consulted for every variable reference, so a
/// renamed attribute is renamed everywhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameMap {
    renames: BTreeMap<String, String>,
}

impl NameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_attributes(attributes: &[AttributeDescriptor]) -> Self {
        let mut map = Self::new();
        for attr in attributes {
            map.declare(&attr.name);
        }
        map
    }

    /// Record a rename for `name` if it is reserved
    pub fn declare(&mut self, name: &str) {
        if !is_reserved(name) || self.renames.contains_key(name) {
            return;
        }
        let mut renamed = format!("{}{}", name, SUFFIX);
        while is_reserved(&renamed) || self.renames.values().any(|v| *v == renamed) {
            renamed.push('_');
        }
        self.renames.insert(name.to_string(), renamed);
    }

    /// Template variable for an attribute or identifier
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.renames.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn is_renamed(&self, name: &str) -> bool {
        self.renames.contains_key(name)
    }

    pub fn renames(&self) -> impl Iterator<Item = (&str, &str)> {
        self.renames.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn review_items(&self) -> Vec<ManualReviewItem> {
        self.renames()
            .map(|(from, to)| {
                ManualReviewItem::low(format!(
                    "Attribute '{}' renamed to '{}' in the template",
                    from, to
                ))
                .with_context(from)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roos_parser::AttributeType;

    #[test]
    fn test_reserved_attributes_are_renamed_consistently() {
        let attrs = vec![
            AttributeDescriptor::new("loop", AttributeType::Boolean),
            AttributeDescriptor::new("label", AttributeType::String),
        ];
        let names = NameMap::for_attributes(&attrs);
        assert_eq!(names.resolve("loop"), "loop_attr");
        assert_eq!(names.resolve("label"), "label");
        assert!(names.is_renamed("loop"));
        assert_eq!(names.review_items().len(), 1);
    }
}
