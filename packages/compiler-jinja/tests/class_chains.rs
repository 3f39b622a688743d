//! Class lists built from switch statements and clsx calls on the same
//! component, from source text to the generated statements.

use pretty_assertions::assert_eq;
use roos_compiler_jinja::{ClassBuilder, NameMap};
use roos_parser::{
    extract_switches, switch_class_mappings, ClassExtraction, ClsxExtractor, Prop, PropClassLookup,
    PropValue,
};
use serde_json::Value;

const PREAMBLE: &str = r#"
  let appearance;
  switch (kind) {
    case 'primary':
      appearance = 'primary-action-button';
      break;
    case 'plain':
      appearance = undefined;
      break;
    default:
      appearance = 'secondary-action-button';
  }
"#;

/// `appearance="primary-action-button"` renders `btn--primary`
struct AppearanceLookup;

impl PropClassLookup for AppearanceLookup {
    fn classes_for(&self, prop: &str, value: &Value) -> Vec<String> {
        match (prop, value.as_str()) {
            ("appearance", Some(v)) => vec![
                "btn".to_string(),
                format!("btn--{}", v.trim_end_matches("-action-button")),
            ],
            _ => Vec::new(),
        }
    }
}

fn with_switch(mut extraction: ClassExtraction) -> ClassExtraction {
    let props = vec![Prop {
        name: "appearance".into(),
        value: PropValue::Expression("appearance".into()),
    }];
    for switch in extract_switches(PREAMBLE) {
        extraction.mappings.extend(switch_class_mappings(
            &switch,
            &props,
            None,
            &AppearanceLookup,
            &["btn".to_string()],
        ));
    }
    extraction
}

#[test]
fn test_switch_case_without_class_keeps_its_own_arm() {
    let extraction = with_switch(ClassExtraction::default());
    let builder = ClassBuilder::from_extraction(&extraction, &NameMap::new());

    assert_eq!(
        builder.to_jinja(),
        "{% set css_classes = [] %}\n\
         {% if kind == 'primary' %}\n    {% set css_classes = css_classes + ['btn--primary'] %}\n\
         {% elif kind == 'plain' %}\n    {# no classes #}\n\
         {% else %}\n    {% set css_classes = css_classes + ['btn--secondary'] %}\n\
         {% endif %}\n"
    );
}

#[test]
fn test_clsx_equality_stays_outside_the_switch_chain() {
    let clsx = ClsxExtractor::new(&[]).extract("clsx('btn', kind === 'warning' && 'is-warning')");
    let extraction = with_switch(clsx);
    let builder = ClassBuilder::from_extraction(&extraction, &NameMap::new());

    assert_eq!(
        builder.to_jinja(),
        "{% set css_classes = ['btn'] %}\n\
         {% if kind == 'warning' %}{% set css_classes = css_classes + ['is-warning'] %}{% endif %}\n\
         {% if kind == 'primary' %}\n    {% set css_classes = css_classes + ['btn--primary'] %}\n\
         {% elif kind == 'plain' %}\n    {# no classes #}\n\
         {% else %}\n    {% set css_classes = css_classes + ['btn--secondary'] %}\n\
         {% endif %}\n"
    );
}

#[test]
fn test_quoted_numeric_value_compares_as_string() {
    let extraction =
        ClsxExtractor::new(&[]).extract("clsx('heading', level === '1' && 'heading--lead', size === 2 && 'heading--small')");
    let out = ClassBuilder::from_extraction(&extraction, &NameMap::new()).to_jinja();

    assert!(out.contains(
        "{% if level == '1' %}{% set css_classes = css_classes + ['heading--lead'] %}{% endif %}\n"
    ));
    assert!(out.contains(
        "{% if size == 2 %}{% set css_classes = css_classes + ['heading--small'] %}{% endif %}\n"
    ));
}
