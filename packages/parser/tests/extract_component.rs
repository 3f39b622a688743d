//! End-to-end extraction over a realistic component file: source model,
//! class logic and rendered content together.

use pretty_assertions::assert_eq;
use roos_parser::{
    parse_component, AttributeType, ClsxExtractor, ContentElement, ContentExtractor, PropValue,
    Trigger,
};

const ALERT: &str = r#"
import React from 'react';
import clsx from 'clsx';
import { Icon } from '../icon/Icon';

interface ILink {
  label: string;
  href: string;
}

export interface IAlertProps {
  kind?: 'info' | 'warning' | 'error';
  padding?: 'sm' | 'md';
  heading?: string;
  content?: string;
  closable?: boolean;
  items?: ILink[];
}

export const Alert = ({ kind = 'info', padding = 'md', heading, content, closable, items, children }: IAlertProps) => {
  const icon = <Icon icon="info" />;

  return (
    <div
      className={clsx(
        'rvo-alert',
        `rvo-alert--${kind}`,
        padding === 'sm' && 'rvo-alert--padding-sm',
        closable && 'rvo-alert--closable',
      )}
    >
      {icon}
      {heading && <strong className="rvo-alert__heading">{heading}</strong>}
      {children || content}
      {items && items.map(({ label, href }) => <a href={href}>{label}</a>)}
    </div>
  );
};
"#;

#[test]
fn test_source_model() {
    let model = parse_component(ALERT, None, Some("alert")).unwrap();

    assert_eq!(model.name, "Alert");
    assert_eq!(model.props_type.as_deref(), Some("IAlertProps"));

    let names: Vec<_> = model.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["kind", "padding", "heading", "content", "closable", "items"]);

    let kind = model.attribute("kind").unwrap();
    assert_eq!(kind.enum_values, vec!["info", "warning", "error"]);
    assert!(model.attribute("closable").unwrap().has_type(AttributeType::Boolean));
    assert!(model.attribute("items").unwrap().is_array());

    assert!(model.preamble.contains("const icon"));
    println!("✓ Source model extracted");
}

#[test]
fn test_class_logic() {
    let model = parse_component(ALERT, None, None).unwrap();
    let root = model.root_element().unwrap();
    let Some(PropValue::Expression(class_expr)) = root.prop("className") else {
        panic!("root has no className expression");
    };

    let mut classes = ClsxExtractor::new(&model.attributes).extract(class_expr);
    classes.expand_templates(&model.attributes);

    assert_eq!(classes.base_classes, vec!["rvo-alert"]);
    let summary: Vec<_> = classes
        .mappings
        .iter()
        .map(|m| (m.prop_name.as_str(), m.trigger.clone(), m.css_class.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("kind", Trigger::Equals("info".into()), "rvo-alert--info"),
            ("kind", Trigger::Equals("warning".into()), "rvo-alert--warning"),
            ("kind", Trigger::Equals("error".into()), "rvo-alert--error"),
            ("padding", Trigger::Equals("sm".into()), "rvo-alert--padding-sm"),
            ("closable", Trigger::Truthy, "rvo-alert--closable"),
        ]
    );
    assert!(classes.review.is_empty());
    println!("✓ Class logic extracted");
}

#[test]
fn test_content() {
    let model = parse_component(ALERT, None, None).unwrap();
    let root = model.root_element().unwrap();
    let content = ContentExtractor::new().extract(&root, &model.preamble);

    assert_eq!(content.elements.len(), 4);
    assert!(content.review.is_empty());

    match &content.elements[0] {
        ContentElement::Reference { name, resolved } => {
            assert_eq!(name, "icon");
            assert!(matches!(resolved.as_deref(), Some(ContentElement::Component(c)) if c.name == "Icon"));
        }
        other => panic!("expected reference, got {:?}", other),
    }
    assert!(matches!(
        &content.elements[1],
        ContentElement::Conditional { condition, .. } if condition == "heading"
    ));
    assert_eq!(
        content.elements[2],
        ContentElement::Fallback {
            chain: vec!["children".into(), "content".into()]
        }
    );
    match &content.elements[3] {
        ContentElement::Conditional { condition, body } => {
            assert_eq!(condition, "items");
            let ContentElement::ArrayMap(map) = &body[0] else {
                panic!("expected array map, got {:?}", body[0]);
            };
            assert_eq!(map.array, "items");
            assert_eq!(map.accessed_item_props(), vec!["label", "href"]);
        }
        other => panic!("expected conditional, got {:?}", other),
    }
    println!("✓ Content extracted");
}
