use crate::ast::{ImportDecl, ImportedName};
use crate::scan::{extract_balanced_inner, split_top_level};
use regex::Regex;
use std::sync::LazyLock;

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\bimport\s+(type\s+)?([^'";]+?)\s+from\s+['"]([^'"]+)['"]"#).unwrap()
});

/// Every `import <clause> from '<source>'` statement, in order.
/// Side-effect imports (`import './style.css'`) carry no bindings and are
/// skipped.
pub fn parse_imports(source: &str) -> Vec<ImportDecl> {
    IMPORT_RE
        .captures_iter(source)
        .filter_map(|caps| {
            let clause = caps.get(2)?.as_str().trim();
            let mut decl = ImportDecl {
                source: caps.get(3)?.as_str().to_string(),
                default_import: None,
                names: Vec::new(),
                namespace: None,
                type_only: caps.get(1).is_some(),
            };

            for part in split_top_level(clause, ",") {
                if part.starts_with('{') {
                    let inner = extract_balanced_inner(part, 0).unwrap_or_default();
                    decl.names.extend(split_top_level(inner, ",").into_iter().filter_map(parse_named));
                } else if let Some(ns) = part.strip_prefix('*') {
                    decl.namespace = ns.trim().strip_prefix("as").map(|n| n.trim().to_string());
                } else {
                    decl.default_import = Some(part.to_string());
                }
            }

            Some(decl)
        })
        .collect()
}

fn parse_named(spec: &str) -> Option<ImportedName> {
    let spec = spec.strip_prefix("type ").unwrap_or(spec).trim();
    let mut words = spec.split_whitespace();
    let imported = words.next()?.to_string();
    let local = match (words.next(), words.next()) {
        (Some("as"), Some(alias)) => alias.to_string(),
        _ => imported.clone(),
    };
    Some(ImportedName { imported, local })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_imports() {
        let source = r#"
import React, { forwardRef } from 'react';
import { Button as UtrechtButton, type ButtonProps } from '@utrecht/component-library-react';
import clsx from 'clsx';
import * as Icons from './icons';
import type { IMenuItem } from '../menu-item/src/template';
import './style.css';
import {
  MenuBarItem,
} from "../menubar-item/src/template";
"#;
        let imports = parse_imports(source);
        assert_eq!(imports.len(), 6);

        assert_eq!(imports[0].default_import.as_deref(), Some("React"));
        assert_eq!(imports[0].names[0].local, "forwardRef");

        let utrecht = &imports[1];
        assert_eq!(utrecht.imported_name("UtrechtButton"), Some("Button"));
        assert_eq!(utrecht.names[1].imported, "ButtonProps");
        assert!(!utrecht.is_relative());

        assert_eq!(imports[3].namespace.as_deref(), Some("Icons"));
        assert!(imports[4].type_only);
        assert!(imports[4].is_relative());

        let nested = &imports[5];
        assert_eq!(nested.source, "../menubar-item/src/template");
        assert_eq!(nested.local_names().collect::<Vec<_>>(), vec!["MenuBarItem"]);
    }
}
