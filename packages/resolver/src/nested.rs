//! Sibling components a component renders, found through its relative
//! imports.

use crate::error::{ResolverError, ResolverResult};
use regex::Regex;
use roos_common::{component_tag, is_pascal_case, normalize_path, to_kebab_case, FileSystem};
use roos_parser::{parse_component, ImportDecl};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// A locally imported component used in the render body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedComponentRef {
    /// Declared (imported) name, e.g. `ProgressTrackerStep`
    pub component_class: String,
    /// Local binding used in JSX
    pub local_name: String,
    /// Kebab-case name, e.g. `progress-tracker-step`
    pub name: String,
    /// Import path as written
    pub source_path: String,
    pub resolved_path: Option<PathBuf>,
    /// `c-progress-tracker-step`
    pub tag_name: String,
    pub interface: Option<String>,
    /// Attribute names of the nested component
    pub props: Vec<String>,
}

pub struct NestedComponentDetector<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> NestedComponentDetector<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// One reference per imported component class that `jsx` renders.
    #[instrument(skip(self, imports, jsx), fields(source = %source_file.display()))]
    pub fn detect(&self, imports: &[ImportDecl], jsx: &str, source_file: &Path) -> Vec<NestedComponentRef> {
        let mut found: Vec<NestedComponentRef> = Vec::new();

        for import in imports.iter().filter(|i| i.is_relative() && !i.type_only) {
            for local in import.local_names() {
                let class = import.imported_name(local).unwrap_or(local);
                if !is_pascal_case(local) || is_props_interface(class) {
                    continue;
                }
                if found.iter().any(|n| n.component_class == class) || !is_rendered(local, jsx) {
                    continue;
                }
                found.push(self.describe(import, local, class, source_file));
            }
        }

        debug!(count = found.len(), "detected nested components");
        found
    }

    fn describe(&self, import: &ImportDecl, local: &str, class: &str, source_file: &Path) -> NestedComponentRef {
        let resolved_path = match self.resolve_import_path(&import.source, source_file) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!(error = %e, "nested component file not found");
                None
            }
        };

        let interface_name = format!("I{}Props", class);
        let mut interface = import
            .local_names()
            .any(|n| n == interface_name)
            .then(|| interface_name.clone());

        let mut props = Vec::new();
        if let Some(path) = &resolved_path {
            let parsed = self
                .fs
                .read_to_string(path)
                .ok()
                .and_then(|source| parse_component(&source, None, Some(class)).ok());
            match parsed {
                Some(model) => {
                    props = model.attributes.iter().map(|a| a.name.clone()).collect();
                    if interface.is_none() {
                        interface = model.props_type;
                    }
                }
                None => debug!(path = %path.display(), "could not read nested component attributes"),
            }
        }

        NestedComponentRef {
            component_class: class.to_string(),
            local_name: local.to_string(),
            name: to_kebab_case(class),
            source_path: import.source.clone(),
            resolved_path,
            tag_name: component_tag(class),
            interface,
            props,
        }
    }

    /// Resolve a relative import against the importing file's directory,
    /// trying `.tsx`, `.ts`, `/index.tsx` and then the path as written.
    pub fn resolve_import_path(&self, import_path: &str, importing_file: &Path) -> ResolverResult<PathBuf> {
        let dir = importing_file.parent().unwrap_or(Path::new(""));
        let base = dir.join(import_path);

        let candidates: Vec<PathBuf> = if import_path.ends_with(".tsx") || import_path.ends_with(".ts") {
            vec![base]
        } else {
            vec![
                PathBuf::from(format!("{}.tsx", base.display())),
                PathBuf::from(format!("{}.ts", base.display())),
                base.join("index.tsx"),
                base,
            ]
        };

        for candidate in candidates {
            let candidate = normalize_path(&candidate);
            if self.fs.exists(&candidate) {
                return self
                    .fs
                    .canonicalize(&candidate)
                    .map_err(|_| ResolverError::import_not_found(import_path, importing_file));
            }
        }
        Err(ResolverError::import_not_found(import_path, importing_file))
    }
}

fn is_props_interface(name: &str) -> bool {
    name.starts_with('I') && name.ends_with("Props")
}

/// `<Name` followed by whitespace, `/` or `>`
fn is_rendered(name: &str, jsx: &str) -> bool {
    Regex::new(&format!(r"<{}[\s/>]", regex::escape(name)))
        .map(|re| re.is_match(jsx))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roos_common::MockFileSystem;
    use roos_parser::imports::parse_imports;

    const TRACKER: &str = r#"
import React from 'react';
import { ProgressTrackerStep, IProgressTrackerStepProps } from './progress-tracker-step/template';
import { Icon } from '../../icon/src/template';
import { Unused } from './unused';
import type { Shape } from './types';
"#;

    const STEP: &str = r#"
export interface IProgressTrackerStepProps {
  state?: 'completed' | 'incomplete';
  label?: string;
  link?: string;
  size?: 'sm' | 'md';
  line?: boolean;
}
export const ProgressTrackerStep = ({ state, label }: IProgressTrackerStepProps) => <li className="step">{label}</li>;
"#;

    #[test]
    fn test_detects_rendered_relative_imports() {
        let fs = MockFileSystem::new();
        fs.add_file("/rvo/progress-tracker/src/progress-tracker-step/template.tsx", STEP);
        let detector = NestedComponentDetector::new(&fs);

        let imports = parse_imports(TRACKER);
        let jsx = "<ol>{steps.map((step) => <ProgressTrackerStep {...step} />)}<Icon icon=\"x\"/></ol>";
        let nested = detector.detect(&imports, jsx, Path::new("/rvo/progress-tracker/src/template.tsx"));

        assert_eq!(nested.len(), 2);
        let step = &nested[0];
        assert_eq!(step.name, "progress-tracker-step");
        assert_eq!(step.tag_name, "c-progress-tracker-step");
        assert_eq!(step.interface.as_deref(), Some("IProgressTrackerStepProps"));
        assert_eq!(step.props, vec!["state", "label", "link", "size", "line"]);
        assert_eq!(
            step.resolved_path.as_deref(),
            Some(Path::new("/rvo/progress-tracker/src/progress-tracker-step/template.tsx"))
        );

        let icon = &nested[1];
        assert_eq!(icon.tag_name, "c-icon");
        assert!(icon.resolved_path.is_none());
        assert!(icon.props.is_empty());
    }

    #[test]
    fn test_resolve_candidates() {
        let fs = MockFileSystem::new();
        fs.add_file("/c/src/item/index.tsx", "");
        fs.add_file("/c/src/helper.ts", "");
        let detector = NestedComponentDetector::new(&fs);
        let importer = Path::new("/c/src/template.tsx");

        assert_eq!(
            detector.resolve_import_path("./item", importer).unwrap(),
            PathBuf::from("/c/src/item/index.tsx")
        );
        assert_eq!(
            detector.resolve_import_path("./helper", importer).unwrap(),
            PathBuf::from("/c/src/helper.ts")
        );
        assert!(matches!(
            detector.resolve_import_path("../missing", importer),
            Err(ResolverError::ImportNotFound { .. })
        ));
    }
}
