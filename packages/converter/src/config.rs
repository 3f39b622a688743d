use crate::error::{ConvertError, ConvertResult};
use roos_common::FileSystem;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "roos.config.json";

/// Project layout, read from `roos.config.json`. Relative paths are
/// resolved against the directory holding the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Directory holding one sub-directory per source component
    pub components_dir: String,

    /// Component source, relative to its component directory
    pub template_file: String,

    /// Optional defaults module, relative to its component directory
    pub defaults_file: String,

    pub templates_dir: String,
    pub definitions_dir: String,
    pub review_dir: String,
    pub customizations_dir: String,

    /// Shared alias registry
    pub registry_file: String,

    /// Where the base component library's distribution is installed
    pub node_modules_dir: String,

    /// Extra base component mappings merged over the built-in table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mappings_file: Option<String>,

    pub convert_nested: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            components_dir: "rvo/components".to_string(),
            template_file: "src/template.tsx".to_string(),
            defaults_file: "src/defaultArgs.ts".to_string(),
            templates_dir: "templates/components".to_string(),
            definitions_dir: "conversion/definitions".to_string(),
            review_dir: "conversion/review".to_string(),
            customizations_dir: "conversion/customizations".to_string(),
            registry_file: "definitions.json".to_string(),
            node_modules_dir: "rvo/node_modules".to_string(),
            mappings_file: None,
            convert_nested: true,
        }
    }
}

impl Config {
    /// Load the config from a directory; a missing file gives the defaults
    pub fn load(dir: &Path, fs: &dyn FileSystem) -> ConvertResult<Self> {
        let path = dir.join(DEFAULT_CONFIG_NAME);
        if !fs.exists(&path) {
            return Ok(Config::default());
        }
        let content = fs
            .read_to_string(&path)
            .map_err(|e| ConvertError::io(&path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn to_json(&self) -> ConvertResult<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Absolute locations of every configured path under `root`
    pub fn paths(&self, root: &Path) -> ProjectPaths {
        ProjectPaths {
            root: root.to_path_buf(),
            components: root.join(&self.components_dir),
            templates: root.join(&self.templates_dir),
            definitions: root.join(&self.definitions_dir),
            review: root.join(&self.review_dir),
            customizations: root.join(&self.customizations_dir),
            registry: root.join(&self.registry_file),
            node_modules: root.join(&self.node_modules_dir),
            mappings: self.mappings_file.as_ref().map(|m| root.join(m)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub components: PathBuf,
    pub templates: PathBuf,
    pub definitions: PathBuf,
    pub review: PathBuf,
    pub customizations: PathBuf,
    pub registry: PathBuf,
    pub node_modules: PathBuf,
    pub mappings: Option<PathBuf>,
}

impl ProjectPaths {
    pub fn template(&self, name: &str) -> PathBuf {
        self.templates.join(format!("{}.html.j2", name))
    }

    pub fn definition(&self, name: &str) -> PathBuf {
        self.definitions.join(format!("{}.json", name))
    }

    pub fn review_document(&self, name: &str) -> PathBuf {
        self.review.join(format!("{}_review.md", name))
    }

    /// `path` relative to the project root, with forward slashes
    pub fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roos_common::MockFileSystem;

    #[test]
    fn test_parse_config() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "/project/roos.config.json",
            r#"{ "componentsDir": "src/components", "convertNested": false, "mappingsFile": "base.json" }"#,
        );

        let config = Config::load(Path::new("/project"), &fs).unwrap();
        assert_eq!(config.components_dir, "src/components");
        assert!(!config.convert_nested);
        assert_eq!(config.templates_dir, "templates/components");

        let paths = config.paths(Path::new("/project"));
        assert_eq!(paths.mappings, Some(PathBuf::from("/project/base.json")));
        assert_eq!(
            paths.template("button"),
            PathBuf::from("/project/templates/components/button.html.j2")
        );
        assert_eq!(
            paths.relative(Path::new("/project/src/components/button/src/template.tsx")),
            "src/components/button/src/template.tsx"
        );
    }

    #[test]
    fn test_default_config() {
        let fs = MockFileSystem::new();
        let config = Config::load(Path::new("/empty"), &fs).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.to_json().unwrap().contains("\"registryFile\": \"definitions.json\""));
    }
}
