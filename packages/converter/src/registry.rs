//! The shared alias registry (`definitions.json`).

use crate::error::{ConvertError, ConvertResult};
use roos_common::FileSystem;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub name: String,
    pub target_component: String,
    #[serde(default)]
    pub default_attributes: Map<String, Value>,
    #[serde(default)]
    pub description: String,
    /// Keys this tool does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    aliases: Vec<AliasEntry>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

/// Load, merge and store cycle over the registry file.
///
/// There is no locking: two processes registering at once can still lose
/// an update.
#[derive(Debug)]
pub struct AliasRegistry {
    path: PathBuf,
    file: RegistryFile,
}

impl AliasRegistry {
    /// A missing file loads as an empty registry
    pub fn load(path: impl Into<PathBuf>, fs: &dyn FileSystem) -> ConvertResult<Self> {
        let path = path.into();
        let file = if fs.exists(&path) {
            let text = fs
                .read_to_string(&path)
                .map_err(|e| ConvertError::io(&path, e))?;
            serde_json::from_str(&text)?
        } else {
            debug!(path = %path.display(), "no alias registry yet");
            RegistryFile::default()
        };
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn aliases(&self) -> &[AliasEntry] {
        &self.file.aliases
    }

    pub fn get(&self, alias: &str) -> Option<&AliasEntry> {
        self.file.aliases.iter().find(|a| a.name == alias)
    }

    /// Point `alias` at `target`. Returns true when an existing alias was
    /// repointed.
    pub fn register(&mut self, alias: &str, target: &str) -> bool {
        let description = format!("Alias for {}", target);
        if let Some(existing) = self.file.aliases.iter_mut().find(|a| a.name == alias) {
            existing.target_component = target.to_string();
            existing.description = description;
            info!(alias, target, "repointed alias");
            return true;
        }
        self.file.aliases.push(AliasEntry {
            name: alias.to_string(),
            target_component: target.to_string(),
            default_attributes: Map::new(),
            description,
            extra: Map::new(),
        });
        info!(alias, target, "registered alias");
        false
    }

    /// Write the registry back, replacing the file atomically
    pub fn store(&self, fs: &dyn FileSystem) -> ConvertResult<()> {
        let mut json = serde_json::to_string_pretty(&self.file)?;
        json.push('\n');
        fs.write_atomic(&self.path, &json)
            .map_err(|e| ConvertError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roos_common::MockFileSystem;
    use serde_json::json;

    #[test]
    fn test_register_repoints_and_keeps_other_keys() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "/p/definitions.json",
            r#"{
                "components": [{ "name": "button" }],
                "aliases": [
                    { "name": "fs", "target_component": "form-fieldset", "default_attributes": { "x": 1 }, "description": "old" }
                ]
            }"#,
        );

        let mut registry = AliasRegistry::load("/p/definitions.json", &fs).unwrap();
        assert!(registry.register("fs", "fieldset"));
        assert!(!registry.register("field", "fieldset"));
        registry.store(&fs).unwrap();

        let text = fs.get("/p/definitions.json").unwrap();
        assert!(text.ends_with("}\n"));
        let json: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["components"], json!([{ "name": "button" }]));
        assert_eq!(
            json["aliases"],
            json!([
                { "name": "fs", "target_component": "fieldset", "default_attributes": { "x": 1 }, "description": "Alias for fieldset" },
                { "name": "field", "target_component": "fieldset", "default_attributes": {}, "description": "Alias for fieldset" }
            ])
        );
    }

    #[test]
    fn test_missing_registry_is_empty() {
        let fs = MockFileSystem::new();
        let registry = AliasRegistry::load("/p/definitions.json", &fs).unwrap();
        assert!(registry.aliases().is_empty());
        assert!(registry.get("fs").is_none());
    }
}
