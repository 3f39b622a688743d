use crate::progress::ConsoleProgress;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use roos_common::RealFileSystem;
use roos_converter::{
    component_from_source, Config, ConvertOptions, Converter, Progress, Silent,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct RegenerateArgs {
    /// Component to leave untouched (repeatable)
    #[arg(short, long)]
    pub skip: Vec<String>,

    /// Print the full conversion trace of every component
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where a definition file came from
#[derive(Debug, PartialEq)]
enum Source {
    Component(String),
    Custom(PathBuf),
    /// Generated while converting a parent component
    Nested,
}

pub fn regenerate(args: RegenerateArgs, cwd: &str) -> Result<()> {
    let fs = RealFileSystem;
    let root = Path::new(cwd);
    let config = Config::load(root, &fs)?;
    let paths = config.paths(root);

    if !paths.definitions.exists() {
        return Err(anyhow!(
            "Definitions directory does not exist: {}",
            paths.definitions.display()
        ));
    }

    println!("{}", "🔁 Regenerating components...".bright_blue().bold());
    let definitions = find_definitions(&paths.definitions);
    if definitions.is_empty() {
        println!("{}", "⚠️  No definitions found".yellow());
        return Ok(());
    }
    println!("Found {} definitions", definitions.len());

    let console = ConsoleProgress::new(cwd);
    let progress: &dyn Progress = if args.verbose { &console } else { &Silent };
    let converter = Converter::new(root, config.clone(), &fs, progress)?;

    let mut success_count = 0;
    let mut skipped_count = 0;
    let mut error_count = 0;

    for path in &definitions {
        let (name, source) = match read_definition(path, &config) {
            Ok(found) => found,
            Err(e) => {
                error_count += 1;
                eprintln!("  {} {} - {}", "✗".red(), path.display(), e.to_string().red());
                continue;
            }
        };
        if args.skip.contains(&name) {
            skipped_count += 1;
            println!("  {} {} (skipped)", "⏭".dimmed(), name);
            continue;
        }

        let options = ConvertOptions {
            output_name: Some(name.clone()),
            aliases: Vec::new(),
            convert_nested: config.convert_nested,
        };
        let result = match &source {
            Source::Component(component) => converter.convert(component, &options),
            Source::Custom(definition) => converter.convert_custom(&root.join(definition), &options),
            Source::Nested => {
                skipped_count += 1;
                println!("  {} {} (nested, regenerated with its parent)", "⏭".dimmed(), name);
                continue;
            }
        };

        match result {
            Ok(summary) => {
                success_count += 1;
                println!(
                    "  {} {} ({}% automated, {} review items)",
                    "✅".green(),
                    name,
                    summary.automation,
                    summary.review_items
                );
            }
            Err(e) => {
                error_count += 1;
                eprintln!("  {} {} - {}", "❌".red(), name, e.to_string().red());
            }
        }
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Regenerated {} components, {} skipped",
            "✅".green(),
            success_count,
            skipped_count
        );
        Ok(())
    } else {
        println!(
            "{} Regenerated {} components, {} skipped, {} errors",
            "⚠️".yellow(),
            success_count,
            skipped_count,
            error_count
        );
        Err(anyhow!("{} component(s) failed to regenerate", error_count))
    }
}

fn find_definitions(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort();
    files
}

fn read_definition(path: &Path, config: &Config) -> Result<(String, Source)> {
    let text = fs::read_to_string(path)?;
    let json: Value = serde_json::from_str(&text)?;
    let name = json["name"]
        .as_str()
        .ok_or_else(|| anyhow!("definition has no name"))?
        .to_string();
    let source_file = json["source_file"].as_str().unwrap_or_default();
    Ok((name, classify(source_file, config)))
}

fn classify(source_file: &str, config: &Config) -> Source {
    if source_file.ends_with(".json") {
        return Source::Custom(PathBuf::from(source_file));
    }
    match component_from_source(source_file, config) {
        Some(component) => Source::Component(component),
        None => Source::Nested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_classify_sources() {
        let config = Config::default();
        assert_eq!(
            classify("rvo/components/button/src/template.tsx", &config),
            Source::Component("button".to_string())
        );
        assert_eq!(
            classify("custom/card.json", &config),
            Source::Custom(PathBuf::from("custom/card.json"))
        );
        assert_eq!(
            classify("rvo/components/list/src/item.tsx", &config),
            Source::Nested
        );
    }

    #[test]
    fn test_find_definitions_only_lists_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();

        let found = find_definitions(dir.path());
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_read_definition() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("button.json");
        fs::write(
            &path,
            r#"{ "name": "rvo-button", "source_file": "rvo/components/button/src/template.tsx" }"#,
        )
        .unwrap();

        let (name, source) = read_definition(&path, &Config::default()).unwrap();
        assert_eq!(name, "rvo-button");
        assert_eq!(source, Source::Component("button".to_string()));
    }
}
