use crate::progress::ConsoleProgress;
use anyhow::{anyhow, Result};
use clap::Args;
use roos_common::RealFileSystem;
use roos_converter::{Config, ConvertOptions, Converter};
use std::path::Path;

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Component name, or path to its directory
    pub component: String,

    /// Output name (defaults to the component name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Register an alias for the generated component (repeatable)
    #[arg(short, long = "alias")]
    pub aliases: Vec<String>,

    /// Do not convert nested components
    #[arg(long)]
    pub no_nested: bool,

    /// Debug logging and full error chains
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn convert(args: ConvertArgs, cwd: &str) -> Result<()> {
    let fs = RealFileSystem;
    let root = Path::new(cwd);
    let config = Config::load(root, &fs)?;
    let component = component_name(&args.component)?;

    let options = ConvertOptions {
        output_name: args.name,
        aliases: args.aliases,
        convert_nested: config.convert_nested && !args.no_nested,
    };

    let progress = ConsoleProgress::new(cwd);
    let converter = Converter::new(root, config, &fs, &progress)?;
    converter.convert(&component, &options)?;
    Ok(())
}

/// `rvo/components/button/` and `button` both name `button`
fn component_name(arg: &str) -> Result<String> {
    Path::new(arg)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("Invalid component: {}", arg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_name() {
        assert_eq!(component_name("button").unwrap(), "button");
        assert_eq!(component_name("rvo/components/form-field/").unwrap(), "form-field");
        assert!(component_name("..").is_err());
    }
}
