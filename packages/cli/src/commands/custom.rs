use crate::progress::ConsoleProgress;
use anyhow::Result;
use clap::Args;
use roos_common::RealFileSystem;
use roos_converter::{Config, ConvertOptions, Converter};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct CustomArgs {
    /// Custom component definition (JSON)
    pub definition: PathBuf,

    /// Output name (defaults to the definition's name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Debug logging and full error chains
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn custom(args: CustomArgs, cwd: &str) -> Result<()> {
    let fs = RealFileSystem;
    let root = Path::new(cwd);
    let config = Config::load(root, &fs)?;
    let definition = root.join(&args.definition);

    let options = ConvertOptions {
        output_name: args.name,
        ..Default::default()
    };

    let progress = ConsoleProgress::new(cwd);
    let converter = Converter::new(root, config, &fs, &progress)?;
    converter.convert_custom(&definition, &options)?;
    Ok(())
}
