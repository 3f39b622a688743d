use anyhow::Result;
use clap::Args;
use colored::Colorize;
use roos_converter::{Config, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Roos project...".bright_blue().bold());

    let config = Config::default();
    fs::write(&config_path, config.to_json()?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Check the paths in {}", DEFAULT_CONFIG_NAME);
    println!("  2. Run: roos-convert convert <component>");
    println!("  3. Review the files in {}/", config.review_dir);

    Ok(())
}
