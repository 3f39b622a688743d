mod commands;
mod progress;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{convert, custom, init, regenerate, ConvertArgs, CustomArgs, InitArgs, RegenerateArgs};
use tracing_subscriber::EnvFilter;

/// Roos - convert RVO React components into Jinja templates
#[derive(Parser, Debug)]
#[command(name = "roos-convert")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default roos.config.json
    Init(InitArgs),

    /// Convert one component and the components it renders
    Convert(ConvertArgs),

    /// Generate a component from a custom JSON definition
    Custom(CustomArgs),

    /// Re-run the conversion of every component with a definition
    Regenerate(RegenerateArgs),
}

impl Command {
    fn verbose(&self) -> bool {
        match self {
            Command::Init(_) => false,
            Command::Convert(args) => args.verbose,
            Command::Custom(args) => args.verbose,
            Command::Regenerate(args) => args.verbose,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let verbose = cli.command.verbose();
    init_logging(verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Convert(args) => convert(args, &cwd),
                Command::Custom(args) => custom(args, &cwd),
                Command::Regenerate(args) => regenerate(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        if verbose {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
        } else {
            eprintln!("{} {}", "Error:".red().bold(), err);
        }
        eprintln!();
        std::process::exit(1);
    }
}
