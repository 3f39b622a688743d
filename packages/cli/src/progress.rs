use colored::Colorize;
use roos_converter::{ConversionSummary, NestedOutcome, Progress};
use std::path::Path;

/// Prints the conversion trace to stdout
pub struct ConsoleProgress {
    root: String,
}

impl ConsoleProgress {
    pub fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
        }
    }

    fn display(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

impl Progress for ConsoleProgress {
    fn start(&self, component: &str, output_name: &str, aliases: &[String]) {
        println!();
        println!(
            "{} {}",
            "🔄 Converting component:".bright_blue().bold(),
            component.bright_white()
        );
        if output_name != component {
            println!("   Output name: {}", output_name);
        }
        if !aliases.is_empty() {
            println!("   Aliases: {}", aliases.join(", "));
        }
        println!("{}", "=".repeat(60));
    }

    fn step(&self, title: &str) {
        println!();
        println!("{}", title);
    }

    fn ok(&self, message: &str) {
        println!("   {} {}", "✓".green(), message);
    }

    fn info(&self, message: &str) {
        println!("   {} {}", "ℹ".bright_blue(), message);
    }

    fn warn(&self, message: &str) {
        println!("   {} {}", "⚠".yellow(), message.yellow());
    }

    fn finish(&self, summary: &ConversionSummary) {
        println!();
        println!("{}", "=".repeat(60));
        println!("{}", "✅ Conversion complete!".green().bold());
        println!();
        println!("   Automation: {}%", summary.automation);
        println!("   Manual review items: {}", summary.review_items);
        for nested in &summary.nested {
            match nested {
                NestedOutcome::Converted(name) => {
                    println!("   {} Nested: {} (converted)", "✓".green(), name)
                }
                NestedOutcome::Existing(name) => {
                    println!("   {} Nested: {} (already converted)", "ℹ".bright_blue(), name)
                }
                NestedOutcome::Failed { name, .. } => {
                    println!("   {} Nested: {} (failed)", "✗".red(), name)
                }
            }
        }
        println!();
        println!("📦 Output files:");
        println!("   Template:   {}", self.display(&summary.template));
        println!("   Definition: {}", self.display(&summary.definition));
        println!("   Review:     {}", self.display(&summary.review));
    }
}
