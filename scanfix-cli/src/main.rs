use anyhow::Result;
use clap::Parser;
use scanfix::fixtures::{self, FixtureKind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "scanfix",
    about = "Generate synthetic document and image fixtures for bulk scanning E2E tests",
    version
)]
struct Cli {
    /// Output directory for the generated fixtures
    #[arg(short, long, default_value = "documents")]
    output: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    std::fs::create_dir_all(&cli.output)?;
    tracing::debug!("writing fixtures to {}", cli.output.display());

    println!("Creating test files for bulk scanning tests...\n");

    for spec in fixtures::catalog() {
        match spec.kind {
            FixtureKind::MultiPagePdf { .. } => println!("\nCreating multi-page PDF..."),
            FixtureKind::OversizedPdf => println!("\nCreating large PDF (> 1050KB)..."),
            _ => {}
        }

        let generated = spec.generate(&cli.output)?;
        match spec.kind {
            FixtureKind::OversizedPdf => println!(
                "✓ Created: {} ({:.2} KB)",
                generated.path.display(),
                generated.size_kb
            ),
            _ => println!("✓ Created: {}", generated.path.display()),
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("All test files created successfully!");
    println!("{}", "=".repeat(60));

    println!("\nFiles created in: {}", cli.output.display());
    println!("\n{:<30} {:>15}", "Filename", "Size");
    println!("{}", "-".repeat(50));

    for entry in fixtures::manifest(&cli.output)? {
        println!("{:<30} {:>12.2} KB", entry.filename, entry.size_kb);
    }

    Ok(())
}
