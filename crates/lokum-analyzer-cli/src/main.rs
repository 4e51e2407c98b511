//! lokum-analyzer CLI tool.
//!
//! Usage:
//! ```bash
//! lokum-analyzer --folder src
//! lokum-analyzer --folder src --format json
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use lokum_analyzer_core::{Analyzer, ErrorPolicy};
use lokum_analyzer_ts::TypeScriptExtractor;

mod manifest;
mod output;

/// Decorator analyzer for Lokum dependency injection projects
#[derive(Parser)]
#[command(name = "lokum-analyzer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Folder to analyze
    #[arg(short, long)]
    folder: PathBuf,

    /// Path to the project's package.json
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Framework package name (overrides package.json)
    #[arg(short, long)]
    package_name: Option<String>,

    /// Output format
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Exclude patterns (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Report every violation instead of stopping at the first
    #[arg(long)]
    keep_going: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for analysis results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output including the extracted model.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let package_name = manifest::resolve(
        cli.package_name.as_deref(),
        cli.manifest.as_deref(),
        &cli.folder,
    )?;

    tracing::info!(
        "Analyzing {} for decorators of package '{}'",
        cli.folder.display(),
        package_name
    );

    let policy = if cli.keep_going {
        ErrorPolicy::Collect
    } else {
        ErrorPolicy::FailFast
    };

    let analyzer = Analyzer::builder()
        .root(&cli.folder)
        .package_name(package_name)
        .extractor(TypeScriptExtractor::new())
        .excludes(cli.exclude)
        .policy(policy)
        .build()?;

    let report = analyzer.analyze()?;

    output::print(&report, cli.format, &cli.folder)?;

    if report.has_violations() {
        std::process::exit(1);
    }

    Ok(())
}
