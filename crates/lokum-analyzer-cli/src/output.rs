//! Shared output formatting for analysis results.

use anyhow::Result;
use miette::NamedSource;
use std::path::Path;

use lokum_analyzer_core::{AnalysisReport, Violation, ViolationDiagnostic};

use crate::OutputFormat;

/// Print an analysis report in the specified format.
///
/// `root` locates the analyzed sources so text output can render
/// violations with source context.
pub fn print(report: &AnalysisReport, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report, root),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(report: &AnalysisReport, root: &Path) {
    for violation in &report.violations {
        print_violation(violation, root);
    }

    let classes: usize = report.units.iter().map(|unit| unit.classes.len()).sum();

    let summary_color = if report.has_violations() {
        "\x1b[31m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} violation(s), {} decorated class(es) in {} file(s)\x1b[0m",
        summary_color,
        report.violations.len(),
        classes,
        report.files_checked
    );
}

/// Renders one violation, with a source snippet when the file is still
/// readable, falling back to the plain location format otherwise.
fn print_violation(violation: &Violation, root: &Path) {
    let path = root.join(&violation.location.file);
    match std::fs::read_to_string(&path) {
        Ok(source) => {
            let diagnostic = ViolationDiagnostic::from(violation);
            let report = miette::Report::new(diagnostic).with_source_code(NamedSource::new(
                violation.location.file.display().to_string(),
                source,
            ));
            eprintln!("{report:?}");
        }
        Err(_) => {
            print!("{}", violation.format());
            println!();
        }
    }
}

fn print_json(report: &AnalysisReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &AnalysisReport) {
    for violation in &report.violations {
        println!("{violation}");
    }
}
