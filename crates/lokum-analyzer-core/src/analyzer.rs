//! Analysis orchestration.
//!
//! The [`Analyzer`] discovers source files under a root, runs the
//! extractor on each, resolves bindings and classes, and assembles an
//! [`AnalysisReport`]. Rule violations are values in the report; the
//! engine never terminates the process.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ast::SourceFileAst;
use crate::bindings::resolve_bindings;
use crate::class::analyze_class;
use crate::diagnostics::Violation;
use crate::model::SourceUnit;

/// Errors that can occur while producing the declaration model.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The underlying parser could not be initialized or run.
    #[error("parser error: {0}")]
    Parser(String),
}

/// Produces the declaration model for one source file.
///
/// Implementations wrap a concrete parser; the engine stays agnostic of
/// grammar details.
pub trait SourceExtractor: Send + Sync {
    /// Language identifier (e.g. `"typescript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g. `&[".ts"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extracts the declaration model from source text.
    ///
    /// # Errors
    ///
    /// Returns an error when the parser cannot process the input.
    fn extract(&self, source: &str) -> Result<SourceFileAst, ExtractError>;
}

/// How the analyzer reacts to rule violations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop at the first violation; the report carries that single
    /// violation and no units.
    #[default]
    FailFast,
    /// Record every violation, drop the offending class, and continue
    /// with the remaining classes and files.
    Collect,
}

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// The builder was not given a source extractor.
    #[error("analyzer requires a source extractor")]
    MissingExtractor,
}

/// Result of one analysis run.
#[derive(Debug, Default, Serialize)]
pub struct AnalysisReport {
    /// Per-file analysis results, in discovery order.
    pub units: Vec<SourceUnit>,
    /// Rule violations found. Under [`ErrorPolicy::FailFast`] this holds
    /// at most one entry.
    pub violations: Vec<Violation>,
    /// Number of files processed.
    pub files_checked: usize,
}

impl AnalysisReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the run found any rule violation.
    #[must_use]
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// The first violation, in file/source order, if any.
    #[must_use]
    pub fn first_violation(&self) -> Option<&Violation> {
        self.violations.first()
    }
}

/// Observer invoked with each completed source unit.
pub type UnitObserver = Box<dyn Fn(&SourceUnit) + Send + Sync>;

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    package_name: Option<String>,
    extractor: Option<Box<dyn SourceExtractor>>,
    exclude_patterns: Vec<String>,
    policy: ErrorPolicy,
    on_unit: Option<UnitObserver>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the framework package name import specifiers must reference.
    #[must_use]
    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    /// Sets the source extractor.
    #[must_use]
    pub fn extractor<E: SourceExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractor = Some(Box::new(extractor));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the violation handling policy (default: fail fast).
    #[must_use]
    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Registers an observer invoked with each completed unit.
    #[must_use]
    pub fn on_unit(mut self, observer: UnitObserver) -> Self {
        self.on_unit = Some(observer);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error when no extractor was configured or the root
    /// cannot be resolved.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let extractor = self.extractor.ok_or(AnalyzerError::MissingExtractor)?;

        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        if exclude_patterns.is_empty() {
            exclude_patterns.push("**/node_modules/**".to_string());
        }

        Ok(Analyzer {
            root,
            package_name: self.package_name.unwrap_or_default(),
            extractor,
            exclude_patterns,
            policy: self.policy,
            on_unit: self.on_unit,
        })
    }
}

/// The main analyzer that orchestrates decorator analysis.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    package_name: String,
    extractor: Box<dyn SourceExtractor>,
    exclude_patterns: Vec<String>,
    policy: ErrorPolicy,
    on_unit: Option<UnitObserver>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configured framework package name.
    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Analyzes all files under the root and returns the report.
    ///
    /// Files are processed in discovery order. Under
    /// [`ErrorPolicy::FailFast`] the run stops at the first violation
    /// and the report carries no partial units.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery, reading, or parsing fails.
    pub fn analyze(&self) -> Result<AnalysisReport, AnalyzerError> {
        info!(
            "Starting analysis at {:?} for package {:?}",
            self.root, self.package_name
        );

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let mut report = AnalysisReport::new();

        for file_path in &files {
            let source = std::fs::read_to_string(file_path)?;
            let mut ast =
                self.extractor
                    .extract(&source)
                    .map_err(|e| AnalyzerError::Parse {
                        path: file_path.clone(),
                        message: e.to_string(),
                    })?;
            ast.path = file_path
                .strip_prefix(&self.root)
                .map_or_else(|_| file_path.clone(), Path::to_path_buf);

            report.files_checked += 1;
            let stop = self.analyze_file(&ast, &mut report);
            if stop {
                warn!(
                    "Stopping analysis: rule violation in {}",
                    ast.path.display()
                );
                report.units.clear();
                return Ok(report);
            }
        }

        info!(
            "Analysis complete: {} classes in {} files, {} violation(s)",
            report.units.iter().map(|u| u.classes.len()).sum::<usize>(),
            report.files_checked,
            report.violations.len()
        );

        Ok(report)
    }

    /// Analyzes one file into the report. Returns true when the run
    /// must stop (fail-fast violation).
    fn analyze_file(&self, ast: &SourceFileAst, report: &mut AnalysisReport) -> bool {
        debug!("Analyzing: {}", ast.path.display());

        let bindings = resolve_bindings(ast, &self.package_name);
        let mut classes = Vec::new();

        for class in &ast.classes {
            match analyze_class(class, &bindings, &ast.path) {
                Ok(Some(model)) => classes.push(model),
                Ok(None) => {}
                Err(violation) => {
                    report.violations.push(violation);
                    if self.policy == ErrorPolicy::FailFast {
                        return true;
                    }
                }
            }
        }

        let unit = SourceUnit {
            path: ast.path.clone(),
            bindings,
            classes,
        };
        if let Some(observer) = &self.on_unit {
            observer(&unit);
        }
        report.units.push(unit);
        false
    }

    /// Discovers all source files to analyze, in sorted order.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut files = Vec::new();

        for extension in self.extractor.extensions() {
            let pattern = format!("{}/**/*{extension}", self.root.display());
            for entry in glob::glob(&pattern)? {
                let path = entry.map_err(|e| AnalyzerError::Io(e.into_error()))?;

                if self.should_exclude(&path) {
                    debug!("Excluding: {}", path.display());
                    continue;
                }

                files.push(path);
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/node_modules/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }
}
