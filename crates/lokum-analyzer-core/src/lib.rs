//! # lokum-analyzer-core
//!
//! Core engine of the Lokum decorator analyzer: discovers classes and
//! methods annotated with the framework decorators (`Service`,
//! `Configuration`, `Provide`, `AppContext`, `Lokum`), enforces their
//! usage rules, and builds the intermediate representation a container
//! generator consumes.
//!
//! The crate provides:
//!
//! - [`ast`] - the language-independent declaration model produced by a
//!   [`SourceExtractor`]
//! - [`DecoratorKind`] - the closed decorator rule set
//! - [`resolve_bindings`] / [`BindingMap`] - per-file import binding
//!   resolution
//! - [`Analyzer`] - orchestration of the per-file pipeline
//! - [`Violation`] - decorator misuse diagnostics
//!
//! ## Example
//!
//! ```ignore
//! use lokum_analyzer_core::{Analyzer, ErrorPolicy};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .package_name("lokum")
//!     .extractor(my_extractor)
//!     .build()?;
//!
//! let report = analyzer.analyze()?;
//! if let Some(violation) = report.first_violation() {
//!     eprintln!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod bindings;
mod checks;
mod class;
mod decorator;
mod diagnostics;
mod method;
mod model;
mod resolver;

pub mod ast;

pub use analyzer::{
    AnalysisReport, Analyzer, AnalyzerBuilder, AnalyzerError, ErrorPolicy, ExtractError,
    SourceExtractor, UnitObserver,
};
pub use bindings::{resolve_bindings, BindingMap, ImportBinding};
pub use decorator::{DecoratorKind, DecoratorTarget};
pub use diagnostics::{Location, Violation, ViolationDiagnostic, ViolationKind};
pub use model::{
    ClassModel, DecoratorApplication, DecoratorArgument, MethodModel, ParameterDescriptor,
    SourceUnit,
};
