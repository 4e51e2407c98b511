//! # lokum-analyzer-ts
//!
//! Tree-sitter based TypeScript extraction for the Lokum decorator
//! analyzer.
//!
//! This crate implements the core engine's
//! [`SourceExtractor`](lokum_analyzer_core::SourceExtractor) boundary
//! for TypeScript: it parses source text with `tree-sitter-typescript`
//! and reduces the syntax tree to the declaration model in
//! `lokum_analyzer_core::ast`. Grammar node kinds stay inside this
//! crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod typeexpr;
mod typescript;

pub use typescript::TypeScriptExtractor;
