//! The intermediate representation consumed by the container generator.
//!
//! Values here are produced once per analysis run and never mutated
//! afterwards; everything is `Serialize` so the CLI can emit the tree
//! as JSON.

use serde::Serialize;
use std::path::PathBuf;

use crate::bindings::{BindingMap, ImportBinding};
use crate::decorator::DecoratorKind;
use crate::diagnostics::Location;

/// Analysis result for one source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceUnit {
    /// File path relative to the analysis root.
    pub path: PathBuf,
    /// Decorator import bindings of the file.
    pub bindings: BindingMap,
    /// Retained classes in declaration order. Classes with no resolved
    /// decorator application do not appear.
    pub classes: Vec<ClassModel>,
}

/// Metadata for one decorated class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassModel {
    /// Class name.
    pub name: String,
    /// Path of the declaring file.
    pub file: PathBuf,
    /// Whether the class is exported.
    pub is_exported: bool,
    /// Whether the class is abstract.
    pub is_abstract: bool,
    /// Implemented interface names.
    pub implements: Vec<String>,
    /// Constructor parameters; `None` when the class has no constructor.
    pub constructor_params: Option<Vec<ParameterDescriptor>>,
    /// Class-level decorator applications in source order.
    pub decorators: Vec<DecoratorApplication>,
    /// Method metadata in declaration order.
    pub methods: Vec<MethodModel>,
}

/// Metadata for one method of a decorated class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodModel {
    /// Method name.
    pub name: String,
    /// Whether the method is `async`.
    pub is_async: bool,
    /// Return-type descriptor; present only for array, class/interface,
    /// or promise-shaped return annotations.
    pub return_type: Option<String>,
    /// Parameter descriptors in declaration order.
    pub params: Vec<ParameterDescriptor>,
    /// Method-level decorator applications in source order.
    pub decorators: Vec<DecoratorApplication>,
}

/// Metadata for one parameter of a method or constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    /// Parameter name.
    pub name: String,
    /// Referenced type name, when the written type resolves to a local
    /// class/interface reference (directly or as an array element).
    pub type_ref: Option<String>,
    /// True for array or tuple types.
    pub is_array: bool,
    /// True for rest parameters.
    pub is_rest: bool,
}

/// One resolved decorator application on a class or method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecoratorApplication {
    /// The import binding the written annotation resolved through.
    pub binding: ImportBinding,
    /// Extracted decorator argument, if one was present and well-shaped.
    pub argument: Option<DecoratorArgument>,
    /// Source location of the annotation.
    pub location: Location,
}

impl DecoratorApplication {
    /// The decorator this application refers to.
    #[must_use]
    pub fn kind(&self) -> DecoratorKind {
        self.binding.kind
    }

    /// The framework-defined decorator name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.binding.kind.name()
    }
}

/// Extracted decorator argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecoratorArgument {
    /// Qualifier string used downstream to disambiguate implementations.
    pub qualifier: String,
}
