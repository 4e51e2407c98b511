//! Violation types for decorator misuse.

use miette::{Diagnostic, SourceSpan};
use serde::Serialize;
use std::path::PathBuf;

use crate::ast::Span;
use crate::decorator::DecoratorKind;

/// Source code location of a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// File path relative to the analysis root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a location from a file path and a node span.
    #[must_use]
    pub fn new(file: PathBuf, span: Span) -> Self {
        Self {
            file,
            line: span.line,
            column: span.column,
            offset: span.offset,
            length: span.length,
        }
    }
}

/// The fixed decorator misuse taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// Class decorator applied to something that is not a class.
    NotAClass,
    /// Method decorator applied to something that is not a class method.
    NotAMethod,
    /// Decorated class is not exported.
    ClassNotExported,
    /// Decorated class is abstract.
    AbstractClass,
    /// Decorated method is abstract.
    AbstractMethod,
    /// Decorated method is static.
    StaticMethod,
    /// Decorated method is a generator.
    GeneratorMethod,
    /// Decorated class declares more than one constructor.
    MultipleConstructors,
    /// Same decorator applied more than once to one class.
    DuplicateDecorator,
    /// Two different role decorators on the same class.
    ConflictingDecorators,
    /// Decorator invocation carries more than one argument.
    TooManyArguments,
    /// `Lokum` used outside a `Service`/`Configuration` class.
    MissingRoleContext,
}

impl ViolationKind {
    /// Stable violation code (e.g. `"LK003"`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::NotAClass => "LK001",
            Self::NotAMethod => "LK002",
            Self::ClassNotExported => "LK003",
            Self::AbstractClass => "LK004",
            Self::AbstractMethod => "LK005",
            Self::StaticMethod => "LK006",
            Self::GeneratorMethod => "LK007",
            Self::MultipleConstructors => "LK008",
            Self::DuplicateDecorator => "LK009",
            Self::ConflictingDecorators => "LK010",
            Self::TooManyArguments => "LK011",
            Self::MissingRoleContext => "LK012",
        }
    }
}

/// A decorator usage violation found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Which rule of the taxonomy was broken.
    pub kind: ViolationKind,
    /// The decorator whose rule was broken.
    pub decorator: DecoratorKind,
    /// Primary location of the violation.
    pub location: Location,
    /// Enclosing class name, when known.
    pub class: Option<String>,
    /// Method name, for method-level violations.
    pub method: Option<String>,
    /// Conflicting decorator names, for exclusivity/cardinality failures.
    pub conflicts: Vec<&'static str>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(kind: ViolationKind, decorator: DecoratorKind, location: Location) -> Self {
        Self {
            kind,
            decorator,
            location,
            class: None,
            method: None,
            conflicts: Vec::new(),
        }
    }

    /// Attaches the enclosing class name.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Attaches the method name.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Attaches the conflicting decorator names.
    #[must_use]
    pub fn with_conflicts(mut self, conflicts: Vec<&'static str>) -> Self {
        self.conflicts = conflicts;
        self
    }

    /// Stable violation code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Human-readable rule message.
    #[must_use]
    pub fn message(&self) -> String {
        let d = self.decorator.name();
        match self.kind {
            ViolationKind::NotAClass => {
                format!("@{d} can only be applied to a class declaration")
            }
            ViolationKind::NotAMethod => {
                format!("@{d} can only be applied to a class method")
            }
            ViolationKind::ClassNotExported => format!("@{d} requires an exported class"),
            ViolationKind::AbstractClass => {
                format!("@{d} cannot be applied to an abstract class")
            }
            ViolationKind::AbstractMethod => {
                format!("@{d} cannot be applied to an abstract method")
            }
            ViolationKind::StaticMethod => {
                format!("@{d} cannot be applied to a static method")
            }
            ViolationKind::GeneratorMethod => {
                format!("@{d} cannot be applied to a generator method")
            }
            ViolationKind::MultipleConstructors => {
                format!("@{d} class must declare at most one constructor")
            }
            ViolationKind::DuplicateDecorator => {
                format!("@{d} may be applied only once per class")
            }
            ViolationKind::ConflictingDecorators => {
                let joined = self
                    .conflicts
                    .iter()
                    .map(|n| format!("@{n}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("@{d} cannot be combined with {joined}")
            }
            ViolationKind::TooManyArguments => format!("@{d} accepts at most one argument"),
            ViolationKind::MissingRoleContext => format!(
                "@{d} requires an enclosing class decorated with @Service or @Configuration"
            ),
        }
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} at {}:{}:{}\n",
            self.code(),
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  error: {}", self.message());
        if let Some(class) = &self.class {
            let _ = writeln!(output, "  = class: {class}");
        }
        if let Some(method) = &self.method {
            let _ = writeln!(output, "  = method: {method}");
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: error [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.code(),
            self.message()
        )
    }
}

/// Converts a [`Violation`] to a miette [`Diagnostic`] for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        let help = match (&v.class, &v.method) {
            (Some(c), Some(m)) => Some(format!("in method {m} of class {c}")),
            (Some(c), None) => Some(format!("in class {c}")),
            _ => None,
        };
        Self {
            message: format!("[{}] {}", v.code(), v.message()),
            help,
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: format!("@{}", v.decorator.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn here() -> Location {
        Location::new(PathBuf::from("src/app.ts"), Span::new(3, 5, 42, 8))
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ViolationKind::NotAClass.code(), "LK001");
        assert_eq!(ViolationKind::MissingRoleContext.code(), "LK012");
    }

    #[test]
    fn conflict_message_lists_all_names() {
        let v = Violation::new(
            ViolationKind::ConflictingDecorators,
            DecoratorKind::Service,
            here(),
        )
        .with_class("A")
        .with_conflicts(vec!["Configuration", "Provide"]);
        assert_eq!(
            v.message(),
            "@Service cannot be combined with @Configuration, @Provide"
        );
    }

    #[test]
    fn format_includes_class_context() {
        let v = Violation::new(
            ViolationKind::ClassNotExported,
            DecoratorKind::Service,
            here(),
        )
        .with_class("UserService");
        let out = v.format();
        assert!(out.contains("LK003 at src/app.ts:3:5"));
        assert!(out.contains("= class: UserService"));
    }

    #[test]
    fn display_is_one_line() {
        let v = Violation::new(ViolationKind::StaticMethod, DecoratorKind::Lokum, here())
            .with_class("A")
            .with_method("run");
        assert_eq!(
            format!("{v}"),
            "src/app.ts:3:5: error [LK006] @Lokum cannot be applied to a static method"
        );
    }

    #[test]
    fn diagnostic_help_names_method_and_class() {
        let v = Violation::new(ViolationKind::AbstractMethod, DecoratorKind::Lokum, here())
            .with_class("A")
            .with_method("run");
        let d = ViolationDiagnostic::from(&v);
        assert!(format!("{d}").contains("LK005"));
    }
}
