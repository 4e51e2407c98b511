//! Language-independent declaration model.
//!
//! This is the boundary between the analysis engine and the source parser:
//! an extractor (see [`crate::SourceExtractor`]) produces these values from
//! raw source text, and everything downstream operates on them. Grammar
//! node kinds never leak past this module; shapes are discriminated by
//! named enums.

use serde::Serialize;
use std::path::PathBuf;

/// Position and byte extent of a node within its source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
    /// Length of the node in bytes.
    pub length: usize,
}

impl Span {
    /// Creates a span from explicit values.
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            line,
            column,
            offset,
            length,
        }
    }
}

/// One parsed source file, as handed to the engine.
#[derive(Debug, Clone, Default)]
pub struct SourceFileAst {
    /// Path of the file, relative to the analysis root.
    pub path: PathBuf,
    /// Import declarations in source order.
    pub imports: Vec<ImportDecl>,
    /// Class declarations in source order.
    pub classes: Vec<ClassDecl>,
}

/// An import declaration.
///
/// A declaration is either a namespace import (`import * as X from m`) or
/// carries named specifiers (`import { A, B as C } from m`); default-only
/// imports have neither.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    /// Module specifier, with quotes stripped.
    pub module: String,
    /// Namespace binding name for `import * as X`.
    pub namespace: Option<String>,
    /// Named specifiers in declaration order.
    pub named: Vec<NamedSpecifier>,
    /// Source location of the declaration.
    pub span: Span,
}

/// One named import specifier.
#[derive(Debug, Clone)]
pub struct NamedSpecifier {
    /// Imported name as written in the exporting module.
    pub name: String,
    /// Local alias, if the specifier uses `as`.
    pub alias: Option<String>,
}

/// A class declaration with the members the engine cares about.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    /// Class name.
    pub name: String,
    /// Whether the class is exported.
    pub is_exported: bool,
    /// Whether the class is declared `abstract`.
    pub is_abstract: bool,
    /// Implemented interface names, in declaration order.
    pub implements: Vec<String>,
    /// Annotations attached to the class, in source order.
    pub decorators: Vec<DecoratorNode>,
    /// Constructor declarations. More than one is representable here;
    /// the rules decide whether that is a violation.
    pub constructors: Vec<ConstructorDecl>,
    /// Methods in declaration order, excluding constructors.
    pub methods: Vec<MethodDecl>,
    /// Source location of the declaration.
    pub span: Span,
}

/// A constructor declaration.
#[derive(Debug, Clone)]
pub struct ConstructorDecl {
    /// Constructor parameters in declaration order.
    pub params: Vec<ParamDecl>,
    /// Source location of the declaration.
    pub span: Span,
}

/// A method declaration.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    /// Method name.
    pub name: String,
    /// `async` modifier.
    pub is_async: bool,
    /// `static` modifier.
    pub is_static: bool,
    /// `abstract` modifier.
    pub is_abstract: bool,
    /// Generator marker (`*`).
    pub is_generator: bool,
    /// Annotations attached to the method, in source order.
    pub decorators: Vec<DecoratorNode>,
    /// Parameters in declaration order.
    pub params: Vec<ParamDecl>,
    /// Written return type annotation, if any.
    pub return_type: Option<TypeExpr>,
    /// Source location of the declaration.
    pub span: Span,
}

/// A parameter of a method or constructor.
#[derive(Debug, Clone)]
pub struct ParamDecl {
    /// Parameter name.
    pub name: String,
    /// Whether this is a rest parameter (`...args`).
    pub is_rest: bool,
    /// Written type annotation, if any.
    pub ty: Option<TypeExpr>,
    /// Source location of the parameter.
    pub span: Span,
}

/// An annotation as written on a class or method.
///
/// `@Service`, `@Service("db")` and `@ns.Service` all surface here with
/// `name = "Service"`; the namespace object, when present, is recorded
/// separately so binding resolution can match it structurally.
#[derive(Debug, Clone)]
pub struct DecoratorNode {
    /// Written decorator name (the rightmost identifier).
    pub name: String,
    /// Namespace object name for `@ns.Name` usage.
    pub namespace: Option<String>,
    /// Call arguments; absent entirely for bare `@Name` usage.
    pub args: Vec<DecoratorArg>,
    /// Source location of the annotation.
    pub span: Span,
}

/// Shape of a single decorator call argument.
#[derive(Debug, Clone)]
pub enum DecoratorArg {
    /// A string literal, with quotes stripped.
    Str(String),
    /// An object literal, reduced to its named properties.
    Object(Vec<ObjectProperty>),
    /// Any other expression shape; carries no extractable metadata.
    Other,
}

/// A named property of an object-literal decorator argument.
#[derive(Debug, Clone)]
pub struct ObjectProperty {
    /// Property name.
    pub name: String,
    /// Initializer text when the initializer is a string literal.
    pub string_value: Option<String>,
}

/// A written type annotation, reduced to the shapes the engine needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    /// Full written text of the type.
    pub text: String,
    /// Discriminated shape.
    pub shape: TypeShape,
}

/// Syntactic shape of a type annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// A predefined primitive (`string`, `number`, `boolean`, ...).
    Predefined,
    /// A bare type reference (`Foo`).
    Reference,
    /// A generic type reference (`Foo<T>`); `name` is the wrapper name.
    Generic {
        /// Referenced wrapper name.
        name: String,
        /// Type arguments in written order.
        args: Vec<TypeExpr>,
    },
    /// A bracketed array type (`T[]`).
    Array {
        /// Element type.
        elem: Box<TypeExpr>,
    },
    /// A tuple type (`[A, B]`).
    Tuple,
    /// Anything else (unions, inline object types, literals, ...).
    Other,
}

impl TypeExpr {
    /// A bare type reference.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            text: name.into(),
            shape: TypeShape::Reference,
        }
    }

    /// A predefined primitive type.
    #[must_use]
    pub fn predefined(name: impl Into<String>) -> Self {
        Self {
            text: name.into(),
            shape: TypeShape::Predefined,
        }
    }

    /// A bracketed array of the given element type.
    #[must_use]
    pub fn array(elem: TypeExpr) -> Self {
        Self {
            text: format!("{}[]", elem.text),
            shape: TypeShape::Array {
                elem: Box::new(elem),
            },
        }
    }

    /// A generic reference such as `Array<T>` or `Promise<T>`.
    #[must_use]
    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        let name = name.into();
        let rendered = args
            .iter()
            .map(|a| a.text.clone())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            text: format!("{name}<{rendered}>"),
            shape: TypeShape::Generic { name, args },
        }
    }
}
