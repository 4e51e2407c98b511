//! Decorator application resolution.
//!
//! Matches written annotations against a file's import bindings,
//! validates each match against its rule, and extracts any decorator
//! argument. Annotations that resolve to no binding are unrelated and
//! are skipped silently.

use std::path::Path;

use crate::ast::{ClassDecl, DecoratorArg, DecoratorNode, MethodDecl};
use crate::bindings::{BindingMap, ImportBinding};
use crate::decorator::{DecoratorKind, DecoratorTarget};
use crate::diagnostics::{Location, Violation, ViolationKind};
use crate::model::{DecoratorApplication, DecoratorArgument};

/// Declaration the annotations under resolution are attached to.
pub(crate) enum DeclSite<'a> {
    /// A class declaration.
    Class(&'a ClassDecl),
    /// A method, together with its enclosing class and that class's
    /// already-resolved class-level applications.
    Method {
        class: &'a ClassDecl,
        method: &'a MethodDecl,
        class_applications: &'a [DecoratorApplication],
    },
}

impl DeclSite<'_> {
    fn class_name(&self) -> &str {
        match self {
            DeclSite::Class(class) | DeclSite::Method { class, .. } => &class.name,
        }
    }

    fn method_name(&self) -> Option<&str> {
        match self {
            DeclSite::Class(_) => None,
            DeclSite::Method { method, .. } => Some(&method.name),
        }
    }
}

/// Resolves the framework decorator applications of one declaration.
///
/// Annotations are visited in source order. Each one that matches a
/// binding is validated against the applications already accumulated
/// for this declaration, then appended with its extracted argument.
pub(crate) fn resolve_applications(
    site: &DeclSite<'_>,
    decorators: &[DecoratorNode],
    bindings: &BindingMap,
    file: &Path,
) -> Result<Vec<DecoratorApplication>, Violation> {
    let mut applications = Vec::new();

    for decorator in decorators {
        let Some(binding) = match_binding(decorator, bindings) else {
            continue;
        };
        let kind = binding.kind;
        let location = Location::new(file.to_path_buf(), decorator.span);

        validate(kind, site, &applications, &location)?;
        let argument = read_argument(kind, &decorator.args, site, &location)?;

        applications.push(DecoratorApplication {
            binding: binding.clone(),
            argument,
            location,
        });
    }

    Ok(applications)
}

/// Finds the binding a written annotation refers to, if any.
///
/// Namespace-qualified usage is matched structurally: the written
/// namespace object must equal the binding's namespace and the written
/// name must be the decorator's own name. Plain usage matches either a
/// binding's alias or the decorator's own name.
fn match_binding<'a>(
    decorator: &DecoratorNode,
    bindings: &'a BindingMap,
) -> Option<&'a ImportBinding> {
    let mut all = bindings.iter().flat_map(|(_, list)| list.iter());

    match &decorator.namespace {
        Some(namespace) => all.find(|binding| {
            binding.namespace.as_deref() == Some(namespace.as_str())
                && binding.kind.name() == decorator.name
        }),
        None => all.find(|binding| {
            binding.alias.as_deref() == Some(decorator.name.as_str())
                || binding.kind.name() == decorator.name
        }),
    }
}

fn validate(
    kind: DecoratorKind,
    site: &DeclSite<'_>,
    accumulated: &[DecoratorApplication],
    location: &Location,
) -> Result<(), Violation> {
    match (kind.target(), site) {
        (DecoratorTarget::Class, DeclSite::Class(class)) => {
            kind.validate_class(class, accumulated, location)
        }
        (DecoratorTarget::Method, DeclSite::Method { class, method, class_applications }) => {
            kind.validate_method(method, class, class_applications, location)
        }
        (DecoratorTarget::Class, DeclSite::Method { class, method, .. }) => Err(Violation::new(
            ViolationKind::NotAClass,
            kind,
            location.clone(),
        )
        .with_class(&class.name)
        .with_method(&method.name)),
        (DecoratorTarget::Method, DeclSite::Class(class)) => Err(Violation::new(
            ViolationKind::NotAMethod,
            kind,
            location.clone(),
        )
        .with_class(&class.name)),
    }
}

/// Extracts the optional decorator argument.
///
/// Zero arguments yield no descriptor; a single string literal yields
/// its text as qualifier; a single object literal is scanned for a
/// string-valued `qualifier` property; any other single-argument shape
/// yields no descriptor. More than one argument is a violation.
fn read_argument(
    kind: DecoratorKind,
    args: &[DecoratorArg],
    site: &DeclSite<'_>,
    location: &Location,
) -> Result<Option<DecoratorArgument>, Violation> {
    if args.len() > 1 {
        let mut violation =
            Violation::new(ViolationKind::TooManyArguments, kind, location.clone())
                .with_class(site.class_name());
        if let Some(method) = site.method_name() {
            violation = violation.with_method(method);
        }
        return Err(violation);
    }

    let qualifier = match args.first() {
        None | Some(DecoratorArg::Other) => None,
        Some(DecoratorArg::Str(text)) => Some(text.clone()),
        Some(DecoratorArg::Object(properties)) => properties
            .iter()
            .find(|property| property.name == "qualifier")
            .and_then(|property| property.string_value.clone()),
    };

    Ok(qualifier.map(|qualifier| DecoratorArgument { qualifier }))
}
