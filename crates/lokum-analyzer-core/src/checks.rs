//! Shared rule predicates composed by the decorator rules.
//!
//! Every predicate checks one condition and reports the first unmet one
//! as a [`Violation`] carrying the decorator, location, and declaration
//! context. Predicates never recover or continue past a failure.

use crate::ast::{ClassDecl, MethodDecl};
use crate::decorator::DecoratorKind;
use crate::diagnostics::{Location, Violation, ViolationKind};
use crate::model::DecoratorApplication;

pub(crate) fn exported_class(
    kind: DecoratorKind,
    class: &ClassDecl,
    location: &Location,
) -> Result<(), Violation> {
    if class.is_exported {
        Ok(())
    } else {
        Err(
            Violation::new(ViolationKind::ClassNotExported, kind, location.clone())
                .with_class(&class.name),
        )
    }
}

pub(crate) fn not_abstract_class(
    kind: DecoratorKind,
    class: &ClassDecl,
    location: &Location,
) -> Result<(), Violation> {
    if class.is_abstract {
        Err(
            Violation::new(ViolationKind::AbstractClass, kind, location.clone())
                .with_class(&class.name),
        )
    } else {
        Ok(())
    }
}

pub(crate) fn at_most_one_constructor(
    kind: DecoratorKind,
    class: &ClassDecl,
    location: &Location,
) -> Result<(), Violation> {
    if class.constructors.len() > 1 {
        Err(
            Violation::new(ViolationKind::MultipleConstructors, kind, location.clone())
                .with_class(&class.name),
        )
    } else {
        Ok(())
    }
}

/// No already-resolved sibling may carry the same decorator.
pub(crate) fn used_at_most_once(
    kind: DecoratorKind,
    siblings: &[DecoratorApplication],
    class: &ClassDecl,
    location: &Location,
) -> Result<(), Violation> {
    if siblings.iter().any(|app| app.kind() == kind) {
        Err(
            Violation::new(ViolationKind::DuplicateDecorator, kind, location.clone())
                .with_class(&class.name)
                .with_conflicts(vec![kind.name()]),
        )
    } else {
        Ok(())
    }
}

/// No already-resolved sibling may carry a different decorator.
pub(crate) fn used_exclusively(
    kind: DecoratorKind,
    siblings: &[DecoratorApplication],
    class: &ClassDecl,
    location: &Location,
) -> Result<(), Violation> {
    let conflicts: Vec<&'static str> = siblings
        .iter()
        .filter(|app| app.kind() != kind)
        .map(|app| app.kind().name())
        .collect();
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(
            Violation::new(ViolationKind::ConflictingDecorators, kind, location.clone())
                .with_class(&class.name)
                .with_conflicts(conflicts),
        )
    }
}

pub(crate) fn not_abstract_method(
    kind: DecoratorKind,
    method: &MethodDecl,
    class: &ClassDecl,
    location: &Location,
) -> Result<(), Violation> {
    if method.is_abstract {
        Err(
            Violation::new(ViolationKind::AbstractMethod, kind, location.clone())
                .with_class(&class.name)
                .with_method(&method.name),
        )
    } else {
        Ok(())
    }
}

pub(crate) fn not_static_method(
    kind: DecoratorKind,
    method: &MethodDecl,
    class: &ClassDecl,
    location: &Location,
) -> Result<(), Violation> {
    if method.is_static {
        Err(
            Violation::new(ViolationKind::StaticMethod, kind, location.clone())
                .with_class(&class.name)
                .with_method(&method.name),
        )
    } else {
        Ok(())
    }
}

pub(crate) fn not_generator_method(
    kind: DecoratorKind,
    method: &MethodDecl,
    class: &ClassDecl,
    location: &Location,
) -> Result<(), Violation> {
    if method.is_generator {
        Err(
            Violation::new(ViolationKind::GeneratorMethod, kind, location.clone())
                .with_class(&class.name)
                .with_method(&method.name),
        )
    } else {
        Ok(())
    }
}

/// The enclosing class must already carry a role application that
/// supports entry point methods (`Service` or `Configuration`).
pub(crate) fn enclosing_class_has_role(
    kind: DecoratorKind,
    method: &MethodDecl,
    class: &ClassDecl,
    class_applications: &[DecoratorApplication],
    location: &Location,
) -> Result<(), Violation> {
    if class_applications
        .iter()
        .any(|app| app.kind().satisfies_lokum())
    {
        Ok(())
    } else {
        Err(
            Violation::new(ViolationKind::MissingRoleContext, kind, location.clone())
                .with_class(&class.name)
                .with_method(&method.name),
        )
    }
}
