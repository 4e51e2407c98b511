//! Method analysis and type descriptor extraction.
//!
//! Methods are never dropped (only undecorated classes are); each one is
//! reduced to its name, asynchrony, optional return-type descriptor, and
//! parameter descriptors. Parameter extraction is shared with
//! constructors.

use std::path::Path;

use crate::ast::{ClassDecl, ParamDecl, TypeExpr, TypeShape};
use crate::bindings::BindingMap;
use crate::diagnostics::Violation;
use crate::model::{DecoratorApplication, MethodModel, ParameterDescriptor};
use crate::resolver::{resolve_applications, DeclSite};

/// Analyzes every method of a class.
pub(crate) fn analyze_methods(
    class: &ClassDecl,
    class_applications: &[DecoratorApplication],
    bindings: &BindingMap,
    file: &Path,
) -> Result<Vec<MethodModel>, Violation> {
    let mut methods = Vec::with_capacity(class.methods.len());

    for method in &class.methods {
        let site = DeclSite::Method {
            class,
            method,
            class_applications,
        };
        let decorators = resolve_applications(&site, &method.decorators, bindings, file)?;

        methods.push(MethodModel {
            name: method.name.clone(),
            is_async: method.is_async,
            return_type: method.return_type.as_ref().and_then(return_descriptor),
            params: parameter_descriptors(&method.params),
            decorators,
        });
    }

    Ok(methods)
}

/// Computes the return-type descriptor of a written annotation.
///
/// Present only for array types (element type text), bare type
/// references (full text), and promise-shaped generics (full text
/// including the wrapper). Everything else, including an absent
/// annotation, yields no descriptor.
fn return_descriptor(ty: &TypeExpr) -> Option<String> {
    match &ty.shape {
        TypeShape::Array { elem } => Some(elem.text.clone()),
        TypeShape::Generic { name, args } if name == "Array" => {
            args.first().map(|arg| arg.text.clone())
        }
        TypeShape::Reference => Some(ty.text.clone()),
        TypeShape::Generic { name, .. } if name == "Promise" => Some(ty.text.clone()),
        _ => None,
    }
}

/// Reduces a parameter list to descriptors, shared by methods and
/// constructors.
pub(crate) fn parameter_descriptors(params: &[ParamDecl]) -> Vec<ParameterDescriptor> {
    params
        .iter()
        .map(|param| ParameterDescriptor {
            name: param.name.clone(),
            type_ref: param.ty.as_ref().and_then(parameter_type_ref),
            is_array: param.ty.as_ref().is_some_and(is_array_like),
            is_rest: param.is_rest,
        })
        .collect()
}

/// Uniform parameter type-reference rule.
///
/// Bracketed arrays contribute their element's reference text; generic
/// `Array<T>` containers contribute the argument text; bare references
/// contribute the referenced name. Primitives, unions, inline object
/// types and other generics contribute nothing.
fn parameter_type_ref(ty: &TypeExpr) -> Option<String> {
    match &ty.shape {
        TypeShape::Array { elem } => match elem.shape {
            TypeShape::Reference | TypeShape::Generic { .. } => Some(elem.text.clone()),
            _ => None,
        },
        TypeShape::Generic { name, args } if name == "Array" => {
            args.first().map(|arg| arg.text.clone())
        }
        TypeShape::Reference => Some(ty.text.clone()),
        _ => None,
    }
}

fn is_array_like(ty: &TypeExpr) -> bool {
    match &ty.shape {
        TypeShape::Array { .. } | TypeShape::Tuple => true,
        TypeShape::Generic { name, .. } => name == "Array",
        _ => false,
    }
}
