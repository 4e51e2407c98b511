//! Class analysis.
//!
//! Produces a [`ClassModel`] for every class carrying at least one
//! resolved decorator application; classes with none are ordinary
//! classes unrelated to the framework and are silently dropped.

use std::path::Path;
use tracing::debug;

use crate::ast::ClassDecl;
use crate::bindings::BindingMap;
use crate::diagnostics::Violation;
use crate::method::{analyze_methods, parameter_descriptors};
use crate::model::ClassModel;
use crate::resolver::{resolve_applications, DeclSite};

/// Analyzes one class declaration.
///
/// Returns `Ok(None)` when the class carries no framework decorator.
pub(crate) fn analyze_class(
    class: &ClassDecl,
    bindings: &BindingMap,
    file: &Path,
) -> Result<Option<ClassModel>, Violation> {
    let decorators =
        resolve_applications(&DeclSite::Class(class), &class.decorators, bindings, file)?;

    if decorators.is_empty() {
        debug!("Skipping undecorated class {}", class.name);
        return Ok(None);
    }

    let constructor_params = class
        .constructors
        .first()
        .map(|constructor| parameter_descriptors(&constructor.params));

    let methods = analyze_methods(class, &decorators, bindings, file)?;

    Ok(Some(ClassModel {
        name: class.name.clone(),
        file: file.to_path_buf(),
        is_exported: class.is_exported,
        is_abstract: class.is_abstract,
        implements: class.implements.clone(),
        constructor_params,
        decorators,
        methods,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        ConstructorDecl, DecoratorNode, ImportDecl, MethodDecl, NamedSpecifier, ParamDecl,
        SourceFileAst, Span, TypeExpr,
    };
    use crate::bindings::resolve_bindings;
    use crate::decorator::DecoratorKind;
    use crate::diagnostics::ViolationKind;
    use std::path::PathBuf;

    const PKG: &str = "lokum";

    fn bindings() -> BindingMap {
        resolve_bindings(
            &SourceFileAst {
                path: PathBuf::from("test.ts"),
                imports: vec![ImportDecl {
                    module: PKG.to_owned(),
                    namespace: Some("namespaced".to_owned()),
                    named: vec![],
                    span: Span::default(),
                }],
                classes: vec![],
            },
            PKG,
        )
    }

    fn decorator(name: &str) -> DecoratorNode {
        DecoratorNode {
            name: name.to_owned(),
            namespace: None,
            args: vec![],
            span: Span::default(),
        }
    }

    fn method(name: &str, decorators: Vec<DecoratorNode>) -> MethodDecl {
        MethodDecl {
            name: name.to_owned(),
            is_async: false,
            is_static: false,
            is_abstract: false,
            is_generator: false,
            decorators,
            params: vec![],
            return_type: None,
            span: Span::default(),
        }
    }

    fn service_class(name: &str) -> ClassDecl {
        ClassDecl {
            name: name.to_owned(),
            is_exported: true,
            is_abstract: false,
            implements: vec![],
            decorators: vec![decorator("Service")],
            constructors: vec![],
            methods: vec![],
            span: Span::default(),
        }
    }

    #[test]
    fn undecorated_class_is_dropped() {
        let mut class = service_class("Plain");
        class.decorators.clear();
        let result = analyze_class(&class, &bindings(), Path::new("a.ts")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn decorated_class_produces_model() {
        let mut class = service_class("UserService");
        class.implements = vec!["UserPort".to_owned()];
        class.methods.push(method("hello", vec![decorator("Lokum")]));

        let model = analyze_class(&class, &bindings(), Path::new("src/user.ts"))
            .unwrap()
            .expect("class should be retained");

        assert_eq!(model.name, "UserService");
        assert_eq!(model.file, PathBuf::from("src/user.ts"));
        assert!(model.is_exported);
        assert_eq!(model.implements, vec!["UserPort"]);
        assert_eq!(model.constructor_params, None);
        assert_eq!(model.decorators.len(), 1);
        assert_eq!(model.decorators[0].kind(), DecoratorKind::Service);

        assert_eq!(model.methods.len(), 1);
        let hello = &model.methods[0];
        assert_eq!(hello.name, "hello");
        assert!(!hello.is_async);
        assert_eq!(hello.return_type, None);
        assert_eq!(hello.decorators.len(), 1);
        assert_eq!(hello.decorators[0].name(), "Lokum");
    }

    #[test]
    fn undecorated_methods_are_kept() {
        let mut class = service_class("A");
        class.methods.push(method("plain", vec![]));
        let model = analyze_class(&class, &bindings(), Path::new("a.ts"))
            .unwrap()
            .expect("retained");
        assert_eq!(model.methods.len(), 1);
        assert!(model.methods[0].decorators.is_empty());
    }

    #[test]
    fn constructor_params_are_extracted() {
        let mut class = service_class("A");
        class.constructors.push(ConstructorDecl {
            params: vec![ParamDecl {
                name: "repos".to_owned(),
                is_rest: false,
                ty: Some(TypeExpr::array(TypeExpr::reference("Repository"))),
                span: Span::default(),
            }],
            span: Span::default(),
        });

        let model = analyze_class(&class, &bindings(), Path::new("a.ts"))
            .unwrap()
            .expect("retained");
        let params = model.constructor_params.expect("constructor present");
        assert_eq!(params[0].type_ref.as_deref(), Some("Repository"));
        assert!(params[0].is_array);
    }

    #[test]
    fn lokum_under_app_context_fails() {
        let mut class = service_class("A");
        class.decorators = vec![decorator("AppContext")];
        class.methods.push(method("hello", vec![decorator("Lokum")]));

        let err = analyze_class(&class, &bindings(), Path::new("a.ts")).unwrap_err();
        assert_eq!(err.kind, ViolationKind::MissingRoleContext);
        assert_eq!(err.decorator, DecoratorKind::Lokum);
    }

    #[test]
    fn analysis_is_idempotent() {
        let mut class = service_class("A");
        class.methods.push(method("hello", vec![decorator("Lokum")]));
        let bindings = bindings();

        let first = analyze_class(&class, &bindings, Path::new("a.ts")).unwrap();
        let second = analyze_class(&class, &bindings, Path::new("a.ts")).unwrap();
        assert_eq!(first, second);
    }
}
