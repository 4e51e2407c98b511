//! TypeScript language extractor using Tree-sitter.

use tree_sitter::{Language, Node, Parser};

use lokum_analyzer_core::ast::{
    ClassDecl, ConstructorDecl, DecoratorArg, DecoratorNode, ImportDecl, MethodDecl,
    NamedSpecifier, ObjectProperty, ParamDecl, SourceFileAst, Span,
};
use lokum_analyzer_core::{ExtractError, SourceExtractor};

use crate::typeexpr;

/// Extracts imports and decorated class declarations from TypeScript source.
pub struct TypeScriptExtractor {
    language: Language,
}

impl TypeScriptExtractor {
    /// Creates a new TypeScript extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        typeexpr::text(node, src)
    }

    fn span(node: &Node<'_>) -> Span {
        Span::new(
            node.start_position().row + 1,
            node.start_position().column + 1,
            node.start_byte(),
            node.end_byte() - node.start_byte(),
        )
    }

    /// String literal content with surrounding quotes stripped.
    fn string_content(node: &Node<'_>, src: &[u8]) -> String {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .filter(|c| c.kind() == "string_fragment")
            .map(|c| Self::text(&c, src).to_owned())
            .collect()
    }

    fn extract_import(node: &Node<'_>, src: &[u8]) -> Option<ImportDecl> {
        let source = node.child_by_field_name("source")?;
        let module = Self::string_content(&source, src);

        let mut namespace = None;
        let mut named = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "import_clause" {
                continue;
            }
            let mut clause_cursor = child.walk();
            for clause_child in child.children(&mut clause_cursor) {
                match clause_child.kind() {
                    "namespace_import" => {
                        let mut ns_cursor = clause_child.walk();
                        for ns_child in clause_child.children(&mut ns_cursor) {
                            if ns_child.kind() == "identifier" {
                                namespace = Some(Self::text(&ns_child, src).to_owned());
                            }
                        }
                    }
                    "named_imports" => {
                        let mut spec_cursor = clause_child.walk();
                        for spec in clause_child.named_children(&mut spec_cursor) {
                            if spec.kind() != "import_specifier" {
                                continue;
                            }
                            let Some(name) = spec.child_by_field_name("name") else {
                                continue;
                            };
                            named.push(NamedSpecifier {
                                name: Self::text(&name, src).to_owned(),
                                alias: spec
                                    .child_by_field_name("alias")
                                    .map(|a| Self::text(&a, src).to_owned()),
                            });
                        }
                    }
                    _ => {}
                }
            }
        }

        Some(ImportDecl {
            module,
            namespace,
            named,
            span: Self::span(node),
        })
    }

    /// The expression inside a `decorator` node: a bare identifier, a
    /// `ns.Name` member access, or a call wrapping either.
    fn extract_decorator(node: &Node<'_>, src: &[u8]) -> Option<DecoratorNode> {
        let expr = node.named_child(0)?;
        let span = Self::span(node);

        match expr.kind() {
            "identifier" => Some(DecoratorNode {
                name: Self::text(&expr, src).to_owned(),
                namespace: None,
                args: Vec::new(),
                span,
            }),
            "member_expression" => {
                let (namespace, name) = Self::member_parts(&expr, src)?;
                Some(DecoratorNode {
                    name,
                    namespace,
                    args: Vec::new(),
                    span,
                })
            }
            "call_expression" => {
                let callee = expr.child_by_field_name("function")?;
                let (namespace, name) = match callee.kind() {
                    "identifier" => (None, Self::text(&callee, src).to_owned()),
                    "member_expression" => Self::member_parts(&callee, src)?,
                    _ => return None,
                };
                let args = expr
                    .child_by_field_name("arguments")
                    .map(|a| Self::extract_args(&a, src))
                    .unwrap_or_default();
                Some(DecoratorNode {
                    name,
                    namespace,
                    args,
                    span,
                })
            }
            _ => None,
        }
    }

    fn member_parts(node: &Node<'_>, src: &[u8]) -> Option<(Option<String>, String)> {
        let object = node.child_by_field_name("object")?;
        let property = node.child_by_field_name("property")?;
        if object.kind() != "identifier" {
            return None;
        }
        Some((
            Some(Self::text(&object, src).to_owned()),
            Self::text(&property, src).to_owned(),
        ))
    }

    fn extract_args(node: &Node<'_>, src: &[u8]) -> Vec<DecoratorArg> {
        let mut args = Vec::new();
        let mut cursor = node.walk();
        for arg in node.named_children(&mut cursor) {
            args.push(match arg.kind() {
                "string" => DecoratorArg::Str(Self::string_content(&arg, src)),
                "object" => DecoratorArg::Object(Self::extract_object(&arg, src)),
                _ => DecoratorArg::Other,
            });
        }
        args
    }

    fn extract_object(node: &Node<'_>, src: &[u8]) -> Vec<ObjectProperty> {
        let mut props = Vec::new();
        let mut cursor = node.walk();
        for pair in node.named_children(&mut cursor) {
            if pair.kind() != "pair" {
                continue;
            }
            let Some(key) = pair.child_by_field_name("key") else {
                continue;
            };
            let name = match key.kind() {
                "string" => Self::string_content(&key, src),
                _ => Self::text(&key, src).to_owned(),
            };
            let string_value = pair.child_by_field_name("value").and_then(|v| {
                (v.kind() == "string").then(|| Self::string_content(&v, src))
            });
            props.push(ObjectProperty { name, string_value });
        }
        props
    }

    fn extract_params(node: &Node<'_>, src: &[u8]) -> Vec<ParamDecl> {
        let mut params = Vec::new();
        let mut cursor = node.walk();
        for param in node.named_children(&mut cursor) {
            if param.kind() != "required_parameter" && param.kind() != "optional_parameter" {
                continue;
            }
            let Some(pattern) = param.child_by_field_name("pattern") else {
                continue;
            };
            let (name, is_rest) = match pattern.kind() {
                "identifier" => (Self::text(&pattern, src).to_owned(), false),
                "rest_pattern" => {
                    let mut rest_cursor = pattern.walk();
                    let inner = pattern
                        .named_children(&mut rest_cursor)
                        .find(|c| c.kind() == "identifier");
                    match inner {
                        Some(inner) => (Self::text(&inner, src).to_owned(), true),
                        None => continue,
                    }
                }
                // Destructuring patterns carry no single name.
                _ => (Self::text(&pattern, src).to_owned(), false),
            };
            let ty = param
                .child_by_field_name("type")
                .and_then(|t| t.named_child(0))
                .map(|t| typeexpr::convert(&t, src));
            params.push(ParamDecl {
                name,
                is_rest,
                ty,
                span: Self::span(&param),
            });
        }
        params
    }

    fn extract_method(
        node: &Node<'_>,
        src: &[u8],
        decorators: Vec<DecoratorNode>,
        is_abstract: bool,
    ) -> Option<MethodDecl> {
        let name = node.child_by_field_name("name")?;

        let mut decorators = decorators;
        let mut is_async = false;
        let mut is_static = false;
        let mut is_generator = false;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "async" => is_async = true,
                "static" => is_static = true,
                "*" => is_generator = true,
                // Some grammar revisions attach decorators to the member
                // itself rather than listing them as class body siblings.
                "decorator" => {
                    if let Some(dec) = Self::extract_decorator(&child, src) {
                        decorators.push(dec);
                    }
                }
                _ => {}
            }
        }

        let params = node
            .child_by_field_name("parameters")
            .map(|p| Self::extract_params(&p, src))
            .unwrap_or_default();
        let return_type = node
            .child_by_field_name("return_type")
            .and_then(|t| t.named_child(0))
            .map(|t| typeexpr::convert(&t, src));

        Some(MethodDecl {
            name: Self::text(&name, src).to_owned(),
            is_async,
            is_static,
            is_abstract,
            is_generator,
            decorators,
            params,
            return_type,
            span: Self::span(node),
        })
    }

    fn extract_class(
        node: &Node<'_>,
        src: &[u8],
        is_exported: bool,
        outer_decorators: Vec<DecoratorNode>,
    ) -> Option<ClassDecl> {
        let name = node.child_by_field_name("name")?;
        let is_abstract = node.kind() == "abstract_class_declaration";

        let mut decorators = outer_decorators;
        let mut implements = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "decorator" => {
                    if let Some(dec) = Self::extract_decorator(&child, src) {
                        decorators.push(dec);
                    }
                }
                "class_heritage" => {
                    implements = Self::extract_implements(&child, src);
                }
                _ => {}
            }
        }

        let mut constructors = Vec::new();
        let mut methods = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut pending: Vec<DecoratorNode> = Vec::new();
            let mut body_cursor = body.walk();
            for member in body.named_children(&mut body_cursor) {
                match member.kind() {
                    // Method decorators are siblings preceding the member.
                    "decorator" => {
                        if let Some(dec) = Self::extract_decorator(&member, src) {
                            pending.push(dec);
                        }
                    }
                    "method_definition" => {
                        let decs = std::mem::take(&mut pending);
                        let Some(name) = member.child_by_field_name("name") else {
                            continue;
                        };
                        if Self::text(&name, src) == "constructor" {
                            let params = member
                                .child_by_field_name("parameters")
                                .map(|p| Self::extract_params(&p, src))
                                .unwrap_or_default();
                            constructors.push(ConstructorDecl {
                                params,
                                span: Self::span(&member),
                            });
                        } else if let Some(method) =
                            Self::extract_method(&member, src, decs, false)
                        {
                            methods.push(method);
                        }
                    }
                    "abstract_method_signature" => {
                        let decs = std::mem::take(&mut pending);
                        if let Some(method) = Self::extract_method(&member, src, decs, true) {
                            methods.push(method);
                        }
                    }
                    _ => {
                        pending.clear();
                    }
                }
            }
        }

        Some(ClassDecl {
            name: Self::text(&name, src).to_owned(),
            is_exported,
            is_abstract,
            implements,
            decorators,
            constructors,
            methods,
            span: Self::span(node),
        })
    }

    fn extract_implements(heritage: &Node<'_>, src: &[u8]) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = heritage.walk();
        for clause in heritage.children(&mut cursor) {
            if clause.kind() != "implements_clause" {
                continue;
            }
            let mut clause_cursor = clause.walk();
            for ty in clause.named_children(&mut clause_cursor) {
                match ty.kind() {
                    "type_identifier" | "nested_type_identifier" => {
                        names.push(Self::text(&ty, src).to_owned());
                    }
                    "generic_type" => {
                        if let Some(name) = ty.child_by_field_name("name") {
                            names.push(Self::text(&name, src).to_owned());
                        }
                    }
                    _ => {}
                }
            }
        }
        names
    }
}

impl Default for TypeScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceExtractor for TypeScriptExtractor {
    fn language_id(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".ts"]
    }

    fn extract(&self, source: &str) -> Result<SourceFileAst, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ExtractError::Parser(e.to_string()))?;

        let src = source.as_bytes();
        let tree = parser
            .parse(src, None)
            .ok_or_else(|| ExtractError::Parser("parser returned no tree".to_owned()))?;
        let root = tree.root_node();

        let mut result = SourceFileAst::default();

        let mut cursor = root.walk();
        for node in root.children(&mut cursor) {
            match node.kind() {
                "import_statement" => {
                    if let Some(import) = Self::extract_import(&node, src) {
                        result.imports.push(import);
                    }
                }
                "class_declaration" | "abstract_class_declaration" => {
                    if let Some(class) = Self::extract_class(&node, src, false, Vec::new()) {
                        result.classes.push(class);
                    }
                }
                "export_statement" => {
                    // Decorators written above `export` attach to the
                    // export statement, not the class itself.
                    let mut outer = Vec::new();
                    let mut export_cursor = node.walk();
                    for child in node.children(&mut export_cursor) {
                        if child.kind() == "decorator" {
                            if let Some(dec) = Self::extract_decorator(&child, src) {
                                outer.push(dec);
                            }
                        }
                    }
                    if let Some(decl) = node.child_by_field_name("declaration") {
                        if matches!(
                            decl.kind(),
                            "class_declaration" | "abstract_class_declaration"
                        ) {
                            if let Some(class) = Self::extract_class(&decl, src, true, outer) {
                                result.classes.push(class);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lokum_analyzer_core::ast::TypeShape;

    fn extract(src: &str) -> SourceFileAst {
        TypeScriptExtractor::new()
            .extract(src)
            .expect("extraction failed")
    }

    #[test]
    fn extracts_named_import() {
        let a = extract("import { Service } from 'lokum';\n");
        assert_eq!(a.imports.len(), 1);
        assert_eq!(a.imports[0].module, "lokum");
        assert_eq!(a.imports[0].named.len(), 1);
        assert_eq!(a.imports[0].named[0].name, "Service");
        assert_eq!(a.imports[0].named[0].alias, None);
    }

    #[test]
    fn extracts_aliased_import() {
        let a = extract("import { Service as METIN, Provide } from 'lokum';\n");
        let named = &a.imports[0].named;
        assert_eq!(named[0].name, "Service");
        assert_eq!(named[0].alias.as_deref(), Some("METIN"));
        assert_eq!(named[1].name, "Provide");
        assert_eq!(named[1].alias, None);
    }

    #[test]
    fn extracts_namespace_import() {
        let a = extract("import * as lokum from 'lokum';\n");
        assert_eq!(a.imports[0].namespace.as_deref(), Some("lokum"));
        assert!(a.imports[0].named.is_empty());
    }

    #[test]
    fn default_import_has_no_bindings() {
        let a = extract("import lokum from 'lokum';\n");
        assert_eq!(a.imports[0].namespace, None);
        assert!(a.imports[0].named.is_empty());
    }

    #[test]
    fn extracts_exported_class() {
        let a = extract("export class UserService {}\n");
        assert_eq!(a.classes.len(), 1);
        assert_eq!(a.classes[0].name, "UserService");
        assert!(a.classes[0].is_exported);
        assert!(!a.classes[0].is_abstract);
    }

    #[test]
    fn extracts_abstract_class() {
        let a = extract("export abstract class Base {}\n");
        assert!(a.classes[0].is_abstract);
    }

    #[test]
    fn local_class_is_not_exported() {
        let a = extract("class Hidden {}\n");
        assert!(!a.classes[0].is_exported);
    }

    #[test]
    fn extracts_implemented_interfaces() {
        let a = extract("export class Repo implements UserRepo, Closeable<Repo> {}\n");
        assert_eq!(a.classes[0].implements, vec!["UserRepo", "Closeable"]);
    }

    #[test]
    fn extracts_bare_decorator() {
        let a = extract("@Service\nexport class UserService {}\n");
        let decs = &a.classes[0].decorators;
        assert_eq!(decs.len(), 1);
        assert_eq!(decs[0].name, "Service");
        assert_eq!(decs[0].namespace, None);
        assert!(decs[0].args.is_empty());
    }

    #[test]
    fn extracts_namespaced_decorator() {
        let a = extract(
            "import * as lokum from 'lokum';\n@lokum.Service\nexport class UserService {}\n",
        );
        let dec = &a.classes[0].decorators[0];
        assert_eq!(dec.name, "Service");
        assert_eq!(dec.namespace.as_deref(), Some("lokum"));
    }

    #[test]
    fn extracts_string_argument() {
        let a = extract("@Service('db')\nexport class Db {}\n");
        let dec = &a.classes[0].decorators[0];
        assert_eq!(dec.args.len(), 1);
        match &dec.args[0] {
            DecoratorArg::Str(s) => assert_eq!(s, "db"),
            other => panic!("expected string argument, got {other:?}"),
        }
    }

    #[test]
    fn extracts_object_argument() {
        let a = extract("@Service({ qualifier: 'db', extra: 1 })\nexport class Db {}\n");
        let dec = &a.classes[0].decorators[0];
        match &dec.args[0] {
            DecoratorArg::Object(props) => {
                assert_eq!(props[0].name, "qualifier");
                assert_eq!(props[0].string_value.as_deref(), Some("db"));
                assert_eq!(props[1].name, "extra");
                assert_eq!(props[1].string_value, None);
            }
            other => panic!("expected object argument, got {other:?}"),
        }
    }

    #[test]
    fn non_literal_argument_is_other() {
        let a = extract("@Service(qualifierFor('db'))\nexport class Db {}\n");
        assert!(matches!(
            a.classes[0].decorators[0].args[0],
            DecoratorArg::Other
        ));
    }

    #[test]
    fn extracts_namespaced_call_decorator() {
        let a = extract("@lokum.Provide('db')\nexport class Db {\n}\n");
        let dec = &a.classes[0].decorators[0];
        assert_eq!(dec.name, "Provide");
        assert_eq!(dec.namespace.as_deref(), Some("lokum"));
        assert_eq!(dec.args.len(), 1);
    }

    #[test]
    fn extracts_constructor_and_params() {
        let a = extract(
            "export class Svc {\n  constructor(repo: UserRepo, names: string[]) {}\n}\n",
        );
        let class = &a.classes[0];
        assert_eq!(class.constructors.len(), 1);
        let params = &class.constructors[0].params;
        assert_eq!(params[0].name, "repo");
        assert_eq!(
            params[0].ty.as_ref().map(|t| &t.shape),
            Some(&TypeShape::Reference)
        );
        assert_eq!(params[1].name, "names");
        assert!(matches!(
            params[1].ty.as_ref().map(|t| &t.shape),
            Some(TypeShape::Array { .. })
        ));
    }

    #[test]
    fn extracts_rest_param() {
        let a = extract("export class Svc {\n  run(...args: string[]): void {}\n}\n");
        let param = &a.classes[0].methods[0].params[0];
        assert_eq!(param.name, "args");
        assert!(param.is_rest);
    }

    #[test]
    fn extracts_method_modifiers() {
        let a = extract(
            "export class Svc {\n  async fetch(): Promise<User> { return null; }\n  static make(): Svc { return new Svc(); }\n  *walk() {}\n}\n",
        );
        let methods = &a.classes[0].methods;
        assert_eq!(methods[0].name, "fetch");
        assert!(methods[0].is_async);
        assert_eq!(methods[1].name, "make");
        assert!(methods[1].is_static);
        assert_eq!(methods[2].name, "walk");
        assert!(methods[2].is_generator);
    }

    #[test]
    fn extracts_abstract_method() {
        let a = extract(
            "export abstract class Base {\n  abstract handle(input: string): void;\n}\n",
        );
        let method = &a.classes[0].methods[0];
        assert_eq!(method.name, "handle");
        assert!(method.is_abstract);
    }

    #[test]
    fn extracts_method_decorator() {
        let a = extract(
            "import { Lokum } from 'lokum';\nexport class Cfg {\n  @Lokum\n  db(): Database { return new Database(); }\n}\n",
        );
        let method = &a.classes[0].methods[0];
        assert_eq!(method.decorators.len(), 1);
        assert_eq!(method.decorators[0].name, "Lokum");
    }

    #[test]
    fn extracts_return_type() {
        let a = extract("export class Svc {\n  list(): User[] { return []; }\n}\n");
        let ret = a.classes[0].methods[0].return_type.as_ref().unwrap();
        assert_eq!(ret.text, "User[]");
        assert!(matches!(ret.shape, TypeShape::Array { .. }));
    }

    #[test]
    fn generic_return_type_shape() {
        let a = extract("export class Svc {\n  list(): Array<User> { return []; }\n}\n");
        let ret = a.classes[0].methods[0].return_type.as_ref().unwrap();
        match &ret.shape {
            TypeShape::Generic { name, args } => {
                assert_eq!(name, "Array");
                assert_eq!(args.len(), 1);
                assert_eq!(args[0].text, "User");
            }
            other => panic!("expected generic shape, got {other:?}"),
        }
    }

    #[test]
    fn union_type_is_other() {
        let a = extract("export class Svc {\n  find(): User | null { return null; }\n}\n");
        let ret = a.classes[0].methods[0].return_type.as_ref().unwrap();
        assert_eq!(ret.shape, TypeShape::Other);
        assert_eq!(ret.text, "User | null");
    }

    #[test]
    fn spans_are_one_indexed() {
        let a = extract("export class Svc {}\n");
        assert_eq!(a.classes[0].span.line, 1);
    }

    #[test]
    fn empty_source() {
        let a = extract("");
        assert!(a.imports.is_empty());
        assert!(a.classes.is_empty());
    }
}
