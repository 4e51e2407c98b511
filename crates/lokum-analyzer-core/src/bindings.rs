//! Import binding resolution.
//!
//! Scans a file's import declarations and computes, per decorator, the
//! local names through which that decorator can be written in the file.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::ast::SourceFileAst;
use crate::decorator::DecoratorKind;

/// One way a decorator can be referenced in a file.
///
/// A binding is either a direct/aliased named import or a
/// namespace-qualified one; `alias` and `namespace` are never both set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportBinding {
    /// The decorator this binding refers to.
    pub kind: DecoratorKind,
    /// Local alias for `import { Name as Alias }`.
    pub alias: Option<String>,
    /// Namespace object name for `import * as ns`.
    pub namespace: Option<String>,
}

impl ImportBinding {
    /// A named-import binding, optionally aliased.
    #[must_use]
    pub fn named(kind: DecoratorKind, alias: Option<String>) -> Self {
        Self {
            kind,
            alias,
            namespace: None,
        }
    }

    /// A namespace-qualified binding.
    #[must_use]
    pub fn namespaced(kind: DecoratorKind, namespace: impl Into<String>) -> Self {
        Self {
            kind,
            alias: None,
            namespace: Some(namespace.into()),
        }
    }
}

/// Per-file mapping from decorator to its import bindings.
///
/// Every known decorator is present as a key, possibly with an empty
/// list. Iteration follows registry (name) order; within one decorator,
/// bindings keep import declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BindingMap {
    entries: BTreeMap<DecoratorKind, Vec<ImportBinding>>,
}

impl BindingMap {
    /// A map with every decorator bound to an empty list.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: DecoratorKind::ALL
                .into_iter()
                .map(|kind| (kind, Vec::new()))
                .collect(),
        }
    }

    /// Bindings recorded for one decorator.
    #[must_use]
    pub fn bindings(&self, kind: DecoratorKind) -> &[ImportBinding] {
        self.entries.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Iterates decorators and their bindings in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (DecoratorKind, &[ImportBinding])> {
        self.entries
            .iter()
            .map(|(kind, bindings)| (*kind, bindings.as_slice()))
    }

    /// True when no decorator has any binding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    fn push(&mut self, binding: ImportBinding) {
        self.entries.entry(binding.kind).or_default().push(binding);
    }
}

impl Default for BindingMap {
    fn default() -> Self {
        Self::empty()
    }
}

/// Resolves the decorator bindings of one source file.
///
/// Only import declarations whose module specifier equals `package_name`
/// participate. A namespace import binds every known decorator through
/// the namespace object; named specifiers bind only the decorator names
/// they match, keeping any alias. Unmatched specifiers and imports from
/// other modules are ignored.
#[must_use]
pub fn resolve_bindings(file: &SourceFileAst, package_name: &str) -> BindingMap {
    let mut map = BindingMap::empty();

    for import in &file.imports {
        if import.module != package_name {
            continue;
        }

        if let Some(namespace) = &import.namespace {
            for kind in DecoratorKind::ALL {
                map.push(ImportBinding::namespaced(kind, namespace.clone()));
            }
        } else {
            for specifier in &import.named {
                if let Some(kind) = DecoratorKind::from_name(&specifier.name) {
                    map.push(ImportBinding::named(kind, specifier.alias.clone()));
                }
            }
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ImportDecl, NamedSpecifier, Span};
    use std::path::PathBuf;

    const PKG: &str = "lokum";

    fn file(imports: Vec<ImportDecl>) -> SourceFileAst {
        SourceFileAst {
            path: PathBuf::from("test.ts"),
            imports,
            classes: vec![],
        }
    }

    fn named_import(module: &str, specifiers: &[(&str, Option<&str>)]) -> ImportDecl {
        ImportDecl {
            module: module.to_owned(),
            namespace: None,
            named: specifiers
                .iter()
                .map(|(name, alias)| NamedSpecifier {
                    name: (*name).to_owned(),
                    alias: alias.map(str::to_owned),
                })
                .collect(),
            span: Span::default(),
        }
    }

    fn namespace_import(module: &str, namespace: &str) -> ImportDecl {
        ImportDecl {
            module: module.to_owned(),
            namespace: Some(namespace.to_owned()),
            named: vec![],
            span: Span::default(),
        }
    }

    #[test]
    fn no_framework_import_leaves_every_list_empty() {
        let map = resolve_bindings(&file(vec![named_import("other", &[("Service", None)])]), PKG);
        assert!(map.is_empty());
        for kind in DecoratorKind::ALL {
            assert!(map.bindings(kind).is_empty());
        }
    }

    #[test]
    fn namespace_import_binds_every_decorator() {
        let map = resolve_bindings(&file(vec![namespace_import(PKG, "namespaced")]), PKG);
        for kind in DecoratorKind::ALL {
            assert_eq!(
                map.bindings(kind),
                &[ImportBinding::namespaced(kind, "namespaced")]
            );
        }
    }

    #[test]
    fn named_import_binds_only_matching_names() {
        let map = resolve_bindings(&file(vec![named_import(PKG, &[("Service", None)])]), PKG);
        assert_eq!(
            map.bindings(DecoratorKind::Service),
            &[ImportBinding::named(DecoratorKind::Service, None)]
        );
        assert!(map.bindings(DecoratorKind::Configuration).is_empty());
    }

    #[test]
    fn alias_is_preserved() {
        let map = resolve_bindings(
            &file(vec![named_import(PKG, &[("Service", Some("METIN"))])]),
            PKG,
        );
        assert_eq!(
            map.bindings(DecoratorKind::Service),
            &[ImportBinding::named(
                DecoratorKind::Service,
                Some("METIN".to_owned())
            )]
        );
    }

    #[test]
    fn repeated_imports_keep_declaration_order() {
        let map = resolve_bindings(
            &file(vec![
                named_import(PKG, &[("Service", Some("METIN"))]),
                named_import(PKG, &[("Service", Some("SEYLAN"))]),
                named_import(PKG, &[("Service", None)]),
            ]),
            PKG,
        );
        let bindings = map.bindings(DecoratorKind::Service);
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings[0].alias.as_deref(), Some("METIN"));
        assert_eq!(bindings[1].alias.as_deref(), Some("SEYLAN"));
        assert_eq!(bindings[2].alias, None);
    }

    #[test]
    fn unknown_specifiers_are_ignored() {
        let map = resolve_bindings(
            &file(vec![named_import(PKG, &[("Inject", None), ("Lokum", None)])]),
            PKG,
        );
        assert!(map.bindings(DecoratorKind::Service).is_empty());
        assert_eq!(map.bindings(DecoratorKind::Lokum).len(), 1);
    }

    #[test]
    fn resolution_is_idempotent() {
        let f = file(vec![
            namespace_import(PKG, "ns"),
            named_import(PKG, &[("Provide", Some("P"))]),
        ]);
        assert_eq!(resolve_bindings(&f, PKG), resolve_bindings(&f, PKG));
    }
}
