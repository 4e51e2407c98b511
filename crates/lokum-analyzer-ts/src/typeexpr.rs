//! Type annotation conversion.
//!
//! Reduces Tree-sitter type nodes to the [`TypeExpr`] shapes the core
//! engine discriminates on. Shapes the engine has no rule for collapse
//! to [`TypeShape::Other`] with the written text preserved.

use tree_sitter::Node;

use lokum_analyzer_core::ast::{TypeExpr, TypeShape};

pub(crate) fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
    std::str::from_utf8(&src[node.start_byte()..node.end_byte()]).unwrap_or("")
}

/// Converts a type node into a [`TypeExpr`].
pub(crate) fn convert(node: &Node<'_>, src: &[u8]) -> TypeExpr {
    let full_text = text(node, src).to_owned();

    let shape = match node.kind() {
        "predefined_type" => TypeShape::Predefined,
        "type_identifier" | "nested_type_identifier" => TypeShape::Reference,
        "tuple_type" => TypeShape::Tuple,
        "array_type" => match node.named_child(0) {
            Some(elem) => TypeShape::Array {
                elem: Box::new(convert(&elem, src)),
            },
            None => TypeShape::Other,
        },
        "generic_type" => convert_generic(node, src),
        _ => TypeShape::Other,
    };

    TypeExpr {
        text: full_text,
        shape,
    }
}

fn convert_generic(node: &Node<'_>, src: &[u8]) -> TypeShape {
    let Some(name_node) = node.child_by_field_name("name") else {
        return TypeShape::Other;
    };

    let mut args = Vec::new();
    if let Some(arguments) = node.child_by_field_name("type_arguments") {
        let mut cursor = arguments.walk();
        for argument in arguments.named_children(&mut cursor) {
            args.push(convert(&argument, src));
        }
    }

    TypeShape::Generic {
        name: text(&name_node, src).to_owned(),
        args,
    }
}
