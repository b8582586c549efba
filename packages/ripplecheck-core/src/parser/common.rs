//! Shared tree-sitter node helpers used by the Symbol Extractor and
//! Reference Walker: traversal, text extraction, span conversion, modifier
//! detection.

use super::node_kinds;
use crate::shared::{ByteRange, LineRange};
use tree_sitter::Node;

pub fn node_to_line_range(node: &Node) -> LineRange {
    let start = node.start_position();
    let end = node.end_position();
    LineRange::new((start.row + 1) as u32, (end.row + 1) as u32)
}

pub fn node_to_byte_range(node: &Node) -> ByteRange {
    ByteRange::new(node.start_byte(), node.end_byte())
}

pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

pub fn find_child_by_kind<'a>(node: &'a Node, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|child| child.kind() == kind)
}

pub fn find_children_by_kind<'a>(node: &'a Node, kind: &str) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.kind() == kind)
        .collect()
}

pub fn find_child_by_field<'a>(node: &'a Node, field_name: &str) -> Option<Node<'a>> {
    node.child_by_field_name(field_name)
}

/// Extract an identifier's text, whether the node itself is an identifier
/// or wraps one (e.g. a `nested_identifier` for `Namespace.Thing`).
pub fn extract_identifier(node: &Node, source: &str) -> Option<String> {
    match node.kind() {
        node_kinds::IDENTIFIER | node_kinds::PROPERTY_IDENTIFIER | node_kinds::TYPE_IDENTIFIER => {
            Some(node_text(node, source).to_string())
        }
        _ => find_child_by_kind(node, node_kinds::IDENTIFIER)
            .map(|n| node_text(&n, source).to_string()),
    }
}

pub fn has_modifier(node: &Node, modifier_kind: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|child| child.kind() == modifier_kind)
}

pub fn is_async(node: &Node) -> bool {
    has_modifier(node, node_kinds::ASYNC)
}

pub fn is_static(node: &Node) -> bool {
    has_modifier(node, node_kinds::STATIC)
}

pub fn is_readonly(node: &Node) -> bool {
    has_modifier(node, node_kinds::READONLY)
}

pub fn is_abstract(node: &Node) -> bool {
    has_modifier(node, node_kinds::ABSTRACT)
}

/// True when `node` sits in a declaration-name slot of its parent — i.e. it
/// is a binding site, not a use. The Reference Walker uses this to decide
/// whether an identifier is worth resolving (spec §4.2).
pub fn is_binding_site(node: &Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    for field in ["name", "pattern"] {
        if let Some(slot) = parent.child_by_field_name(field) {
            if slot.id() == node.id() {
                return true;
            }
        }
    }
    false
}

