//! Symbol Extractor (spec §4.1): walks a parsed file and emits `Symbol`
//! records with stable ids and canonical signature hashes.

use super::symbol::{Symbol, SymbolKind};
use crate::parser::adapter::ParsedFile;
use crate::parser::common::{
    extract_identifier, find_child_by_field, find_child_by_kind, find_children_by_kind, node_text,
    node_to_byte_range, node_to_line_range,
};
use crate::parser::node_kinds as nk;
use crate::signature::{callable_signature, class_signature, enum_signature, interface_signature, signature_hash, type_signature};
use tree_sitter::Node;

pub struct SymbolExtractor;

impl SymbolExtractor {
    /// Extract every named symbol from a parsed file (spec §4.1).
    #[tracing::instrument(skip_all, fields(file = %parsed.file_path))]
    pub fn extract(parsed: &ParsedFile) -> Vec<Symbol> {
        let mut out = Vec::new();
        let root = parsed.tree.root_node();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            walk_statement(&child, &parsed.source, &parsed.file_path, "", None, false, &mut out);
        }
        tracing::debug!(count = out.len(), "extracted symbols");
        out
    }
}

/// True when `node` is wrapped directly by an `export_statement`, or is
/// itself an export statement's declaration child.
fn is_exported(node: &Node) -> bool {
    node.parent().is_some_and(|p| p.kind() == nk::EXPORT_STATEMENT)
}

fn unwrap_export<'a>(node: &'a Node<'a>) -> Node<'a> {
    if node.kind() == nk::EXPORT_STATEMENT {
        find_child_by_field(node, "declaration").unwrap_or(*node)
    } else {
        *node
    }
}

fn walk_statement<'a>(
    node: &Node<'a>,
    source: &str,
    file_path: &str,
    prefix: &str,
    parent_id: Option<&str>,
    parent_exported: bool,
    out: &mut Vec<Symbol>,
) {
    let exported_here = node.kind() == nk::EXPORT_STATEMENT;
    let decl = unwrap_export(node);
    let exported = parent_exported || exported_here || is_exported(&decl);

    match decl.kind() {
        nk::FUNCTION_DECLARATION | nk::GENERATOR_FUNCTION_DECLARATION => {
            if let Some(sym) = extract_function(&decl, source, file_path, prefix, parent_id, exported, SymbolKind::Function) {
                out.push(sym);
            }
        }
        nk::CLASS_DECLARATION => {
            extract_class(&decl, source, file_path, prefix, exported, out);
        }
        nk::INTERFACE_DECLARATION => {
            if let Some(sym) = extract_interface(&decl, source, file_path, prefix, parent_id, exported) {
                out.push(sym);
            }
        }
        nk::TYPE_ALIAS_DECLARATION => {
            if let Some(sym) = extract_type_alias(&decl, source, file_path, prefix, parent_id, exported) {
                out.push(sym);
            }
        }
        nk::ENUM_DECLARATION => {
            if let Some(sym) = extract_enum(&decl, source, file_path, prefix, parent_id, exported) {
                out.push(sym);
            }
        }
        nk::VARIABLE_DECLARATION | nk::LEXICAL_DECLARATION => {
            extract_variables(&decl, source, file_path, prefix, parent_id, exported, out);
        }
        nk::MODULE_DECLARATION | nk::AMBIENT_DECLARATION => {
            extract_namespace(&decl, source, file_path, prefix, exported, out);
        }
        _ => {}
    }
}

use crate::shared::qualify;

fn has_body(node: &Node) -> bool {
    find_child_by_field(node, "body").is_some()
}

fn extract_params(node: &Node, source: &str) -> Vec<(String, String)> {
    let Some(params_node) = find_child_by_kind(node, nk::FORMAL_PARAMETERS) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut cursor = params_node.walk();
    for child in params_node.children(&mut cursor) {
        if !matches!(
            child.kind(),
            nk::REQUIRED_PARAMETER | nk::OPTIONAL_PARAMETER | nk::REST_PARAMETER
        ) {
            continue;
        }
        let name = find_child_by_field(&child, "pattern")
            .and_then(|n| extract_identifier(&n, source))
            .unwrap_or_else(|| "_".to_string());
        let ty = find_child_by_field(&child, "type")
            .map(|n| node_text(&n, source).to_string())
            .unwrap_or_default();
        out.push((name, ty));
    }
    out
}

fn extract_return_type(node: &Node, source: &str) -> String {
    find_child_by_field(node, "return_type")
        .map(|n| node_text(&n, source).to_string())
        .unwrap_or_else(|| "void".to_string())
}

fn extract_function(
    node: &Node,
    source: &str,
    file_path: &str,
    prefix: &str,
    parent_id: Option<&str>,
    exported: bool,
    kind: SymbolKind,
) -> Option<Symbol> {
    // Overload signatures (no body) are skipped; only the implementation is kept.
    if !has_body(node) {
        return None;
    }
    let name_node = find_child_by_field(node, "name")?;
    let name = extract_identifier(&name_node, source)?;
    let qualified_name = qualify(prefix, &name);
    let params = extract_params(node, source);
    let return_type = extract_return_type(node, source);
    let canonical = callable_signature(&params, &return_type);

    Some(build_symbol(file_path, &qualified_name, kind, node, exported, parent_id, &canonical))
}

fn extract_class(node: &Node, source: &str, file_path: &str, prefix: &str, exported: bool, out: &mut Vec<Symbol>) {
    let Some(name_node) = find_child_by_field(node, "name") else { return };
    let Some(name) = extract_identifier(&name_node, source) else { return };
    let qualified_name = qualify(prefix, &name);

    let base_class = find_child_by_kind(node, nk::CLASS_HERITAGE)
        .and_then(|h| find_child_by_kind(&h, nk::EXTENDS_CLAUSE))
        .and_then(|e| find_child_by_kind(&e, nk::TYPE_IDENTIFIER))
        .map(|n| node_text(&n, source).to_string());
    let implements: Vec<String> = find_child_by_kind(node, nk::CLASS_HERITAGE)
        .and_then(|h| find_child_by_kind(&h, nk::IMPLEMENTS_CLAUSE))
        .map(|clause| {
            find_children_by_kind(&clause, nk::TYPE_IDENTIFIER)
                .iter()
                .map(|n| node_text(n, source).to_string())
                .collect()
        })
        .unwrap_or_default();
    let canonical = class_signature(base_class.as_deref(), &implements);

    let class_symbol = build_symbol(file_path, &qualified_name, SymbolKind::Class, node, exported, None, &canonical);
    let class_id = class_symbol.id.clone();
    out.push(class_symbol);

    let Some(body) = find_child_by_field(node, "body") else { return };
    let mut cursor = body.walk();
    for member in body.children(&mut cursor) {
        match member.kind() {
            nk::METHOD_DEFINITION => {
                if let Some(sym) = extract_function(
                    &member,
                    source,
                    file_path,
                    &qualified_name,
                    Some(&class_id),
                    exported,
                    SymbolKind::Method,
                ) {
                    out.push(sym);
                }
            }
            nk::CONSTRUCTOR => {
                if let Some(sym) = extract_function(
                    &member,
                    source,
                    file_path,
                    &qualified_name,
                    Some(&class_id),
                    exported,
                    SymbolKind::Method,
                ) {
                    out.push(sym);
                }
            }
            nk::PUBLIC_FIELD_DEFINITION => {
                if let Some(sym) = extract_property(&member, source, file_path, &qualified_name, Some(&class_id), exported) {
                    out.push(sym);
                }
            }
            _ => {}
        }
    }
}

fn extract_property(
    node: &Node,
    source: &str,
    file_path: &str,
    prefix: &str,
    parent_id: Option<&str>,
    exported: bool,
) -> Option<Symbol> {
    let name_node = find_child_by_field(node, "name")?;
    let name = extract_identifier(&name_node, source)?;
    let qualified_name = qualify(prefix, &name);
    let type_text = find_child_by_field(node, "type")
        .map(|n| node_text(&n, source).to_string())
        .unwrap_or_default();
    let canonical = type_signature(&type_text);
    Some(build_symbol(file_path, &qualified_name, SymbolKind::Property, node, exported, parent_id, &canonical))
}

fn extract_interface(
    node: &Node,
    source: &str,
    file_path: &str,
    prefix: &str,
    parent_id: Option<&str>,
    exported: bool,
) -> Option<Symbol> {
    let name_node = find_child_by_field(node, "name")?;
    let name = extract_identifier(&name_node, source)?;
    let qualified_name = qualify(prefix, &name);

    let members: Vec<String> = find_child_by_kind(node, nk::INTERFACE_BODY)
        .map(|body| {
            let mut cursor = body.walk();
            body.children(&mut cursor)
                .filter(|c| matches!(c.kind(), nk::PROPERTY_SIGNATURE | nk::METHOD_SIGNATURE))
                .map(|c| node_text(&c, source).to_string())
                .collect()
        })
        .unwrap_or_default();
    let canonical = interface_signature(&members);

    Some(build_symbol(file_path, &qualified_name, SymbolKind::Interface, node, exported, parent_id, &canonical))
}

fn extract_type_alias(
    node: &Node,
    source: &str,
    file_path: &str,
    prefix: &str,
    parent_id: Option<&str>,
    exported: bool,
) -> Option<Symbol> {
    let name_node = find_child_by_field(node, "name")?;
    let name = extract_identifier(&name_node, source)?;
    let qualified_name = qualify(prefix, &name);
    let value_text = find_child_by_field(node, "value")
        .map(|n| node_text(&n, source).to_string())
        .unwrap_or_default();
    let canonical = type_signature(&value_text);
    Some(build_symbol(file_path, &qualified_name, SymbolKind::TypeAlias, node, exported, parent_id, &canonical))
}

fn extract_enum(
    node: &Node,
    source: &str,
    file_path: &str,
    prefix: &str,
    parent_id: Option<&str>,
    exported: bool,
) -> Option<Symbol> {
    let name_node = find_child_by_field(node, "name")?;
    let name = extract_identifier(&name_node, source)?;
    let qualified_name = qualify(prefix, &name);

    let members: Vec<(String, String)> = find_child_by_kind(node, nk::ENUM_BODY)
        .map(|body| {
            let mut cursor = body.walk();
            body.children(&mut cursor)
                .filter(|c| c.kind() == nk::PROPERTY_IDENTIFIER || c.kind() == nk::ENUM_ASSIGNMENT)
                .map(|c| {
                    if c.kind() == nk::ENUM_ASSIGNMENT {
                        let member_name = find_child_by_field(&c, "name")
                            .map(|n| node_text(&n, source).to_string())
                            .unwrap_or_default();
                        let value = find_child_by_field(&c, "value")
                            .map(|n| node_text(&n, source).to_string())
                            .unwrap_or_default();
                        (member_name, value)
                    } else {
                        (node_text(&c, source).to_string(), String::new())
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    let canonical = enum_signature(&members);

    Some(build_symbol(file_path, &qualified_name, SymbolKind::Enum, node, exported, parent_id, &canonical))
}

fn extract_variables(
    node: &Node,
    source: &str,
    file_path: &str,
    prefix: &str,
    parent_id: Option<&str>,
    exported: bool,
    out: &mut Vec<Symbol>,
) {
    let declarators = find_children_by_kind(node, nk::VARIABLE_DECLARATOR);
    for decl in declarators {
        let Some(name_node) = find_child_by_field(&decl, "name") else { continue };
        let Some(name) = extract_identifier(&name_node, source) else { continue };
        let qualified_name = qualify(prefix, &name);
        let type_text = find_child_by_field(&decl, "type")
            .map(|n| node_text(&n, source).to_string())
            .unwrap_or_else(|| {
                find_child_by_field(&decl, "value")
                    .map(|n| node_text(&n, source).to_string())
                    .unwrap_or_default()
            });
        let canonical = type_signature(&type_text);
        out.push(build_symbol(file_path, &qualified_name, SymbolKind::Variable, &decl, exported, parent_id, &canonical));
    }
}

fn extract_namespace(node: &Node, source: &str, file_path: &str, prefix: &str, exported: bool, out: &mut Vec<Symbol>) {
    let Some(name_node) = find_child_by_field(node, "name") else { return };
    let Some(name) = extract_identifier(&name_node, source) else { return };
    let nested_prefix = qualify(prefix, &name);

    let Some(body) = find_child_by_field(node, "body") else { return };
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        walk_statement(&child, source, file_path, &nested_prefix, None, exported, out);
    }
}

fn build_symbol(
    file_path: &str,
    qualified_name: &str,
    kind: SymbolKind,
    node: &Node,
    exported: bool,
    parent_id: Option<&str>,
    canonical_signature: &str,
) -> Symbol {
    Symbol {
        id: Symbol::make_id(file_path, qualified_name),
        file_path: file_path.to_string(),
        qualified_name: qualified_name.to_string(),
        kind,
        line_range: node_to_line_range(node),
        byte_range: node_to_byte_range(node),
        exported,
        parent_id: parent_id.map(|s| s.to_string()),
        signature_hash: signature_hash(canonical_signature),
    }
}
