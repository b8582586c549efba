use crate::domain::ports::DeclarationResolver;
use crate::graph::GraphStore;
use crate::parser::adapter::ParsedFile;
use crate::parser::common::{extract_identifier, find_child_by_field, is_binding_site};
use crate::parser::node_kinds as nk;
use crate::shared::qualify;
use crate::symbols::Symbol;
use tree_sitter::Node;

/// Walks one file's AST, recording `owner -> referenced` edges into `graph`.
/// Running this on a single file only ever produces edges whose source
/// belongs to that file (spec §4.2).
pub struct ReferenceWalker;

impl ReferenceWalker {
    #[tracing::instrument(skip_all, fields(file = %parsed.file_path))]
    pub fn walk_file<R: DeclarationResolver>(parsed: &ParsedFile, resolver: &R, graph: &mut GraphStore) {
        let root = parsed.tree.root_node();
        let mut owner_stack: Vec<String> = Vec::new();
        walk_node(&root, parsed, resolver, "", &mut owner_stack, graph);
        tracing::debug!("walked references for file");
    }
}

fn walk_children<R: DeclarationResolver>(
    node: &Node,
    parsed: &ParsedFile,
    resolver: &R,
    prefix: &str,
    owner_stack: &mut Vec<String>,
    graph: &mut GraphStore,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_node(&child, parsed, resolver, prefix, owner_stack, graph);
    }
}

fn walk_node<R: DeclarationResolver>(
    node: &Node,
    parsed: &ParsedFile,
    resolver: &R,
    prefix: &str,
    owner_stack: &mut Vec<String>,
    graph: &mut GraphStore,
) {
    let source = parsed.source.as_str();

    match node.kind() {
        nk::IDENTIFIER | nk::TYPE_IDENTIFIER => {
            if !is_binding_site(node) {
                if let Some(owner_id) = owner_stack.last().cloned() {
                    for decl in resolver.resolve(&parsed.file_path, node.start_byte()) {
                        if decl.external {
                            continue;
                        }
                        let target_id = Symbol::make_id(&decl.file_path, &decl.qualified_name);
                        graph.add_edge(&owner_id, &target_id);
                    }
                }
            }
            // identifiers are leaves; nothing further to walk.
        }

        nk::CLASS_DECLARATION => {
            let Some(name) = find_child_by_field(node, "name").and_then(|n| extract_identifier(&n, source)) else {
                walk_children(node, parsed, resolver, prefix, owner_stack, graph);
                return;
            };
            let qualified = qualify(prefix, &name);
            let class_id = Symbol::make_id(&parsed.file_path, &qualified);

            owner_stack.push(class_id);
            if let Some(body) = find_child_by_field(node, "body") {
                walk_children(&body, parsed, resolver, &qualified, owner_stack, graph);
            }
            owner_stack.pop();
        }

        // Constructors inherit the enclosing class's owner frame: no push.
        nk::CONSTRUCTOR => {
            walk_children(node, parsed, resolver, prefix, owner_stack, graph);
        }

        nk::FUNCTION_DECLARATION
        | nk::GENERATOR_FUNCTION_DECLARATION
        | nk::METHOD_DEFINITION
        | nk::GENERATOR_FUNCTION => {
            let named = find_child_by_field(node, "name").and_then(|n| extract_identifier(&n, source));
            match named {
                Some(name) => {
                    let qualified = qualify(prefix, &name);
                    let owner_id = Symbol::make_id(&parsed.file_path, &qualified);
                    owner_stack.push(owner_id);
                    walk_children(node, parsed, resolver, prefix, owner_stack, graph);
                    owner_stack.pop();
                }
                None => walk_children(node, parsed, resolver, prefix, owner_stack, graph),
            }
        }

        nk::VARIABLE_DECLARATOR => {
            let name = find_child_by_field(node, "name").and_then(|n| extract_identifier(&n, source));
            let value = find_child_by_field(node, "value");
            match (name, value) {
                (Some(name), Some(value)) if value.kind() == nk::ARROW_FUNCTION || value.kind() == nk::FUNCTION_EXPRESSION => {
                    let qualified = qualify(prefix, &name);
                    let owner_id = Symbol::make_id(&parsed.file_path, &qualified);
                    owner_stack.push(owner_id);
                    walk_node(&value, parsed, resolver, prefix, owner_stack, graph);
                    owner_stack.pop();
                }
                (_, Some(value)) => {
                    walk_node(&value, parsed, resolver, prefix, owner_stack, graph);
                }
                _ => {}
            }
        }

        nk::MODULE_DECLARATION | nk::AMBIENT_DECLARATION => {
            let Some(name) = find_child_by_field(node, "name").and_then(|n| extract_identifier(&n, source)) else {
                walk_children(node, parsed, resolver, prefix, owner_stack, graph);
                return;
            };
            let nested_prefix = qualify(prefix, &name);
            if let Some(body) = find_child_by_field(node, "body") {
                walk_children(&body, parsed, resolver, &nested_prefix, owner_stack, graph);
            }
        }

        // Arrow functions not bound to a named variable attribute their
        // references to whatever owner is already on the stack (spec §9
        // open question, resolved: attribute to enclosing owner).
        _ => {
            walk_children(node, parsed, resolver, prefix, owner_stack, graph);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::DeclSite;
    use crate::parser::{ParserAdapter, TreeSitterAdapter};
    use std::collections::HashMap;

    struct MapResolver {
        decls: HashMap<usize, DeclSite>,
    }

    impl DeclarationResolver for MapResolver {
        fn resolve(&self, _file_path: &str, byte_offset: usize) -> Vec<DeclSite> {
            self.decls.get(&byte_offset).cloned().into_iter().collect()
        }
    }

    fn decl(file: &str, name: &str) -> DeclSite {
        DeclSite {
            file_path: file.to_string(),
            qualified_name: name.to_string(),
            external: false,
        }
    }

    #[test]
    fn records_edge_from_function_owner_to_referenced_declaration() {
        let source = "function caller() { callee(); }";
        let parsed = TreeSitterAdapter::new().parse("/a.ts", source).unwrap();
        // byte offset of the `callee` identifier in the call expression.
        let offset = source.find("callee()").unwrap();
        let mut decls = HashMap::new();
        decls.insert(offset, decl("/a.ts", "callee"));
        let resolver = MapResolver { decls };

        let mut graph = GraphStore::new();
        ReferenceWalker::walk_file(&parsed, &resolver, &mut graph);

        assert!(graph
            .dependencies("/a.ts#caller")
            .contains("/a.ts#callee"));
    }

    #[test]
    fn self_reference_does_not_create_a_self_loop() {
        let source = "function recurse() { recurse(); }";
        let parsed = TreeSitterAdapter::new().parse("/a.ts", source).unwrap();
        let offset = source.rfind("recurse()").unwrap();
        let mut decls = HashMap::new();
        decls.insert(offset, decl("/a.ts", "recurse"));
        let resolver = MapResolver { decls };

        let mut graph = GraphStore::new();
        ReferenceWalker::walk_file(&parsed, &resolver, &mut graph);

        assert!(graph.dependencies("/a.ts#recurse").is_empty());
    }

    #[test]
    fn external_declarations_do_not_produce_edges() {
        let source = "function caller() { external(); }";
        let parsed = TreeSitterAdapter::new().parse("/a.ts", source).unwrap();
        let offset = source.find("external()").unwrap();
        let mut decls = HashMap::new();
        decls.insert(
            offset,
            DeclSite {
                file_path: "/node_modules/pkg/index.d.ts".to_string(),
                qualified_name: "external".to_string(),
                external: true,
            },
        );
        let resolver = MapResolver { decls };

        let mut graph = GraphStore::new();
        ReferenceWalker::walk_file(&parsed, &resolver, &mut graph);

        assert!(graph.forward_map().is_empty());
    }
}
