use crate::errors::{ErrorKind, Result, RippleError};
use tree_sitter::{Parser, Tree};

/// A file that has been parsed: its own source text plus the tree, kept
/// together because byte offsets into the tree are only meaningful against
/// this exact text.
pub struct ParsedFile {
    pub file_path: String,
    pub source: String,
    pub tree: Tree,
}

/// Per-file parse boundary (spec §4, component 1). Symbol enumeration lives
/// in `symbols::SymbolExtractor`; identifier resolution lives behind
/// `domain::ports::DeclarationResolver`. This trait only owns turning text
/// into a syntax tree.
pub trait ParserAdapter {
    fn parse(&self, file_path: &str, source: &str) -> Result<ParsedFile>;
}

/// tree-sitter-backed adapter for the TypeScript/TSX grammar.
#[derive(Clone, Copy)]
pub struct TreeSitterAdapter;

impl TreeSitterAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TreeSitterAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserAdapter for TreeSitterAdapter {
    fn parse(&self, file_path: &str, source: &str) -> Result<ParsedFile> {
        let mut parser = Parser::new();
        let language = if file_path.ends_with(".tsx") {
            tree_sitter_typescript::language_tsx()
        } else {
            tree_sitter_typescript::language_typescript()
        };
        parser
            .set_language(&language)
            .map_err(|e| RippleError::new(ErrorKind::Parse, "failed to load grammar").with_source(e))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| RippleError::parse(format!("tree-sitter produced no tree for {file_path}")))?;

        Ok(ParsedFile {
            file_path: file_path.to_string(),
            source: source.to_string(),
            tree,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_function_declaration() {
        let adapter = TreeSitterAdapter::new();
        let parsed = adapter
            .parse("/src/a.ts", "export function add(a: number, b: number): number { return a + b; }")
            .expect("parse should succeed");
        assert_eq!(parsed.tree.root_node().kind(), "program");
        assert!(!parsed.tree.root_node().has_error());
    }

    #[test]
    fn tsx_extension_selects_tsx_grammar() {
        let adapter = TreeSitterAdapter::new();
        let parsed = adapter
            .parse("/src/a.tsx", "export const X = () => <div />;")
            .expect("parse should succeed");
        assert!(!parsed.tree.root_node().has_error());
    }
}
