//! Parser Adapter (spec §4, component 1): thin boundary over tree-sitter's
//! TypeScript grammar. Identifier-use -> declaration resolution is *not*
//! this module's job; that's the `domain::ports::DeclarationResolver`
//! boundary, since the spec treats the type checker as an opaque external
//! collaborator.

pub mod adapter;
pub mod common;
pub mod node_kinds;

pub use adapter::{ParsedFile, ParserAdapter, TreeSitterAdapter};
