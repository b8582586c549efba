//! Ports that `ripplecheck-core` consumes without owning an implementation.
//!
//! The AST/type-checker is treated as an external collaborator (spec §1):
//! this crate only needs identifier-use → declaration resolution, not a
//! type checker of its own.

/// A declaration site the type checker resolved an identifier use to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclSite {
    /// Absolute, normalized path of the file the declaration lives in.
    pub file_path: String,
    /// Dotted qualified name matching how the Symbol Extractor names it.
    pub qualified_name: String,
    /// True when the declaration is outside the workspace (third-party
    /// dependency or the TypeScript standard library); such resolutions are
    /// not turned into edges.
    pub external: bool,
}

/// Resolves identifier *uses* to their declaration site(s).
///
/// A real implementation backs this with an external TypeScript language
/// service; tests back it with an in-memory map. Resolution failures for
/// malformed or ambient nodes are expected and must be swallowed by the
/// caller (spec §4.2), not propagated as errors.
pub trait DeclarationResolver {
    /// Resolve the identifier at `(file_path, byte_offset)` to every
    /// declaration it could refer to. Returns an empty vec when resolution
    /// is not possible (ambient node, malformed source, etc.).
    fn resolve(&self, file_path: &str, byte_offset: usize) -> Vec<DeclSite>;
}
