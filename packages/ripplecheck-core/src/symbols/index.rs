use super::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from symbol ID to `Symbol` (spec §3 "Symbol Index").
///
/// Owned by the Incremental Updater in the live case; every speculative
/// reader (staged analysis, intent pipeline) works against an independent
/// shallow clone, which `Clone` gives us for free since `Symbol` itself is
/// cheap to duplicate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolIndex {
    symbols: HashMap<String, Symbol>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol.id.clone(), symbol);
    }

    pub fn remove(&mut self, id: &str) -> Option<Symbol> {
        self.symbols.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.symbols.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Symbol)> {
        self.symbols.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.symbols.keys()
    }

    /// Every symbol currently attributed to `file_path`.
    pub fn symbols_in_file<'a>(&'a self, file_path: &'a str) -> impl Iterator<Item = &'a Symbol> {
        self.symbols
            .values()
            .filter(move |s| s.file_path == file_path)
    }

    /// Snapshot of `id -> signatureHash` for every symbol in `file_path`
    /// (spec §4.5 step 1).
    pub fn signature_snapshot(&self, file_path: &str) -> HashMap<String, String> {
        self.symbols_in_file(file_path)
            .map(|s| (s.id.clone(), s.signature_hash.clone()))
            .collect()
    }

    /// Remove and return every symbol belonging to `file_path`.
    pub fn evict_file(&mut self, file_path: &str) -> Vec<Symbol> {
        let ids: Vec<String> = self
            .symbols_in_file(file_path)
            .map(|s| s.id.clone())
            .collect();
        ids.into_iter().filter_map(|id| self.symbols.remove(&id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{ByteRange, LineRange};
    use crate::symbols::symbol::SymbolKind;

    fn sym(file: &str, name: &str, hash: &str) -> Symbol {
        Symbol {
            id: Symbol::make_id(file, name),
            file_path: file.to_string(),
            qualified_name: name.to_string(),
            kind: SymbolKind::Function,
            line_range: LineRange::new(1, 1),
            byte_range: ByteRange::new(0, 1),
            exported: false,
            parent_id: None,
            signature_hash: hash.to_string(),
        }
    }

    #[test]
    fn evict_file_removes_only_that_files_symbols() {
        let mut idx = SymbolIndex::new();
        idx.insert(sym("/a.ts", "foo", "h1"));
        idx.insert(sym("/b.ts", "bar", "h2"));

        let evicted = idx.evict_file("/a.ts");
        assert_eq!(evicted.len(), 1);
        assert!(!idx.contains("/a.ts#foo"));
        assert!(idx.contains("/b.ts#bar"));
    }

    #[test]
    fn signature_snapshot_scopes_to_file() {
        let mut idx = SymbolIndex::new();
        idx.insert(sym("/a.ts", "foo", "h1"));
        idx.insert(sym("/b.ts", "bar", "h2"));

        let snap = idx.signature_snapshot("/a.ts");
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.get("/a.ts#foo"), Some(&"h1".to_string()));
    }
}
