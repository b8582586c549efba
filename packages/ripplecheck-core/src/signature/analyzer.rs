use crate::graph::GraphStore;
use crate::symbols::SymbolIndex;
use std::collections::{HashMap, HashSet};

/// Partition of a file's symbols between a pre-parse snapshot and its
/// post-parse index (spec §4.4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub added: HashSet<String>,
    pub ripple: HashSet<String>,
    pub safe: HashSet<String>,
    pub removed: HashSet<String>,
}

pub struct SignatureAnalyzer;

impl SignatureAnalyzer {
    /// `snapshot` is `{id -> signatureHash}` for the symbols that belonged
    /// to the file before re-parsing; `post_index` is the live index after
    /// re-extraction. `file_path` scopes which post-parse symbols count.
    pub fn diff(snapshot: &HashMap<String, String>, post_index: &SymbolIndex, file_path: &str) -> DiffReport {
        let mut report = DiffReport::default();

        for symbol in post_index.symbols_in_file(file_path) {
            match snapshot.get(&symbol.id) {
                None => {
                    report.added.insert(symbol.id.clone());
                }
                Some(old_hash) if old_hash != &symbol.signature_hash => {
                    report.ripple.insert(symbol.id.clone());
                }
                Some(_) => {
                    report.safe.insert(symbol.id.clone());
                }
            }
        }

        for id in snapshot.keys() {
            if !post_index.contains(id) {
                report.removed.insert(id.clone());
            }
        }

        report
    }

    /// Whole-graph ghost sweep: ids still referenced in the graph but
    /// absent from the index. Each ghost is treated as destructively
    /// changed.
    pub fn ghosts(graph: &GraphStore, index: &SymbolIndex) -> HashSet<String> {
        graph.ghost_symbols(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{ByteRange, LineRange};
    use crate::symbols::{Symbol, SymbolKind};

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
    fn classifies_added_ripple_safe_removed() {
        let mut snapshot = HashMap::new();
        snapshot.insert("/a.ts#foo".to_string(), "h1".to_string());
        snapshot.insert("/a.ts#bar".to_string(), "h2".to_string());
        snapshot.insert("/a.ts#gone".to_string(), "h3".to_string());

        let mut index = SymbolIndex::new();
        index.insert(sym("/a.ts", "foo", "h1")); // unchanged
        index.insert(sym("/a.ts", "bar", "h2-changed")); // ripple
        index.insert(sym("/a.ts", "new", "h4")); // added

        let report = SignatureAnalyzer::diff(&snapshot, &index, "/a.ts");
        assert_eq!(report.safe, HashSet::from(["/a.ts#foo".to_string()]));
        assert_eq!(report.ripple, HashSet::from(["/a.ts#bar".to_string()]));
        assert_eq!(report.added, HashSet::from(["/a.ts#new".to_string()]));
        assert_eq!(report.removed, HashSet::from(["/a.ts#gone".to_string()]));
    }
}
