//! In-Editor (Unstaged) Blast Radius (spec §4.10): a transient
//! reverse-edge overlay built from a pre-eviction snapshot, so removed
//! symbols still produce dependents even after `evictFile` has dropped
//! their edges. Never mutates the live graph.

use crate::blast_radius::{BlastRadiusEngine, BlastRadiusResult, ImpactRoot, PropagationMode, Reason};
use ripplecheck_core::graph::GraphStore;
use ripplecheck_core::signature::DiffReport;
use std::collections::HashMap;

/// Snapshot of dependents for symbols about to be removed, taken BEFORE
/// `handle_file_changed`/`handle_file_deleted` runs `evictFile`.
pub fn snapshot_removed_dependents(removed_ids: &[String], graph: &GraphStore) -> HashMap<String, Vec<String>> {
    removed_ids
        .iter()
        .map(|id| (id.clone(), graph.dependents(id).into_iter().collect()))
        .collect()
}

/// Builds Impact Roots for a buffer's `DiffReport` (ripple + removed
/// symbols), then runs the Blast-Radius Engine against the live graph plus
/// a transient overlay reconstructed from `removed_dependents`.
#[tracing::instrument(skip(diff, live_graph, removed_dependents))]
pub fn analyze_editor_change(diff: &DiffReport, live_graph: &GraphStore, removed_dependents: &HashMap<String, Vec<String>>) -> BlastRadiusResult {
    let mut roots: Vec<ImpactRoot> = diff
        .ripple
        .iter()
        .map(|id| ImpactRoot { symbol_id: id.clone(), propagation_mode: PropagationMode::Deep, reason: Reason::SignatureRipple })
        .collect();
    roots.extend(diff.removed.iter().map(|id| ImpactRoot {
        symbol_id: id.clone(),
        propagation_mode: PropagationMode::Deep,
        reason: Reason::Deleted,
    }));

    let mut overlay = live_graph.clone();
    for removed_id in &diff.removed {
        let Some(dependents) = removed_dependents.get(removed_id) else { continue };
        for dependent in dependents {
            overlay.add_edge(dependent, removed_id);
        }
    }

    BlastRadiusEngine::run(&roots, &overlay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripplecheck_core::shared::{ByteRange, LineRange};
    use ripplecheck_core::symbols::{Symbol, SymbolIndex, SymbolKind};
    use std::collections::HashSet;

    fn sym(file: &str, name: &str) -> Symbol {
        Symbol {
            id: Symbol::make_id(file, name),
            file_path: file.to_string(),
            qualified_name: name.to_string(),
            kind: SymbolKind::Function,
            line_range: LineRange::new(1, 1),
            byte_range: ByteRange::new(0, 1),
            exported: false,
            parent_id: None,
            signature_hash: "h".to_string(),
        }
    }

    #[test]
    fn removed_symbol_still_reaches_its_dependents_via_the_overlay() {
        let mut graph = GraphStore::new();
        graph.add_edge("/a.ts#caller", "/a.ts#removed");

        let snapshot = snapshot_removed_dependents(&["/a.ts#removed".to_string()], &graph);

        let mut index = SymbolIndex::new();
        index.insert(sym("/a.ts", "removed"));
        graph.evict_file("/a.ts", &mut index);
        assert!(graph.dependents("/a.ts#removed").is_empty());

        let diff = DiffReport {
            removed: HashSet::from(["/a.ts#removed".to_string()]),
            ..Default::default()
        };
        let result = analyze_editor_change(&diff, &graph, &snapshot);
        assert!(result.direct_impact.contains("/a.ts#caller"));
    }

    #[test]
    fn live_graph_is_never_mutated_by_the_overlay() {
        let mut graph = GraphStore::new();
        graph.add_edge("/a.ts#caller", "/a.ts#ripple");
        let before = graph.forward_map().clone();

        let diff = DiffReport {
            ripple: HashSet::from(["/a.ts#ripple".to_string()]),
            ..Default::default()
        };
        analyze_editor_change(&diff, &graph, &HashMap::new());

        assert_eq!(graph.forward_map(), &before);
    }
}
