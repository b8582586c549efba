//! Blast-Radius Engine (spec §4.8): multi-source BFS over reverse edges,
//! with per-root parent maps, shallow-vs-deep arbitration, and full path
//! reconstruction.

use ripplecheck_core::graph::GraphStore;
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationMode {
    Shallow,
    Deep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    BodyChange,
    SignatureRipple,
    Deleted,
    Renamed,
}

impl Reason {
    /// Priority, high to low: `deleted > signature-ripple > renamed >
    /// body-change` (spec §3).
    fn priority(self) -> u8 {
        match self {
            Reason::Deleted => 3,
            Reason::SignatureRipple => 2,
            Reason::Renamed => 1,
            Reason::BodyChange => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactRoot {
    pub symbol_id: String,
    pub propagation_mode: PropagationMode,
    pub reason: Reason,
}

/// Keep the highest-priority reason per id when the same symbol is
/// nominated as a root under multiple reasons (spec §§4.7, 4.9, 8).
pub fn dedupe_roots(candidates: Vec<ImpactRoot>) -> Vec<ImpactRoot> {
    let mut best: HashMap<String, ImpactRoot> = HashMap::new();
    for candidate in candidates {
        match best.get(&candidate.symbol_id) {
            Some(existing) if existing.reason.priority() >= candidate.reason.priority() => {}
            _ => {
                best.insert(candidate.symbol_id.clone(), candidate);
            }
        }
    }
    best.into_values().collect()
}

#[derive(Debug, Clone, Default)]
pub struct BlastRadiusResult {
    pub roots: Vec<ImpactRoot>,
    pub direct_impact: HashSet<String>,
    pub indirect_impact: HashSet<String>,
    pub depth_map: HashMap<String, u32>,
    pub paths: HashMap<String, Vec<Vec<String>>>,
}

pub struct BlastRadiusEngine;

impl BlastRadiusEngine {
    #[tracing::instrument(skip(roots, graph), fields(root_count = roots.len()))]
    pub fn run(roots: &[ImpactRoot], graph: &GraphStore) -> BlastRadiusResult {
        let root_ids: HashSet<&str> = roots.iter().map(|r| r.symbol_id.as_str()).collect();

        // Pass 1: one independent BFS per deep root, each with its own
        // parent map, plus a shared minimum-depth map across all of them.
        let mut global_depth: HashMap<String, u32> = HashMap::new();
        let mut deep_parents: HashMap<String, HashMap<String, Option<String>>> = HashMap::new();

        for root in roots.iter().filter(|r| r.propagation_mode == PropagationMode::Deep) {
            let mut parent: HashMap<String, Option<String>> = HashMap::new();
            parent.insert(root.symbol_id.clone(), None);
            let mut queue = VecDeque::new();
            queue.push_back((root.symbol_id.clone(), 0u32));

            while let Some((current, depth)) = queue.pop_front() {
                for next in graph.dependents(&current) {
                    if parent.contains_key(&next) {
                        continue;
                    }
                    parent.insert(next.clone(), Some(current.clone()));
                    let next_depth = depth + 1;
                    global_depth
                        .entry(next.clone())
                        .and_modify(|d| *d = (*d).min(next_depth))
                        .or_insert(next_depth);
                    queue.push_back((next, next_depth));
                }
            }
            deep_parents.insert(root.symbol_id.clone(), parent);
        }

        // Pass 2: one-hop expansion for shallow roots. Deep always wins.
        let mut shallow_parent: HashMap<String, String> = HashMap::new();
        for root in roots.iter().filter(|r| r.propagation_mode == PropagationMode::Shallow) {
            for neighbor in graph.dependents(&root.symbol_id) {
                if root_ids.contains(neighbor.as_str()) {
                    continue;
                }
                shallow_parent.entry(neighbor).or_insert_with(|| root.symbol_id.clone());
            }
        }

        let mut depth_map: HashMap<String, u32> = HashMap::new();
        let mut direct_impact = HashSet::new();
        let mut indirect_impact = HashSet::new();

        for (id, depth) in &global_depth {
            if root_ids.contains(id.as_str()) {
                continue;
            }
            depth_map.insert(id.clone(), *depth);
            if *depth == 1 {
                direct_impact.insert(id.clone());
            } else {
                indirect_impact.insert(id.clone());
            }
        }
        for id in shallow_parent.keys() {
            if root_ids.contains(id.as_str()) || depth_map.contains_key(id) {
                continue;
            }
            depth_map.insert(id.clone(), 1);
            direct_impact.insert(id.clone());
        }

        let mut paths: HashMap<String, Vec<Vec<String>>> = HashMap::new();
        for id in depth_map.keys() {
            let mut id_paths = Vec::new();
            for (root_id, parent_map) in &deep_parents {
                if let Some(path) = reconstruct_path(root_id, id, parent_map) {
                    id_paths.push(path);
                }
            }
            if let Some(shallow_root) = shallow_parent.get(id) {
                id_paths.push(vec![shallow_root.clone(), id.clone()]);
            }
            if !id_paths.is_empty() {
                paths.insert(id.clone(), id_paths);
            }
        }

        tracing::debug!(direct = direct_impact.len(), indirect = indirect_impact.len(), "blast radius computed");

        BlastRadiusResult {
            roots: roots.to_vec(),
            direct_impact,
            indirect_impact,
            depth_map,
            paths,
        }
    }
}

fn reconstruct_path(root_id: &str, target: &str, parent_map: &HashMap<String, Option<String>>) -> Option<Vec<String>> {
    if !parent_map.contains_key(target) {
        return None;
    }
    let mut chain = vec![target.to_string()];
    let mut cursor = target.to_string();
    loop {
        match parent_map.get(&cursor) {
            Some(Some(predecessor)) => {
                chain.push(predecessor.clone());
                cursor = predecessor.clone();
            }
            _ => break,
        }
    }
    chain.reverse();
    if chain.first().map(String::as_str) == Some(root_id) {
        Some(chain)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(id: &str, mode: PropagationMode, reason: Reason) -> ImpactRoot {
        ImpactRoot {
            symbol_id: id.to_string(),
            propagation_mode: mode,
            reason,
        }
    }

    #[test]
    fn scenario_single_file_body_change() {
        // A -> B, C -> A; B's body changes, shallow body-change root.
        let mut g = GraphStore::new();
        g.add_edge("A", "B");
        g.add_edge("C", "A");
        let roots = vec![root("B", PropagationMode::Shallow, Reason::BodyChange)];
        let result = BlastRadiusEngine::run(&roots, &g);

        assert_eq!(result.direct_impact, HashSet::from(["A".to_string()]));
        assert!(result.indirect_impact.is_empty());
        assert_eq!(result.depth_map.get("A"), Some(&1));
        assert_eq!(result.paths.get("A"), Some(&vec![vec!["B".to_string(), "A".to_string()]]));
    }

    #[test]
    fn scenario_signature_ripple() {
        let mut g = GraphStore::new();
        g.add_edge("A", "B");
        g.add_edge("C", "A");
        let roots = vec![root("B", PropagationMode::Deep, Reason::SignatureRipple)];
        let result = BlastRadiusEngine::run(&roots, &g);

        assert_eq!(result.direct_impact, HashSet::from(["A".to_string()]));
        assert_eq!(result.indirect_impact, HashSet::from(["C".to_string()]));
        assert_eq!(result.depth_map.get("A"), Some(&1));
        assert_eq!(result.depth_map.get("C"), Some(&2));
        assert_eq!(result.paths.get("C"), Some(&vec![vec!["B".to_string(), "A".to_string(), "C".to_string()]]));
    }

    #[test]
    fn scenario_multi_root_deep_and_shallow_on_same_node() {
        // A -> B, A -> C, X -> A; B deep (signature-ripple), C shallow (body-change).
        let mut g = GraphStore::new();
        g.add_edge("A", "B");
        g.add_edge("A", "C");
        g.add_edge("X", "A");
        let roots = vec![
            root("B", PropagationMode::Deep, Reason::SignatureRipple),
            root("C", PropagationMode::Shallow, Reason::BodyChange),
        ];
        let result = BlastRadiusEngine::run(&roots, &g);

        assert!(result.direct_impact.contains("A"));
        assert_eq!(result.depth_map.get("A"), Some(&1));
        let a_paths = result.paths.get("A").unwrap();
        assert!(a_paths.contains(&vec!["B".to_string(), "A".to_string()]));
        assert!(a_paths.contains(&vec!["C".to_string(), "A".to_string()]));

        assert_eq!(result.depth_map.get("X"), Some(&2));
        assert_eq!(result.paths.get("X"), Some(&vec![vec!["B".to_string(), "A".to_string(), "X".to_string()]]));
    }

    #[test]
    fn cycles_terminate_and_record_minimum_depth() {
        let mut g = GraphStore::new();
        g.add_edge("A", "B");
        g.add_edge("B", "A");
        let roots = vec![root("A", PropagationMode::Deep, Reason::Deleted)];
        let result = BlastRadiusEngine::run(&roots, &g);
        assert_eq!(result.depth_map.get("B"), Some(&1));
        assert!(!result.depth_map.contains_key("A"));
    }

    #[test]
    fn dedupe_keeps_highest_priority_reason() {
        let candidates = vec![
            root("A", PropagationMode::Shallow, Reason::BodyChange),
            root("A", PropagationMode::Deep, Reason::Deleted),
            root("A", PropagationMode::Deep, Reason::Renamed),
        ];
        let deduped = dedupe_roots(candidates);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].reason, Reason::Deleted);
    }

    #[test]
    fn roots_never_appear_in_depth_map_or_impact_lists() {
        let mut g = GraphStore::new();
        g.add_edge("A", "B");
        let roots = vec![root("B", PropagationMode::Deep, Reason::Deleted)];
        let result = BlastRadiusEngine::run(&roots, &g);
        assert!(!result.depth_map.contains_key("B"));
        assert!(!result.direct_impact.contains("B"));
        assert!(!result.indirect_impact.contains("B"));
    }
}
