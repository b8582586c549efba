use crate::symbols::{Symbol, SymbolIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Forward and reverse adjacency maps over symbol IDs, kept mirrored.
///
/// Invariants (spec §3): `y ∈ forward[x] ⇔ x ∈ reverse[y]`; no self-loops;
/// a key whose set becomes empty is removed entirely.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    forward: HashMap<String, HashSet<String>>,
    reverse: HashMap<String, HashSet<String>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `src -> tgt`. Self-loops are silently suppressed (spec §4.2).
    /// Returns `true` if a new edge was recorded.
    pub fn add_edge(&mut self, src: &str, tgt: &str) -> bool {
        if src == tgt {
            return false;
        }
        let inserted = self
            .forward
            .entry(src.to_string())
            .or_default()
            .insert(tgt.to_string());
        self.reverse
            .entry(tgt.to_string())
            .or_default()
            .insert(src.to_string());
        inserted
    }

    pub fn remove_edge(&mut self, src: &str, tgt: &str) {
        if let Some(set) = self.forward.get_mut(src) {
            set.remove(tgt);
            if set.is_empty() {
                self.forward.remove(src);
            }
        }
        if let Some(set) = self.reverse.get_mut(tgt) {
            set.remove(src);
            if set.is_empty() {
                self.reverse.remove(tgt);
            }
        }
    }

    /// Ids that reference `id` (reverse neighbors) — the blast-radius
    /// traversal's primary access pattern.
    pub fn dependents(&self, id: &str) -> HashSet<String> {
        self.reverse.get(id).cloned().unwrap_or_default()
    }

    /// Ids that `id` itself references (forward neighbors).
    pub fn dependencies(&self, id: &str) -> HashSet<String> {
        self.forward.get(id).cloned().unwrap_or_default()
    }

    pub fn forward_map(&self) -> &HashMap<String, HashSet<String>> {
        &self.forward
    }

    pub fn reverse_map(&self) -> &HashMap<String, HashSet<String>> {
        &self.reverse
    }

    /// Remove every edge whose source or target belongs to `file_path`, and
    /// delete those symbols from `index`. Returns the removed symbols.
    pub fn evict_file(&mut self, file_path: &str, index: &mut SymbolIndex) -> Vec<Symbol> {
        let ids: HashSet<String> = index
            .symbols_in_file(file_path)
            .map(|s| s.id.clone())
            .collect();

        for id in &ids {
            let targets: Vec<String> = self.forward.get(id).cloned().unwrap_or_default().into_iter().collect();
            for t in targets {
                self.remove_edge(id, &t);
            }
            let sources: Vec<String> = self.reverse.get(id).cloned().unwrap_or_default().into_iter().collect();
            for s in sources {
                self.remove_edge(&s, id);
            }
        }

        ids.iter().filter_map(|id| index.remove(id)).collect()
    }

    /// Ids appearing as a source or target in the graph but absent from
    /// `index` — symbols still referenced with no declaration (spec §4.4).
    pub fn ghost_symbols(&self, index: &SymbolIndex) -> HashSet<String> {
        self.forward
            .keys()
            .chain(self.reverse.keys())
            .filter(|id| !index.contains(id))
            .cloned()
            .collect()
    }

    pub fn to_json(&self) -> GraphJson {
        GraphJson {
            forward: sorted_map(&self.forward),
            reverse: sorted_map(&self.reverse),
        }
    }

    pub fn from_json(json: GraphJson) -> Self {
        Self {
            forward: unsorted_map(json.forward),
            reverse: unsorted_map(json.reverse),
        }
    }

    #[cfg(test)]
    pub fn check_mirror(&self) -> bool {
        for (x, targets) in &self.forward {
            for y in targets {
                if !self.reverse.get(y).is_some_and(|s| s.contains(x)) {
                    return false;
                }
            }
        }
        for (y, sources) in &self.reverse {
            for x in sources {
                if !self.forward.get(x).is_some_and(|s| s.contains(y)) {
                    return false;
                }
            }
        }
        true
    }

    #[cfg(test)]
    pub fn check_no_self_loop(&self) -> bool {
        self.forward.iter().all(|(x, targets)| !targets.contains(x))
    }

    #[cfg(test)]
    pub fn check_no_empty_sets(&self) -> bool {
        self.forward.values().all(|s| !s.is_empty()) && self.reverse.values().all(|s| !s.is_empty())
    }
}

fn sorted_map(map: &HashMap<String, HashSet<String>>) -> HashMap<String, Vec<String>> {
    map.iter()
        .map(|(k, v)| {
            let mut vals: Vec<String> = v.iter().cloned().collect();
            vals.sort();
            (k.clone(), vals)
        })
        .collect()
}

fn unsorted_map(map: HashMap<String, Vec<String>>) -> HashMap<String, HashSet<String>> {
    map.into_iter().map(|(k, v)| (k, v.into_iter().collect())).collect()
}

/// Object-of-arrays wire form written/read by the Cache Layer (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphJson {
    pub forward: HashMap<String, Vec<String>>,
    pub reverse: HashMap<String, Vec<String>>,
}
