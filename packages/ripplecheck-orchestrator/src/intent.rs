//! Intent Pipeline (spec §4.9): two-pass fuzzy resolution from a natural
//! language prompt to Impact Roots, run against a shadow index/graph but
//! evaluated for blast radius on the live graph.

use crate::blast_radius::{dedupe_roots, BlastRadiusEngine, BlastRadiusResult, ImpactRoot, PropagationMode, Reason};
use crate::oracle::{ChangeType, IntentDescriptor};
use ripplecheck_core::graph::GraphStore;
use ripplecheck_core::shared::{ByteRange, LineRange};
use ripplecheck_core::symbols::{Symbol, SymbolIndex, SymbolKind};
use std::collections::{HashMap, HashSet};

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "it", "its", "we", "you", "i",
    "to", "of", "in", "on", "for", "with", "and", "or", "is", "are", "be", "was",
    "add", "remove", "change", "use", "make", "update", "fix", "file", "function", "module",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    fn from_score(score: f64, cfg: &crate::config::RippleConfig) -> Self {
        if score >= cfg.confidence_high {
            Confidence::High
        } else if score >= cfg.confidence_medium {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    fn demote(self) -> Self {
        match self {
            Confidence::High => Confidence::Medium,
            Confidence::Medium => Confidence::Low,
            Confidence::Low => Confidence::Low,
        }
    }
}

#[derive(Debug, Clone)]
struct ResolvedCandidate {
    symbol_id: String,
    confidence: Confidence,
}

#[derive(Debug, Clone, Default)]
pub struct IntentAnalysisResult {
    pub is_relevant: bool,
    pub blast_radius: BlastRadiusResult,
    pub confidence_by_symbol: HashMap<String, Confidence>,
}

pub struct IntentPipeline;

impl IntentPipeline {
    /// Shallow-clones `live_index`, deep-clones `live_graph` for the
    /// virtual diff, then runs the Blast-Radius Engine against the live
    /// graph (spec §4.9: "we want who currently depends on these").
    #[tracing::instrument(skip(descriptor, live_index, live_graph, cfg), fields(prompt = %descriptor.prompt))]
    pub fn analyze(
        descriptor: &IntentDescriptor,
        live_index: &SymbolIndex,
        live_graph: &GraphStore,
        cfg: &crate::config::RippleConfig,
    ) -> IntentAnalysisResult {
        let pass_a = resolve_pass_a(descriptor, live_index, cfg);
        let pass_b = resolve_pass_b(descriptor, live_index, cfg);

        let best_pass_b_score = pass_b.iter().map(|(_, score)| *score).fold(0.0_f64, f64::max);
        let is_relevant = !pass_a.is_empty() || best_pass_b_score >= cfg.relevance_threshold;

        if !is_relevant {
            return IntentAnalysisResult { is_relevant: false, ..Default::default() };
        }

        let resolved: Vec<ResolvedCandidate> = if !pass_a.is_empty() {
            let mut a = pass_a;
            a.sort_by(|x, y| y.1.partial_cmp(&x.1).unwrap());
            a.truncate(cfg.max_resolved_hints);
            a.into_iter()
                .map(|(id, score)| ResolvedCandidate { symbol_id: id, confidence: Confidence::from_score(score, cfg) })
                .collect()
        } else {
            let mut b = pass_b;
            b.sort_by(|x, y| y.1.partial_cmp(&x.1).unwrap());
            b.truncate(cfg.max_resolved_keywords);
            b.into_iter()
                .map(|(id, score)| ResolvedCandidate { symbol_id: id, confidence: Confidence::from_score(score, cfg) })
                .collect()
        };

        let mut shadow_index = live_index.clone();
        // Deep-cloned per the virtual-diff contract even though blast radius
        // below runs against the live graph; kept for callers that want to
        // inspect the shadow graph's shape after resolution.
        let _shadow_graph = live_graph.clone();
        let mut candidates = Vec::new();
        let mut root_confidence: HashMap<String, Confidence> = HashMap::new();
        let mut root_files: HashSet<String> = HashSet::new();

        for candidate in &resolved {
            root_confidence.insert(candidate.symbol_id.clone(), candidate.confidence);
            if let Some(symbol) = shadow_index.get(&candidate.symbol_id) {
                root_files.insert(symbol.file_path.clone());
            }

            match descriptor.change_type {
                ChangeType::Delete => {
                    shadow_index.remove(&candidate.symbol_id);
                    candidates.push(ImpactRoot { symbol_id: candidate.symbol_id.clone(), propagation_mode: PropagationMode::Deep, reason: Reason::Deleted });
                }
                _ if descriptor.affects_public_api => {
                    candidates.push(ImpactRoot { symbol_id: candidate.symbol_id.clone(), propagation_mode: PropagationMode::Deep, reason: Reason::SignatureRipple });
                }
                _ => {
                    candidates.push(ImpactRoot { symbol_id: candidate.symbol_id.clone(), propagation_mode: PropagationMode::Shallow, reason: Reason::BodyChange });
                }
            }
        }

        if descriptor.change_type == ChangeType::Add {
            let resolved_ids: HashSet<&str> = resolved.iter().map(|c| c.symbol_id.as_str()).collect();
            for hint in &descriptor.symbol_hints {
                let already_resolved = live_index
                    .iter()
                    .any(|(id, s)| s.qualified_name.eq_ignore_ascii_case(hint) && resolved_ids.contains(id.as_str()));
                if !already_resolved {
                    shadow_index.insert(phantom_symbol(hint));
                }
            }
        }
        let roots = dedupe_roots(candidates);
        let mut blast_radius = BlastRadiusEngine::run(&roots, live_graph);

        if descriptor.change_type == ChangeType::Delete {
            blast_radius.direct_impact.retain(|id| !is_in_root_file(id, live_index, &root_files));
            blast_radius.indirect_impact.retain(|id| !is_in_root_file(id, live_index, &root_files));
            blast_radius.depth_map.retain(|id, _| !is_in_root_file(id, live_index, &root_files));
            blast_radius.paths.retain(|id, _| !is_in_root_file(id, live_index, &root_files));
        }

        let confidence_by_symbol = compute_confidence(&blast_radius, &root_confidence);

        IntentAnalysisResult { is_relevant: true, blast_radius, confidence_by_symbol }
    }
}

fn is_in_root_file(id: &str, index: &SymbolIndex, root_files: &HashSet<String>) -> bool {
    index.get(id).map(|s| root_files.contains(&s.file_path)).unwrap_or(false)
}

fn compute_confidence(result: &BlastRadiusResult, root_confidence: &HashMap<String, Confidence>) -> HashMap<String, Confidence> {
    let mut best: HashMap<String, Confidence> = HashMap::new();
    for (id, paths) in &result.paths {
        for path in paths {
            let Some(root_id) = path.first() else { continue };
            let Some(&root_conf) = root_confidence.get(root_id) else { continue };
            let depth = path.len().saturating_sub(1);
            let effective = if depth <= 1 { root_conf } else { root_conf.demote() };
            best.entry(id.clone())
                .and_modify(|c| *c = (*c).max(effective))
                .or_insert(effective);
        }
    }
    best
}

fn phantom_symbol(name: &str) -> Symbol {
    Symbol {
        id: Symbol::phantom_id(name),
        file_path: String::new(),
        qualified_name: name.to_string(),
        kind: SymbolKind::Variable,
        line_range: LineRange::new(0, 0),
        byte_range: ByteRange::new(0, 0),
        exported: false,
        parent_id: None,
        signature_hash: String::new(),
    }
}

fn resolve_pass_a(descriptor: &IntentDescriptor, index: &SymbolIndex, cfg: &crate::config::RippleConfig) -> Vec<(String, f64)> {
    let mut out = Vec::new();
    for (id, symbol) in index.iter() {
        let symbol_score = descriptor
            .symbol_hints
            .iter()
            .map(|hint| name_score(&leaf_name(&symbol.qualified_name), hint))
            .fold(0.0_f64, f64::max);
        let file_score = descriptor
            .file_hints
            .iter()
            .map(|hint| name_score(&symbol.file_path, hint))
            .fold(0.0_f64, f64::max);

        let combined = match (symbol_score > 0.0, file_score > 0.0) {
            (true, true) => symbol_score * 0.7 + file_score * 0.3,
            (true, false) => symbol_score,
            (false, true) => file_score,
            (false, false) => 0.0,
        };
        if combined <= 0.0 {
            continue;
        }
        let bonus = if symbol.exported { 0.05 } else { 0.0 };
        let score = (combined + bonus).min(1.0);
        if score >= cfg.hint_accept_threshold {
            out.push((id.clone(), score));
        }
    }
    out
}

fn resolve_pass_b(descriptor: &IntentDescriptor, index: &SymbolIndex, cfg: &crate::config::RippleConfig) -> Vec<(String, f64)> {
    let keywords = extract_keywords(&descriptor.prompt);
    if keywords.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    for (id, symbol) in index.iter() {
        let name_tokens = tokenize(&leaf_name(&symbol.qualified_name));
        let mut sum = 0.0;
        for kw in &keywords {
            sum += keyword_score(kw, &name_tokens);
        }
        let base = (sum / keywords.len() as f64).min(1.0);
        let bonus = if symbol.exported { 0.05 } else { 0.0 };
        let score = (base + bonus).min(1.0);
        if score >= cfg.keyword_accept_threshold {
            out.push((id.clone(), score));
        }
    }
    out
}

fn leaf_name(qualified_name: &str) -> String {
    qualified_name.rsplit('.').next().unwrap_or(qualified_name).to_string()
}

/// Tiered name scoring shared by symbol-hint and file-hint matching: exact
/// (case-insensitive) = 1.0, mutual substring with >=40% length ratio =
/// `0.5 + 0.3*(shorter/longer)`, else Jaccard token overlap >= 0.25 scaled
/// by 0.9.
fn name_score(candidate: &str, hint: &str) -> f64 {
    if candidate.eq_ignore_ascii_case(hint) {
        return 1.0;
    }
    let (c_lower, h_lower) = (candidate.to_lowercase(), hint.to_lowercase());
    if c_lower.contains(&h_lower) || h_lower.contains(&c_lower) {
        let (shorter, longer) = if c_lower.len() <= h_lower.len() { (c_lower.len(), h_lower.len()) } else { (h_lower.len(), c_lower.len()) };
        if longer > 0 {
            let ratio = shorter as f64 / longer as f64;
            if ratio >= 0.4 {
                return 0.5 + 0.3 * ratio;
            }
        }
    }
    let overlap = jaccard(&tokenize(candidate), &tokenize(hint));
    if overlap >= 0.25 {
        overlap * 0.9
    } else {
        0.0
    }
}

fn keyword_score(keyword: &str, name_tokens: &[String]) -> f64 {
    if name_tokens.iter().any(|t| t == keyword) {
        return 1.0;
    }
    if name_tokens.iter().any(|t| t.starts_with(keyword) || t.ends_with(keyword) || keyword.starts_with(t.as_str()) || keyword.ends_with(t.as_str())) {
        return 0.7;
    }
    if name_tokens.iter().any(|t| t.contains(keyword) || keyword.contains(t.as_str())) {
        return 0.4;
    }
    0.0
}

fn extract_keywords(prompt: &str) -> Vec<String> {
    tokenize(prompt).into_iter().filter(|t| !STOPWORDS.contains(&t.as_str())).collect()
}

/// Splits on non-alphanumeric boundaries and camelCase transitions,
/// lowercasing every token (covers camel/snake/kebab/dot identifiers).
fn tokenize(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in s.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() && prev_lower {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            prev_lower = ch.is_lowercase() || ch.is_numeric();
            current.push(ch.to_ascii_lowercase());
        } else {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens.into_iter().filter(|t| t.len() > 1).collect()
}

fn jaccard(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&String> = a.iter().collect();
    let set_b: HashSet<&String> = b.iter().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RippleConfig;

    fn sym(file: &str, name: &str, exported: bool) -> Symbol {
        Symbol {
            id: Symbol::make_id(file, name),
            file_path: file.to_string(),
            qualified_name: name.to_string(),
            kind: SymbolKind::Function,
            line_range: LineRange::new(1, 1),
            byte_range: ByteRange::new(0, 1),
            exported,
            parent_id: None,
            signature_hash: "h".to_string(),
        }
    }

    fn descriptor(prompt: &str, change_type: ChangeType, symbol_hints: Vec<&str>, affects_public_api: bool) -> IntentDescriptor {
        IntentDescriptor {
            prompt: prompt.to_string(),
            change_type,
            symbol_hints: symbol_hints.into_iter().map(String::from).collect(),
            file_hints: Vec::new(),
            affects_public_api,
            summary: String::new(),
        }
    }

    #[test]
    fn tokenize_splits_camel_case() {
        assert_eq!(tokenize("computeBlastRadius"), vec!["compute", "blast", "radius"]);
    }

    #[test]
    fn unrelated_prompt_is_marked_not_relevant() {
        let mut index = SymbolIndex::new();
        index.insert(sym("/a.ts", "computeBlastRadius", true));
        let graph = GraphStore::new();
        let cfg = RippleConfig::default();

        let d = descriptor("what is the weather like today", ChangeType::Modify, vec![], false);
        let result = IntentPipeline::analyze(&d, &index, &graph, &cfg);
        assert!(!result.is_relevant);
    }

    #[test]
    fn exact_symbol_hint_resolves_and_propagates_signature_ripple() {
        let mut index = SymbolIndex::new();
        index.insert(sym("/a.ts", "computeBlastRadius", true));
        let mut graph = GraphStore::new();
        graph.add_edge("/b.ts#caller", "/a.ts#computeBlastRadius");
        let cfg = RippleConfig::default();

        let d = descriptor("update computeBlastRadius", ChangeType::Modify, vec!["computeBlastRadius"], true);
        let result = IntentPipeline::analyze(&d, &index, &graph, &cfg);
        assert!(result.is_relevant);
        assert!(result.blast_radius.direct_impact.contains("/b.ts#caller"));
    }

    #[test]
    fn delete_intent_filters_intra_file_dependents() {
        let mut index = SymbolIndex::new();
        index.insert(sym("/a.ts", "doomed", true));
        index.insert(sym("/a.ts", "sibling", true));
        index.insert(sym("/b.ts", "external", true));
        let mut graph = GraphStore::new();
        graph.add_edge("/a.ts#sibling", "/a.ts#doomed");
        graph.add_edge("/b.ts#external", "/a.ts#doomed");
        let cfg = RippleConfig::default();

        let d = descriptor("delete doomed", ChangeType::Delete, vec!["doomed"], false);
        let result = IntentPipeline::analyze(&d, &index, &graph, &cfg);
        assert!(!result.blast_radius.direct_impact.contains("/a.ts#sibling"));
        assert!(result.blast_radius.direct_impact.contains("/b.ts#external"));
    }
}
