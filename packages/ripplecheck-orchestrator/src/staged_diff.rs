//! Staged-Diff Mapper (spec §4.7): maps a VCS collaborator's staged view
//! onto a shadow index/graph, producing a deduplicated list of Impact
//! Roots.

use crate::blast_radius::{dedupe_roots, ImpactRoot, PropagationMode, Reason};
use crate::incremental::IncrementalUpdater;
use crate::vcs::{FileStatus, VcsCollaborator};
use ripplecheck_core::domain::ports::DeclarationResolver;
use ripplecheck_core::graph::GraphStore;
use ripplecheck_core::parser::ParserAdapter;
use ripplecheck_core::shared::ByteRange;
use ripplecheck_core::signature::SignatureAnalyzer;
use ripplecheck_core::symbols::SymbolIndex;

pub struct StagedDiffMapper<P, R> {
    updater: IncrementalUpdater<P, R>,
}

impl<P: ParserAdapter, R: DeclarationResolver> StagedDiffMapper<P, R> {
    pub fn new(parser: P, resolver: R) -> Self {
        Self {
            updater: IncrementalUpdater::new(parser, resolver),
        }
    }

    /// Runs entirely against a caller-supplied shadow index/graph — never
    /// the live state (spec §5 "Speculative analyses receive ... clones").
    #[tracing::instrument(skip(self, vcs, shadow_index, shadow_graph))]
    pub fn analyze(
        &self,
        vcs: &dyn VcsCollaborator,
        shadow_index: &mut SymbolIndex,
        shadow_graph: &mut GraphStore,
    ) -> Vec<ImpactRoot> {
        let staged_files = vcs.staged_files();
        let mut candidates = Vec::new();
        let mut touched_paths = Vec::new();

        for file in &staged_files {
            match file.status {
                FileStatus::Deleted => {
                    shadow_graph.evict_file(&file.path, shadow_index);
                }
                FileStatus::Renamed | FileStatus::Copied => {
                    if let Some(old_path) = &file.old_path {
                        shadow_graph.evict_file(old_path, shadow_index);
                    }
                    if let Some(text) = vcs.staged_content(&file.path) {
                        let report = self.updater.handle_file_created(&file.path, &text, shadow_index, shadow_graph);
                        touched_paths.push(file.path.clone());
                        candidates.extend(rename_destination_roots(shadow_index, &file.path));
                        candidates.extend(signature_ripple_roots(&report));
                    }
                }
                FileStatus::Added | FileStatus::Modified | FileStatus::TypeChanged => {
                    if let Some(text) = vcs.staged_content(&file.path) {
                        let report = self.updater.handle_file_changed(&file.path, &text, shadow_index, shadow_graph);
                        touched_paths.push(file.path.clone());
                        candidates.extend(signature_ripple_roots(&report));
                    } else {
                        tracing::warn!(file = %file.path, "staged content unreadable, skipping file");
                    }
                }
            }
        }

        candidates.extend(
            SignatureAnalyzer::ghosts(shadow_graph, shadow_index)
                .into_iter()
                .map(|id| ImpactRoot { symbol_id: id, propagation_mode: PropagationMode::Deep, reason: Reason::Deleted }),
        );

        let hunks_by_path = group_hunks_by_path(vcs);
        for path in &touched_paths {
            let Some(text) = vcs.staged_content(path) else { continue };
            let Some(hunk_ranges) = hunks_by_path.get(path) else { continue };
            let byte_ranges = hunk_ranges
                .iter()
                .map(|&(start, count)| lines_to_byte_range(&text, start, count))
                .collect::<Vec<_>>();

            for symbol in shadow_index.symbols_in_file(path) {
                let overlaps = byte_ranges.iter().any(|range| range.overlaps(&symbol.byte_range));
                if overlaps {
                    candidates.push(ImpactRoot {
                        symbol_id: symbol.id.clone(),
                        propagation_mode: PropagationMode::Shallow,
                        reason: Reason::BodyChange,
                    });
                }
            }
        }

        dedupe_roots(candidates)
    }
}

fn signature_ripple_roots(report: &ripplecheck_core::signature::DiffReport) -> Vec<ImpactRoot> {
    report
        .ripple
        .iter()
        .map(|id| ImpactRoot { symbol_id: id.clone(), propagation_mode: PropagationMode::Deep, reason: Reason::SignatureRipple })
        .collect()
}

fn rename_destination_roots(index: &SymbolIndex, new_path: &str) -> Vec<ImpactRoot> {
    index
        .symbols_in_file(new_path)
        .map(|s| ImpactRoot {
            symbol_id: s.id.clone(),
            propagation_mode: PropagationMode::Deep,
            reason: Reason::Renamed,
        })
        .collect()
}

fn group_hunks_by_path(vcs: &dyn VcsCollaborator) -> std::collections::HashMap<String, Vec<(u32, u32)>> {
    let mut map: std::collections::HashMap<String, Vec<(u32, u32)>> = std::collections::HashMap::new();
    for hunk in vcs.staged_hunks() {
        map.entry(hunk.path).or_default().push((hunk.new_start_line, hunk.new_line_count));
    }
    map
}

/// Converts a 1-based `(startLine, lineCount)` hunk to an absolute byte
/// range via a newline scan, clamping to the file's line count. `endPos`
/// is the last character of the end line, excluding its newline.
fn lines_to_byte_range(text: &str, start_line: u32, line_count: u32) -> ByteRange {
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect();
    let last_line_index = line_starts.len().saturating_sub(1);

    let start_index = (start_line.saturating_sub(1) as usize).min(last_line_index);
    let end_line = start_line + line_count.saturating_sub(1);
    let end_index = (end_line.saturating_sub(1) as usize).min(last_line_index);

    let start_pos = line_starts[start_index];
    let end_pos = if end_index + 1 < line_starts.len() {
        line_starts[end_index + 1].saturating_sub(1)
    } else {
        text.len()
    };

    ByteRange::new(start_pos, end_pos.max(start_pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::{StagedFile, StagedHunk};
    use ripplecheck_core::domain::ports::DeclSite;
    use ripplecheck_core::parser::TreeSitterAdapter;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct NoopResolver;
    impl DeclarationResolver for NoopResolver {
        fn resolve(&self, _file_path: &str, _byte_offset: usize) -> Vec<DeclSite> {
            Vec::new()
        }
    }

    struct FakeVcs {
        files: Vec<StagedFile>,
        content: RefCell<HashMap<String, String>>,
        hunks: Vec<StagedHunk>,
    }

    impl VcsCollaborator for FakeVcs {
        fn staged_files(&self) -> Vec<StagedFile> {
            self.files.clone()
        }
        fn staged_content(&self, path: &str) -> Option<String> {
            self.content.borrow().get(path).cloned()
        }
        fn staged_hunks(&self) -> Vec<StagedHunk> {
            self.hunks.clone()
        }
    }

    #[test]
    fn lines_to_byte_range_clamps_and_excludes_trailing_newline() {
        let text = "line1\nline2\nline3\n";
        let range = lines_to_byte_range(text, 2, 1);
        assert_eq!(&text[range.start..range.end], "line2");
    }

    #[test]
    fn added_file_produces_body_change_root_for_overlapping_hunk() {
        let mut content = HashMap::new();
        content.insert("/a.ts".to_string(), "export function foo(): void {}\n".to_string());
        let vcs = FakeVcs {
            files: vec![StagedFile { status: FileStatus::Added, path: "/a.ts".to_string(), old_path: None }],
            content: RefCell::new(content),
            hunks: vec![StagedHunk { path: "/a.ts".to_string(), new_start_line: 1, new_line_count: 1 }],
        };

        let mapper = StagedDiffMapper::new(TreeSitterAdapter::new(), NoopResolver);
        let mut index = SymbolIndex::new();
        let mut graph = GraphStore::new();
        let roots = mapper.analyze(&vcs, &mut index, &mut graph);

        assert!(roots.iter().any(|r| r.symbol_id == "/a.ts#foo" && r.reason == Reason::BodyChange));
    }

    #[test]
    fn deleted_file_yields_ghost_roots_when_still_referenced() {
        let mut content = HashMap::new();
        content.insert("/a.ts".to_string(), "export function foo(): void { bar(); }\n".to_string());
        let vcs = FakeVcs {
            files: vec![StagedFile { status: FileStatus::Added, path: "/a.ts".to_string(), old_path: None }],
            content: RefCell::new(content),
            hunks: Vec::new(),
        };
        let mapper = StagedDiffMapper::new(TreeSitterAdapter::new(), NoopResolver);
        let mut index = SymbolIndex::new();
        let mut graph = GraphStore::new();
        graph.add_edge("/a.ts#foo", "/b.ts#bar");

        let roots = mapper.analyze(&vcs, &mut index, &mut graph);
        assert!(roots.iter().any(|r| r.symbol_id == "/b.ts#bar" && r.reason == Reason::Deleted));
    }

    #[test]
    fn modified_file_with_signature_change_produces_deep_signature_ripple_root() {
        let mut content = HashMap::new();
        content.insert("/a.ts".to_string(), "export function foo(): void {}\n".to_string());
        let vcs = FakeVcs {
            files: vec![StagedFile { status: FileStatus::Modified, path: "/a.ts".to_string(), old_path: None }],
            content: RefCell::new(content),
            hunks: Vec::new(),
        };
        let mapper = StagedDiffMapper::new(TreeSitterAdapter::new(), NoopResolver);
        let mut index = SymbolIndex::new();
        let mut graph = GraphStore::new();
        index.insert(ripplecheck_core::symbols::Symbol {
            id: "/a.ts#foo".to_string(),
            file_path: "/a.ts".to_string(),
            qualified_name: "foo".to_string(),
            kind: ripplecheck_core::symbols::SymbolKind::Function,
            line_range: ripplecheck_core::shared::LineRange::new(1, 1),
            byte_range: ripplecheck_core::shared::ByteRange::new(0, 1),
            exported: true,
            parent_id: None,
            signature_hash: "old-hash".to_string(),
        });

        let roots = mapper.analyze(&vcs, &mut index, &mut graph);

        assert!(roots.iter().any(|r| r.symbol_id == "/a.ts#foo" && r.reason == Reason::SignatureRipple && r.propagation_mode == PropagationMode::Deep));
    }

    #[test]
    fn renamed_file_evicts_old_path_and_roots_every_symbol_at_new_path() {
        let mut content = HashMap::new();
        content.insert("/new.ts".to_string(), "export function foo(): void {}\n".to_string());
        let vcs = FakeVcs {
            files: vec![StagedFile {
                status: FileStatus::Renamed,
                path: "/new.ts".to_string(),
                old_path: Some("/old.ts".to_string()),
            }],
            content: RefCell::new(content),
            hunks: Vec::new(),
        };
        let mapper = StagedDiffMapper::new(TreeSitterAdapter::new(), NoopResolver);
        let mut index = SymbolIndex::new();
        let mut graph = GraphStore::new();
        graph.add_edge("/old.ts#foo", "/b.ts#bar");

        let roots = mapper.analyze(&vcs, &mut index, &mut graph);

        assert!(!index.symbols_in_file("/old.ts").any(|_| true));
        assert!(roots.iter().any(|r| r.symbol_id == "/new.ts#foo" && r.reason == Reason::Renamed));
    }
}
