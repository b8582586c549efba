//! Incremental Updater (spec §4.5): snapshot -> evict -> reparse ->
//! reindex -> rewalk for a single file, plus full rebuild and the
//! two-pass multi-file partial patch.

use ripplecheck_core::domain::ports::DeclarationResolver;
use ripplecheck_core::graph::GraphStore;
use ripplecheck_core::parser::ParserAdapter;
use ripplecheck_core::refwalk::ReferenceWalker;
use ripplecheck_core::signature::{DiffReport, SignatureAnalyzer};
use ripplecheck_core::symbols::{SymbolExtractor, SymbolIndex};
use std::collections::HashMap;

pub struct IncrementalUpdater<P, R> {
    parser: P,
    resolver: R,
}

impl<P: ParserAdapter, R: DeclarationResolver> IncrementalUpdater<P, R> {
    pub fn new(parser: P, resolver: R) -> Self {
        Self { parser, resolver }
    }

    /// `handleFileChanged` (spec §4.5): the single-file sequence runs
    /// atomically with respect to cooperative yields — no `.await` between
    /// steps (spec §5 "Ordering guarantees").
    #[tracing::instrument(skip(self, new_text, index, graph), fields(file = %path))]
    pub fn handle_file_changed(&self, path: &str, new_text: &str, index: &mut SymbolIndex, graph: &mut GraphStore) -> DiffReport {
        let snapshot = index.signature_snapshot(path);
        graph.evict_file(path, index);

        match self.parser.parse(path, new_text) {
            Ok(parsed) => {
                for symbol in SymbolExtractor::extract(&parsed) {
                    index.insert(symbol);
                }
                ReferenceWalker::walk_file(&parsed, &self.resolver, graph);
                SignatureAnalyzer::diff(&snapshot, index, path)
            }
            Err(error) => {
                // Parse failure: the file stays evicted (spec §7).
                tracing::warn!(%error, "parse failed, file remains evicted");
                DiffReport {
                    removed: snapshot.into_keys().collect(),
                    ..Default::default()
                }
            }
        }
    }

    pub fn handle_file_created(&self, path: &str, text: &str, index: &mut SymbolIndex, graph: &mut GraphStore) -> DiffReport {
        self.handle_file_changed(path, text, index, graph)
    }

    #[tracing::instrument(skip(self, index, graph), fields(file = %path))]
    pub fn handle_file_deleted(&self, path: &str, index: &mut SymbolIndex, graph: &mut GraphStore) -> DiffReport {
        let snapshot = index.signature_snapshot(path);
        graph.evict_file(path, index);
        DiffReport {
            removed: snapshot.into_keys().collect(),
            ..Default::default()
        }
    }

    /// Clear both graph maps and the index, reparse every file from disk,
    /// re-extract, then re-walk — yielding cooperatively every
    /// `batch_yield_size` files so a single-event-loop host stays
    /// responsive (spec §5).
    #[tracing::instrument(skip(self, files, index, graph), fields(file_count = files.len()))]
    pub async fn full_rebuild(
        &self,
        files: &[(String, String)],
        index: &mut SymbolIndex,
        graph: &mut GraphStore,
        batch_yield_size: usize,
    ) {
        *index = SymbolIndex::new();
        *graph = GraphStore::new();

        let mut parsed_files = Vec::new();
        for (i, (path, text)) in files.iter().enumerate() {
            match self.parser.parse(path, text) {
                Ok(parsed) => {
                    for symbol in SymbolExtractor::extract(&parsed) {
                        index.insert(symbol);
                    }
                    parsed_files.push(parsed);
                }
                Err(error) => {
                    tracing::warn!(%error, file = %path, "parse failed during full rebuild, skipping file");
                }
            }
            maybe_yield(i, batch_yield_size).await;
        }

        for (i, parsed) in parsed_files.iter().enumerate() {
            ReferenceWalker::walk_file(parsed, &self.resolver, graph);
            maybe_yield(i, batch_yield_size).await;
        }

        tracing::info!(symbols = index.len(), "full rebuild complete");
    }

    /// Multi-file partial patch honoring the two-pass invariant (spec
    /// §4.5): every eviction and re-extraction completes before any
    /// re-walk begins, so a re-walk never records an edge against a
    /// not-yet-refreshed neighbor that is evicted later in the same pass.
    #[tracing::instrument(skip(self, stale_files, index, graph), fields(file_count = stale_files.len()))]
    pub async fn partial_patch(
        &self,
        stale_files: &[(String, String)],
        index: &mut SymbolIndex,
        graph: &mut GraphStore,
        batch_yield_size: usize,
    ) -> HashMap<String, DiffReport> {
        let mut snapshots = HashMap::new();
        let mut parsed_files = Vec::new();

        for (i, (path, text)) in stale_files.iter().enumerate() {
            snapshots.insert(path.clone(), index.signature_snapshot(path));
            graph.evict_file(path, index);
            match self.parser.parse(path, text) {
                Ok(parsed) => {
                    for symbol in SymbolExtractor::extract(&parsed) {
                        index.insert(symbol);
                    }
                    parsed_files.push(parsed);
                }
                Err(error) => {
                    tracing::warn!(%error, file = %path, "parse failed during partial patch, file remains evicted");
                }
            }
            maybe_yield(i, batch_yield_size).await;
        }

        for (i, parsed) in parsed_files.iter().enumerate() {
            ReferenceWalker::walk_file(parsed, &self.resolver, graph);
            maybe_yield(i, batch_yield_size).await;
        }

        snapshots
            .into_iter()
            .map(|(path, snapshot)| {
                let diff = SignatureAnalyzer::diff(&snapshot, index, &path);
                (path, diff)
            })
            .collect()
    }
}

async fn maybe_yield(index: usize, batch_yield_size: usize) {
    if batch_yield_size > 0 && (index + 1) % batch_yield_size == 0 {
        tokio::task::yield_now().await;
    }
}
