//! Top-level façade tying the core, cache, and orchestrator components
//! together: owns the live index/graph, drives cache startup (spec §4.6),
//! and guards speculative analyses with a monotone version counter
//! (spec §5).

use crate::blast_radius::BlastRadiusResult;
use crate::config::RippleConfig;
use crate::editor;
use crate::error::{OrchestratorError, Result};
use crate::incremental::IncrementalUpdater;
use crate::intent::IntentAnalysisResult;
use crate::oracle::IntentDescriptor;
use crate::staged_diff::StagedDiffMapper;
use crate::vcs::VcsCollaborator;
use ripplecheck_cache::{CacheArtifacts, CacheStore, Fingerprint, Metadata, CACHE_FORMAT_VERSION};
use ripplecheck_core::domain::ports::DeclarationResolver;
use ripplecheck_core::graph::GraphStore;
use ripplecheck_core::parser::ParserAdapter;
use ripplecheck_core::signature::DiffReport;
use ripplecheck_core::symbols::SymbolIndex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub struct RippleOrchestrator<P, R> {
    parser: P,
    resolver: R,
    index: SymbolIndex,
    graph: GraphStore,
    cache: CacheStore,
    config: RippleConfig,
    version: u64,
}

impl<P: ParserAdapter + Clone, R: DeclarationResolver + Clone> RippleOrchestrator<P, R> {
    pub fn new(parser: P, resolver: R, project_root: impl Into<PathBuf>, config: RippleConfig) -> Self {
        let cache = CacheStore::new(project_root.into(), config.cache_dir_name.clone());
        Self {
            parser,
            resolver,
            index: SymbolIndex::new(),
            graph: GraphStore::new(),
            cache,
            config,
            version: 0,
        }
    }

    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    fn updater(&self) -> IncrementalUpdater<P, R> {
        IncrementalUpdater::new(self.parser.clone(), self.resolver.clone())
    }

    fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    /// Cache startup policy (spec §4.6): full rebuild when any artifact is
    /// missing, the project hash differs, or the index is empty; otherwise
    /// reload and apply a two-pass partial patch to stale files.
    #[tracing::instrument(skip(self, project_files, project_config_text), fields(file_count = project_files.len()))]
    pub async fn startup(&mut self, project_files: &[String], project_config_text: &str) -> Result<()> {
        let project_hash = ripplecheck_cache::project_hash(project_config_text);
        let loaded = if self.cache.exists() { self.cache.load().ok() } else { None };

        match loaded {
            Some(artifacts) if artifacts.metadata.project_hash == project_hash && !artifacts.index.is_empty() => {
                self.resume_from_cache(artifacts, project_files).await
            }
            _ => self.full_rebuild_and_persist(project_files, &project_hash).await,
        }
    }

    async fn full_rebuild_and_persist(&mut self, project_files: &[String], project_hash: &str) -> Result<()> {
        let files = read_all(project_files);
        self.updater()
            .full_rebuild(&files, &mut self.index, &mut self.graph, self.config.batch_yield_size)
            .await;
        let hashes = compute_file_hashes(project_files);
        self.persist(project_hash, hashes)
    }

    async fn resume_from_cache(&mut self, artifacts: CacheArtifacts, project_files: &[String]) -> Result<()> {
        self.index = artifacts.index;
        self.graph = artifacts.graph;
        let mut file_hashes = artifacts.file_hashes;
        let project_hash = artifacts.metadata.project_hash.clone();

        let present: HashSet<&str> = project_files.iter().map(String::as_str).collect();
        let stale_paths: Vec<String> = self
            .cache
            .stale_files(&file_hashes)
            .into_iter()
            .filter(|p| present.contains(p.as_str()))
            .collect();

        if !stale_paths.is_empty() {
            let stale_files = read_all(&stale_paths);
            self.updater()
                .partial_patch(&stale_files, &mut self.index, &mut self.graph, self.config.batch_yield_size)
                .await;
        }

        let vanished: Vec<String> = file_hashes.keys().filter(|p| !present.contains(p.as_str())).cloned().collect();
        for path in &vanished {
            self.graph.evict_file(path, &mut self.index);
        }

        file_hashes.retain(|p, _| present.contains(p.as_str()));
        for (path, hash) in compute_file_hashes(project_files) {
            file_hashes.insert(path, hash);
        }

        self.persist(&project_hash, file_hashes)
    }

    fn persist(&self, project_hash: &str, file_hashes: HashMap<String, String>) -> Result<()> {
        let artifacts = CacheArtifacts {
            index: self.index.clone(),
            graph: self.graph.clone(),
            file_hashes,
            metadata: Metadata {
                project_hash: project_hash.to_string(),
                created_at: chrono::Utc::now(),
                version: CACHE_FORMAT_VERSION.to_string(),
            },
        };
        self.cache.save(&artifacts).map_err(OrchestratorError::from)
    }

    pub fn handle_file_changed(&mut self, path: &str, new_text: &str) -> DiffReport {
        self.updater().handle_file_changed(path, new_text, &mut self.index, &mut self.graph)
    }

    pub fn handle_file_created(&mut self, path: &str, text: &str) -> DiffReport {
        self.updater().handle_file_created(path, text, &mut self.index, &mut self.graph)
    }

    pub fn handle_file_deleted(&mut self, path: &str) -> DiffReport {
        self.updater().handle_file_deleted(path, &mut self.index, &mut self.graph)
    }

    /// In-editor (unstaged) blast radius (spec §4.10): snapshots dependents
    /// of the file's current symbols before the Incremental Updater evicts
    /// them, so removed symbols still report their dependents.
    pub fn analyze_editor_buffer(&mut self, path: &str, new_text: &str) -> BlastRadiusResult {
        let candidate_ids: Vec<String> = self.index.symbols_in_file(path).map(|s| s.id.clone()).collect();
        let removed_dependents = editor::snapshot_removed_dependents(&candidate_ids, &self.graph);
        let diff = self.handle_file_changed(path, new_text);
        editor::analyze_editor_change(&diff, &self.graph, &removed_dependents)
    }

    /// Runs the Staged-Diff Mapper against shadow state and the Blast-Radius
    /// Engine against the live graph, discarding the result if a newer
    /// analysis started in the meantime (spec §5 monotone version counter).
    #[tracing::instrument(skip(self, vcs))]
    pub async fn analyze_staged(&mut self, vcs: &dyn VcsCollaborator) -> Option<BlastRadiusResult> {
        let started_at = self.bump_version();
        let mapper = StagedDiffMapper::new(self.parser.clone(), self.resolver.clone());
        let mut shadow_index = self.index.clone();
        let mut shadow_graph = self.graph.clone();
        let roots = mapper.analyze(vcs, &mut shadow_index, &mut shadow_graph);

        tokio::task::yield_now().await;
        if started_at != self.version {
            tracing::debug!("discarding staged analysis superseded by a newer one");
            return None;
        }
        Some(crate::blast_radius::BlastRadiusEngine::run(&roots, &self.graph))
    }

    #[tracing::instrument(skip(self, descriptor), fields(prompt = %descriptor.prompt))]
    pub async fn analyze_intent(&mut self, descriptor: &IntentDescriptor) -> Option<IntentAnalysisResult> {
        let started_at = self.bump_version();
        let result = crate::intent::IntentPipeline::analyze(descriptor, &self.index, &self.graph, &self.config);

        tokio::task::yield_now().await;
        if started_at != self.version {
            tracing::debug!("discarding intent analysis superseded by a newer one");
            return None;
        }
        Some(result)
    }
}

fn read_all(paths: &[String]) -> Vec<(String, String)> {
    paths
        .iter()
        .filter_map(|p| match std::fs::read_to_string(p) {
            Ok(text) => Some((p.clone(), text)),
            Err(error) => {
                tracing::warn!(file = %p, %error, "unreadable source file, skipping");
                None
            }
        })
        .collect()
}

fn compute_file_hashes(paths: &[String]) -> HashMap<String, String> {
    paths
        .iter()
        .filter_map(|p| Fingerprint::from_file(Path::new(p)).ok().map(|fp| (p.clone(), fp.to_hex())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripplecheck_core::domain::ports::DeclSite;
    use ripplecheck_core::parser::TreeSitterAdapter;
    use tempfile::tempdir;

    #[derive(Clone)]
    struct NoopResolver;
    impl DeclarationResolver for NoopResolver {
        fn resolve(&self, _file_path: &str, _byte_offset: usize) -> Vec<DeclSite> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn startup_with_no_cache_performs_full_rebuild_and_persists() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("a.ts");
        std::fs::write(&file_path, "export function foo(): void {}").unwrap();

        let mut orchestrator = RippleOrchestrator::new(
            TreeSitterAdapter::new(),
            NoopResolver,
            dir.path(),
            RippleConfig::default(),
        );
        let files = vec![file_path.to_string_lossy().into_owned()];
        orchestrator.startup(&files, "{}").await.unwrap();

        assert!(orchestrator.index().len() >= 1);
        assert!(dir.path().join(".blastradius").join("metadata.json").exists());
    }

    #[tokio::test]
    async fn second_startup_reuses_cache_when_project_hash_matches() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("a.ts");
        std::fs::write(&file_path, "export function foo(): void {}").unwrap();
        let files = vec![file_path.to_string_lossy().into_owned()];

        let mut first = RippleOrchestrator::new(TreeSitterAdapter::new(), NoopResolver, dir.path(), RippleConfig::default());
        first.startup(&files, "{}").await.unwrap();

        let mut second = RippleOrchestrator::new(TreeSitterAdapter::new(), NoopResolver, dir.path(), RippleConfig::default());
        second.startup(&files, "{}").await.unwrap();
        assert!(second.index().contains(&format!("{}#foo", file_path.to_string_lossy())));
    }
}
