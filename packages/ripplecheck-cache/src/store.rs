//! The Cache Layer (spec §4.6, §6): persists and restores the symbol
//! index, bidirectional graph, per-file content hashes, and project-config
//! hash, and implements the startup staleness policy.

use crate::error::{CacheError, Result};
use crate::fingerprint::Fingerprint;
use crate::layout::CacheLayout;
use chrono::{DateTime, Utc};
use ripplecheck_core::graph::{GraphJson, GraphStore};
use ripplecheck_core::symbols::SymbolIndex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const CACHE_FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "projectHash")]
    pub project_hash: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub version: String,
}

/// The four persisted artifacts, loaded together.
pub struct CacheArtifacts {
    pub index: SymbolIndex,
    pub graph: GraphStore,
    pub file_hashes: HashMap<String, String>,
    pub metadata: Metadata,
}

/// Cryptographic hash of the project-configuration text (e.g. the contents
/// of `tsconfig.json`), used to invalidate the whole cache when the
/// project's compiler configuration changes.
pub fn project_hash(config_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(config_text.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub struct CacheStore {
    layout: CacheLayout,
}

impl CacheStore {
    pub fn new(root: impl Into<std::path::PathBuf>, cache_dir_name: impl Into<String>) -> Self {
        Self {
            layout: CacheLayout::new(root, cache_dir_name),
        }
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    pub fn exists(&self) -> bool {
        self.layout.all_artifacts_exist()
    }

    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> Result<CacheArtifacts> {
        let symbols_text = read_to_string(&self.layout.symbols_path())?;
        let index: SymbolIndex = serde_json::from_str(&symbols_text)
            .map_err(|e| CacheError::corrupt("malformed symbols.json").with_source(e))?;

        let graph_text = read_to_string(&self.layout.graph_path())?;
        let graph = read_graph_json(&graph_text)?;

        let hashes_text = read_to_string(&self.layout.file_hashes_path())?;
        let file_hashes: HashMap<String, String> = serde_json::from_str(&hashes_text)
            .map_err(|e| CacheError::corrupt("malformed fileHashes.json").with_source(e))?;

        let metadata_text = read_to_string(&self.layout.metadata_path())?;
        let metadata: Metadata = serde_json::from_str(&metadata_text)
            .map_err(|e| CacheError::corrupt("malformed metadata.json").with_source(e))?;

        tracing::debug!(symbols = index.len(), files = file_hashes.len(), "loaded cache artifacts");

        Ok(CacheArtifacts {
            index,
            graph,
            file_hashes,
            metadata,
        })
    }

    #[tracing::instrument(skip(self, artifacts))]
    pub fn save(&self, artifacts: &CacheArtifacts) -> Result<()> {
        let dir = self.layout.cache_dir();
        fs::create_dir_all(&dir).map_err(|e| CacheError::io(format!("failed to create {}", dir.display())).with_source(e))?;

        write_pretty(&self.layout.symbols_path(), &artifacts.index)?;
        write_pretty(&self.layout.graph_path(), &artifacts.graph.to_json())?;
        write_compact(&self.layout.file_hashes_path(), &artifacts.file_hashes)?;
        write_pretty(&self.layout.metadata_path(), &artifacts.metadata)?;

        tracing::debug!(symbols = artifacts.index.len(), "persisted cache artifacts");
        Ok(())
    }

    /// Compute current on-disk fingerprints for every path already present
    /// in `known_files`, returning the set whose hash differs or which is
    /// now unreadable (spec §4.6 "stale-file detection").
    pub fn stale_files(&self, known_hashes: &HashMap<String, String>) -> Vec<String> {
        known_hashes
            .iter()
            .filter(|(path, old_hex)| match Fingerprint::from_file(Path::new(path.as_str())) {
                Ok(current) => Fingerprint::from_hex(old_hex).map(|old| !current.matches(&old)).unwrap_or(true),
                Err(_) => true,
            })
            .map(|(path, _)| path.clone())
            .collect()
    }
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| CacheError::corrupt(format!("failed to read {}", path.display())).with_source(e))
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CacheError::io("failed to serialize artifact").with_source(e))?;
    fs::write(path, text).map_err(|e| CacheError::io(format!("failed to write {}", path.display())).with_source(e))
}

fn write_compact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string(value).map_err(|e| CacheError::io("failed to serialize artifact").with_source(e))?;
    fs::write(path, text).map_err(|e| CacheError::io(format!("failed to write {}", path.display())).with_source(e))
}

/// Reads `graph.json`, transparently accepting both the plain
/// `{forward, reverse}` form and the legacy sectioned form with top-level
/// `present`/`future` keys (spec §6) — only `present` is live state.
fn read_graph_json(text: &str) -> Result<GraphStore> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| CacheError::corrupt("malformed graph.json").with_source(e))?;

    let graph_value = if value.get("present").is_some() || value.get("future").is_some() {
        value.get("present").cloned().unwrap_or(serde_json::json!({"forward": {}, "reverse": {}}))
    } else {
        value
    };

    let json: GraphJson =
        serde_json::from_value(graph_value).map_err(|e| CacheError::corrupt("malformed graph.json").with_source(e))?;
    Ok(GraphStore::from_json(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripplecheck_core::symbols::{Symbol, SymbolKind};
    use ripplecheck_core::shared::{ByteRange, LineRange};
    use tempfile::tempdir;

    fn sample_symbol() -> Symbol {
        Symbol {
            id: Symbol::make_id("/a.ts", "foo"),
            file_path: "/a.ts".to_string(),
            qualified_name: "foo".to_string(),
            kind: SymbolKind::Function,
            line_range: LineRange::new(1, 1),
            byte_range: ByteRange::new(0, 1),
            exported: true,
            parent_id: None,
            signature_hash: "abc123".to_string(),
        }
    }

    #[test]
    fn save_then_load_round_trips_all_four_artifacts() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path(), "blastradius");

        let mut index = SymbolIndex::new();
        index.insert(sample_symbol());
        let mut graph = GraphStore::new();
        graph.add_edge("/a.ts#foo", "/b.ts#bar");
        let mut file_hashes = HashMap::new();
        file_hashes.insert("/a.ts".to_string(), Fingerprint::zero().to_hex());

        let artifacts = CacheArtifacts {
            index,
            graph,
            file_hashes,
            metadata: Metadata {
                project_hash: project_hash("{}"),
                created_at: Utc::now(),
                version: CACHE_FORMAT_VERSION.to_string(),
            },
        };

        store.save(&artifacts).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert!(loaded.index.contains("/a.ts#foo"));
        assert!(loaded.graph.dependencies("/a.ts#foo").contains("/b.ts#bar"));
        assert_eq!(loaded.metadata.project_hash, artifacts.metadata.project_hash);
    }

    #[test]
    fn legacy_sectioned_graph_json_reads_present_section() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path(), "blastradius");
        fs::create_dir_all(store.layout().cache_dir()).unwrap();
        fs::write(
            store.layout().graph_path(),
            r#"{"present": {"forward": {"a": ["b"]}, "reverse": {"b": ["a"]}}, "future": {"forward": {}, "reverse": {}}}"#,
        )
        .unwrap();

        let graph = read_graph_json(&fs::read_to_string(store.layout().graph_path()).unwrap()).unwrap();
        assert!(graph.dependencies("a").contains("b"));
    }

    #[test]
    fn project_hash_is_deterministic_per_text() {
        assert_eq!(project_hash("{\"a\":1}"), project_hash("{\"a\":1}"));
        assert_ne!(project_hash("{\"a\":1}"), project_hash("{\"a\":2}"));
    }
}
