//! Cache directory layout (spec §6).

use std::path::{Path, PathBuf};

pub const GRAPH_FILE: &str = "graph.json";
pub const SYMBOLS_FILE: &str = "symbols.json";
pub const FILE_HASHES_FILE: &str = "fileHashes.json";
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
    cache_dir_name: String,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>, cache_dir_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            cache_dir_name: cache_dir_name.into(),
        }
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(format!(".{}", self.cache_dir_name.trim_start_matches('.')))
    }

    pub fn graph_path(&self) -> PathBuf {
        self.cache_dir().join(GRAPH_FILE)
    }

    pub fn symbols_path(&self) -> PathBuf {
        self.cache_dir().join(SYMBOLS_FILE)
    }

    pub fn file_hashes_path(&self) -> PathBuf {
        self.cache_dir().join(FILE_HASHES_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.cache_dir().join(METADATA_FILE)
    }

    pub fn all_artifacts_exist(&self) -> bool {
        [self.graph_path(), self.symbols_path(), self.file_hashes_path(), self.metadata_path()]
            .iter()
            .all(|p| p.exists())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_dir_name_gets_a_single_leading_dot() {
        let layout = CacheLayout::new("/proj", "blastradius");
        assert_eq!(layout.cache_dir(), PathBuf::from("/proj/.blastradius"));
    }

    #[test]
    fn cache_dir_name_with_existing_dot_is_not_doubled() {
        let layout = CacheLayout::new("/proj", ".blastradius");
        assert_eq!(layout.cache_dir(), PathBuf::from("/proj/.blastradius"));
    }
}
