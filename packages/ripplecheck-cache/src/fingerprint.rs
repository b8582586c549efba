//! Per-file content fingerprints used for stale-file detection on startup
//! (spec §4.6). Blake3 is used purely as a fast fixed-size digest here —
//! change detection, not security, is the requirement.

use crate::error::{CacheError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| CacheError::io(format!("failed to read {}", path.display())).with_source(e))?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn zero() -> Self {
        Self(blake3::Hash::from_bytes([0u8; 32]))
    }

    pub fn to_hex(self) -> String {
        self.0.to_hex().to_string()
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        blake3::Hash::from_hex(hex_str)
            .map(Self)
            .map_err(|e| CacheError::corrupt("invalid fingerprint hex").with_source(e))
    }

    pub fn matches(&self, other: &Fingerprint) -> bool {
        self.0 == other.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn same_content_yields_matching_fingerprints() {
        let a = Fingerprint::from_bytes(b"hello world");
        let b = Fingerprint::from_bytes(b"hello world");
        assert!(a.matches(&b));
    }

    #[test]
    fn different_content_yields_different_fingerprints() {
        let a = Fingerprint::from_bytes(b"hello world");
        let b = Fingerprint::from_bytes(b"hello there");
        assert!(!a.matches(&b));
    }

    #[test]
    fn hex_round_trip() {
        let fp = Fingerprint::from_bytes(b"round trip me");
        let hex_str = fp.to_hex();
        let restored = Fingerprint::from_hex(&hex_str).unwrap();
        assert!(fp.matches(&restored));
    }

    #[test]
    fn from_file_reads_and_hashes_disk_content() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"file contents").unwrap();
        let fp = Fingerprint::from_file(file.path()).unwrap();
        let expected = Fingerprint::from_bytes(b"file contents");
        assert!(fp.matches(&expected));
    }
}
