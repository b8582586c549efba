//! Cache Layer (spec §§4.6, 6): on-disk JSON artifacts for the symbol
//! index, bidirectional graph, per-file content hashes, and project
//! metadata, with stale-file detection on startup.

pub mod error;
pub mod fingerprint;
pub mod layout;
pub mod store;

pub use error::{CacheError, ErrorKind, Result};
pub use fingerprint::Fingerprint;
pub use layout::CacheLayout;
pub use store::{project_hash, CacheArtifacts, CacheStore, Metadata, CACHE_FORMAT_VERSION};
