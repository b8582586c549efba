//! Signature canonicalization, hashing, and the Signature Analyzer diff
//! (spec §§3, 4.4).

pub mod analyzer;
pub mod builders;
pub mod canonicalize;

pub use analyzer::{DiffReport, SignatureAnalyzer};
pub use builders::{callable_signature, class_signature, enum_signature, interface_signature, type_signature};
pub use canonicalize::{canonicalize, signature_hash};
