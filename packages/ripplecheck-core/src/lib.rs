//! Symbol, signature, and graph primitives: the Parser Adapter, Symbol
//! Extractor, Reference Walker, Graph Store, and Signature Analyzer (spec
//! §§2-4). This crate has no knowledge of incremental updates, caching, or
//! the blast-radius engine — those live in `ripplecheck-orchestrator` and
//! `ripplecheck-cache`.

pub mod domain;
pub mod errors;
pub mod graph;
pub mod parser;
pub mod refwalk;
pub mod shared;
pub mod signature;
pub mod symbols;

pub use errors::{ErrorKind, Result, RippleError};
