//! Bidirectional symbol dependency graph (spec §§3, 4.3).

pub mod store;

pub use store::{GraphJson, GraphStore};
