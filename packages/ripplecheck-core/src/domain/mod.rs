//! Hexagonal ports: the boundaries ripplecheck-core depends on but does not
//! implement itself — the external parser and the external type checker.

pub mod ports;

pub use ports::{DeclSite, DeclarationResolver};
