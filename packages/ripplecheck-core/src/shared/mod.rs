//! Shared primitives used across ripplecheck-core modules.

pub mod span;

pub use span::{ByteRange, LineRange};

/// Join a dotted qualified-name prefix with the next segment
/// (`ClassName.methodName`, `NamespaceA.NamespaceB.symbol`).
pub fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
