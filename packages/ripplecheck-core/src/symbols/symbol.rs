use crate::shared::{ByteRange, LineRange};
use serde::{Deserialize, Serialize};

pub const PHANTOM_PREFIX: &str = "__phantom__#";

/// Symbol kinds, in the order the extractor may emit them for a given node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    Function,
    Class,
    Interface,
    TypeAlias,
    Enum,
    Variable,
    Method,
    Property,
}

/// A named declaration, uniquely identified by `(absolute path, qualified
/// name)` and rendered as `path#qualifiedName` (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: String,
    pub file_path: String,
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub line_range: LineRange,
    pub byte_range: ByteRange,
    pub exported: bool,
    pub parent_id: Option<String>,
    pub signature_hash: String,
}

impl Symbol {
    /// Build the `path#qualifiedName` id used as this symbol's stable key.
    pub fn make_id(file_path: &str, qualified_name: &str) -> String {
        format!("{file_path}#{qualified_name}")
    }

    pub fn is_phantom(id: &str) -> bool {
        id.starts_with(PHANTOM_PREFIX)
    }

    pub fn phantom_id(name: &str) -> String {
        format!("{PHANTOM_PREFIX}{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_id_joins_path_and_name_with_hash() {
        assert_eq!(
            Symbol::make_id("/src/a.ts", "Foo.bar"),
            "/src/a.ts#Foo.bar"
        );
    }

    #[test]
    fn phantom_ids_are_recognized() {
        let id = Symbol::phantom_id("widget");
        assert!(Symbol::is_phantom(&id));
        assert!(!Symbol::is_phantom("/src/a.ts#Foo"));
    }
}
