//! Per-kind signature text construction (spec §3 "Signature hash"). These
//! build the pre-canonicalization text; `canonicalize` + `signature_hash`
//! turn the result into the stored 16-hex-digit fingerprint.

use super::canonicalize::canonicalize;

/// `(name:canonType,…):canonReturn`
pub fn callable_signature(params: &[(String, String)], return_type: &str) -> String {
    let params_str = params
        .iter()
        .map(|(name, ty)| format!("{name}:{}", canonicalize(ty)))
        .collect::<Vec<_>>()
        .join(",");
    format!("({params_str}):{}", canonicalize(return_type))
}

/// Canonicalized declared type, used for properties, variables, and type
/// aliases.
pub fn type_signature(type_text: &str) -> String {
    canonicalize(type_text)
}

/// Sorted canonicalized member texts joined by `;`.
pub fn interface_signature(member_texts: &[String]) -> String {
    let mut canon: Vec<String> = member_texts.iter().map(|m| canonicalize(m)).collect();
    canon.sort();
    canon.join(";")
}

/// `class:<baseClass>:[sorted implements list]`
pub fn class_signature(base_class: Option<&str>, implements: &[String]) -> String {
    let mut impls: Vec<String> = implements.to_vec();
    impls.sort();
    format!("class:{}:[{}]", base_class.unwrap_or(""), impls.join(","))
}

/// Sorted `name=value` pairs.
pub fn enum_signature(members: &[(String, String)]) -> String {
    let mut pairs: Vec<String> = members.iter().map(|(n, v)| format!("{n}={v}")).collect();
    pairs.sort();
    pairs.join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callable_signature_formats_params_and_return() {
        let params = vec![("a".to_string(), "number".to_string()), ("b".to_string(), "number".to_string())];
        assert_eq!(callable_signature(&params, "number"), "(a:number,b:number):number");
    }

    #[test]
    fn interface_signature_sorts_members() {
        let members = vec!["b: number".to_string(), "a: string".to_string()];
        let a = interface_signature(&members);
        let members2 = vec!["a: string".to_string(), "b: number".to_string()];
        let b = interface_signature(&members2);
        assert_eq!(a, b);
    }

    #[test]
    fn class_signature_sorts_implements_list() {
        let impls = vec!["Z".to_string(), "A".to_string()];
        assert_eq!(class_signature(Some("Base"), &impls), "class:Base:[A,Z]");
    }

    #[test]
    fn enum_signature_sorts_pairs() {
        let members = vec![("B".to_string(), "2".to_string()), ("A".to_string(), "1".to_string())];
        assert_eq!(enum_signature(&members), "A=1;B=2");
    }
}
