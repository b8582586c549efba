//! Canonicalization of a symbol's public-API surface into a whitespace- and
//! order-insensitive fingerprint, and the truncated hash taken over it
//! (spec §3 "Signature hash").

/// Collapse whitespace runs to a single space and trim the ends.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `s` on `sep` at bracket-nesting depth zero w.r.t. `<>{}()[]`.
fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for c in s.chars() {
        match c {
            '<' | '{' | '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            '>' | '}' | ')' | ']' => {
                depth -= 1;
                current.push(c);
            }
            c if c == sep && depth == 0 => {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            c => current.push(c),
        }
    }
    if !current.trim().is_empty() || parts.is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Sort the top-level members of an object-type body (`{ a; b; c }`) and
/// rejoin. Accepts either the braces or just the inner text.
fn canonicalize_object_members(s: &str) -> String {
    let trimmed = s.trim();
    let (inner, braced) = match trimmed.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
        Some(inner) => (inner, true),
        None => (trimmed, false),
    };
    let mut members: Vec<String> = split_top_level(inner, ';')
        .into_iter()
        .flat_map(|m| {
            if m.contains(',') && !m.contains(':') {
                split_top_level(&m, ',')
            } else {
                vec![m]
            }
        })
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    members.sort();
    let joined = members.join("; ");
    if braced {
        format!("{{ {joined} }}")
    } else {
        joined
    }
}

fn canonicalize_intersection(s: &str) -> String {
    let parts = split_top_level(s, '&');
    if parts.len() > 1 {
        let mut canon: Vec<String> = parts.iter().map(|p| canonicalize_unit(p)).collect();
        canon.sort();
        return canon.join(" & ");
    }
    canonicalize_unit(s)
}

fn canonicalize_unit(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        canonicalize_object_members(trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Canonicalize a raw type/signature text: collapse whitespace, sort
/// top-level union members, sort top-level intersection members, sort
/// top-level object-literal property signatures. Order-insensitive for
/// commutative constructs, whitespace-insensitive throughout.
pub fn canonicalize(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let union_parts = split_top_level(&collapsed, '|');
    if union_parts.len() > 1 {
        let mut canon: Vec<String> = union_parts.iter().map(|p| canonicalize_intersection(p)).collect();
        canon.sort();
        return canon.join(" | ");
    }
    canonicalize_intersection(&collapsed)
}

/// Truncated blake3 digest of the canonicalized text, as 16 hex digits.
pub fn signature_hash(canonical_text: &str) -> String {
    let digest = blake3::hash(canonical_text.as_bytes());
    digest.to_hex()[..16].to_string()
}
