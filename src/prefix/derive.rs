//! Prefix candidates for namespaces without a library entry.
//!
//! Both steps are pure functions of the namespace string, so the same
//! namespace always yields the same candidate across calls and runs.

/// Strip a leading `scheme:` and an optional `//`.
fn without_scheme(namespace: &str) -> &str {
    let Some((scheme, rest)) = namespace.split_once(':') else {
        return namespace;
    };
    let is_scheme = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !is_scheme {
        return namespace;
    }
    rest.strip_prefix("//").unwrap_or(rest)
}

/// Derive a prefix from the trailing segment of `namespace`.
///
/// A single trailing `#`, `/` or `:` is ignored. Characters outside
/// `[A-Za-z0-9_-]` become `_`, the result is lowercased and must start with
/// a letter. Returns `None` when nothing usable remains.
pub fn heuristic_prefix(namespace: &str) -> Option<String> {
    let body = without_scheme(namespace);
    let body = body.strip_suffix(['#', '/', ':']).unwrap_or(body);
    let segment = body.rsplit(['#', '/', ':']).next().unwrap_or(body);

    let mut candidate = String::with_capacity(segment.len());
    for ch in segment.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            candidate.push(ch.to_ascii_lowercase());
        } else if !candidate.is_empty() && !candidate.ends_with('_') {
            candidate.push('_');
        }
    }
    let candidate = candidate
        .trim_start_matches(|c: char| !c.is_ascii_alphabetic())
        .trim_end_matches('_');
    (!candidate.is_empty()).then(|| candidate.to_owned())
}

/// Last-resort abbreviation: the initials of the first four alphabetic runs
/// after the scheme, lowercased, or `ns` when there are none.
pub fn fallback_prefix(namespace: &str) -> String {
    let mut initials = String::new();
    let mut in_run = false;
    for ch in without_scheme(namespace).chars() {
        if ch.is_ascii_alphabetic() {
            if !in_run && initials.len() < 4 {
                initials.push(ch.to_ascii_lowercase());
            }
            in_run = true;
        } else {
            in_run = false;
        }
    }
    if initials.is_empty() {
        "ns".to_owned()
    } else {
        initials
    }
}

/// Heuristic prefix, else the fallback abbreviation. Never empty.
pub fn derive_prefix(namespace: &str) -> String {
    heuristic_prefix(namespace).unwrap_or_else(|| fallback_prefix(namespace))
}
