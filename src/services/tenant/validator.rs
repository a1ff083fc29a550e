//! Tenant identifier grammar.
//!
//! A candidate is either a canonical UUID or a lowercase slug. Characters that show up
//! in folded or spoofed header values (`a, b`, `x; y`, paths, wildcards) are rejected
//! before any grammar is tried.
use std::sync::LazyLock;

use regex::Regex;

pub const MAX_IDENTIFIER_LEN: usize = 100;
pub const MIN_SLUG_LEN: usize = 3;
pub const MAX_SLUG_LEN: usize = 50;

const FORBIDDEN_CHARS: [char; 6] = [' ', ',', '/', '*', ';', ':'];

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern compiles")
});

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug pattern compiles"));

pub fn is_valid_identifier(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.len() > MAX_IDENTIFIER_LEN {
        return false;
    }

    if candidate.contains(FORBIDDEN_CHARS) {
        return false;
    }

    if UUID_RE.is_match(candidate) {
        return true;
    }

    (MIN_SLUG_LEN..=MAX_SLUG_LEN).contains(&candidate.len()) && SLUG_RE.is_match(candidate)
}

/// Directory and registry key for a valid identifier: UUIDs are lowercased, slugs are
/// already canonical.
pub fn canonical_identifier(identifier: &str) -> String {
    if UUID_RE.is_match(identifier) {
        identifier.to_ascii_lowercase()
    } else {
        identifier.to_string()
    }
}
