//! Lightweight per-chunk scope hints.
//!
//! Pattern matching only; names are what a reader skimming the chunk would
//! look for first.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_MAX_DEFINES: usize = 40;
pub const DEFAULT_TOP_IDENTIFIERS: usize = 12;

const RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "let", "new", "null", "return", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "implements",
    "interface", "package", "private", "protected", "public", "static",
];

static DEFINE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?m)^[ \t]*function\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*\(",
        r"(?m)^[ \t]*async\s+function\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*\(",
        r"(?m)^[ \t]*function\s*\*\s*([A-Za-z_$][A-Za-z0-9_$]*)\s*\(",
        r"(?m)^[ \t]*async\s+function\s*\*\s*([A-Za-z_$][A-Za-z0-9_$]*)\s*\(",
        r"(?m)^[ \t]*class\s+([A-Za-z_$][A-Za-z0-9_$]*)\b",
        r"(?m)^[ \t]*(?:var|let|const)\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static define pattern"))
    .collect()
});

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z_$][A-Za-z0-9_$]*\b").expect("static identifier pattern")
});

/// Scope hints for one chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkHints {
    /// Names this chunk appears to define, grouped by declaration form
    pub defines: Vec<String>,

    /// Most frequent identifiers with their counts
    pub top_identifiers: Vec<(String, usize)>,
}

/// Names declared in `text`, grouped by declaration form, deduplicated
#[must_use]
pub fn defined_names(text: &str, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    if max == 0 {
        return names;
    }

    for pattern in DEFINE_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let Some(name) = caps.get(1).map(|m| m.as_str()) else {
                continue;
            };
            if seen.insert(name) {
                names.push(name.to_string());
                if names.len() >= max {
                    return names;
                }
            }
        }
    }

    names
}

/// The `n` most frequent non-reserved identifiers, count descending then name
#[must_use]
pub fn top_identifiers(text: &str, n: usize) -> Vec<(String, usize)> {
    rank_identifiers(&identifier_counts(text), n)
}

/// Occurrences of every non-reserved identifier token
pub(crate) fn identifier_counts(text: &str) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for m in IDENTIFIER.find_iter(text) {
        let ident = m.as_str();
        if RESERVED.contains(&ident) {
            continue;
        }
        *counts.entry(ident).or_default() += 1;
    }
    counts
}

pub(crate) fn rank_identifiers(counts: &HashMap<&str, usize>, n: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts
        .iter()
        .map(|(ident, count)| ((*ident).to_string(), *count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}
