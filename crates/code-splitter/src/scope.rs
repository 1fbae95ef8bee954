//! Whole-document lookup index.
//!
//! Every identifier token plus the string arguments of common DOM and
//! storage calls, so presence of a name can be settled from the index alone.
//! Like the chunk hints this is pattern matching, not parsing: tokens inside
//! strings and comments are indexed too.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::hints::{identifier_counts, rank_identifiers};

pub const MAX_INDEXED_IDENTIFIERS: usize = 6_000;
pub const MAX_INDEXED_DOM: usize = 1_500;
pub const MAX_INDEXED_SELECTORS: usize = 1_500;
pub const MAX_INDEXED_KEYS: usize = 2_000;
pub const TOP_FREQUENT_IDENTIFIERS: usize = 80;

fn call_pattern(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static scope pattern")
}

static DOM_ID: Lazy<Regex> =
    Lazy::new(|| call_pattern(r#"getElementById\(\s*['"]([^'"]+)['"]\s*\)"#));

static DOM_CLASS: Lazy<Regex> =
    Lazy::new(|| call_pattern(r#"getElementsByClassName\(\s*['"]([^'"]+)['"]\s*\)"#));

static DOM_NAME: Lazy<Regex> =
    Lazy::new(|| call_pattern(r#"getElementsByName\(\s*['"]([^'"]+)['"]\s*\)"#));

static SELECTOR: Lazy<Regex> =
    Lazy::new(|| call_pattern(r#"querySelector(?:All)?\(\s*['"]([^'"]+)['"]\s*\)"#));

// Group 1 is the storage object; the key is group 2 (get/remove) or 3 (set).
static STORAGE_KEY: Lazy<Regex> = Lazy::new(|| {
    call_pattern(
        r#"(localStorage|sessionStorage)\.(?:(?:getItem|removeItem)\(\s*['"]([^'"]+)['"]\s*\)|setItem\(\s*['"]([^'"]+)['"]\s*,)"#,
    )
});

/// A sorted, deduplicated list cut to a fixed cap
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexedNames {
    /// Unique entries before the cap
    pub total: usize,

    /// The first entries in sorted order
    pub items: Vec<String>,
}

impl IndexedNames {
    fn capped(names: BTreeSet<&str>, cap: usize) -> Self {
        Self {
            total: names.len(),
            items: names.into_iter().take(cap).map(str::to_string).collect(),
        }
    }

    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.total > self.items.len()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items.binary_search_by(|item| item.as_str().cmp(name)).is_ok()
    }
}

/// Lookup index over a whole document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScopeIndex {
    /// Non-reserved identifier tokens
    pub identifiers: IndexedNames,

    /// Most frequent identifiers, count descending then name
    pub top_identifiers: Vec<(String, usize)>,

    /// `getElementById` arguments
    pub dom_ids: IndexedNames,

    /// `getElementsByClassName` arguments
    pub dom_classes: IndexedNames,

    /// `getElementsByName` arguments
    pub dom_names: IndexedNames,

    /// `querySelector` and `querySelectorAll` arguments
    pub selectors: IndexedNames,

    /// `localStorage` keys read, written or removed
    pub local_storage_keys: IndexedNames,

    /// `sessionStorage` keys read, written or removed
    pub session_storage_keys: IndexedNames,
}

/// Build the lookup index for `text`.
#[must_use]
pub fn scope_index(text: &str) -> ScopeIndex {
    let counts = identifier_counts(text);

    let mut local_keys = BTreeSet::new();
    let mut session_keys = BTreeSet::new();
    for caps in STORAGE_KEY.captures_iter(text) {
        let Some(key) = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str()) else {
            continue;
        };
        if key.trim().is_empty() {
            continue;
        }
        match caps.get(1).map(|m| m.as_str()) {
            Some("localStorage") => local_keys.insert(key),
            _ => session_keys.insert(key),
        };
    }

    let index = ScopeIndex {
        identifiers: IndexedNames::capped(counts.keys().copied().collect(), MAX_INDEXED_IDENTIFIERS),
        top_identifiers: rank_identifiers(&counts, TOP_FREQUENT_IDENTIFIERS),
        dom_ids: IndexedNames::capped(string_args(&DOM_ID, text), MAX_INDEXED_DOM),
        dom_classes: IndexedNames::capped(string_args(&DOM_CLASS, text), MAX_INDEXED_DOM),
        dom_names: IndexedNames::capped(string_args(&DOM_NAME, text), MAX_INDEXED_DOM),
        selectors: IndexedNames::capped(string_args(&SELECTOR, text), MAX_INDEXED_SELECTORS),
        local_storage_keys: IndexedNames::capped(local_keys, MAX_INDEXED_KEYS),
        session_storage_keys: IndexedNames::capped(session_keys, MAX_INDEXED_KEYS),
    };

    log::debug!(
        "scope index: {} identifiers, {} dom ids, {} selectors, {} storage keys",
        index.identifiers.total,
        index.dom_ids.total,
        index.selectors.total,
        index.local_storage_keys.total + index.session_storage_keys.total
    );
    index
}

/// Non-blank first-group captures of `pattern`
fn string_args<'t>(pattern: &Regex, text: &'t str) -> BTreeSet<&'t str> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|arg| !arg.trim().is_empty())
        .collect()
}
