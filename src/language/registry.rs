//! The `Type: language` records of the IANA language subtag registry.
//!
//! `subtags.tsv` holds one record per line: the subtag, then its
//! descriptions, tab-separated. Two-letter subtags come first, then the
//! three-letter ones, each alphabetically, as in the registry itself. The
//! first description is the display name.

use std::collections::HashMap;
use std::sync::LazyLock;

/// A `Type: language` registry record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtag {
    pub subtag: &'static str,
    pub descriptions: Vec<&'static str>,
}

impl Subtag {
    /// The record's first description.
    pub fn description(&self) -> &'static str {
        self.descriptions.first().copied().unwrap_or(self.subtag)
    }
}

/// Every language record, in registry order.
pub static LANGUAGES: LazyLock<Vec<Subtag>> = LazyLock::new(|| {
    include_str!("subtags.tsv")
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let subtag = fields.next().filter(|s| !s.is_empty())?;
            Some(Subtag {
                subtag,
                descriptions: fields.collect(),
            })
        })
        .collect()
});

/// Record index by subtag. Subtags in the table are lowercase.
static BY_SUBTAG: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    LANGUAGES
        .iter()
        .enumerate()
        .map(|(i, record)| (record.subtag, i))
        .collect()
});

/// Look up a language subtag, ignoring case.
pub fn lookup(subtag: &str) -> Option<&'static Subtag> {
    let index = *BY_SUBTAG.get(subtag.to_ascii_lowercase().as_str())?;
    LANGUAGES.get(index)
}

/// Find the language whose description best matches `query`.
///
/// Ranked best first:
///
/// 1. the description equals the query (`Dutch`)
/// 2. it does once a trailing qualifier is dropped (`Bemba (Zambia)`)
/// 3. the query appears in it as whole words (`Modern Greek (1453-)`)
/// 4. the query appears in it anywhere
///
/// Comparison ignores case. Ties go to the record that comes first.
pub fn search(query: &str) -> Option<&'static Subtag> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let mut best: Option<(u8, &'static Subtag)> = None;
    for record in LANGUAGES.iter() {
        let Some(rank) = record.descriptions.iter().filter_map(|d| match_rank(d, &query)).min() else {
            continue;
        };
        if best.is_none_or(|(r, _)| rank < r) {
            best = Some((rank, record));
            if rank == 0 {
                break;
            }
        }
    }
    best.map(|(_, record)| record)
}

fn match_rank(description: &str, query: &str) -> Option<u8> {
    let description = description.to_lowercase();
    if description == query {
        return Some(0);
    }
    let unqualified = description.split(" (").next().unwrap_or(&description);
    if unqualified == query {
        return Some(1);
    }

    let mut found = None;
    for (start, _) in description.match_indices(query) {
        let end = start + query.len();
        let before = description[..start].chars().next_back();
        let after = description[end..].chars().next();
        if !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric) {
            return Some(2);
        }
        found = Some(3);
    }
    found
}
