//! Language label resolution.
//!
//! XForms name their translations freely: `English`, `english`, `en`,
//! `French (fr)` and `Sorani` all occur in the wild. [`parse_language`] turns
//! such a label into a canonical tag, a display description and a writing
//! direction:
//!
//! 1. `Description (tag)` labels are split as written.
//! 2. A label whose first hyphen-separated segment is a registered language
//!    subtag keeps the label as its tag (region suffix included).
//! 3. Otherwise the registry descriptions are searched for the label.
//! 4. Unknown labels pass through, trimmed, as both tag and description.

mod direction;
pub mod registry;

use std::sync::LazyLock;

use regex_lite::Regex;

pub use direction::{Direction, RTL_LANGUAGES};

/// `Description (tag)`
static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^(]+)\((.*)\)\s*$").unwrap());

/// A resolved language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// The label as it appeared in the form.
    pub source_language: String,
    pub tag: String,
    pub description: String,
    pub directionality: Direction,
}

/// Resolve a language label. `sample` is text written in the language and
/// only matters for tags that are not known to be right-to-left.
pub fn parse_language(raw: &str, sample: &str) -> Language {
    let label = raw.trim();

    let (tag, description) = if let Some(caps) = PARENTHETICAL_RE.captures(label) {
        (caps[2].trim().to_string(), caps[1].trim().to_string())
    } else if let Some(record) = label
        .split('-')
        .next()
        .and_then(registry::lookup)
    {
        (label.to_string(), record.description().to_string())
    } else if let Some(record) = registry::search(label) {
        (record.subtag.to_string(), label.to_string())
    } else {
        (label.to_string(), label.to_string())
    };

    let directionality = Direction::detect(&tag, sample);
    Language {
        source_language: raw.to_string(),
        tag,
        description,
        directionality,
    }
}
