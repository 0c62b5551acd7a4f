//! Cached regex patterns for the Markdown passes.
//!
//! Compiled once on first use. All patterns run in multi-line mode, where
//! `^` and `$` also match at line boundaries.

use regex_lite::Regex;
use std::sync::LazyLock;

// === Protection ===

/// Escaped `<span …>` opener. Attributes may not contain `/` or a newline.
pub static SPAN_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&lt;\s?span([^/\n]*)&gt;").unwrap());

/// Escaped `<sup …>` opener.
pub static SUP_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&lt;\s?sup([^/\n]*)&gt;").unwrap());

/// Escaped `<sub …>` opener.
pub static SUB_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&lt;\s?sub([^/\n]*)&gt;").unwrap());

/// Escaped closing tag at the start of the haystack.
pub static CLOSE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^&lt;/\s?(span|sup|sub)\s?&gt;").unwrap());

/// The only attribute kept on a protected span.
pub static STYLE_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#" style=("[^"']*"|'[^"']*')"#).unwrap());

// === Inline formatting ===

pub static STRONG_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)__(.*?)__").unwrap());

pub static STRONG_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\*\*(.*?)\*\*").unwrap());

/// `_x_`, where `x` does not start with whitespace.
pub static EM_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)_([^\s][^_\n]*)_").unwrap());

/// `*x*`, where `x` does not start with whitespace.
pub static EM_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\*([^\s][^*\n]*)\*").unwrap());

/// `[text](url)`
pub static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\[([^\]]*)\]\(([^)]+)\)").unwrap());

// === Blocks ===

/// `# Title` through `###### Title`, one per line.
pub static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(#{1,6})\s?([^#][^\n]*)(\n|$)").unwrap());

/// Consecutive `* `, `+ ` or `- ` lines.
pub static UNORDERED_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^((\*|\+|-) (.*)(\n|$))+").unwrap());

pub static UNORDERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(\*|\+|-)(.*)\n?").unwrap());

/// Consecutive `N. ` lines. Each must follow a newline, since labels that
/// merely start with a number are common.
pub static ORDERED_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(\n([0-9]+\.) (.*))+$").unwrap());

pub static ORDERED_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\n?([0-9]+)\.").unwrap());

pub static ORDERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\n?([0-9]+\.)(.*)").unwrap());

/// A line followed by at least one blank line.
pub static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)([^\n]+)\n{2,}").unwrap());

/// Lines that already open or close a block element.
pub static BLOCK_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^</?(ul|ol|li|h|p|bl)").unwrap());

/// A line followed by a single newline.
pub static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)([^\n]+)\n").unwrap());
