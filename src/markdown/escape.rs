//! Escaping passes that run before and after formatting.

use memchr::memmem;
use regex_lite::Regex;

use super::patterns::{CLOSE_TAG_RE, SPAN_OPEN_RE, STYLE_ATTR_RE, SUB_OPEN_RE, SUP_OPEN_RE};

/// Escaped backslash sequences and the placeholder codes standing in for
/// them while formatting runs.
const ESCAPES: [(&str, &str); 4] = [
    ("\\\\", "&92;"),
    ("\\*", "&42;"),
    ("\\_", "&95;"),
    ("\\#", "&35;"),
];

/// Order in which placeholder codes are turned back into literals.
const RESTORES: [(&str, &str); 5] = [
    ("&35;", "#"),
    ("&95;", "_"),
    ("&92;", "\\"),
    ("&42;", "*"),
    ("&amp;", "&"),
];

/// Neutralize raw markup: only the escaped forms of `<` and `>` reach the
/// formatting passes.
pub fn escape_angle_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Turn escaped `<span>`, `<sup>` and `<sub>` pairs back into markup.
///
/// Spans keep a `style` attribute and nothing else; `sup` and `sub` lose
/// all attributes. Content must be non-empty, fit on one line and contain
/// no other closing tag.
pub fn protect_inline_tags(text: &str) -> String {
    let text = protect_tag(text, "span", &SPAN_OPEN_RE);
    let text = protect_tag(&text, "sup", &SUP_OPEN_RE);
    protect_tag(&text, "sub", &SUB_OPEN_RE)
}

fn protect_tag(text: &str, tag: &str, opener: &Regex) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(caps) = opener.captures_at(text, pos) {
        let Some(open) = caps.get(0) else {
            break;
        };
        let content_start = open.end();
        let rest = &text[content_start..];

        let closed = memmem::find(rest.as_bytes(), b"&lt;/").and_then(|end| {
            let content = &rest[..end];
            if content.is_empty() || content.contains('\n') {
                return None;
            }
            let close = CLOSE_TAG_RE.captures(&rest[end..])?;
            (&close[1] == tag).then(|| (content, end + close[0].len()))
        });

        match closed {
            Some((content, consumed)) => {
                let attrs = if tag == "span" {
                    STYLE_ATTR_RE
                        .find(&caps[1])
                        .map(|m| m.as_str())
                        .unwrap_or_default()
                } else {
                    ""
                };
                out.push_str(&text[pos..open.start()]);
                out.push_str(&format!("<{tag}{attrs}>{content}</{tag}>"));
                pos = content_start + consumed;
            }
            None => {
                out.push_str(&text[pos..open.end()]);
                pos = open.end();
            }
        }
    }

    out.push_str(&text[pos..]);
    out
}

/// Escape `&` and swap backslash escapes for placeholder codes.
pub fn encode_escapes(text: &str) -> String {
    ESCAPES
        .iter()
        .fold(text.replace('&', "&amp;"), |acc, (from, to)| acc.replace(from, to))
}

/// Turn placeholder codes back into the characters they stand for.
pub fn restore_escapes(text: &str) -> String {
    RESTORES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}
