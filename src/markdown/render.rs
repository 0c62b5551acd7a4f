//! Ordered substitution passes turning label text into HTML.

use regex_lite::Captures;

use super::escape::{encode_escapes, escape_angle_brackets, protect_inline_tags, restore_escapes};
use super::patterns::*;

/// Render label or hint text as HTML.
///
/// `text` is the escaped form of the label (as `innerHTML` returns it);
/// raw `<` and `>` are escaped again before anything else runs.
pub fn to_html(text: &str) -> String {
    let html = escape_angle_brackets(text);
    let html = protect_inline_tags(&html);
    let html = encode_escapes(&html);

    let html = STRONG_UNDERSCORE_RE.replace_all(&html, "<strong>${1}</strong>");
    let html = STRONG_STAR_RE.replace_all(&html, "<strong>${1}</strong>");
    let html = EM_UNDERSCORE_RE.replace_all(&html, "<em>${1}</em>");
    let html = EM_STAR_RE.replace_all(&html, "<em>${1}</em>");
    let html = LINK_RE.replace_all(
        &html,
        r#"<a href="${2}" rel="noopener" target="_blank">${1}</a>"#,
    );

    let html = HEADER_RE.replace_all(&html, header);
    let html = UNORDERED_LIST_RE.replace_all(&html, unordered_list);
    let html = ORDERED_LIST_RE.replace_all(&html, ordered_list);

    let html = restore_escapes(&html);

    let html = PARAGRAPH_RE.replace_all(&html, paragraph);
    let html = LINE_BREAK_RE.replace_all(&html, "${1}<br>");

    html.trim().to_string()
}

fn header(caps: &Captures<'_>) -> String {
    let level = caps[1].len();
    let content = caps[2].trim_end_matches('#');
    format!("<h{level}>{content}</h{level}>")
}

fn unordered_list(caps: &Captures<'_>) -> String {
    let items = UNORDERED_ITEM_RE.replace_all(&caps[0], list_item);
    format!("<ul>{items}</ul>")
}

fn ordered_list(caps: &Captures<'_>) -> String {
    let list = &caps[0];
    let start = ORDERED_START_RE
        .captures(list)
        .map(|c| c[1].to_string())
        .filter(|n| n != "1")
        .map(|n| format!(r#" start="{n}""#))
        .unwrap_or_default();
    let items = ORDERED_ITEM_RE.replace_all(list, list_item);
    format!("<ol{start}>{items}</ol>")
}

fn list_item(caps: &Captures<'_>) -> String {
    format!("<li>{}</li>", caps[2].trim())
}

fn paragraph(caps: &Captures<'_>) -> String {
    let line = &caps[1];
    let trimmed = line.trim();
    if BLOCK_TAG_RE.is_match(trimmed) {
        return line.to_string();
    }
    format!("<p>{trimmed}</p>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_formatting() {
        assert_eq!(to_html("_emphasis_"), "<em>emphasis</em>");
        assert_eq!(to_html("*emphasis*"), "<em>emphasis</em>");
        assert_eq!(to_html("**strong**"), "<strong>strong</strong>");
        assert_eq!(to_html("__strong__"), "<strong>strong</strong>");
        assert_eq!(to_html("a * b * c"), "a * b * c");
    }

    #[test]
    fn test_escaped_literals() {
        assert_eq!(to_html(r"\_A\_B\_"), "_A_B_");
        assert_eq!(to_html(r"\*\*not strong\*\*"), "**not strong**");
        assert_eq!(to_html(r"\# not a header"), "# not a header");
        assert_eq!(to_html(r"back\\slash"), r"back\slash");
    }

    #[test]
    fn test_links() {
        assert_eq!(
            to_html("[link](http://x)"),
            r#"<a href="http://x" rel="noopener" target="_blank">link</a>"#
        );
    }

    #[test]
    fn test_headers() {
        assert_eq!(to_html("#h1\n"), "<h1>h1</h1>");
        assert_eq!(to_html("### h3 ###"), "<h3>h3 </h3>");
        assert_eq!(to_html("###### h6"), "<h6>h6</h6>");
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(to_html("\n* a\n* b\n"), "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(to_html("- x\n+ y"), "<ul><li>x</li><li>y</li></ul>");
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            to_html("intro\n1. one\n2. two"),
            "intro<ol><li>one</li><li>two</li></ol>"
        );
        assert_eq!(
            to_html("intro\n3. three\n4. four"),
            r#"intro<ol start="3"><li>three</li><li>four</li></ol>"#
        );
        assert_eq!(to_html("1. not a list"), "1. not a list");
    }

    #[test]
    fn test_paragraphs_and_breaks() {
        assert_eq!(to_html("one\n\ntwo"), "<p>one</p>two");
        assert_eq!(to_html("line 1\nline 2"), "line 1<br>line 2");
    }

    #[test]
    fn test_sanitizes_markup() {
        assert_eq!(
            to_html("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert_eq!(
            to_html(r#"&lt;span style="color:red"&gt;*red*&lt;/span&gt;"#),
            r#"<span style="color:red"><em>red</em></span>"#
        );
    }

    #[test]
    fn test_entities_survive() {
        assert_eq!(to_html("a &amp; b &lt; c"), "a &amp; b &lt; c");
    }

    #[test]
    fn test_output_placeholder_untouched() {
        assert_eq!(to_html("*---output-0*"), "<em>---output-0</em>");
        assert_eq!(to_html("value: ---output-12"), "value: ---output-12");
    }
}
