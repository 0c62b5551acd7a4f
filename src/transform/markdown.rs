//! Markdown rendering of question labels and hints.

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::markdown;

/// Render every `span.question-label` and `span.or-hint` as Markdown.
///
/// `<output>` placeholders inside a span are swapped for `---output-N`
/// tokens while rendering and come back unchanged afterwards. Spans whose
/// text renders to itself are left alone.
pub fn render_markdown(form: &mut Document) -> Result<()> {
    let spans = form.select(form.document(), "span.question-label, span.or-hint")?;

    let mut rendered_count = 0;
    for span in spans {
        if render_span(form, span)? {
            rendered_count += 1;
        }
    }
    log::debug!("markdown: {rendered_count} labels rendered");
    Ok(())
}

fn render_span(form: &mut Document, span: NodeId) -> Result<bool> {
    let outputs = form.select(span, ".or-output")?;
    let mut swapped = Vec::with_capacity(outputs.len());
    for (i, output) in outputs.into_iter().enumerate() {
        if form.parent(output).is_none() {
            // nested inside an output that was already swapped out
            continue;
        }
        let html = form.to_html(output);
        let token = form.create_text(placeholder(i));
        form.replace_with(output, token);
        swapped.push((i, output, token, html));
    }

    let source = form.inner_html(span);
    let rendered = markdown::to_html(&source);

    if rendered == source {
        for (_, output, token, _) in swapped {
            form.replace_with(token, output);
        }
        return Ok(false);
    }

    // Highest index first so `---output-1` never eats `---output-10`.
    let html = swapped
        .iter()
        .rev()
        .fold(rendered, |html, (i, _, _, output_html)| {
            html.replace(&placeholder(*i), output_html)
        });
    form.clear_children(span);
    form.insert_html(span, &html);
    Ok(true)
}

fn placeholder(index: usize) -> String {
    format!("---output-{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(label: &str) -> String {
        let mut dom = Document::parse_xml(&format!(
            r#"<root><form><label class="question"><span lang="" class="question-label active">{label}</span></label></form></root>"#
        ))
        .unwrap();
        render_markdown(&mut dom).unwrap();
        let span = dom.select_first(dom.document(), ".question-label").unwrap().unwrap();
        dom.inner_html(span)
    }

    #[test]
    fn test_renders_label() {
        assert_eq!(render("_emphasis_"), "<em>emphasis</em>");
        assert_eq!(render("plain text"), "plain text");
    }

    #[test]
    fn test_escaped_markup_stays_text() {
        assert_eq!(render("a &lt;b&gt;bold&lt;/b&gt; *c*"), "a &lt;b&gt;bold&lt;/b&gt; <em>c</em>");
    }

    #[test]
    fn test_outputs_survive_rendering() {
        assert_eq!(
            render(r#"**<span class="or-output" data-value="/data/name"> </span>**"#),
            r#"<strong><span class="or-output" data-value="/data/name"> </span></strong>"#
        );
        assert_eq!(
            render(r#"Hi <span class="or-output" data-value="/data/name"> </span>"#),
            r#"Hi <span class="or-output" data-value="/data/name"> </span>"#
        );
    }

    #[test]
    fn test_hints_render_too() {
        let mut dom = Document::parse_xml(
            r#"<root><form><span class="or-hint">#Title</span><span class="other">*x*</span></form></root>"#,
        )
        .unwrap();
        render_markdown(&mut dom).unwrap();
        let form = dom.find_by_tag("form").unwrap();
        assert_eq!(
            dom.inner_html(form),
            r#"<span class="or-hint"><h1>Title</h1></span><span class="other">*x*</span>"#
        );
    }
}
