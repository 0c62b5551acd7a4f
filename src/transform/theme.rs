//! Forcing a theme onto the form.

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

use crate::dom::Document;
use crate::error::Result;

/// A `theme-*` class token with the whitespace around it.
static THEME_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s|^)theme-[^\s]+(\s|$)").unwrap());

/// Set `theme-<theme>` on the first `<form>`, replacing a theme declared by
/// the XForm. An empty theme changes nothing.
pub fn apply_theme(form: &mut Document, theme: &str) -> Result<()> {
    if theme.is_empty() {
        return Ok(());
    }
    let Some(element) = form.select_first(form.document(), "form")? else {
        return Ok(());
    };

    let class = match form.get_attr(element, "class") {
        Some(class) if THEME_CLASS_RE.is_match(class) => THEME_CLASS_RE
            .replace(class, |caps: &Captures<'_>| {
                format!("{}theme-{theme}{}", &caps[1], &caps[2])
            })
            .into_owned(),
        Some("") | None => format!("theme-{theme}"),
        Some(class) => format!("{class} theme-{theme}"),
    };
    form.set_attr(element, "class", &class);
    log::debug!("theme set to {theme}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_class(class: Option<&str>, theme: &str) -> Option<String> {
        let attr = class.map(|c| format!(r#" class="{c}""#)).unwrap_or_default();
        let mut dom = Document::parse_xml(&format!("<root><form{attr}/></root>")).unwrap();
        apply_theme(&mut dom, theme).unwrap();
        let form = dom.find_by_tag("form").unwrap();
        dom.get_attr(form, "class").map(str::to_string)
    }

    #[test]
    fn test_appends_theme() {
        assert_eq!(form_class(Some("or clearfix"), "mytheme").as_deref(), Some("or clearfix theme-mytheme"));
        assert_eq!(form_class(None, "mytheme").as_deref(), Some("theme-mytheme"));
    }

    #[test]
    fn test_replaces_declared_theme() {
        assert_eq!(
            form_class(Some("or theme-one clearfix"), "mytheme").as_deref(),
            Some("or theme-mytheme clearfix")
        );
        assert_eq!(form_class(Some("theme-one"), "grid").as_deref(), Some("theme-grid"));
    }

    #[test]
    fn test_empty_theme_keeps_declared_theme() {
        assert_eq!(form_class(Some("or theme-one"), "").as_deref(), Some("or theme-one"));
    }
}
