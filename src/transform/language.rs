//! Canonical language tags in the generated form.

use std::collections::{BTreeMap, HashMap};

use crate::dom::{Document, NodeId, css_string};
use crate::error::Result;
use crate::language::{Language, parse_language};

/// Sample text used when a language has no translated text at all.
const NO_SAMPLE: &str = "nothing";

/// Resolve the options of `#form-languages` to canonical tags.
///
/// Each option gets `data-dir`, its canonical tag as `value` and the language
/// description as text. `lang` attributes throughout the form and the
/// closest `data-default-lang` (the selector's own or an ancestor's) follow
/// the new tags.
/// Returns the labels that changed, original → canonical tag.
pub fn resolve_languages(form: &mut Document) -> Result<BTreeMap<String, String>> {
    let root = form.document();
    let options = form.select(root, "#form-languages option")?;

    let mut languages: Vec<Language> = Vec::with_capacity(options.len().max(1));
    let mut language_map = BTreeMap::new();

    if options.is_empty() {
        let sample = sample_text(form, "")?;
        languages.push(parse_language("", &sample));
    }

    for option in options {
        let value = match form.get_attr(option, "value") {
            Some(value) => value.to_string(),
            None => form.text_content(option),
        };
        let sample = sample_text(form, &value)?;
        let language = parse_language(&value, &sample);

        form.set_attr(option, "data-dir", language.directionality.as_str());
        form.set_attr(option, "value", &language.tag);
        form.set_text_content(option, &language.description);

        if value != language.tag {
            language_map.insert(value, language.tag.clone());
        }
        languages.push(language);
    }

    rewrite_lang_attributes(form, &language_map)?;
    correct_default_language(form, &languages)?;

    log::debug!(
        "languages: {} resolved, {} renamed",
        languages.len(),
        language_map.len()
    );
    Ok(language_map)
}

/// Text written in a language: hints first, then any other translated span.
fn sample_text(form: &Document, lang: &str) -> Result<String> {
    let lang = css_string(lang);
    for selector in [
        format!("span.or-hint[lang={lang}]"),
        format!("span[lang={lang}]"),
    ] {
        for span in form.select(form.document(), &selector)? {
            let text = form.text_content(span);
            let trimmed = text.trim();
            if !trimmed.is_empty() && trimmed != "-" {
                return Ok(trimmed.to_string());
            }
        }
    }
    Ok(NO_SAMPLE.to_string())
}

fn rewrite_lang_attributes(form: &mut Document, language_map: &BTreeMap<String, String>) -> Result<()> {
    if language_map.is_empty() {
        return Ok(());
    }
    let renames: HashMap<&str, &str> = language_map
        .iter()
        .map(|(from, to)| (from.as_str(), to.as_str()))
        .collect();

    let elements: Vec<(NodeId, String)> = form
        .select(form.document(), "[lang]")?
        .into_iter()
        .filter_map(|id| {
            let lang = form.get_attr(id, "lang")?;
            renames.get(lang).map(|tag| (id, tag.to_string()))
        })
        .collect();

    for (id, tag) in elements {
        form.set_attr(id, "lang", &tag);
    }
    Ok(())
}

fn correct_default_language(form: &mut Document, languages: &[Language]) -> Result<()> {
    let Some(selector) = form.select_first(form.document(), "#form-languages")? else {
        return Ok(());
    };

    let mut ancestor = Some(selector);
    while let Some(id) = ancestor {
        if let Some(default) = form.get_attr(id, "data-default-lang") {
            if let Some(language) = languages.iter().find(|l| l.source_language == default) {
                let tag = language.tag.clone();
                form.set_attr(id, "data-default-lang", &tag);
            }
            return Ok(());
        }
        ancestor = form.parent_element(id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"<root><form class="or" lang="dutch">
  <header class="form-header"><select id="form-languages" data-default-lang="dutch"><option value="dutch">dutch</option><option value="english">english</option><option value="Sorani">Sorani</option></select></header>
  <label class="question"><span lang="dutch" class="question-label active">Wat?</span><span lang="english" class="question-label">What?</span><span lang="Sorani" class="or-hint">-</span><span lang="Sorani" class="question-label">ناوی تۆ چییە؟</span></label>
</form></root>"#;

    #[test]
    fn test_resolves_options() {
        let mut dom = Document::parse_xml(FORM).unwrap();
        let map = resolve_languages(&mut dom).unwrap();

        assert_eq!(
            map,
            BTreeMap::from([
                ("dutch".to_string(), "nl".to_string()),
                ("english".to_string(), "en".to_string()),
            ])
        );

        let options = dom.select(dom.document(), "option").unwrap();
        assert_eq!(dom.get_attr(options[0], "value"), Some("nl"));
        assert_eq!(dom.get_attr(options[0], "data-dir"), Some("ltr"));
        assert_eq!(dom.text_content(options[0]), "dutch");
        assert_eq!(dom.get_attr(options[2], "value"), Some("Sorani"));
        assert_eq!(dom.get_attr(options[2], "data-dir"), Some("rtl"));
    }

    #[test]
    fn test_rewrites_lang_attributes_and_default() {
        let mut dom = Document::parse_xml(FORM).unwrap();
        resolve_languages(&mut dom).unwrap();

        assert_eq!(dom.select(dom.document(), r#"span[lang="nl"]"#).unwrap().len(), 1);
        assert_eq!(dom.select(dom.document(), r#"span[lang="en"]"#).unwrap().len(), 1);
        assert!(dom.select(dom.document(), r#"[lang="dutch"]"#).unwrap().is_empty());

        let select = dom.select_first(dom.document(), "#form-languages").unwrap().unwrap();
        assert_eq!(dom.get_attr(select, "data-default-lang"), Some("nl"));
        let form = dom.find_by_tag("form").unwrap();
        assert_eq!(dom.get_attr(form, "lang"), Some("nl"));
    }

    #[test]
    fn test_form_without_languages() {
        let mut dom = Document::parse_xml(
            r#"<root><form><label class="question"><span class="question-label">Q</span></label></form></root>"#,
        )
        .unwrap();
        let map = resolve_languages(&mut dom).unwrap();
        assert!(map.is_empty());
    }
}
