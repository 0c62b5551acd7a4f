//! A stand-in XSLT engine for integration tests.
//!
//! It understands just enough XSLT for the fixture stylesheets: the first
//! `xsl:template` is instantiated as a literal result, and `xsl:copy-of`
//! copies the elements found at its `select` path in the source document
//! (prefixes ignored).

#![allow(dead_code)]

use std::sync::Mutex;

use odk_transformer::dom::{Document, NodeId};
use odk_transformer::{BoxError, Stylesheet, StylesheetKind, Stylesheets, Survey, Xslt};

pub const XSL: &str = "http://www.w3.org/1999/XSL/Transform";

pub const SURVEY: &str = include_str!("../fixtures/survey.xml");
pub const FORM_XSL: &str = include_str!("../fixtures/form.xsl");
pub const MODEL_XSL: &str = include_str!("../fixtures/model.xsl");

/// Records every call so tests can check the parameters handed over.
#[derive(Default)]
pub struct FixtureEngine {
    pub calls: Mutex<Vec<(StylesheetKind, Vec<(String, String)>)>>,
}

impl FixtureEngine {
    pub fn params(&self, kind: StylesheetKind) -> Vec<Vec<(String, String)>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, params)| params.clone())
            .collect()
    }
}

impl Xslt for FixtureEngine {
    fn transform(
        &self,
        stylesheet: &Stylesheet,
        source: &Document,
        params: &[(&str, &str)],
    ) -> Result<Document, BoxError> {
        self.calls.lock().unwrap().push((
            stylesheet.kind(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));

        let sheet = stylesheet.document();
        let template = sheet
            .descendants(sheet.document())
            .find(|&n| sheet.is_named(n, XSL, "template"))
            .ok_or("stylesheet has no template")?;

        let mut out = Document::new();
        let doc = out.document();
        let result = sheet
            .element_children(template)
            .next()
            .ok_or("template is empty")?;
        let imported = out.import_node(sheet, result);
        out.append(doc, imported);

        let copies: Vec<NodeId> = out
            .descendants(doc)
            .filter(|&n| out.is_named(n, XSL, "copy-of"))
            .collect();
        for copy in copies {
            let select = out.get_attr(copy, "select").unwrap_or_default().to_string();
            for found in source.find_path(&select) {
                let node = out.import_node(source, found);
                out.insert_before(copy, node);
            }
            out.remove(copy);
        }

        Ok(out)
    }
}

/// An engine whose every call fails.
pub struct FailingEngine;

impl Xslt for FailingEngine {
    fn transform(
        &self,
        stylesheet: &Stylesheet,
        _source: &Document,
        _params: &[(&str, &str)],
    ) -> Result<Document, BoxError> {
        Err(format!("cannot apply the {} stylesheet", stylesheet.kind()).into())
    }
}

pub fn stylesheets() -> Stylesheets {
    Stylesheets::new(FORM_XSL, MODEL_XSL).unwrap()
}

pub fn survey() -> Survey {
    Survey::new(SURVEY)
}

/// Number of non-overlapping occurrences of `needle`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
