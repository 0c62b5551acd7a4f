//! The structural transform capability.
//!
//! The pipeline never runs XSLT itself. Callers plug an engine in through
//! [`Xslt`] and hand over the two stylesheets that turn an XForm into a form
//! skeleton and a model skeleton.

use std::fmt;
use std::path::Path;

use crate::dom::Document;
use crate::error::{BoxError, Error, Result};
use crate::util::decode_xml;

/// An XSLT 1.0 engine.
///
/// Implementations must be callable from several threads at once; each call
/// gets its own source document and returns a fresh result document.
pub trait Xslt: Send + Sync {
    /// Apply `stylesheet` to `source` with the given top-level parameters.
    fn transform(
        &self,
        stylesheet: &Stylesheet,
        source: &Document,
        params: &[(&str, &str)],
    ) -> std::result::Result<Document, BoxError>;
}

impl<T: Xslt + ?Sized> Xslt for Box<T> {
    fn transform(
        &self,
        stylesheet: &Stylesheet,
        source: &Document,
        params: &[(&str, &str)],
    ) -> std::result::Result<Document, BoxError> {
        (**self).transform(stylesheet, source, params)
    }
}

impl<T: Xslt + ?Sized> Xslt for std::sync::Arc<T> {
    fn transform(
        &self,
        stylesheet: &Stylesheet,
        source: &Document,
        params: &[(&str, &str)],
    ) -> std::result::Result<Document, BoxError> {
        (**self).transform(stylesheet, source, params)
    }
}

/// Which of the two stylesheets this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StylesheetKind {
    /// XForm → HTML form.
    Form,
    /// XForm → XML model.
    Model,
}

impl fmt::Display for StylesheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form => f.write_str("form"),
            Self::Model => f.write_str("model"),
        }
    }
}

/// A parsed stylesheet.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    kind: StylesheetKind,
    text: String,
    document: Document,
    /// Qualified names of the attributes on the `xsl:stylesheet` element,
    /// namespace declarations included.
    root_attributes: Vec<String>,
}

impl Stylesheet {
    /// Parse stylesheet text. Fails if it is not well-formed XML.
    pub fn parse(kind: StylesheetKind, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let document = Document::parse_xml(&text).map_err(|e| match e {
            Error::Parse(msg) => Error::Parse(format!("{kind} stylesheet: {msg}")),
            other => other,
        })?;
        let root_attributes = document
            .document_element()
            .map(|root| {
                document
                    .attrs(root)
                    .iter()
                    .map(|a| a.qualified_name())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            kind,
            text,
            document,
            root_attributes,
        })
    }

    pub fn kind(&self) -> StylesheetKind {
        self.kind
    }

    /// The stylesheet source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed stylesheet, for engines that work on trees.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Whether the stylesheet root carries an attribute with this qualified
    /// name (e.g. `xmlns:jr`).
    pub fn declares(&self, qualified: &str) -> bool {
        self.root_attributes.iter().any(|a| a == qualified)
    }
}

/// The form and model stylesheets.
#[derive(Debug, Clone)]
pub struct Stylesheets {
    pub form: Stylesheet,
    pub model: Stylesheet,
}

impl Stylesheets {
    pub fn new(form: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            form: Stylesheet::parse(StylesheetKind::Form, form)?,
            model: Stylesheet::parse(StylesheetKind::Model, model)?,
        })
    }

    /// Read both stylesheets from disk.
    pub fn load(form_path: impl AsRef<Path>, model_path: impl AsRef<Path>) -> Result<Self> {
        let form = std::fs::read(form_path)?;
        let model = std::fs::read(model_path)?;
        Self::new(decode_xml(&form), decode_xml(&model))
    }

    /// Digest identifying this stylesheet pair and crate version.
    pub fn version(&self) -> String {
        transformer_version(self.form.text(), self.model.text())
    }
}

/// Lowercase hex SHA-1 over both stylesheets and the crate version.
///
/// Changes whenever either stylesheet or the crate changes, so clients can
/// use it to invalidate cached transformation results.
pub fn transformer_version(form_xsl: &str, model_xsl: &str) -> String {
    let mut hasher = sha1_smol::Sha1::new();
    hasher.update(form_xsl.as_bytes());
    hasher.update(model_xsl.as_bytes());
    hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
    hasher.digest().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM_XSL: &str = r#"<xsl:stylesheet xmlns:xsl="http://www.w3.org/1999/XSL/Transform" xmlns:jr="http://openrosa.org/javarosa" version="1.0"/>"#;
    const MODEL_XSL: &str =
        r#"<xsl:stylesheet xmlns:xsl="http://www.w3.org/1999/XSL/Transform" version="1.0"/>"#;

    #[test]
    fn test_root_attributes() {
        let sheets = Stylesheets::new(FORM_XSL, MODEL_XSL).unwrap();
        assert!(sheets.form.declares("xmlns:xsl"));
        assert!(sheets.form.declares("xmlns:jr"));
        assert!(sheets.form.declares("version"));
        assert!(!sheets.model.declares("xmlns:jr"));
        assert_eq!(sheets.model.kind(), StylesheetKind::Model);
    }

    #[test]
    fn test_malformed_stylesheet() {
        let err = Stylesheets::new("<xsl:stylesheet", MODEL_XSL).unwrap_err();
        assert!(err.to_string().contains("form stylesheet"));
    }

    #[test]
    fn test_version_is_stable_hex() {
        let a = transformer_version(FORM_XSL, MODEL_XSL);
        assert_eq!(a, transformer_version(FORM_XSL, MODEL_XSL));
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(a, transformer_version(MODEL_XSL, FORM_XSL));
    }
}
