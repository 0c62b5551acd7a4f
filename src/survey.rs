//! Pipeline input and output records.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::dom::Document;
use crate::error::BoxError;
use crate::util::decode_xml;

/// Field names that belong to the pipeline and never pass through as extras.
pub(crate) const RESERVED_FIELDS: &[&str] = &[
    "xform",
    "markdown",
    "media",
    "openclinica",
    "theme",
    "preprocess",
    "preprocessXForm",
    "form",
    "model",
    "languageMap",
    "transformerVersion",
];

/// Caller hook run on the XForm before anything else.
pub enum Preprocess {
    /// Rewrite the raw XForm text. The result is parsed again.
    Text(Box<dyn Fn(&str) -> Result<String, BoxError> + Send + Sync>),
    /// Edit the parsed XForm in place. The document doubles as the node
    /// factory (`create_element`, `create_element_ns`, …).
    Document(Box<dyn Fn(&mut Document) -> Result<(), BoxError> + Send + Sync>),
}

impl Preprocess {
    pub fn text<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        Self::Text(Box::new(f))
    }

    pub fn document<F>(f: F) -> Self
    where
        F: Fn(&mut Document) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self::Document(Box::new(f))
    }
}

impl fmt::Debug for Preprocess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(_) => f.write_str("Preprocess::Text(..)"),
            Self::Document(_) => f.write_str("Preprocess::Document(..)"),
        }
    }
}

/// A transformation request.
///
/// Deserializes from the JSON accepted by the HTTP surface. Unknown fields
/// are kept in `extra` and copied onto the result.
#[derive(Debug, Deserialize)]
pub struct Survey {
    /// XForm source text.
    #[serde(default)]
    pub xform: Option<String>,

    /// Render Markdown in labels and hints. Only an explicit `false` disables it.
    #[serde(default = "default_markdown", deserialize_with = "not_false")]
    pub markdown: bool,

    /// Media substitutions, file name → URL.
    #[serde(default)]
    pub media: HashMap<String, String>,

    /// Pass `openclinica=1` to the form stylesheet. Accepts booleans and numbers.
    #[serde(default, deserialize_with = "truthy")]
    pub openclinica: bool,

    /// Theme to force onto the form (`theme-<name>` class).
    #[serde(default)]
    pub theme: Option<String>,

    #[serde(skip)]
    pub preprocess: Option<Preprocess>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_markdown() -> bool {
    true
}

fn not_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(!matches!(value, Value::Bool(false)))
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

impl Default for Survey {
    fn default() -> Self {
        Self {
            xform: None,
            markdown: true,
            media: HashMap::new(),
            openclinica: false,
            theme: None,
            preprocess: None,
            extra: Map::new(),
        }
    }
}

impl Survey {
    pub fn new(xform: impl Into<String>) -> Self {
        Self {
            xform: Some(xform.into()),
            ..Default::default()
        }
    }

    /// Build a survey from raw XForm bytes, honouring a BOM or the XML
    /// declaration's encoding.
    pub fn from_xform_bytes(bytes: &[u8]) -> Self {
        Self::new(decode_xml(bytes))
    }

    pub fn with_markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    pub fn with_media(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.media.insert(name.into(), url.into());
        self
    }

    pub fn with_openclinica(mut self, openclinica: bool) -> Self {
        self.openclinica = openclinica;
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_preprocess(mut self, preprocess: Preprocess) -> Self {
        self.preprocess = Some(preprocess);
        self
    }

    /// Attach a field that is copied through to the result untouched.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// The result of a transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformedSurvey {
    /// The HTML form.
    pub form: String,
    /// The XML model.
    pub model: String,
    /// Language labels that were rewritten, original → canonical tag.
    pub language_map: BTreeMap<String, String>,
    pub transformer_version: String,
    /// Fields carried over from the request.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let survey: Survey = serde_json::from_str(r#"{"xform": "<a/>"}"#).unwrap();
        assert_eq!(survey.xform.as_deref(), Some("<a/>"));
        assert!(survey.markdown);
        assert!(!survey.openclinica);
        assert!(survey.media.is_empty());
        assert!(survey.extra.is_empty());
    }

    #[test]
    fn test_deserialize_loose_flags() {
        let survey: Survey =
            serde_json::from_str(r#"{"openclinica": 1, "markdown": null, "theme": "grid"}"#)
                .unwrap();
        assert!(survey.openclinica);
        assert!(survey.markdown);
        assert_eq!(survey.theme.as_deref(), Some("grid"));

        let survey: Survey =
            serde_json::from_str(r#"{"openclinica": 0, "markdown": false}"#).unwrap();
        assert!(!survey.openclinica);
        assert!(!survey.markdown);
    }

    #[test]
    fn test_extra_fields_are_kept() {
        let survey: Survey =
            serde_json::from_str(r#"{"xform": "<a/>", "id": "abc", "hash": 3}"#).unwrap();
        assert_eq!(survey.extra.get("id"), Some(&Value::from("abc")));
        assert_eq!(survey.extra.get("hash"), Some(&Value::from(3)));
    }

    #[test]
    fn test_serialize_result() {
        let mut extra = Map::new();
        extra.insert("id".into(), Value::from("abc"));
        let result = TransformedSurvey {
            form: "<form/>".into(),
            model: "<model/>".into(),
            language_map: BTreeMap::from([("english".to_string(), "en".to_string())]),
            transformer_version: "abc123".into(),
            extra,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["languageMap"]["english"], "en");
        assert_eq!(json["transformerVersion"], "abc123");
        assert_eq!(json["id"], "abc");
        assert!(json.get("xform").is_none());
    }

    #[test]
    fn test_from_xform_bytes() {
        let survey = Survey::from_xform_bytes(b"\xEF\xBB\xBF<h:html/>");
        assert_eq!(survey.xform.as_deref(), Some("<h:html/>"));
    }
}
