//! The XForm transformation pipeline.
//!
//! The two structural transforms do the heavy lifting; everything in this
//! module repairs and enriches their output.
//!
//! ## Pipeline Order
//!
//! 1. Parse the XForm, run the caller's preprocess hook
//! 2. Add `src` to binary default values
//! 3. Form stylesheet, then on the HTML tree:
//!    action correction, theme, media, languages, Markdown
//! 4. Model stylesheet, then on the XML tree:
//!    namespaces, media, `instanceID`
//!
//! Every step works on documents owned by the call. Any error aborts the
//! whole transformation.

mod actions;
mod binary;
mod instance_id;
mod language;
mod markdown;
mod media;
mod namespace;
mod theme;

pub use actions::{ACTIONS, correct_action};
pub use binary::rewrite_binary_defaults;
pub use instance_id::ensure_instance_id;
pub use language::resolve_languages;
pub use markdown::render_markdown;
pub use media::resolve_media;
pub use namespace::reconcile_namespaces;
pub use theme::apply_theme;

use serde_json::Map;

use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};
use crate::survey::{Preprocess, RESERVED_FIELDS, Survey, TransformedSurvey};
use crate::url::MediaMap;
use crate::xslt::{Stylesheets, Xslt};

/// A reusable transformer: one XSLT engine, one stylesheet pair.
///
/// The version digest is computed once on construction. `Transformer` is
/// `Send + Sync`; share it behind an `Arc` to serve concurrent requests.
pub struct Transformer {
    engine: Box<dyn Xslt>,
    stylesheets: Stylesheets,
    version: String,
}

impl Transformer {
    pub fn new(engine: impl Xslt + 'static, stylesheets: Stylesheets) -> Self {
        let version = stylesheets.version();
        Self {
            engine: Box::new(engine),
            stylesheets,
            version,
        }
    }

    /// The transformer version reported in every result.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn stylesheets(&self) -> &Stylesheets {
        &self.stylesheets
    }

    /// Transform one survey.
    pub fn transform(&self, survey: Survey) -> Result<TransformedSurvey> {
        run(self.engine.as_ref(), &self.stylesheets, &self.version, survey)
    }
}

impl std::fmt::Debug for Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformer")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Transform one survey without keeping a [`Transformer`] around.
pub fn transform(
    engine: &dyn Xslt,
    stylesheets: &Stylesheets,
    survey: Survey,
) -> Result<TransformedSurvey> {
    run(engine, stylesheets, &stylesheets.version(), survey)
}

fn run(
    engine: &dyn Xslt,
    stylesheets: &Stylesheets,
    version: &str,
    survey: Survey,
) -> Result<TransformedSurvey> {
    let Survey {
        xform,
        markdown,
        media,
        openclinica,
        theme,
        preprocess,
        extra,
    } = survey;

    let source = xform.ok_or_else(|| Error::Parse("no XForm supplied".to_string()))?;
    let mut xform = Document::parse_xml(&source)?;

    match &preprocess {
        Some(Preprocess::Text(hook)) => {
            let text = hook(&source).map_err(Error::Preprocess)?;
            xform = Document::parse_xml(&text)?;
        }
        Some(Preprocess::Document(hook)) => hook(&mut xform).map_err(Error::Preprocess)?,
        None => {}
    }

    rewrite_binary_defaults(&mut xform)?;

    let media = MediaMap::new(&media);

    let params: &[(&str, &str)] = if openclinica {
        &[("openclinica", "1")]
    } else {
        &[]
    };
    let mut form = engine
        .transform(&stylesheets.form, &xform, params)
        .map_err(Error::StructuralTransform)?;

    for action in ACTIONS {
        correct_action(&mut form, action)?;
    }
    if let Some(theme) = theme.as_deref() {
        apply_theme(&mut form, theme)?;
    }
    resolve_media(&mut form, &media)?;
    let language_map = resolve_languages(&mut form)?;
    if markdown {
        render_markdown(&mut form)?;
    }
    let form = form.to_html(output_root(&form));

    let mut model = engine
        .transform(&stylesheets.model, &xform, &[])
        .map_err(Error::StructuralTransform)?;

    reconcile_namespaces(&mut model, &xform, &stylesheets.model)?;
    resolve_media(&mut model, &media)?;
    ensure_instance_id(&mut model)?;
    let model = model.to_xml(output_root(&model));

    let extra: Map<_, _> = extra
        .into_iter()
        .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
        .collect();

    Ok(TransformedSurvey {
        form,
        model,
        language_map,
        transformer_version: version.to_string(),
        extra,
    })
}

/// The element serialized as output: the document element's first element
/// child (`<root><form/></root>` → `<form/>`), or the document element.
fn output_root(dom: &Document) -> NodeId {
    let Some(root) = dom.document_element() else {
        return dom.document();
    };
    dom.first_element_child(root).unwrap_or(root)
}

/// Root element of the primary instance: the first element child of the
/// first `<instance>` in the first `<model>`.
pub(crate) fn primary_instance_root(dom: &Document) -> Option<NodeId> {
    let model = dom.find_by_tag("model")?;
    let instance = dom
        .element_children(model)
        .find(|&c| dom.element_name(c).is_some_and(|n| n.as_ref() == "instance"))?;
    dom.first_element_child(instance)
}

/// Resolve an absolute `nodeset` path (`/data/group/question`) against the
/// primary instance. Prefixes are ignored; every match is returned in
/// document order.
pub(crate) fn resolve_nodeset(dom: &Document, instance_root: NodeId, path: &str) -> Vec<NodeId> {
    let mut steps = path
        .trim()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.rsplit(':').next().unwrap_or(s));

    let matches_root = steps.next().is_some_and(|first| {
        dom.element_name(instance_root)
            .is_some_and(|n| n.as_ref() == first)
    });
    if !path.trim_start().starts_with('/') || !matches_root {
        return Vec::new();
    }

    steps.fold(vec![instance_root], |current, step| {
        current
            .iter()
            .flat_map(|&id| dom.element_children(id))
            .filter(|&c| dom.element_name(c).is_some_and(|n| n.as_ref() == step))
            .collect()
    })
}
