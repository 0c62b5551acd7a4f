//! Namespace reconciliation between the source XForm and the generated model.

use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};
use crate::namespaces::XMLNS;
use crate::xslt::Stylesheet;

/// Copy the XForm root's namespace declarations onto each primary instance
/// root of the model.
///
/// A declaration is skipped when the model stylesheet's root declares the
/// same name, when its URI is already used by one of the `<model>` element's
/// attributes, or when the instance root already carries it. Declarations
/// that cannot be set are logged and skipped.
pub fn reconcile_namespaces(
    model: &mut Document,
    xform: &Document,
    stylesheet: &Stylesheet,
) -> Result<()> {
    let model_element = model.find_by_tag("model").ok_or(Error::MissingModel)?;

    let model_namespaces: Vec<String> = model
        .attrs(model_element)
        .iter()
        .filter(|a| !a.is_namespace_declaration() && !a.name.ns.is_empty())
        .map(|a| a.name.ns.to_string())
        .collect();

    let declarations: Vec<(String, String)> = xform
        .document_element()
        .map(|root| {
            xform
                .attrs(root)
                .iter()
                .filter(|a| a.is_namespace_declaration())
                .map(|a| (a.qualified_name(), a.value.clone()))
                .collect()
        })
        .unwrap_or_default();

    let instance_roots: Vec<NodeId> = model
        .element_children(model_element)
        .find(|&c| model.element_name(c).is_some_and(|n| n.as_ref() == "instance"))
        .map(|instance| model.element_children(instance).collect())
        .unwrap_or_default();

    for root in instance_roots {
        for (name, uri) in &declarations {
            if stylesheet.declares(name)
                || model_namespaces.iter().any(|ns| ns == uri)
                || model.has_attr(root, name)
            {
                continue;
            }
            if let Err(err) = model.set_attr_ns(root, XMLNS, name, uri) {
                log::warn!("namespace reconciliation: {err}");
            }
        }
    }

    Ok(())
}
