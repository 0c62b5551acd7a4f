//! Backward-compatible `meta/instanceID` insertion.

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::namespaces::{OPENROSA, XFORMS};

use super::primary_instance_root;

/// Make sure the primary instance has a `meta/instanceID` node.
///
/// An existing pair in the XForms or OpenRosa namespace (or the instance
/// root's own namespace) is left alone. Otherwise an XForms `<instanceID>`
/// is appended to the instance root's `<meta>` child, which is created when
/// missing.
pub fn ensure_instance_id(model: &mut Document) -> Result<()> {
    let Some(root) = primary_instance_root(model) else {
        return Ok(());
    };

    let root_ns = model
        .element_namespace(root)
        .map(|ns| ns.to_string())
        .unwrap_or_default();
    let namespaces = [XFORMS, OPENROSA, root_ns.as_str()];

    if has_instance_id(model, root, &namespaces) {
        return Ok(());
    }

    let existing = model
        .element_children(root)
        .find(|&c| model.is_named(c, XFORMS, "meta"));
    let meta = match existing {
        Some(meta) => meta,
        None => {
            let meta = model.create_element_ns(XFORMS, "meta");
            model.append(root, meta);
            meta
        }
    };
    let instance_id = model.create_element_ns(XFORMS, "instanceID");
    model.append(meta, instance_id);

    log::debug!("instanceID: added");
    Ok(())
}

fn has_instance_id(model: &Document, root: NodeId, namespaces: &[&str]) -> bool {
    namespaces.iter().any(|ns| {
        model
            .element_children(root)
            .filter(|&c| model.is_named(c, ns, "meta"))
            .any(|meta| {
                model
                    .element_children(meta)
                    .any(|c| model.is_named(c, ns, "instanceID"))
            })
    })
}
