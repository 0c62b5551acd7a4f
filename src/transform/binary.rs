//! Default values of binary (media) questions.

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::url::escape_url_path;

use super::{primary_instance_root, resolve_nodeset};

/// Give every instance node bound by `bind[type=binary]` a `src` attribute
/// holding its escaped default value. The default text stays in place.
pub fn rewrite_binary_defaults(xform: &mut Document) -> Result<()> {
    let Some(instance_root) = primary_instance_root(xform) else {
        return Ok(());
    };

    let binds = xform.select(xform.document(), r#"bind[type="binary"]"#)?;
    let targets: Vec<NodeId> = binds
        .into_iter()
        .filter_map(|bind| xform.get_attr(bind, "nodeset"))
        .flat_map(|nodeset| resolve_nodeset(xform, instance_root, nodeset))
        .collect();

    let mut rewritten = 0;
    for node in targets {
        let text = xform.text_content(node);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let src = escape_url_path(text);
        xform.set_attr(node, "src", &src);
        rewritten += 1;
    }

    log::debug!("binary defaults: {rewritten} rewritten");
    Ok(())
}
