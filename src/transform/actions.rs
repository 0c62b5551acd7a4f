//! Repairs for `setvalue` and `setgeopoint` action controls.
//!
//! The form stylesheet emits a hidden input for every action. Two of its
//! outputs need fixing afterwards:
//!
//! - An action input ends up inside a nested `label`, which is invalid
//!   markup. The input is moved out next to the label, and the label goes.
//! - An action-only input shares its `name` with a visible question. The
//!   question takes over `data-<action>` and `data-event`, and the
//!   action-only label is dropped. With several same-named controls
//!   (radio and checkbox groups) only the first one is updated.

use crate::dom::{Document, NodeId, css_string};
use crate::error::Result;

/// Actions corrected by the pipeline, in order.
pub const ACTIONS: [&str; 2] = ["setvalue", "setgeopoint"];

/// Apply both repairs for one action kind.
pub fn correct_action(form: &mut Document, action: &str) -> Result<()> {
    let unnested = unnest_action_controls(form, action)?;
    let merged = merge_action_controls(form, action)?;
    log::debug!("{action}: {unnested} unnested, {merged} merged into questions");
    Ok(())
}

fn unnest_action_controls(form: &mut Document, action: &str) -> Result<usize> {
    let selector = format!(".question label > input[data-{action}]");
    let controls = form.select(form.document(), &selector)?;

    let mut count = 0;
    for control in controls {
        let Some(label) = form.parent_element(control) else {
            continue;
        };
        if form.parent(label).is_none() {
            // label already removed through an earlier control
            continue;
        }
        let clone = form.deep_clone(control);
        form.insert_after(label, clone);
        form.remove(label);
        count += 1;
    }
    Ok(count)
}

fn merge_action_controls(form: &mut Document, action: &str) -> Result<usize> {
    let data_action = format!("data-{action}");
    let selector = format!(".{action} > input[{data_action}]");
    let controls = form.select(form.document(), &selector)?;

    let mut count = 0;
    for control in controls {
        let Some(name) = form.get_attr(control, "name").map(str::to_string) else {
            continue;
        };
        let Some(question) = find_visible_control(form, &name, control)? else {
            continue;
        };

        for attr in [data_action.as_str(), "data-event"] {
            if let Some(value) = form.get_attr(control, attr).map(str::to_string) {
                form.set_attr(question, attr, &value);
            }
        }
        if let Some(label) = form.parent_element(control) {
            form.remove(label);
        }
        count += 1;
    }
    Ok(count)
}

/// First non-hidden control named `name` inside a question, or inside an
/// option wrapper.
fn find_visible_control(form: &Document, name: &str, exclude: NodeId) -> Result<Option<NodeId>> {
    let name = css_string(name);
    for selector in [
        format!(".question > [name={name}]:not([type=\"hidden\"])"),
        format!(".option-wrapper * > [name={name}]:not([type=\"hidden\"])"),
    ] {
        let found = form
            .select(form.document(), &selector)?
            .into_iter()
            .find(|&id| id != exclude);
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}
