//! Document tree used by every pipeline pass.
//!
//! XForms, generated forms and generated models all live in the same arena
//! [`Document`]. XML goes through `quick-xml` ([`xml`]), HTML fragments
//! through `html5ever` ([`html`]), and queries through the `selectors` crate
//! ([`select`]).

mod arena;
pub mod html;
pub mod select;
mod tree_sink;
pub mod xml;

pub use arena::{Attribute, Document, Node, NodeData, NodeId, NamespaceError, qualified_name};
pub use select::css_string;
