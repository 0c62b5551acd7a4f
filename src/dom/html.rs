//! HTML serialization and fragment insertion.

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;

use super::arena::{Document, NodeData, NodeId, qualified_name};
use super::tree_sink::FragmentSink;
use super::xml::{escape_attr, escape_text};

/// Elements serialized without an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text is written verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parse an HTML fragment into a standalone document.
///
/// The fragment is wrapped in a minimal document; its nodes end up as
/// children of `<body>`.
pub fn parse_fragment(html: &str) -> Document {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };

    parse_document(FragmentSink::new(), opts)
        .from_utf8()
        .one(wrapped.as_bytes())
        .into_document()
}

/// Serialize a node and its subtree as HTML (`outerHTML`).
pub fn serialize(dom: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(dom, id, false, &mut out);
    out
}

/// Serialize the children of a node as HTML (`innerHTML`).
pub fn serialize_children(dom: &Document, id: NodeId) -> String {
    let raw = dom
        .element_name(id)
        .is_some_and(|n| RAW_TEXT_ELEMENTS.contains(&n.as_ref()));
    let mut out = String::new();
    for child in dom.children(id) {
        write_node(dom, child, raw, &mut out);
    }
    out
}

fn write_node(dom: &Document, id: NodeId, raw_text: bool, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document => {
            for child in dom.children(id) {
                write_node(dom, child, false, out);
            }
        }
        NodeData::Element { name, attrs } => {
            let tag = qualified_name(name);
            out.push('<');
            out.push_str(&tag);
            for attr in attrs {
                out.push(' ');
                out.push_str(&attr.qualified_name());
                out.push_str("=\"");
                out.push_str(&escape_attr(&attr.value));
                out.push('"');
            }
            out.push('>');

            let local = name.local.as_ref();
            if VOID_ELEMENTS.contains(&local) {
                return;
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&local);
            for child in dom.children(id) {
                write_node(dom, child, raw, out);
            }
            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }
        NodeData::Text(text) if raw_text => out.push_str(text),
        NodeData::Text(text) => out.push_str(&escape_text(text)),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::ProcessingInstruction { target, data } => {
            out.push_str("<?");
            out.push_str(target);
            out.push(' ');
            out.push_str(data);
            out.push('>');
        }
    }
}

impl Document {
    /// Serialize a node as HTML (`outerHTML`).
    pub fn to_html(&self, id: NodeId) -> String {
        serialize(self, id)
    }

    /// Serialize the children of a node as HTML (`innerHTML`).
    pub fn inner_html(&self, id: NodeId) -> String {
        serialize_children(self, id)
    }

    /// Parse `html` and append the resulting nodes to `parent`
    /// (`insertAdjacentHTML("beforeend", …)`).
    pub fn insert_html(&mut self, parent: NodeId, html: &str) {
        let fragment = parse_fragment(html);
        let Some(body) = fragment.find_by_tag("body") else {
            return;
        };
        for child in fragment.children(body) {
            let imported = self.import_node(&fragment, child);
            self.append(parent, imported);
        }
    }
}
