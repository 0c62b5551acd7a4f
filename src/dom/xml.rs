//! XML parsing into a [`Document`] and namespace-aware serialization.
//!
//! Parsing uses quick-xml's event reader and resolves prefixes itself, so
//! every element and attribute carries its namespace URI. Serialization
//! tracks the namespaces in scope and emits missing declarations, which
//! keeps sub-tree output (e.g. just the `<model>` element) well-formed.

use std::borrow::Cow;

use html5ever::{LocalName, Namespace, Prefix, QualName};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use super::arena::{Attribute, Document, NodeData, NodeId};
use crate::error::{Error, Result};
use crate::namespaces::{XML, XMLNS};

/// Prefix → URI bindings with one frame per open element.
#[derive(Debug, Default)]
pub(crate) struct NamespaceScope {
    bindings: Vec<(String, String)>,
    frames: Vec<usize>,
}

impl NamespaceScope {
    pub fn new() -> Self {
        Self {
            bindings: vec![("xml".to_string(), XML.to_string())],
            frames: Vec::new(),
        }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(self.bindings.len());
    }

    pub fn pop_frame(&mut self) {
        if let Some(len) = self.frames.pop() {
            self.bindings.truncate(len);
        }
    }

    /// Bind a prefix (`""` for the default namespace) in the current frame.
    pub fn bind(&mut self, prefix: &str, uri: &str) {
        self.bindings.push((prefix.to_string(), uri.to_string()));
    }

    /// Resolve a prefix, innermost binding first. An empty URI unbinds.
    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
            .filter(|uri| !uri.is_empty())
    }
}

/// Parse XML text into a document.
///
/// Empty input, unclosed or mismatched elements, unbound prefixes, text
/// outside the root element and multiple root elements are all errors.
pub fn parse(text: &str) -> Result<Document> {
    if text.trim().is_empty() {
        return Err(Error::Parse("document is empty".to_string()));
    }

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut dom = Document::new();
    let mut stack: Vec<NodeId> = vec![dom.document()];
    let mut scope = NamespaceScope::new();
    let mut has_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::Parse(format!("{e} (at byte {})", reader.buffer_position())))?;

        match event {
            Event::Start(e) => {
                let id = open_element(&mut dom, &e, &mut scope, &stack, &mut has_root)?;
                stack.push(id);
            }
            Event::Empty(e) => {
                open_element(&mut dom, &e, &mut scope, &stack, &mut has_root)?;
                scope.pop_frame();
            }
            Event::End(_) => {
                if stack.len() <= 1 {
                    return Err(Error::Parse("unexpected end tag".to_string()));
                }
                stack.pop();
                scope.pop_frame();
            }
            Event::Text(e) => {
                let raw = String::from_utf8_lossy(e.as_ref());
                push_text(&mut dom, &stack, &raw)?;
            }
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                let resolved = resolve_entity(&entity)
                    .ok_or_else(|| Error::Parse(format!("unknown entity `&{entity};`")))?;
                push_text(&mut dom, &stack, &resolved)?;
            }
            Event::CData(e) => {
                let raw = String::from_utf8_lossy(&e);
                push_text(&mut dom, &stack, &raw)?;
            }
            Event::Comment(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                let parent = current(&stack);
                let comment = dom.create_comment(text);
                dom.append(parent, comment);
            }
            Event::PI(e) => {
                let content = String::from_utf8_lossy(&e).into_owned();
                let (target, data) = match content.split_once(char::is_whitespace) {
                    Some((target, data)) => (target.to_string(), data.trim_start().to_string()),
                    None => (content, String::new()),
                };
                let parent = current(&stack);
                let pi = dom.create_pi(target, data);
                dom.append(parent, pi);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() > 1 {
        let open = dom
            .qual_name(current(&stack))
            .map(super::arena::qualified_name)
            .unwrap_or_default();
        return Err(Error::Parse(format!("unclosed element <{open}>")));
    }
    if !has_root {
        return Err(Error::Parse("no root element".to_string()));
    }

    Ok(dom)
}

fn current(stack: &[NodeId]) -> NodeId {
    stack.last().copied().unwrap_or(NodeId::NONE)
}

fn push_text(dom: &mut Document, stack: &[NodeId], text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let parent = current(stack);
    if parent == dom.document() {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(Error::Parse("text outside the root element".to_string()));
    }
    dom.append_text(parent, text);
    Ok(())
}

/// Create an element from a start tag, push its namespace frame and attach it.
fn open_element(
    dom: &mut Document,
    start: &BytesStart<'_>,
    scope: &mut NamespaceScope,
    stack: &[NodeId],
    has_root: &mut bool,
) -> Result<NodeId> {
    let parent = current(stack);
    if parent == dom.document() {
        if *has_root {
            return Err(Error::Parse("multiple root elements".to_string()));
        }
        *has_root = true;
    }

    let mut raw_attrs: Vec<(String, String)> = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw)
            .map_err(|e| Error::Parse(e.to_string()))?
            .into_owned();
        raw_attrs.push((key, value));
    }

    scope.push_frame();
    for (key, value) in &raw_attrs {
        if key == "xmlns" {
            scope.bind("", value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.bind(prefix, value);
        }
    }

    let raw_name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let name = resolve_name(scope, &raw_name, true)?;

    let attrs = raw_attrs
        .into_iter()
        .map(|(key, value)| {
            Ok(Attribute {
                name: resolve_name(scope, &key, false)?,
                value,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let id = dom.create_element(name, attrs);
    dom.append(parent, id);
    Ok(id)
}

/// Resolve a raw `prefix:local` name against the scope.
fn resolve_name(scope: &NamespaceScope, raw: &str, is_element: bool) -> Result<QualName> {
    match raw.split_once(':') {
        Some((prefix, local)) => {
            let uri = match prefix {
                "xmlns" if !is_element => XMLNS,
                _ => scope
                    .lookup(prefix)
                    .ok_or_else(|| Error::Parse(format!("unbound namespace prefix `{prefix}`")))?,
            };
            Ok(QualName::new(
                Some(Prefix::from(prefix)),
                Namespace::from(uri),
                LocalName::from(local),
            ))
        }
        None if !is_element && raw == "xmlns" => {
            Ok(QualName::new(None, Namespace::from(XMLNS), LocalName::from(raw)))
        }
        None if is_element => {
            let uri = scope.lookup("").unwrap_or_default();
            Ok(QualName::new(None, Namespace::from(uri), LocalName::from(raw)))
        }
        None => Ok(QualName::new(None, Namespace::from(""), LocalName::from(raw))),
    }
}

/// Resolve XML entity and character references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}

/// Escape text content.
pub(crate) fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape an attribute value for double-quoted output.
pub(crate) fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Serialize a node and its subtree as XML.
pub fn serialize(dom: &Document, id: NodeId) -> String {
    let mut out = String::new();
    let mut scope = NamespaceScope::new();
    write_node(dom, id, &mut scope, &mut out);
    out
}

fn write_node(dom: &Document, id: NodeId, scope: &mut NamespaceScope, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document => {
            for child in dom.children(id) {
                write_node(dom, child, scope, out);
            }
        }
        NodeData::Element { name, attrs } => {
            scope.push_frame();
            for attr in attrs.iter().filter(|a| a.is_namespace_declaration()) {
                let prefix = if attr.name.prefix.is_some() {
                    attr.name.local.as_ref()
                } else {
                    ""
                };
                scope.bind(prefix, &attr.value);
            }

            let mut missing: Vec<(String, String)> = Vec::new();
            let element_prefix = name.prefix.as_ref().map(|p| p.as_ref()).unwrap_or("");
            if scope.lookup(element_prefix).unwrap_or("") != name.ns.as_ref()
                && (element_prefix.is_empty() || !name.ns.is_empty())
            {
                missing.push((element_prefix.to_string(), name.ns.to_string()));
                scope.bind(element_prefix, &name.ns);
            }
            for attr in attrs.iter().filter(|a| !a.is_namespace_declaration()) {
                let Some(prefix) = attr.name.prefix.as_ref().map(|p| p.as_ref()) else {
                    continue;
                };
                if prefix == "xml" || attr.name.ns.is_empty() {
                    continue;
                }
                if scope.lookup(prefix) != Some(attr.name.ns.as_ref()) {
                    missing.push((prefix.to_string(), attr.name.ns.to_string()));
                    scope.bind(prefix, &attr.name.ns);
                }
            }

            out.push('<');
            out.push_str(&super::arena::qualified_name(name));
            for attr in attrs {
                out.push(' ');
                out.push_str(&attr.qualified_name());
                out.push_str("=\"");
                out.push_str(&escape_attr(&attr.value));
                out.push('"');
            }
            for (prefix, uri) in &missing {
                if prefix.is_empty() {
                    out.push_str(" xmlns=\"");
                } else {
                    out.push_str(" xmlns:");
                    out.push_str(prefix);
                    out.push_str("=\"");
                }
                out.push_str(&escape_attr(uri));
                out.push('"');
            }

            if node.first_child.is_none() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in dom.children(id) {
                    write_node(dom, child, scope, out);
                }
                out.push_str("</");
                out.push_str(&super::arena::qualified_name(name));
                out.push('>');
            }
            scope.pop_frame();
        }
        NodeData::Text(text) => out.push_str(&escape_text(text)),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::ProcessingInstruction { target, data } => {
            out.push_str("<?");
            out.push_str(target);
            if !data.is_empty() {
                out.push(' ');
                out.push_str(data);
            }
            out.push_str("?>");
        }
    }
}

impl Document {
    /// Parse XML text (see [`parse`]).
    pub fn parse_xml(text: &str) -> Result<Document> {
        parse(text)
    }

    /// Serialize a node and its subtree as XML.
    pub fn to_xml(&self, id: NodeId) -> String {
        serialize(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::{OPENROSA, XFORMS, XHTML};

    const XFORM: &str = r#"<?xml version="1.0"?>
<h:html xmlns="http://www.w3.org/2002/xforms" xmlns:h="http://www.w3.org/1999/xhtml" xmlns:orx="http://openrosa.org/xforms">
  <h:head>
    <model>
      <instance><data id="x"><a>1 &amp; 2</a><orx:meta/></data></instance>
    </model>
  </h:head>
</h:html>"#;

    #[test]
    fn test_parse_resolves_namespaces() {
        let dom = parse(XFORM).unwrap();
        let root = dom.document_element().unwrap();
        assert!(dom.is_named(root, XHTML, "html"));

        let model = dom.find_by_tag("model").unwrap();
        assert!(dom.is_named(model, XFORMS, "model"));

        let meta = dom.find_by_tag("meta").unwrap();
        assert!(dom.is_named(meta, OPENROSA, "meta"));

        let a = dom.find_by_tag("a").unwrap();
        assert_eq!(dom.text_content(a), "1 & 2");
        assert_eq!(dom.get_attr(root, "xmlns:orx"), Some(OPENROSA));
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
        assert!(parse("<data>").is_err());
        assert!(parse("<a></b>").is_err());
        assert!(parse("<a/><b/>").is_err());
        assert!(parse("text<a/>").is_err());
        assert!(parse("<x:a/>").is_err());
        assert!(parse("<a>&nbsp;</a>").is_err());
    }

    #[test]
    fn test_character_references() {
        let dom = parse("<a>&#65;&#x42;</a>").unwrap();
        let a = dom.document_element().unwrap();
        assert_eq!(dom.text_content(a), "AB");
    }

    #[test]
    fn test_serialize_subtree_adds_missing_declarations() {
        let dom = parse(XFORM).unwrap();
        let model = dom.find_by_tag("model").unwrap();
        let xml = dom.to_xml(model);
        assert!(xml.starts_with(r#"<model xmlns="http://www.w3.org/2002/xforms">"#));
        assert!(xml.contains(r#"<orx:meta xmlns:orx="http://openrosa.org/xforms"/>"#));
        assert!(xml.contains("<a>1 &amp; 2</a>"));
    }

    #[test]
    fn test_serialize_created_element_in_default_namespace() {
        let mut dom = parse(r#"<root xmlns="http://www.w3.org/2002/xforms"><meta/></root>"#).unwrap();
        let meta = dom.find_by_tag("meta").unwrap();
        let id = dom.create_element_ns(XFORMS, "instanceID");
        dom.append(meta, id);
        let root = dom.document_element().unwrap();
        assert_eq!(
            dom.to_xml(root),
            r#"<root xmlns="http://www.w3.org/2002/xforms"><meta><instanceID/></meta></root>"#
        );
    }

    #[test]
    fn test_round_trip_is_stable() {
        let dom = parse(XFORM).unwrap();
        let once = dom.to_xml(dom.document());
        let reparsed = parse(&once).unwrap();
        let again = reparsed.to_xml(reparsed.document());
        assert_eq!(once, again);
    }
}
