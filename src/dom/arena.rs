//! Arena-based document tree.
//!
//! All nodes live in one contiguous vector; parent/child/sibling links are
//! indices into it. Detached nodes stay allocated until the document is
//! dropped, which keeps every `NodeId` handed out during a pipeline run valid.

use std::fmt;

use html5ever::{LocalName, Namespace, Prefix, QualName, ns};
use thiserror::Error;

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node type in the arena.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with its qualified name and attributes in source order.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
    },
    /// Text content (CDATA sections are folded into text).
    Text(String),
    Comment(String),
    ProcessingInstruction {
        target: String,
        data: String,
    },
}

/// Element attribute. Namespace declarations are attributes in the XMLNS namespace.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// The attribute's qualified name as written (`prefix:local` or `local`).
    pub fn qualified_name(&self) -> String {
        qualified_name(&self.name)
    }

    /// Whether this attribute is an `xmlns` or `xmlns:*` declaration.
    pub fn is_namespace_declaration(&self) -> bool {
        self.name.ns == ns!(xmlns)
    }
}

/// Format a qualified name as `prefix:local` or `local`.
pub fn qualified_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

/// Check whether `name` matches a qualified name string.
fn name_matches(name: &QualName, qualified: &str) -> bool {
    match qualified.split_once(':') {
        Some((prefix, local)) => {
            name.prefix.as_ref().is_some_and(|p| p.as_ref() == prefix) && name.local.as_ref() == local
        }
        None => name.prefix.is_none() && name.local.as_ref() == qualified,
    }
}

/// Raised when an attribute cannot be assigned in the requested namespace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot assign attribute `{name}` in namespace `{namespace}`: {reason}")]
pub struct NamespaceError {
    pub name: String,
    pub namespace: String,
    pub reason: &'static str,
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Arena-based document tree.
///
/// A `Document` is owned by exactly one pipeline run; nothing in the crate
/// shares one across calls.
#[derive(Clone)]
pub struct Document {
    nodes: Vec<Node>,
    document: NodeId,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("root", &self.document_element().and_then(|id| self.element_name(id)))
            .finish()
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document node ID.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// The root element (`documentElement`).
    pub fn document_element(&self) -> Option<NodeId> {
        self.first_element_child(self.document)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of allocated nodes, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the document only has its document node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    // ------------------------------------------------------------------
    // Node creation
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        self.alloc(Node::new(NodeData::Element { name, attrs }))
    }

    /// Create an element in no namespace (`createElement`).
    pub fn create_element_local(&mut self, local: &str) -> NodeId {
        self.create_element(QualName::new(None, ns!(), LocalName::from(local)), Vec::new())
    }

    /// Create an element in a namespace (`createElementNS`). `qualified` may carry a prefix.
    pub fn create_element_ns(&mut self, namespace: &str, qualified: &str) -> NodeId {
        let name = match qualified.split_once(':') {
            Some((prefix, local)) => QualName::new(
                Some(Prefix::from(prefix)),
                Namespace::from(namespace),
                LocalName::from(local),
            ),
            None => QualName::new(None, Namespace::from(namespace), LocalName::from(qualified)),
        };
        self.create_element(name, Vec::new())
    }

    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text)))
    }

    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    pub fn create_pi(&mut self, target: String, data: String) -> NodeId {
        self.alloc(Node::new(NodeData::ProcessingInstruction { target, data }))
    }


    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    /// Append a child to a parent node, detaching it from any previous parent.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.remove(child);

        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
        }

        if last_child.is_some()
            && let Some(last_node) = self.get_mut(last_child)
        {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        self.remove(new_node);

        let parent = self.get(sibling).map(|n| n.parent).unwrap_or(NodeId::NONE);
        let prev = self
            .get(sibling)
            .map(|n| n.prev_sibling)
            .unwrap_or(NodeId::NONE);

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Insert a node immediately after a sibling.
    pub fn insert_after(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, next) = match self.get(sibling) {
            Some(n) => (n.parent, n.next_sibling),
            None => return,
        };
        if next.is_some() {
            self.insert_before(next, new_node);
        } else if parent.is_some() {
            self.append(parent, new_node);
        }
    }

    /// Detach a node from its parent. The node and its subtree stay usable.
    pub fn remove(&mut self, target: NodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };
        if parent.is_none() {
            return;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Replace `old` with `new` in `old`'s parent.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) {
        if old == new {
            return;
        }
        self.insert_before(old, new);
        self.remove(old);
    }

    /// Append text to an existing trailing text node, or create a new one.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Detach every child of `parent`.
    pub fn clear_children(&mut self, parent: NodeId) {
        let children: Vec<_> = self.children(parent).collect();
        for child in children {
            self.remove(child);
        }
    }

    /// Deep-copy a subtree within this document. The copy is detached.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let Some(data) = self.get(id).map(|n| n.data.clone()) else {
            return NodeId::NONE;
        };
        let copy = self.alloc(Node::new(data));
        let children: Vec<_> = self.children(id).collect();
        for child in children {
            let child_copy = self.deep_clone(child);
            self.append(copy, child_copy);
        }
        copy
    }

    /// Deep-copy a subtree from another document into this one. The copy is detached.
    pub fn import_node(&mut self, other: &Document, id: NodeId) -> NodeId {
        let Some(node) = other.get(id) else {
            return NodeId::NONE;
        };
        if matches!(node.data, NodeData::Document) {
            return NodeId::NONE;
        }
        let copy = self.alloc(Node::new(node.data.clone()));
        for child in other.children(id) {
            let child_copy = self.import_node(other, child);
            self.append(copy, child_copy);
        }
        copy
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Iterate over element children of a node.
    pub fn element_children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent).filter(|&c| self.is_element(c))
    }

    /// Iterate over all descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let first = self
            .get(root)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        Descendants {
            dom: self,
            root,
            current: first,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_some())
    }

    /// Parent node, if it is an element (`parentElement`).
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.first_child).filter(|c| c.is_some())
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    /// Find the first node matching a predicate (DFS from the document node).
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        let mut stack = vec![self.document];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                if predicate(node) {
                    return Some(id);
                }
                let mut children: Vec<_> = self.children(id).collect();
                children.reverse();
                stack.extend(children);
            }
        }
        None
    }

    /// Find element by local name (first match).
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find(|node| match &node.data {
            NodeData::Element { name, .. } => name.local.as_ref() == tag,
            _ => false,
        })
    }

    /// Walk an absolute path of local names (`/root/model/instance`) down
    /// element children, starting at the document node. Steps may carry a
    /// prefix, which is ignored. Returns every match in document order.
    pub fn find_path(&self, path: &str) -> Vec<NodeId> {
        let mut current = vec![self.document];
        for step in path.split('/').filter(|s| !s.is_empty()) {
            let local = step.rsplit(':').next().unwrap_or(step);
            current = current
                .iter()
                .flat_map(|&id| self.element_children(id))
                .filter(|&c| self.element_name(c).is_some_and(|n| n.as_ref() == local))
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a Document,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct Descendants<'a> {
    dom: &'a Document,
    root: NodeId,
    current: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        let node = self.dom.get(id)?;

        self.current = if node.first_child.is_some() {
            node.first_child
        } else {
            let mut cur = id;
            loop {
                if cur == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.dom.get(cur) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_some() {
                    break n.next_sibling;
                }
                if n.parent.is_none() || n.parent == self.root {
                    break NodeId::NONE;
                }
                cur = n.parent;
            }
        };
        Some(id)
    }
}

/// Element and attribute accessors.
impl Document {
    pub fn qual_name(&self, id: NodeId) -> Option<&QualName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        })
    }

    /// Get element's local name (tag).
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.qual_name(id).map(|name| &name.local)
    }

    /// Get element's namespace.
    pub fn element_namespace(&self, id: NodeId) -> Option<&Namespace> {
        self.qual_name(id).map(|name| &name.ns)
    }

    /// Check whether an element has the given namespace and local name.
    pub fn is_named(&self, id: NodeId, namespace: &str, local: &str) -> bool {
        self.qual_name(id)
            .is_some_and(|name| name.ns.as_ref() == namespace && name.local.as_ref() == local)
    }

    /// Attributes of an element in source order (empty for other nodes).
    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        static EMPTY: &[Attribute] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    fn attrs_mut(&mut self, id: NodeId) -> Option<&mut Vec<Attribute>> {
        self.get_mut(id).and_then(|n| match &mut n.data {
            NodeData::Element { attrs, .. } => Some(attrs),
            _ => None,
        })
    }

    /// Get an attribute value by qualified name (`getAttribute`).
    pub fn get_attr(&self, id: NodeId, qualified: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| name_matches(&a.name, qualified))
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, id: NodeId, qualified: &str) -> bool {
        self.get_attr(id, qualified).is_some()
    }

    /// Set an attribute by qualified name (`setAttribute`). New attributes
    /// are created in no namespace.
    pub fn set_attr(&mut self, id: NodeId, qualified: &str, value: &str) {
        let Some(attrs) = self.attrs_mut(id) else {
            return;
        };
        if let Some(attr) = attrs.iter_mut().find(|a| name_matches(&a.name, qualified)) {
            attr.value = value.to_string();
            return;
        }
        let name = match qualified.split_once(':') {
            Some((prefix, local)) => {
                QualName::new(Some(Prefix::from(prefix)), ns!(), LocalName::from(local))
            }
            None => QualName::new(None, ns!(), LocalName::from(qualified)),
        };
        attrs.push(Attribute {
            name,
            value: value.to_string(),
        });
    }

    /// Set an attribute in a namespace (`setAttributeNS`).
    ///
    /// Fails on malformed qualified names and on the reserved `xml`/`xmlns`
    /// prefix and namespace pairings.
    pub fn set_attr_ns(
        &mut self,
        id: NodeId,
        namespace: &str,
        qualified: &str,
        value: &str,
    ) -> Result<(), NamespaceError> {
        let error = |reason| NamespaceError {
            name: qualified.to_string(),
            namespace: namespace.to_string(),
            reason,
        };

        let (prefix, local) = match qualified.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, qualified),
        };
        if !is_ncname(local) || prefix.is_some_and(|p| !is_ncname(p)) {
            return Err(error("not a valid qualified name"));
        }
        if prefix.is_some() && namespace.is_empty() {
            return Err(error("prefixed name without a namespace"));
        }
        if prefix == Some("xml") && namespace != crate::namespaces::XML {
            return Err(error("the xml prefix is reserved"));
        }
        let is_xmlns_name = prefix == Some("xmlns") || (prefix.is_none() && local == "xmlns");
        if is_xmlns_name != (namespace == crate::namespaces::XMLNS) {
            return Err(error("xmlns names must be in the XMLNS namespace"));
        }

        let Some(attrs) = self.attrs_mut(id) else {
            return Err(error("target is not an element"));
        };
        if let Some(attr) = attrs
            .iter_mut()
            .find(|a| a.name.ns.as_ref() == namespace && a.name.local.as_ref() == local)
        {
            attr.value = value.to_string();
            return Ok(());
        }
        attrs.push(Attribute {
            name: QualName::new(
                prefix.map(Prefix::from),
                Namespace::from(namespace),
                LocalName::from(local),
            ),
            value: value.to_string(),
        });
        Ok(())
    }

    /// Remove an attribute by qualified name.
    pub fn remove_attr(&mut self, id: NodeId, qualified: &str) {
        if let Some(attrs) = self.attrs_mut(id) {
            attrs.retain(|a| !name_matches(&a.name, qualified));
        }
    }

    /// Class tokens of an element.
    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.get_attr(id, "class")
            .unwrap_or_default()
            .split_whitespace()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    /// Get element's id attribute.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get_attr(id, "id")
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    /// Get the text of a text node.
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of all descendant text nodes (`textContent`).
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.node_text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.node_text(d))
            .collect()
    }

    /// Replace all children with a single text node (`textContent = …`).
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        if !text.is_empty() {
            let text_node = self.create_text(text.to_string());
            self.append(id, text_node);
        }
    }
}

/// Check an XML NCName (name without colon).
pub(crate) fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '\u{B7}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> (Document, NodeId, NodeId, NodeId) {
        let mut dom = Document::new();
        let root = dom.create_element_local("root");
        let a = dom.create_element_local("a");
        let b = dom.create_element_local("b");
        dom.append(dom.document(), root);
        dom.append(root, a);
        dom.append(root, b);
        (dom, root, a, b)
    }

    #[test]
    fn test_append_children() {
        let (dom, root, a, b) = build();
        let children: Vec<_> = dom.children(root).collect();
        assert_eq!(children, vec![a, b]);
        assert_eq!(dom.document_element(), Some(root));
    }

    #[test]
    fn test_insert_after_and_remove() {
        let (mut dom, root, a, b) = build();
        let c = dom.create_element_local("c");
        dom.insert_after(a, c);
        assert_eq!(dom.children(root).collect::<Vec<_>>(), vec![a, c, b]);

        dom.remove(a);
        assert_eq!(dom.children(root).collect::<Vec<_>>(), vec![c, b]);
        assert_eq!(dom.parent(a), None);

        let d = dom.create_element_local("d");
        dom.insert_after(b, d);
        assert_eq!(dom.children(root).collect::<Vec<_>>(), vec![c, b, d]);
    }

    #[test]
    fn test_append_moves_node() {
        let (mut dom, root, a, b) = build();
        dom.append(a, b);
        assert_eq!(dom.children(root).collect::<Vec<_>>(), vec![a]);
        assert_eq!(dom.parent(b), Some(a));
    }

    #[test]
    fn test_replace_with() {
        let (mut dom, root, a, b) = build();
        let c = dom.create_element_local("c");
        dom.replace_with(a, c);
        assert_eq!(dom.children(root).collect::<Vec<_>>(), vec![c, b]);
    }

    #[test]
    fn test_descendants_order() {
        let (mut dom, root, a, b) = build();
        let a1 = dom.create_element_local("a1");
        dom.append(a, a1);
        let text = dom.create_text("t".into());
        dom.append(b, text);

        let all: Vec<_> = dom.descendants(root).collect();
        assert_eq!(all, vec![a, a1, b, text]);

        let under_a: Vec<_> = dom.descendants(a).collect();
        assert_eq!(under_a, vec![a1]);
    }

    #[test]
    fn test_text_merging_and_content() {
        let (mut dom, _root, a, _b) = build();
        dom.append_text(a, "Hello, ");
        dom.append_text(a, "World!");
        assert_eq!(dom.children(a).count(), 1);
        assert_eq!(dom.text_content(a), "Hello, World!");

        dom.set_text_content(a, "bye");
        assert_eq!(dom.text_content(a), "bye");
        dom.set_text_content(a, "");
        assert_eq!(dom.children(a).count(), 0);
    }

    #[test]
    fn test_attributes() {
        let (mut dom, _root, a, _b) = build();
        dom.set_attr(a, "class", "one theme-x");
        assert!(dom.has_class(a, "theme-x"));
        dom.set_attr(a, "class", "two");
        assert_eq!(dom.get_attr(a, "class"), Some("two"));
        assert_eq!(dom.attrs(a).len(), 1);
        dom.remove_attr(a, "class");
        assert_eq!(dom.get_attr(a, "class"), None);
    }

    #[test]
    fn test_set_attr_ns_validation() {
        let (mut dom, _root, a, _b) = build();
        let xmlns = crate::namespaces::XMLNS;
        assert!(dom.set_attr_ns(a, xmlns, "xmlns:orx", "http://openrosa.org/xforms").is_ok());
        assert_eq!(dom.get_attr(a, "xmlns:orx"), Some("http://openrosa.org/xforms"));
        assert!(dom.set_attr_ns(a, xmlns, "xmlns:", "x").is_err());
        assert!(dom.set_attr_ns(a, "urn:other", "xmlns:foo", "x").is_err());
        assert!(dom.set_attr_ns(a, xmlns, "foo", "x").is_err());
    }

    #[test]
    fn test_deep_clone_is_detached() {
        let (mut dom, root, a, _b) = build();
        dom.append_text(a, "x");
        dom.set_attr(a, "name", "n");
        let copy = dom.deep_clone(a);
        assert_eq!(dom.parent(copy), None);
        assert_eq!(dom.text_content(copy), "x");
        assert_eq!(dom.get_attr(copy, "name"), Some("n"));
        assert_eq!(dom.children(root).count(), 2);
    }

    #[test]
    fn test_find_path() {
        let (mut dom, _root, a, _b) = build();
        let a1 = dom.create_element_local("x");
        let a2 = dom.create_element_local("x");
        dom.append(a, a1);
        dom.append(a, a2);
        assert_eq!(dom.find_path("/root/a/x"), vec![a1, a2]);
        assert_eq!(dom.find_path("/h:root/h:a"), vec![a]);
        assert!(dom.find_path("/root/missing/x").is_empty());
    }
}
