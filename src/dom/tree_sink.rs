//! html5ever tree builder target for [`Document`].
//!
//! Only HTML fragments (rendered Markdown) go through here. The fragment is
//! wrapped in a standard-mode document whose DOCTYPE the tree builder drops,
//! so quirks mode and doctype callbacks are ignored.

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName};

use super::arena::{Attribute, Document, NodeData, NodeId};

/// Builds a [`Document`] from tree builder callbacks. Handles are arena ids.
pub(crate) struct FragmentSink {
    dom: RefCell<Document>,
}

impl FragmentSink {
    pub(crate) fn new() -> Self {
        Self {
            dom: RefCell::new(Document::new()),
        }
    }

    pub(crate) fn into_document(self) -> Document {
        self.dom.into_inner()
    }

    /// Turn a callback's payload into a detached node.
    fn node(dom: &mut Document, child: NodeOrText<NodeId>) -> NodeId {
        match child {
            NodeOrText::AppendNode(id) => id,
            NodeOrText::AppendText(text) => dom.create_text(text.to_string()),
        }
    }
}

fn convert(attr: Html5Attribute) -> Attribute {
    Attribute {
        name: attr.name,
        value: attr.value.to_string(),
    }
}

impl TreeSink for FragmentSink {
    type Handle = NodeId;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self {
        self
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {}

    fn get_document(&self) -> NodeId {
        self.dom.borrow().document()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> &'a QualName {
        static NONE: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let dom = self.dom.borrow();
        let Some(NodeData::Element { name, .. }) = dom.get(*target).map(|n| &n.data) else {
            return &NONE;
        };
        // SAFETY: the name lives in the arena owned by `self`. Nodes only
        // move when a callback allocates, and the tree builder is done with
        // the name before it makes the next callback.
        unsafe { std::mem::transmute::<&QualName, &'a QualName>(name) }
    }

    fn create_element(&self, name: QualName, attrs: Vec<Html5Attribute>, _: ElementFlags) -> NodeId {
        let attrs = attrs.into_iter().map(convert).collect();
        self.dom.borrow_mut().create_element(name, attrs)
    }

    fn create_comment(&self, text: StrTendril) -> NodeId {
        self.dom.borrow_mut().create_comment(text.to_string())
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> NodeId {
        self.dom
            .borrow_mut()
            .create_pi(target.to_string(), data.to_string())
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            // Adjacent character tokens share one text node.
            NodeOrText::AppendText(text) => dom.append_text(*parent, &text),
            node => {
                let id = Self::node(&mut dom, node);
                dom.append(*parent, id);
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        let has_parent = self.dom.borrow().parent(*element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(&self, _: StrTendril, _: StrTendril, _: StrTendril) {}

    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        let id = Self::node(&mut dom, new_node);
        dom.insert_before(*sibling, id);
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<Html5Attribute>) {
        let mut dom = self.dom.borrow_mut();
        for attr in attrs.into_iter().map(convert) {
            let qualified = attr.qualified_name();
            if !dom.has_attr(*target, &qualified) {
                dom.set_attr(*target, &qualified, &attr.value);
            }
        }
    }

    fn remove_from_parent(&self, target: &NodeId) {
        self.dom.borrow_mut().remove(*target);
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        let mut dom = self.dom.borrow_mut();
        let children: Vec<NodeId> = dom.children(*node).collect();
        for child in children {
            dom.append(*new_parent, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::html::parse_fragment;

    #[test]
    fn test_fragment_lands_in_body() {
        let dom = parse_fragment(r#"<p id="x">Hello</p>"#);
        let body = dom.find_by_tag("body").unwrap();
        let p = dom.first_element_child(body).unwrap();
        assert_eq!(dom.element_id(p), Some("x"));
        assert_eq!(dom.text_content(p), "Hello");
        assert!(dom.find_by_tag("p").is_some());
    }

    #[test]
    fn test_character_tokens_share_a_text_node() {
        let dom = parse_fragment("<p>a &amp; b &lt; c</p>");
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(dom.children(p).count(), 1);
        assert_eq!(dom.text_content(p), "a & b < c");
    }

    #[test]
    fn test_misnested_markup_is_repaired() {
        let dom = parse_fragment("<p><strong>a<em>b</strong>c</em></p>");
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(dom.text_content(p), "abc");
    }

    #[test]
    fn test_stray_body_tag_adds_missing_attributes() {
        let dom = parse_fragment(r#"<p>x</p><body class="late" id="b">"#);
        let body = dom.find_by_tag("body").unwrap();
        assert_eq!(dom.get_attr(body, "class"), Some("late"));
        assert_eq!(dom.element_id(body), Some("b"));
    }
}
