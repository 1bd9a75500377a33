//! Detached HTML trees
//!
//! Both directions of the content transformer work on a tree parsed from the host's serialized
//! markup, mutate it in place and hand back a string. This module owns that tree.
//!
//! # Library Choice
//!
//! We use `html5ever` + `markup5ever_rcdom` for parsing and serialization. The parser is
//! browser grade, so whatever an editor hands us (unclosed tags, stray entities, pasted
//! fragments) comes out as a tree and never as an error.
//!
//! # Fragments
//!
//! Editor content is a fragment, not a document. We run the fragment parser in the context of a
//! `<template>` element, the way `template.innerHTML` does, and lift the result into a detached
//! container `div`. Whitespace and comments at the edges survive, and so do table rows and cells
//! handed over without their table.
//!
//! Handles are reference counted. A [`NodeRef`] obtained from a [`Document`] stays valid (and
//! keeps its subtree alive) after the document itself is dropped, which is what lets an editing
//! session hold on to its target region.

use crate::error::MathtexError;
use html5ever::tendril::TendrilSink;
use html5ever::{
    local_name, ns, parse_fragment, serialize, serialize::SerializeOpts, serialize::TraversalScope,
    Attribute, LocalName, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// An owned, detached HTML fragment
pub struct Document {
    root: NodeRef,
}

impl Document {
    /// Parse a markup fragment into a detached tree.
    pub fn parse(html: &str) -> Result<Self, MathtexError> {
        let context = QualName::new(None, ns!(html), local_name!("template"));
        let dom = parse_fragment(RcDom::default(), Default::default(), context, vec![], false)
            .one(html);

        // The fragment parser puts everything under a single synthetic html element
        let html_element = dom
            .document
            .children
            .borrow()
            .iter()
            .find(|child| NodeRef(Rc::clone(child)).tag_name().as_deref() == Some("html"))
            .cloned()
            .ok_or_else(|| MathtexError::Parse("parser produced no html element".to_string()))?;

        let root = NodeRef::element("div", &[]);
        for child in NodeRef(html_element).take_children() {
            root.append(&child);
        }
        Ok(Self { root })
    }

    /// The detached container holding the fragment's top level nodes.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Serialize the fragment back to markup (the container itself is not emitted).
    pub fn to_html(&self) -> Result<String, MathtexError> {
        self.root.inner_html()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_html() {
            Ok(html) => f.debug_tuple("Document").field(&html).finish(),
            Err(_) => f.write_str("Document(<unserializable>)"),
        }
    }
}

/// A shared handle to one node of a [`Document`]
#[derive(Clone)]
pub struct NodeRef(Handle);

impl NodeRef {
    /// Create a detached element with attributes.
    pub fn element(tag: &str, attrs: &[(&str, &str)]) -> Self {
        let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
        let attributes = attrs
            .iter()
            .map(|(name, value)| Attribute {
                name: QualName::new(None, ns!(), LocalName::from(*name)),
                value: value.to_string().into(),
            })
            .collect();

        NodeRef(Rc::new(Node {
            parent: Cell::new(None),
            children: RefCell::new(Vec::new()),
            data: NodeData::Element {
                name: qual_name,
                attrs: RefCell::new(attributes),
                template_contents: Default::default(),
                mathml_annotation_xml_integration_point: false,
            },
        }))
    }

    /// Create a detached text node.
    pub fn text(text: &str) -> Self {
        NodeRef(Rc::new(Node {
            parent: Cell::new(None),
            children: RefCell::new(Vec::new()),
            data: NodeData::Text {
                contents: RefCell::new(text.to_string().into()),
            },
        }))
    }

    /// Local tag name, `None` for anything that is not an element.
    pub fn tag_name(&self) -> Option<String> {
        match &self.0.data {
            NodeData::Element { name, .. } => Some(name.local.to_string()),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.0.data, NodeData::Element { .. })
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        match &self.0.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|attr| &*attr.name.local == name)
                .map(|attr| attr.value.to_string()),
            _ => None,
        }
    }

    /// Set an attribute, replacing its value in place or appending it. No-op on non-elements.
    pub fn set_attribute(&self, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &self.0.data {
            let mut attrs = attrs.borrow_mut();
            match attrs.iter_mut().find(|attr| &*attr.name.local == name) {
                Some(attr) => attr.value = value.to_string().into(),
                None => attrs.push(Attribute {
                    name: QualName::new(None, ns!(), LocalName::from(name)),
                    value: value.to_string().into(),
                }),
            }
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&self, name: &str) -> bool {
        match &self.0.data {
            NodeData::Element { attrs, .. } => {
                let mut attrs = attrs.borrow_mut();
                let before = attrs.len();
                attrs.retain(|attr| &*attr.name.local != name);
                attrs.len() != before
            }
            _ => false,
        }
    }

    /// Whether the whitespace separated `class` attribute lists `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|value| value.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn children(&self) -> Vec<NodeRef> {
        self.0
            .children
            .borrow()
            .iter()
            .map(|child| NodeRef(Rc::clone(child)))
            .collect()
    }

    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    pub fn first_child(&self) -> Option<NodeRef> {
        self.0
            .children
            .borrow()
            .first()
            .map(|child| NodeRef(Rc::clone(child)))
    }

    pub fn parent(&self) -> Option<NodeRef> {
        let weak = self.0.parent.take();
        let parent = weak.as_ref().and_then(|weak| weak.upgrade());
        self.0.parent.set(weak);
        parent.map(NodeRef)
    }

    /// Append `child` as the last child, detaching it from any previous parent.
    pub fn append(&self, child: &NodeRef) {
        child.detach();
        child.0.parent.set(Some(Rc::downgrade(&self.0)));
        self.0.children.borrow_mut().push(Rc::clone(&child.0));
    }

    /// Insert `child` at `index` (clamped to the child count).
    pub fn insert(&self, index: usize, child: &NodeRef) {
        child.detach();
        child.0.parent.set(Some(Rc::downgrade(&self.0)));
        let mut children = self.0.children.borrow_mut();
        let index = index.min(children.len());
        children.insert(index, Rc::clone(&child.0));
    }

    /// Remove this node from its parent, if it has one.
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent
                .0
                .children
                .borrow_mut()
                .retain(|sibling| !Rc::ptr_eq(sibling, &self.0));
        }
        self.0.parent.set(None);
    }

    /// Detach and return every child.
    pub fn take_children(&self) -> Vec<NodeRef> {
        let children = std::mem::take(&mut *self.0.children.borrow_mut());
        children
            .into_iter()
            .map(|child| {
                child.parent.set(None);
                NodeRef(child)
            })
            .collect()
    }

    pub fn clear_children(&self) {
        self.take_children();
    }

    /// Replace every child with the nodes parsed from `html`.
    pub fn set_inner_html(&self, html: &str) -> Result<(), MathtexError> {
        self.clear_children();
        if !html.contains(['<', '&']) {
            if !html.is_empty() {
                self.append(&NodeRef::text(html));
            }
            return Ok(());
        }
        let fragment = Document::parse(html)?;
        for child in fragment.root().take_children() {
            self.append(&child);
        }
        Ok(())
    }

    /// Position of this node among its parent's children.
    pub fn index_in_parent(&self) -> Option<usize> {
        let parent = self.parent()?;
        let index = parent
            .0
            .children
            .borrow()
            .iter()
            .position(|sibling| Rc::ptr_eq(sibling, &self.0));
        index
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        collect_text(&self.0, &mut text);
        text
    }

    /// Every descendant in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<NodeRef> {
        let mut nodes = Vec::new();
        collect_descendants(&self.0, &mut nodes);
        nodes
    }

    /// The nearest node, starting with `self` and walking up, that satisfies `predicate`.
    pub fn closest<P>(&self, predicate: P) -> Option<NodeRef>
    where
        P: Fn(&NodeRef) -> bool,
    {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if predicate(&node) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Markup of this node including itself.
    pub fn outer_html(&self) -> Result<String, MathtexError> {
        serialize_nodes(std::slice::from_ref(&self.0))
    }

    /// Markup of this node's children.
    pub fn inner_html(&self) -> Result<String, MathtexError> {
        let children = self.0.children.borrow().clone();
        serialize_nodes(&children)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.data {
            NodeData::Element { name, .. } => write!(f, "NodeRef(<{}>)", name.local),
            NodeData::Text { contents } => write!(f, "NodeRef({:?})", &**contents.borrow()),
            NodeData::Comment { .. } => f.write_str("NodeRef(<!-- -->)"),
            _ => f.write_str("NodeRef(..)"),
        }
    }
}

fn collect_text(handle: &Handle, out: &mut String) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => collect_text(child, out),
            _ => {}
        }
    }
}

fn collect_descendants(handle: &Handle, out: &mut Vec<NodeRef>) {
    for child in handle.children.borrow().iter() {
        out.push(NodeRef(Rc::clone(child)));
        collect_descendants(child, out);
    }
}

fn serialize_nodes(nodes: &[Handle]) -> Result<String, MathtexError> {
    let mut output = Vec::new();

    // IncludeNode serializes each element AND its children
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for node in nodes {
        let serializable = SerializableHandle::from(Rc::clone(node));
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            MathtexError::Serialization(format!("HTML serialization failed: {e}"))
        })?;
    }

    String::from_utf8(output)
        .map_err(|e| MathtexError::Serialization(format!("UTF-8 conversion failed: {e}")))
}
