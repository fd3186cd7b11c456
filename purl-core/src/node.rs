//! Declarative DOM description produced by [`Element::render`].
//!
//! [`Element::render`]: crate::Element::render

use std::collections::BTreeMap;

/// A node in a declarative DOM description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with attributes and children.
    Element(ElementNode),
    /// A text node.
    Text(String),
}

/// An element in a DOM description.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementNode {
    /// Tag name.
    pub tag: String,
    /// Attributes, sorted by name so equal descriptions compare equal.
    pub attributes: BTreeMap<String, String>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Node {
    /// Start an element description.
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Element(ElementNode {
            tag: tag.into(),
            ..ElementNode::default()
        })
    }

    /// A text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Set an attribute. No-op on text nodes.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Node::Element(el) = &mut self {
            el.attributes.insert(name.into(), value.into());
        }
        self
    }

    /// Append a child. No-op on text nodes.
    pub fn child(mut self, child: Node) -> Self {
        if let Node::Element(el) = &mut self {
            el.children.push(child);
        }
        self
    }

    /// Append several children. No-op on text nodes.
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        if let Node::Element(el) = &mut self {
            el.children.extend(children);
        }
        self
    }

    /// Concatenated text content of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// The first tag in this subtree that is not a valid tag name.
    pub fn find_invalid_tag(&self) -> Option<&str> {
        match self {
            Node::Text(_) => None,
            Node::Element(el) if !is_valid_tag(&el.tag) => Some(&el.tag),
            Node::Element(el) => el.children.iter().find_map(Node::find_invalid_tag),
        }
    }
}

/// Whether `tag` can name an element: ASCII alphanumerics and hyphens,
/// starting with a letter.
pub fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}
