//! In-memory DOM and a diffing template.
//!
//! [`MemoryDom`] is a live DOM subtree that records every mutation applied to
//! it. [`DiffTemplate`] patches it to match a [`Node`] description with a
//! positional diff.
//!
//! # Algorithm
//!
//! 1. Validate every tag in the description; reject before touching the DOM
//! 2. Walk old and new trees in parallel:
//!    - text vs text: set text if it differs
//!    - element vs element with the same tag: diff attributes, then children
//!      pairwise; append extra new children, truncate extra old ones
//!    - anything else: replace the node
//! 3. Apply the plan and append it to the mutation log

use purl_core::{Node, PatchReport, RenderError, Template};
use std::fmt::{self, Write as _};

/// Child indices from the root to a node. The root itself is `[]`.
pub type Path = Vec<usize>;

/// A single change applied to a [`MemoryDom`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// First paint into an empty root.
    Insert {
        /// The inserted tree.
        node: Node,
    },
    /// Replace the data of a text node.
    SetText {
        /// Text node location.
        path: Path,
        /// New text.
        text: String,
    },
    /// Add or change an attribute.
    SetAttribute {
        /// Element location.
        path: Path,
        /// Attribute name.
        name: String,
        /// New value.
        value: String,
    },
    /// Remove an attribute.
    RemoveAttribute {
        /// Element location.
        path: Path,
        /// Attribute name.
        name: String,
    },
    /// Replace a whole subtree.
    Replace {
        /// Location of the replaced node.
        path: Path,
        /// Replacement.
        node: Node,
    },
    /// Append a child to an element.
    Append {
        /// Parent location.
        path: Path,
        /// Appended child.
        node: Node,
    },
    /// Drop trailing children of an element.
    Truncate {
        /// Parent location.
        path: Path,
        /// Number of children kept.
        len: usize,
    },
}

/// A live DOM subtree held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDom {
    content: Option<Node>,
    log: Vec<Mutation>,
}

impl MemoryDom {
    /// An empty root.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current tree, if anything has been painted.
    pub fn content(&self) -> Option<&Node> {
        self.content.as_ref()
    }

    /// Text content of the whole tree.
    pub fn text_content(&self) -> String {
        self.content
            .as_ref()
            .map(Node::text_content)
            .unwrap_or_default()
    }

    /// Every mutation applied so far, oldest first.
    pub fn mutations(&self) -> &[Mutation] {
        &self.log
    }

    /// Number of mutations applied so far.
    pub fn mutation_count(&self) -> usize {
        self.log.len()
    }

    /// Forget the mutation log, keeping the tree.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Serialize the tree as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(node) = &self.content {
            write_html(&mut out, node);
        }
        out
    }

    fn apply(&mut self, mutation: Mutation) {
        let applied = match &mutation {
            Mutation::Insert { node } => {
                self.content = Some(node.clone());
                true
            }
            Mutation::SetText { path, text } => match self.node_at_mut(path) {
                Some(Node::Text(t)) => {
                    t.clone_from(text);
                    true
                }
                _ => false,
            },
            Mutation::SetAttribute { path, name, value } => match self.node_at_mut(path) {
                Some(Node::Element(el)) => {
                    el.attributes.insert(name.clone(), value.clone());
                    true
                }
                _ => false,
            },
            Mutation::RemoveAttribute { path, name } => match self.node_at_mut(path) {
                Some(Node::Element(el)) => el.attributes.remove(name).is_some(),
                _ => false,
            },
            Mutation::Replace { path, node } => match self.node_at_mut(path) {
                Some(slot) => {
                    *slot = node.clone();
                    true
                }
                None => false,
            },
            Mutation::Append { path, node } => match self.node_at_mut(path) {
                Some(Node::Element(el)) => {
                    el.children.push(node.clone());
                    true
                }
                _ => false,
            },
            Mutation::Truncate { path, len } => match self.node_at_mut(path) {
                Some(Node::Element(el)) => {
                    el.children.truncate(*len);
                    true
                }
                _ => false,
            },
        };
        debug_assert!(applied, "mutation does not fit the tree: {mutation:?}");
        self.log.push(mutation);
    }

    fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = self.content.as_mut()?;
        for &index in path {
            node = match node {
                Node::Element(el) => el.children.get_mut(index)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }
}

impl fmt::Display for MemoryDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// Compute the mutations that turn `old` into `new`.
pub fn diff(old: Option<&Node>, new: &Node) -> Vec<Mutation> {
    let mut plan = Vec::new();
    match old {
        None => plan.push(Mutation::Insert { node: new.clone() }),
        Some(old) => diff_node(&mut Vec::new(), old, new, &mut plan),
    }
    plan
}

fn diff_node(path: &mut Path, old: &Node, new: &Node, plan: &mut Vec<Mutation>) {
    match (old, new) {
        (Node::Text(a), Node::Text(b)) => {
            if a != b {
                plan.push(Mutation::SetText {
                    path: path.clone(),
                    text: b.clone(),
                });
            }
        }
        (Node::Element(a), Node::Element(b)) if a.tag == b.tag => {
            for name in a.attributes.keys() {
                if !b.attributes.contains_key(name) {
                    plan.push(Mutation::RemoveAttribute {
                        path: path.clone(),
                        name: name.clone(),
                    });
                }
            }
            for (name, value) in &b.attributes {
                if a.attributes.get(name) != Some(value) {
                    plan.push(Mutation::SetAttribute {
                        path: path.clone(),
                        name: name.clone(),
                        value: value.clone(),
                    });
                }
            }

            for (index, (old_child, new_child)) in a.children.iter().zip(&b.children).enumerate() {
                path.push(index);
                diff_node(path, old_child, new_child, plan);
                path.pop();
            }
            if b.children.len() < a.children.len() {
                plan.push(Mutation::Truncate {
                    path: path.clone(),
                    len: b.children.len(),
                });
            }
            for extra in b.children.iter().skip(a.children.len()) {
                plan.push(Mutation::Append {
                    path: path.clone(),
                    node: extra.clone(),
                });
            }
        }
        _ => plan.push(Mutation::Replace {
            path: path.clone(),
            node: new.clone(),
        }),
    }
}

/// A [`Template`] that patches a [`MemoryDom`] by diffing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffTemplate;

impl Template for DiffTemplate {
    type Root = MemoryDom;

    fn patch(&mut self, root: &mut MemoryDom, description: &Node) -> Result<PatchReport, RenderError> {
        if let Some(tag) = description.find_invalid_tag() {
            return Err(RenderError::InvalidTag(tag.to_string()));
        }

        let plan = diff(root.content(), description);
        let mutations = plan.len();
        for mutation in plan {
            root.apply(mutation);
        }
        Ok(PatchReport { mutations })
    }
}

fn write_html(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => escape_into(out, text, false),
        Node::Element(el) => {
            let _ = write!(out, "<{}", el.tag);
            for (name, value) in &el.attributes {
                let _ = write!(out, " {name}=\"");
                escape_into(out, value, true);
                out.push('"');
            }
            out.push('>');
            for child in &el.children {
                write_html(out, child);
            }
            let _ = write!(out, "</{}>", el.tag);
        }
    }
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
