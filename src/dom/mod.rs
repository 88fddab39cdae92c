//! Live element tree.
//!
//! The dashboard's mutable structure lives in an arena of nodes addressed by
//! [`NodeId`]. It stands in for a browser DOM: elements carry a tag, string
//! attributes and an optional slot assignment, text nodes carry literal text,
//! and every node may have a bounding box assigned by the layout pass.
//!
//! Transient interaction state (drag in progress, placeholder, armed for
//! dragging) is stored in [`NodeFlags`], never in attributes, so it cannot
//! leak into a configuration snapshot.
//!
//! Node ids are only meaningful for the document that created them; passing
//! a foreign id panics.

pub mod geometry;

use std::collections::BTreeMap;

pub use geometry::{Point, Rect};

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Element type (e.g. `dash-card`, `span`)
    pub tag: String,
    /// Attribute map
    pub attributes: BTreeMap<String, String>,
    /// Named insertion point in the parent, if assigned
    pub slot: Option<String>,
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with tag, attributes and slot assignment
    Element(ElementData),
    /// A literal text node
    Text(String),
}

/// Out-of-band interaction state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeFlags {
    /// Node is a drop-zone placeholder and not part of the layout
    pub placeholder: bool,
    /// Node is the element currently being dragged (rendered invisible)
    pub dragging: bool,
    /// Node has been armed by its grab handle and may start a native drag
    pub draggable: bool,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Option<Rect>,
    flags: NodeFlags,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            rect: None,
            flags: NodeFlags::default(),
        }
    }
}

/// Arena of live nodes.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes ever created (attached or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node was ever created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.push(NodeKind::Element(ElementData {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            slot: None,
        }))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Node kind.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Returns true if the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Element(_))
    }

    /// Parent of a node, `None` when detached or a root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// All children in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Element children in order (text nodes skipped).
    #[must_use]
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Position of a node among its parent's children.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|child| *child == id)
    }

    /// Following sibling, if any.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Returns true if `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Returns true if `id` is currently reachable from `root`.
    #[must_use]
    pub fn is_attached(&self, id: NodeId, root: NodeId) -> bool {
        id.0 < self.nodes.len() && self.is_inclusive_ancestor(root, id)
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|child| *child != id);
            self.node_mut(id).parent = None;
        }
    }

    /// Appends `child` as the last child of `parent`, moving it if attached.
    ///
    /// Returns false (and changes nothing) if the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.is_inclusive_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        true
    }

    /// Inserts `child` immediately before `reference`, moving it if attached.
    ///
    /// Returns false if `reference` has no parent or the move would create a
    /// cycle. Inserting a node before itself is a no-op that succeeds.
    pub fn insert_before(&mut self, child: NodeId, reference: NodeId) -> bool {
        if child == reference {
            return true;
        }
        let Some(parent) = self.parent(reference) else {
            return false;
        };
        if self.is_inclusive_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        let index = self
            .children(parent)
            .iter()
            .position(|sibling| *sibling == reference)
            .unwrap_or(self.children(parent).len());
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
        true
    }

    /// Detaches a node (and its subtree) from its parent.
    ///
    /// The subtree stays in the arena but is no longer reachable.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    // ------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id).kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    /// Element tag, `None` for text nodes.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|data| data.tag.as_str())
    }

    /// Attribute map of an element, `None` for text nodes.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> Option<&BTreeMap<String, String>> {
        self.element(id).map(|data| &data.attributes)
    }

    /// Single attribute value.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|data| data.attributes.get(name))
            .map(String::as_str)
    }

    /// Sets an attribute on an element. Ignored for text nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(data) = self.element_mut(id) {
            data.attributes.insert(name.into(), value.into());
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)
            .and_then(|data| data.attributes.remove(name))
    }

    /// Whitespace-separated tokens of the `class` attribute.
    #[must_use]
    pub fn class_list(&self, id: NodeId) -> Vec<&str> {
        self.attribute(id, "class")
            .map(|classes| classes.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Slot assignment of an element.
    #[must_use]
    pub fn slot(&self, id: NodeId) -> Option<&str> {
        self.element(id).and_then(|data| data.slot.as_deref())
    }

    /// Assigns an element to a named slot of its parent.
    pub fn set_slot(&mut self, id: NodeId, name: impl Into<String>) {
        if let Some(data) = self.element_mut(id) {
            data.slot = Some(name.into());
        }
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Appends a new text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    /// Concatenation of the node's direct text children.
    ///
    /// Text belonging to descendant elements is not included.
    #[must_use]
    pub fn direct_text(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .filter_map(|child| match &self.node(*child).kind {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element(_) => None,
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Layout and interaction state
    // ------------------------------------------------------------------

    /// Bounding box assigned by the last layout pass.
    #[must_use]
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.node(id).rect
    }

    /// Assigns a bounding box.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        self.node_mut(id).rect = Some(rect);
    }

    /// Clears the bounding box (node is not laid out).
    pub fn clear_rect(&mut self, id: NodeId) {
        self.node_mut(id).rect = None;
    }

    /// Interaction flags.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.node(id).flags
    }

    /// Mutable interaction flags.
    pub fn flags_mut(&mut self, id: NodeId) -> &mut NodeFlags {
        &mut self.node_mut(id).flags
    }
}
