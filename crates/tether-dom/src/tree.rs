//! DOM Tree (arena-based allocation)
//!
//! All structural mutation the anchoring engine needs lives here: append,
//! insert-before, detach (keeps the subtree intact for later reinsertion),
//! and text-node splitting at character offsets. Traversal is document order
//! throughout.

use std::cmp::Ordering;

use crate::{DomError, DomResult, ElementData, Node, NodeData, NodeId, TextData};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree holding only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    /// Root node id
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (detached nodes included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // --- Creation ---

    /// Create a detached element node
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(Node::new(NodeData::Element(ElementData::new(name))))
    }

    /// Create a detached element node with an id attribute
    pub fn create_element_with_id(&mut self, name: &str, id: &str) -> NodeId {
        let node = self.create_element(name);
        if let Some(elem) = self.nodes[node.index()].as_element_mut() {
            elem.set_attr("id", id);
        }
        node
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::new(NodeData::Text(TextData {
            content: content.to_string(),
        })))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::new(NodeData::Comment(content.to_string())))
    }

    // --- Links ---

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.parent;
        parent.is_valid().then_some(parent)
    }

    /// Next sibling, if any
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let next = self.get(id)?.next_sibling;
        next.is_valid().then_some(next)
    }

    /// Previous sibling, if any
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let prev = self.get(id)?.prev_sibling;
        prev.is_valid().then_some(prev)
    }

    /// First child, if any
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        let first = self.get(id)?.first_child;
        first.is_valid().then_some(first)
    }

    // --- Mutation ---

    /// Append a child, detaching it from any previous position first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    /// Insert a node immediately before a reference node
    pub fn insert_before(&mut self, new_child: NodeId, ref_child: NodeId) -> DomResult<()> {
        let parent = self.get(ref_child).ok_or(DomError::NotFound)?.parent;
        if !parent.is_valid() {
            return Err(DomError::Detached);
        }
        self.detach(new_child);
        let prev = self.nodes[ref_child.index()].prev_sibling;
        {
            let node = &mut self.nodes[new_child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = ref_child;
        }
        self.nodes[ref_child.index()].prev_sibling = new_child;
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = new_child;
        } else {
            self.nodes[parent.index()].first_child = new_child;
        }
        Ok(())
    }

    /// Unlink a node from its parent and siblings; the subtree below it is
    /// left intact so it can be reinserted elsewhere.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }
        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Split a text node at a character offset, returning the node holding
    /// the remainder. Offset 0 leaves the node untouched; the remainder node
    /// is inserted immediately after the original.
    pub fn split_text(&mut self, id: NodeId, offset: u32) -> DomResult<NodeId> {
        let byte = {
            let node = self.get(id).ok_or(DomError::NotFound)?;
            let content = node.as_text().ok_or(DomError::NotText)?;
            let len = content.chars().count() as u32;
            if offset > len {
                return Err(DomError::IndexSize { offset, len });
            }
            content
                .char_indices()
                .nth(offset as usize)
                .map(|(i, _)| i)
                .unwrap_or(content.len())
        };

        let tail = if let NodeData::Text(text) = &mut self.nodes[id.index()].data {
            text.content.split_off(byte)
        } else {
            return Err(DomError::NotText);
        };

        tracing::trace!(node = id.0, offset, "split text node");

        let new = self.create_text(&tail);
        if let Some(next) = self.next_sibling(id) {
            self.insert_before(new, next)?;
        } else if let Some(parent) = self.parent(id) {
            self.append_child(parent, new);
        }
        Ok(new)
    }

    // --- Traversal ---

    /// Children of a node, in order
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        std::iter::successors(first.is_valid().then_some(first), move |&cur| {
            let next = self.nodes[cur.index()].next_sibling;
            next.is_valid().then_some(next)
        })
    }

    /// Number of children
    pub fn child_count(&self, id: NodeId) -> u32 {
        self.children(id).count() as u32
    }

    /// The n-th child of a node
    pub fn nth_child(&self, parent: NodeId, index: u32) -> Option<NodeId> {
        self.children(parent).nth(index as usize)
    }

    /// All descendants of `root` in document order, excluding `root` itself
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let next = self.get(root).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Descendants {
            tree: self,
            root,
            next,
        }
    }

    /// Text nodes under `root` in document order. A text `root` yields
    /// itself.
    pub fn text_nodes(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let self_text = self
            .get(root)
            .is_some_and(Node::is_text)
            .then_some(root)
            .into_iter();
        self_text.chain(
            self.descendants(root)
                .filter(move |&id| self.nodes[id.index()].is_text()),
        )
    }

    /// Check if `ancestor` is a proper ancestor of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = match self.get(node) {
            Some(n) => n.parent,
            None => return false,
        };
        while cur.is_valid() {
            if cur == ancestor {
                return true;
            }
            cur = self.nodes[cur.index()].parent;
        }
        false
    }

    /// Compare two attached nodes in document order. An ancestor orders
    /// before its descendants.
    pub fn order(&self, a: NodeId, b: NodeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        self.path(a).cmp(&self.path(b))
    }

    /// Child-index path from the node's root down to the node; lexicographic
    /// comparison of paths is document order.
    fn path(&self, id: NodeId) -> Vec<u32> {
        let mut path = Vec::new();
        let mut cur = id;
        while cur.is_valid() {
            path.push(self.sibling_index(cur));
            cur = self.nodes[cur.index()].parent;
        }
        path.reverse();
        path
    }

    fn sibling_index(&self, id: NodeId) -> u32 {
        let mut index = 0;
        let mut cur = self.nodes[id.index()].prev_sibling;
        while cur.is_valid() {
            index += 1;
            cur = self.nodes[cur.index()].prev_sibling;
        }
        index
    }

    // --- Content ---

    /// Concatenated text of the subtree at `root`, depth-first
    pub fn text_content(&self, root: NodeId) -> String {
        if let Some(text) = self.get(root).and_then(Node::as_text) {
            return text.to_string();
        }
        let mut out = String::new();
        for id in self.descendants(root) {
            if let Some(text) = self.nodes[id.index()].as_text() {
                out.push_str(text);
            }
        }
        out
    }

    /// Character length of the subtree's text
    pub fn text_len(&self, root: NodeId) -> u32 {
        self.text_content(root).chars().count() as u32
    }

    /// Tag name, if the node is an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.name.as_str())
    }

    /// Value of the id attribute, if the node is an element carrying one
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().and_then(|e| e.id.as_deref())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Document-order iterator over a subtree, root excluded
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.next.is_valid() {
            return None;
        }
        let current = self.next;
        self.next = self.successor(current);
        Some(current)
    }
}

impl Descendants<'_> {
    /// Next node in document order, bounded by the iteration root
    fn successor(&self, id: NodeId) -> NodeId {
        let node = &self.tree.nodes[id.index()];
        if node.first_child.is_valid() {
            return node.first_child;
        }
        let mut cur = id;
        loop {
            if cur == self.root {
                return NodeId::NONE;
            }
            let node = &self.tree.nodes[cur.index()];
            if node.next_sibling.is_valid() {
                return node.next_sibling;
            }
            cur = node.parent;
            if !cur.is_valid() {
                return NodeId::NONE;
            }
        }
    }
}
