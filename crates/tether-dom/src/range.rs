//! Range - an ephemeral span of the document
//!
//! A range is a pair of boundary points into live tree nodes. It is never
//! persisted; anchoring reconstructs one fresh from a stored target on every
//! replay.

use crate::{DomTree, Node, NodeId};

/// Range boundary point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    /// The container node
    pub node: NodeId,
    /// Offset within the container (character offset for text nodes, child
    /// index for elements)
    pub offset: u32,
}

impl Boundary {
    pub fn new(node: NodeId, offset: u32) -> Self {
        Self { node, offset }
    }
}

/// A contiguous span of the document between two boundary points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomRange {
    /// Start boundary point
    pub start: Boundary,
    /// End boundary point
    pub end: Boundary,
}

impl DomRange {
    /// Create a range between two points
    pub fn new(start_node: NodeId, start_offset: u32, end_node: NodeId, end_offset: u32) -> Self {
        Self {
            start: Boundary::new(start_node, start_offset),
            end: Boundary::new(end_node, end_offset),
        }
    }

    /// Select the entire contents of a node
    pub fn select_contents(tree: &DomTree, node: NodeId) -> Self {
        let end_offset = match tree.get(node) {
            Some(n) if n.is_text() => tree.text_len(node),
            _ => tree.child_count(node),
        };
        Self::new(node, 0, node, end_offset)
    }

    /// Check if the range is collapsed (start == end)
    pub fn collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Deepest node containing both boundary points
    pub fn common_ancestor(&self, tree: &DomTree) -> Option<NodeId> {
        if self.start.node == self.end.node {
            return Some(self.start.node);
        }
        let mut cur = Some(self.start.node);
        while let Some(node) = cur {
            if node == self.end.node || tree.is_ancestor(node, self.end.node) {
                return Some(node);
            }
            cur = tree.parent(node);
        }
        None
    }

    /// Nearest element containing the whole range (the common ancestor
    /// itself when it is an element, else its parent)
    pub fn common_ancestor_element(&self, tree: &DomTree) -> Option<NodeId> {
        let ancestor = self.common_ancestor(tree)?;
        if tree.get(ancestor).is_some_and(Node::is_element) {
            Some(ancestor)
        } else {
            tree.parent(ancestor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_ancestor() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let p1 = tree.create_element("p");
        let p2 = tree.create_element("p");
        let t1 = tree.create_text("one");
        let t2 = tree.create_text("two");
        tree.append_child(tree.root(), div);
        tree.append_child(div, p1);
        tree.append_child(div, p2);
        tree.append_child(p1, t1);
        tree.append_child(p2, t2);

        let range = DomRange::new(t1, 1, t2, 2);
        assert_eq!(range.common_ancestor(&tree), Some(div));
        assert_eq!(range.common_ancestor_element(&tree), Some(div));

        let within = DomRange::new(t1, 0, t1, 3);
        assert_eq!(within.common_ancestor(&tree), Some(t1));
        assert_eq!(within.common_ancestor_element(&tree), Some(p1));
    }

    #[test]
    fn test_select_contents() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let t = tree.create_text("hello");
        tree.append_child(tree.root(), p);
        tree.append_child(p, t);

        let elem_range = DomRange::select_contents(&tree, p);
        assert_eq!(elem_range.start, Boundary::new(p, 0));
        assert_eq!(elem_range.end, Boundary::new(p, 1));

        let text_range = DomRange::select_contents(&tree, t);
        assert_eq!(text_range.end, Boundary::new(t, 5));
        assert!(!text_range.collapsed());
    }
}
