//! Document - high-level document API

use crate::{DomTree, Node, NodeId};

/// A parsed document: the arena tree plus id lookup
#[derive(Debug, Default)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            tree: DomTree::new(),
        }
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Get an element by its id attribute
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.element_id(node) == Some(id))
    }

    /// Nearest ancestor-or-self element carrying an id attribute
    pub fn closest_with_id(&self, node: NodeId) -> Option<NodeId> {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if self.tree.get(id).is_some_and(Node::is_element)
                && self.tree.element_id(id).is_some()
            {
                return Some(id);
            }
            cur = self.tree.parent(id);
        }
        None
    }
}
