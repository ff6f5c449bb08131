//! tether DOM - arena document tree
//!
//! Memory-efficient DOM substrate for the anchoring engine. Nodes live in a
//! flat arena and reference each other through `NodeId` handles, so ranges
//! and traversal state stay `Copy`-cheap and never dangle on reallocation.

mod document;
mod node;
mod range;
mod tree;

pub use document::Document;
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use range::{Boundary, DomRange};
pub use tree::{Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the NONE sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM mutation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node id does not resolve to a live node
    #[error("node not found")]
    NotFound,

    /// Operation requires a text node
    #[error("node is not a text node")]
    NotText,

    /// Offset lies outside the node's content
    #[error("offset {offset} out of bounds for node of length {len}")]
    IndexSize { offset: u32, len: u32 },

    /// Reference node has no parent to insert under
    #[error("reference node is detached")]
    Detached,
}
