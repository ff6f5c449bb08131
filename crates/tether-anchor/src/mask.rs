//! Foreign-element mask
//!
//! External UI code injects elements into the rendered document: editor
//! toolbars, issue markers, previously rendered annotation wrappers. None
//! of that markup may take part in text-offset math. The mask detaches
//! every matching descendant, runs an operation against the clean tree,
//! and reinserts each element at its recorded position.
//!
//! The removal point is recorded as either the next sibling (insert back
//! before it) or the parent (append back as last child). That is enough to
//! restore the exact position even when the operation mutates preceding
//! siblings, e.g. by splitting a text node.

use tether_dom::{DomTree, Node, NodeId};

/// Default marker class for injected UI elements
pub const DEFAULT_FOREIGN_SELECTOR: &str = ".tether-ui";

/// Predicate identifying foreign elements
///
/// A per-call configuration value, not a global setting: independent
/// document views may use different foreign-element conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignMatcher {
    /// Elements carrying a class
    Class(String),
    /// Elements with a tag name
    Tag(String),
}

impl ForeignMatcher {
    /// Parse a simple selector.
    ///
    /// The accepted grammar is a single simple selector: `.class` matches
    /// by class, anything else matches by (lowercased) tag name. Compound
    /// and descendant selectors are not supported; they are taken as a
    /// literal tag name, which matches nothing, and logged.
    pub fn parse(selector: &str) -> Self {
        match selector.strip_prefix('.') {
            Some(class) => Self::Class(class.to_string()),
            None => {
                if selector.contains(['.', '#', '[', ' ', '>']) {
                    tracing::warn!(selector, "unsupported compound selector");
                }
                Self::Tag(selector.to_ascii_lowercase())
            }
        }
    }

    /// Check an element against the predicate
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(elem) = tree.get(node).and_then(Node::as_element) else {
            return false;
        };
        match self {
            Self::Class(class) => elem.has_class(class),
            Self::Tag(tag) => elem.name == *tag,
        }
    }
}

impl Default for ForeignMatcher {
    fn default() -> Self {
        Self::parse(DEFAULT_FOREIGN_SELECTOR)
    }
}

/// Where a removed element goes back
#[derive(Debug, Clone, Copy)]
enum RestorePoint {
    /// Insert immediately before this node
    Before(NodeId),
    /// It was the last child; append under this parent
    LastChildOf(NodeId),
}

/// Detach all foreign descendants of `root`, run `op`, reinsert them, and
/// return `op`'s result unchanged.
///
/// Failure modeled as a `Result` return value flows through restoration
/// untouched. Reentrant for nested invocations on disjoint subtrees;
/// assumes single-threaded execution with no concurrent mutation of the
/// same subtree.
pub fn with_foreign_masked<R>(
    tree: &mut DomTree,
    root: NodeId,
    matcher: &ForeignMatcher,
    op: impl FnOnce(&mut DomTree) -> R,
) -> R {
    let foreign: Vec<NodeId> = tree
        .descendants(root)
        .filter(|&id| matcher.matches(tree, id))
        .collect();

    let mut removed = Vec::with_capacity(foreign.len());
    for id in foreign {
        let point = if let Some(next) = tree.next_sibling(id) {
            RestorePoint::Before(next)
        } else if let Some(parent) = tree.parent(id) {
            RestorePoint::LastChildOf(parent)
        } else {
            continue;
        };
        tree.detach(id);
        removed.push((id, point));
    }
    tracing::trace!(count = removed.len(), "masked foreign elements");

    let result = op(tree);

    // reverse document order: a recorded next-sibling may itself be a
    // masked element, so it must be back in the tree before anything is
    // inserted ahead of it
    for (id, point) in removed.into_iter().rev() {
        match point {
            RestorePoint::Before(next) => {
                if let Err(err) = tree.insert_before(id, next) {
                    tracing::warn!(?err, "failed to restore foreign element");
                }
            }
            RestorePoint::LastChildOf(parent) => tree.append_child(parent, id),
        }
    }

    result
}
