//! Range marking engine
//!
//! Wraps every text node intersected by a range in a marker element so
//! callers can decorate a resolved annotation. Boundary text nodes are
//! split first so marking always wraps whole nodes; gathering runs inside
//! the foreign-element mask so injected markup is never wrapped.

use std::cmp::Ordering;

use tether_dom::{Boundary, DomRange, DomTree, Node, NodeId};

use crate::AnchorResult;
use crate::mask::{ForeignMatcher, with_foreign_masked};

/// Marker element used when the caller names none
pub const DEFAULT_MARK_TAG: &str = "mark";

/// Structural table positions never receive marker wrappers; a wrapper
/// between, say, `tbody` and `tr` would corrupt the table.
const TABULAR: [&str; 4] = ["table", "thead", "tbody", "tr"];

/// Wrap every text node in `range` with a `tag_name` element, invoking
/// `on_mark` for each wrapper in document order.
pub fn mark_range(
    tree: &mut DomTree,
    range: &DomRange,
    tag_name: Option<&str>,
    matcher: &ForeignMatcher,
    mut on_mark: impl FnMut(NodeId),
) -> AnchorResult<()> {
    let Some(scope) = range.common_ancestor_element(tree) else {
        return Ok(());
    };

    // gather (and split) against the clean tree; wrap after the foreign
    // elements are back so they end up outside the markers
    let nodes = with_foreign_masked(tree, scope, matcher, |tree| gather(tree, range, scope))?;
    tracing::debug!(count = nodes.len(), "marking text nodes");

    let tag = tag_name.unwrap_or(DEFAULT_MARK_TAG);
    for node in nodes {
        let wrapper = tree.create_element(tag);
        tree.insert_before(wrapper, node)?;
        tree.append_child(wrapper, node);
        on_mark(wrapper);
    }
    Ok(())
}

/// Split the boundary nodes and collect the covered text nodes in
/// document order
fn gather(tree: &mut DomTree, range: &DomRange, scope: NodeId) -> AnchorResult<Vec<NodeId>> {
    let mut end_boundary = range.end;

    let start = if tree.get(range.start.node).is_some_and(Node::is_text) {
        let tail = split_at(tree, range.start.node, range.start.offset)?;
        // a live DOM range is rebased onto the tail by splitText; mirror
        // that when both boundaries share a node
        if tail != range.start.node
            && end_boundary.node == range.start.node
            && end_boundary.offset >= range.start.offset
        {
            end_boundary = Boundary::new(tail, end_boundary.offset - range.start.offset);
        }
        tail
    } else {
        // first text node under the start container
        match tree.text_nodes(range.start.node).next() {
            Some(first) => first,
            None => return Ok(Vec::new()),
        }
    };

    // the node after the end split is the exclusive terminal; an element
    // container is itself the terminal, with its contents covered
    let end = if tree.get(end_boundary.node).is_some_and(Node::is_text) {
        split_at(tree, end_boundary.node, end_boundary.offset)?
    } else {
        end_boundary.node
    };

    let all: Vec<NodeId> = tree.text_nodes(scope).collect();
    let mut nodes = Vec::new();
    let mut seen_start = false;
    for node in all {
        if tabular_parent(tree, node) {
            continue;
        }
        if !seen_start {
            if node == start {
                seen_start = true;
            } else {
                continue;
            }
        }
        if !covered(tree, node, end) {
            break;
        }
        nodes.push(node);
    }
    Ok(nodes)
}

fn split_at(tree: &mut DomTree, node: NodeId, offset: u32) -> AnchorResult<NodeId> {
    if offset == 0 {
        return Ok(node);
    }
    Ok(tree.split_text(node, offset)?)
}

/// A node is still covered when the terminal contains it or comes after
/// it in document order; containment and ordering rather than pointer
/// equality, so nodes nested at different depths compare correctly.
fn covered(tree: &DomTree, node: NodeId, end: NodeId) -> bool {
    tree.is_ancestor(end, node) || tree.order(node, end) == Ordering::Less
}

fn tabular_parent(tree: &DomTree, node: NodeId) -> bool {
    tree.parent(node)
        .and_then(|p| tree.tag_name(p))
        .is_some_and(|tag| TABULAR.contains(&tag))
}
