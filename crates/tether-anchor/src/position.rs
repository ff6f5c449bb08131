//! Text position codec
//!
//! Converts between a live range and `{start, end}` character offsets
//! measured against the concatenated text of a root element. Callers mask
//! foreign elements around these conversions so injected markup never
//! shifts an offset.
//!
//! All offsets are character counts, never bytes.

use std::cmp::Ordering;

use tether_dom::{Boundary, DomRange, DomTree, Node, NodeId};

use crate::{AnchorError, AnchorResult, target::TextPosition};

/// Convert a range into character offsets within `root`'s text stream
pub fn position_from_range(
    tree: &DomTree,
    root: NodeId,
    range: &DomRange,
) -> AnchorResult<TextPosition> {
    ensure_root(tree, root)?;
    let start = boundary_offset(tree, root, &range.start);
    let end = boundary_offset(tree, root, &range.end);
    Ok(TextPosition::new(start, end))
}

/// Convert character offsets back into a live range
///
/// When an offset lands exactly between two text nodes the boundary is
/// placed at offset 0 of the following node. The end offset may land past
/// the final node boundary (selecting to the very end of the content); it
/// then clamps to the end of the last text node instead of failing. Naive
/// sequential walks get this wrong at the last node.
pub fn position_to_range(
    tree: &DomTree,
    root: NodeId,
    position: &TextPosition,
) -> AnchorResult<DomRange> {
    ensure_root(tree, root)?;
    let start = seek_boundary(tree, root, position.start);
    let end = seek_boundary(tree, root, position.end.max(position.start));
    Ok(DomRange { start, end })
}

/// Literal text denoted by a range, relative to `root`'s text stream
pub fn range_text(tree: &DomTree, root: NodeId, range: &DomRange) -> AnchorResult<String> {
    let position = position_from_range(tree, root, range)?;
    let text = tree.text_content(root);
    Ok(slice_chars(&text, position.start, position.end))
}

/// Character-offset substring
pub(crate) fn slice_chars(text: &str, start: u32, end: u32) -> String {
    text.chars()
        .skip(start as usize)
        .take(end.saturating_sub(start) as usize)
        .collect()
}

fn ensure_root(tree: &DomTree, root: NodeId) -> AnchorResult<()> {
    if tree.get(root).is_none() {
        return Err(AnchorError::MissingRoot);
    }
    Ok(())
}

/// Characters in the text stream strictly before a boundary point
fn boundary_offset(tree: &DomTree, root: NodeId, boundary: &Boundary) -> u32 {
    if tree.get(boundary.node).is_some_and(Node::is_text) {
        let mut count = 0;
        for node in tree.text_nodes(root) {
            if node == boundary.node {
                return count + boundary.offset;
            }
            count += tree.text_len(node);
        }
        count
    } else if let Some(child) = tree.nth_child(boundary.node, boundary.offset) {
        // boundary sits before this child
        chars_before(tree, root, child)
    } else {
        // boundary sits after the element's last child
        chars_before(tree, root, boundary.node) + tree.text_len(boundary.node)
    }
}

/// Characters of text nodes that precede `node` in document order (text
/// inside `node` itself does not count)
fn chars_before(tree: &DomTree, root: NodeId, node: NodeId) -> u32 {
    let mut count = 0;
    for text in tree.text_nodes(root) {
        if tree.order(text, node) != Ordering::Less {
            break;
        }
        count += tree.text_len(text);
    }
    count
}

/// Walk the text-node sequence accumulating lengths until the target
/// offset is reached
fn seek_boundary(tree: &DomTree, root: NodeId, target: u32) -> Boundary {
    let mut count = 0;
    let mut last = None;
    for node in tree.text_nodes(root) {
        let len = tree.text_len(node);
        // exact node-boundary landings prefer the following node at
        // offset 0 over the end of the preceding one
        if target == count || target < count + len {
            return Boundary::new(node, target - count);
        }
        count += len;
        last = Some((node, len));
    }
    match last {
        // past the final boundary: clamp to the end of the last node
        Some((node, len)) => Boundary::new(node, len),
        None => Boundary::new(root, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TextPosition;

    /// <div id="d">"The "<b>"quick"</b>" fox jumps"</div>
    fn sample() -> (DomTree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element_with_id("div", "d");
        let t1 = tree.create_text("The ");
        let b = tree.create_element("b");
        let t2 = tree.create_text("quick");
        let t3 = tree.create_text(" fox jumps");
        tree.append_child(tree.root(), div);
        tree.append_child(div, t1);
        tree.append_child(div, b);
        tree.append_child(b, t2);
        tree.append_child(div, t3);
        (tree, div, t1, t2, t3)
    }

    #[test]
    fn test_round_trip() {
        let (tree, div, ..) = sample();
        for (start, end) in [(0, 0), (0, 4), (4, 9), (2, 12), (9, 19), (0, 19)] {
            let position = TextPosition::new(start, end);
            let range = position_to_range(&tree, div, &position).unwrap();
            let back = position_from_range(&tree, div, &range).unwrap();
            assert_eq!(back, position, "round trip failed for {start}..{end}");
        }
    }

    #[test]
    fn test_position_to_range_within_node() {
        let (tree, div, t1, ..) = sample();
        let range = position_to_range(&tree, div, &TextPosition::new(1, 3)).unwrap();
        assert_eq!(range.start, Boundary::new(t1, 1));
        assert_eq!(range.end, Boundary::new(t1, 3));
    }

    #[test]
    fn test_boundary_prefers_following_node() {
        let (tree, div, _, t2, _) = sample();
        // offset 4 is the joint between "The " and "quick"
        let range = position_to_range(&tree, div, &TextPosition::new(4, 9)).unwrap();
        assert_eq!(range.start, Boundary::new(t2, 0));
        assert_eq!(range.end, Boundary::new(t2, 5));
        assert_eq!(range_text(&tree, div, &range).unwrap(), "quick");
    }

    #[test]
    fn test_end_at_total_length_clamps_to_last_node() {
        let (tree, div, _, _, t3) = sample();
        let total = tree.text_len(div);
        let range = position_to_range(&tree, div, &TextPosition::new(4, total)).unwrap();
        assert_eq!(range.end, Boundary::new(t3, 10));
        assert_eq!(range_text(&tree, div, &range).unwrap(), "quick fox jumps");
    }

    #[test]
    fn test_element_container_boundaries() {
        let (tree, div, _, t2, _) = sample();
        // boundary before child 1 (<b>) up to boundary after child 1
        let range = DomRange::new(div, 1, div, 2);
        let position = position_from_range(&tree, div, &range).unwrap();
        assert_eq!(position, TextPosition::new(4, 9));

        // end boundary past the last child covers all text
        let all = DomRange::new(div, 0, div, 3);
        assert_eq!(
            position_from_range(&tree, div, &all).unwrap(),
            TextPosition::new(0, 19)
        );
        // element boundary resolving into a nested text node
        let nested = DomRange::new(div, 1, t2, 3);
        assert_eq!(
            position_from_range(&tree, div, &nested).unwrap(),
            TextPosition::new(4, 7)
        );
    }

    #[test]
    fn test_missing_root() {
        let (tree, ..) = sample();
        let err = position_to_range(&tree, NodeId::NONE, &TextPosition::new(0, 1)).unwrap_err();
        assert_eq!(err, AnchorError::MissingRoot);
    }

    #[test]
    fn test_empty_root() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div);
        let range = position_to_range(&tree, div, &TextPosition::new(0, 0)).unwrap();
        assert_eq!(range.start, Boundary::new(div, 0));
        assert!(range.collapsed());
    }

    #[test]
    fn test_multibyte_offsets_are_char_counts() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let t = tree.create_text("día två");
        tree.append_child(tree.root(), p);
        tree.append_child(p, t);

        let range = position_to_range(&tree, p, &TextPosition::new(4, 7)).unwrap();
        assert_eq!(range_text(&tree, p, &range).unwrap(), "två");
    }
}
