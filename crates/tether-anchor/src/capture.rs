//! Capture and replay entry points
//!
//! Capture turns a live range into a portable target; replay turns a
//! stored target back into a live range. Everything is rebuilt fresh from
//! the target and the live anchor on every replay, so nothing here holds a
//! node or range across calls.

use tether_dom::{Document, DomRange, NodeId};

use crate::mask::{ForeignMatcher, with_foreign_masked};
use crate::position::{position_from_range, position_to_range};
use crate::quote::quote_from_position;
use crate::resolve::{resolve_anchor, resolve_selectors};
use crate::target::{Selector, Target};
use crate::{AnchorError, AnchorResult};

/// Describe a live range as a persistable target
///
/// The anchor is the nearest identified ancestor of the selection. When a
/// `root` constraint is supplied and the anchor falls outside it, no
/// target is produced: the annotation must not be created there. Selectors
/// are computed against the masked text stream, position first, then the
/// quote derived from that position.
pub fn range_to_target(
    document: &mut Document,
    range: &DomRange,
    root: Option<NodeId>,
    matcher: &ForeignMatcher,
) -> Option<Target> {
    let common = range.common_ancestor(document.tree())?;
    let anchor = document.closest_with_id(common)?;

    if let Err(err) = check_constraint(document, anchor, root) {
        tracing::debug!(?err, "refusing to capture annotation");
        return None;
    }

    let anchor_id = document.tree().element_id(anchor)?.to_string();
    let selectors = with_foreign_masked(document.tree_mut(), anchor, matcher, |tree| {
        let position = position_from_range(tree, anchor, range)?;
        let quote = quote_from_position(tree, anchor, &position)?;
        Ok::<_, AnchorError>(vec![
            Selector::TextPositionSelector(position),
            Selector::TextQuoteSelector(quote),
        ])
    })
    .ok()?;

    Some(Target {
        anchor_id,
        selectors,
    })
}

/// The anchor must be the constraint root itself or one of its
/// descendants
fn check_constraint(
    document: &Document,
    anchor: NodeId,
    root: Option<NodeId>,
) -> AnchorResult<()> {
    match root {
        Some(root) if anchor != root && !document.tree().is_ancestor(root, anchor) => {
            Err(AnchorError::OutOfBounds)
        }
        _ => Ok(()),
    }
}

/// Reconstruct a live range from a stored target
///
/// Walks up the dotted anchor hierarchy when the exact anchor is gone,
/// then resolves selectors against the masked anchor subtree. A target
/// with no selectors is a legacy whole-element annotation and selects the
/// anchor's entire contents. `None` means the annotation is currently
/// unanchorable; callers should hide it, not fail the page.
pub fn target_to_range(
    document: &mut Document,
    target: &Target,
    matcher: &ForeignMatcher,
) -> Option<DomRange> {
    if target.selectors.is_empty() {
        // legacy targets never walk the hierarchy
        let anchor = document.element_by_id(&target.anchor_id)?;
        return Some(DomRange::select_contents(document.tree(), anchor));
    }

    let anchor = resolve_anchor(document, &target.anchor_id)?;
    with_foreign_masked(document.tree_mut(), anchor, matcher, |tree| {
        resolve_selectors(tree, anchor, &target.selectors)
    })
}

/// Reconstruct the range a position selector denotes inside an anchor,
/// with foreign elements masked. Exposed for callers that track their own
/// selector storage.
pub fn position_to_masked_range(
    document: &mut Document,
    anchor: NodeId,
    position: &crate::target::TextPosition,
    matcher: &ForeignMatcher,
) -> AnchorResult<DomRange> {
    with_foreign_masked(document.tree_mut(), anchor, matcher, |tree| {
        position_to_range(tree, anchor, position)
    })
}
