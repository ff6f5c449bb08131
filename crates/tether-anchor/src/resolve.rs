//! Selector resolution and anchor lookup
//!
//! Position selectors are fast and unambiguous but fragile to upstream
//! edits; quote selectors locate by content even after reflow, at the cost
//! of possible false matches on repeated text. Resolution therefore
//! prefers position confirmed by quote, falling back to the quote alone.

use tether_dom::{Document, DomRange, DomTree, NodeId};

use crate::position::{position_to_range, range_text};
use crate::quote::quote_to_range;
use crate::target::{Selector, TextPosition, TextQuote, position_selector, quote_selector};

/// Reconstruct the most reliable range for a set of selectors
///
/// Priority order, first success wins:
/// 1. position selector, returned immediately when its literal text equals
///    the quote's `exact` (position is authoritative when corroborated);
/// 2. quote selector, tolerating document drift that shifted offsets;
/// 3. nothing resolvable.
///
/// Codec failures are absorbed here: one unresolvable annotation must not
/// block the rest of the page.
pub fn resolve_selectors(
    tree: &DomTree,
    anchor: NodeId,
    selectors: &[Selector],
) -> Option<DomRange> {
    let position = position_selector(selectors);
    let quote = quote_selector(selectors);

    if let Some(position) = position {
        if let Some(range) = corroborated_range(tree, anchor, position, quote) {
            return Some(range);
        }
    }

    if let Some(quote) = quote {
        match quote_to_range(tree, anchor, quote) {
            Ok(range) => return Some(range),
            Err(err) => {
                tracing::debug!(?err, "quote selector unresolved");
            }
        }
    }

    None
}

/// Position-derived range, accepted only when the quote confirms its text
fn corroborated_range(
    tree: &DomTree,
    anchor: NodeId,
    position: &TextPosition,
    quote: Option<&TextQuote>,
) -> Option<DomRange> {
    let range = match position_to_range(tree, anchor, position) {
        Ok(range) => range,
        Err(err) => {
            tracing::debug!(?err, "position selector unresolved");
            return None;
        }
    };
    let quote = quote?;
    let text = range_text(tree, anchor, &range).ok()?;
    if text == quote.exact {
        Some(range)
    } else {
        tracing::debug!("position selector text drifted from quote, falling back");
        None
    }
}

/// Map a stored anchor id to a live element
///
/// When the exact id is gone, dotted ids walk up a conceptual hierarchy:
/// truncate at the last dot and retry until something resolves or no dots
/// remain.
pub fn resolve_anchor(document: &Document, anchor_id: &str) -> Option<NodeId> {
    if let Some(node) = document.element_by_id(anchor_id) {
        return Some(node);
    }

    let mut id = anchor_id;
    while let Some(dot) = id.rfind('.') {
        id = &id[..dot];
        if let Some(node) = document.element_by_id(id) {
            tracing::debug!(requested = anchor_id, resolved = id, "anchor walked up");
            return Some(node);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TextQuote;

    fn doc(text: &str) -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element_with_id("div", "d");
        let t = tree.create_text(text);
        tree.append_child(tree.root(), div);
        tree.append_child(div, t);
        (tree, div)
    }

    fn both(start: u32, end: u32, exact: &str) -> Vec<Selector> {
        vec![
            Selector::TextPositionSelector(TextPosition::new(start, end)),
            Selector::TextQuoteSelector(TextQuote::new(exact)),
        ]
    }

    #[test]
    fn test_position_wins_when_corroborated() {
        let (tree, div) = doc("The quick fox jumps");
        let range = resolve_selectors(&tree, div, &both(4, 9, "quick")).unwrap();
        assert_eq!(range_text(&tree, div, &range).unwrap(), "quick");
    }

    #[test]
    fn test_quote_fallback_on_drift() {
        // five characters of drift before the original offsets
        let (tree, div) = doc("Well, the quick fox jumps");
        let range = resolve_selectors(&tree, div, &both(4, 9, "quick")).unwrap();
        assert_eq!(range_text(&tree, div, &range).unwrap(), "quick");
    }

    #[test]
    fn test_position_alone_is_not_authoritative() {
        // without a corroborating quote the position cannot be verified
        let (tree, div) = doc("The quick fox jumps");
        let selectors = vec![Selector::TextPositionSelector(TextPosition::new(4, 9))];
        assert_eq!(resolve_selectors(&tree, div, &selectors), None);
    }

    #[test]
    fn test_quote_alone_resolves() {
        let (tree, div) = doc("The quick fox jumps");
        let selectors = vec![Selector::TextQuoteSelector(TextQuote::new("fox"))];
        let range = resolve_selectors(&tree, div, &selectors).unwrap();
        assert_eq!(range_text(&tree, div, &range).unwrap(), "fox");
    }

    #[test]
    fn test_nothing_resolvable() {
        let (tree, div) = doc("The quick fox jumps");
        assert_eq!(resolve_selectors(&tree, div, &[]), None);
        assert_eq!(
            resolve_selectors(
                &tree,
                div,
                &[Selector::TextQuoteSelector(TextQuote::new("wolf"))]
            ),
            None
        );
    }

    #[test]
    fn test_anchor_walk_up() {
        let mut document = Document::new();
        let root = document.tree.root();
        let a = document.tree.create_element_with_id("section", "a");
        document.tree.append_child(root, a);

        assert_eq!(resolve_anchor(&document, "a.b.c"), Some(a));
        assert_eq!(resolve_anchor(&document, "a"), Some(a));
        assert_eq!(resolve_anchor(&document, "x.y"), None);
        assert_eq!(resolve_anchor(&document, "missing"), None);
    }

    #[test]
    fn test_anchor_exact_match_preferred() {
        let mut document = Document::new();
        let root = document.tree.root();
        let a = document.tree.create_element_with_id("section", "a");
        let ab = document.tree.create_element_with_id("p", "a.b");
        document.tree.append_child(root, a);
        document.tree.append_child(a, ab);

        assert_eq!(resolve_anchor(&document, "a.b"), Some(ab));
        assert_eq!(resolve_anchor(&document, "a.b.missing"), Some(ab));
    }
}
