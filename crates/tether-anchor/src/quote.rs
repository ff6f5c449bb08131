//! Text quote codec
//!
//! Converts between a position selector and a quoted-text description.
//! The quote carries the literal text of the span plus bounded context
//! windows; when document drift invalidates stored offsets, the quote
//! relocates the span by content.

use tether_dom::{DomRange, DomTree, NodeId};

use crate::position::{position_to_range, slice_chars};
use crate::target::{TextPosition, TextQuote};
use crate::{AnchorError, AnchorResult};

/// Context window captured on each side of the quoted text, in characters.
/// The window aids disambiguation between repeated occurrences; its exact
/// length is not load-bearing for correctness.
pub const CONTEXT_CHARS: usize = 32;

/// Build a quote selector from a position selector
pub fn quote_from_position(
    tree: &DomTree,
    root: NodeId,
    position: &TextPosition,
) -> AnchorResult<TextQuote> {
    if tree.get(root).is_none() {
        return Err(AnchorError::MissingRoot);
    }
    let chars: Vec<char> = tree.text_content(root).chars().collect();
    let start = (position.start as usize).min(chars.len());
    let end = (position.end as usize).clamp(start, chars.len());

    let exact: String = chars[start..end].iter().collect();
    let prefix: String = chars[start.saturating_sub(CONTEXT_CHARS)..start]
        .iter()
        .collect();
    let suffix: String = chars[end..(end + CONTEXT_CHARS).min(chars.len())]
        .iter()
        .collect();

    Ok(TextQuote {
        exact,
        prefix: (!prefix.is_empty()).then_some(prefix),
        suffix: (!suffix.is_empty()).then_some(suffix),
    })
}

/// Locate the best match of a quote selector in `root`'s text stream
///
/// Every occurrence of `exact` is scored by how much of the stored
/// prefix/suffix context agrees with the text around it; the best score
/// wins and ties go to the earliest occurrence, so resolution is
/// deterministic even for repeated text.
pub fn quote_to_position(
    tree: &DomTree,
    root: NodeId,
    quote: &TextQuote,
) -> AnchorResult<TextPosition> {
    if tree.get(root).is_none() {
        return Err(AnchorError::MissingRoot);
    }
    if quote.exact.is_empty() {
        return Err(AnchorError::SelectorNotFound);
    }

    let text = tree.text_content(root);
    let chars: Vec<char> = text.chars().collect();
    let exact_len = quote.exact.chars().count() as u32;

    let mut best: Option<(usize, u32)> = None;
    for (byte_start, _) in text.match_indices(quote.exact.as_str()) {
        let char_start = text[..byte_start].chars().count();
        let score = context_score(&chars, char_start, exact_len as usize, quote);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((char_start, score));
        }
    }

    match best {
        Some((start, _)) => Ok(TextPosition::new(start as u32, start as u32 + exact_len)),
        None => {
            tracing::debug!(exact = %quote.exact, "quote not found in text stream");
            Err(AnchorError::SelectorNotFound)
        }
    }
}

/// Compose quote lookup with range reconstruction
pub fn quote_to_range(tree: &DomTree, root: NodeId, quote: &TextQuote) -> AnchorResult<DomRange> {
    let position = quote_to_position(tree, root, quote)?;
    position_to_range(tree, root, &position)
}

/// Agreement between the stored context windows and the text surrounding
/// a candidate occurrence
fn context_score(chars: &[char], start: usize, len: usize, quote: &TextQuote) -> u32 {
    let mut score = 0;

    if let Some(prefix) = &quote.prefix {
        let expected: Vec<char> = prefix.chars().collect();
        // compare backwards from the candidate
        score += expected
            .iter()
            .rev()
            .zip(chars[..start].iter().rev())
            .take_while(|(a, b)| a == b)
            .count() as u32;
    }

    if let Some(suffix) = &quote.suffix {
        let after = start + len;
        score += suffix
            .chars()
            .zip(chars[after.min(chars.len())..].iter().copied())
            .take_while(|(a, b)| a == b)
            .count() as u32;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let t = tree.create_text(text);
        tree.append_child(tree.root(), div);
        tree.append_child(div, t);
        (tree, div)
    }

    #[test]
    fn test_quote_from_position() {
        let (tree, div) = doc("The quick fox jumps");
        let quote = quote_from_position(&tree, div, &TextPosition::new(4, 9)).unwrap();

        assert_eq!(quote.exact, "quick");
        assert_eq!(quote.prefix.as_deref(), Some("The "));
        assert_eq!(quote.suffix.as_deref(), Some(" fox jumps"));
    }

    #[test]
    fn test_quote_context_bounded() {
        let long = "a".repeat(100);
        let text = format!("{long}needle{long}");
        let (tree, div) = doc(&text);
        let quote = quote_from_position(&tree, div, &TextPosition::new(100, 106)).unwrap();

        assert_eq!(quote.exact, "needle");
        assert_eq!(quote.prefix.as_deref(), Some("a".repeat(32).as_str()));
        assert_eq!(quote.suffix.as_deref(), Some("a".repeat(32).as_str()));
    }

    #[test]
    fn test_quote_at_document_start_has_no_prefix() {
        let (tree, div) = doc("quick fox");
        let quote = quote_from_position(&tree, div, &TextPosition::new(0, 5)).unwrap();
        assert_eq!(quote.prefix, None);
        assert_eq!(quote.suffix.as_deref(), Some(" fox"));
    }

    #[test]
    fn test_quote_to_position_simple() {
        let (tree, div) = doc("Well, the quick fox jumps");
        let position = quote_to_position(&tree, div, &TextQuote::new("quick")).unwrap();
        assert_eq!(position, TextPosition::new(10, 15));
    }

    #[test]
    fn test_quote_not_found() {
        let (tree, div) = doc("The quick fox");
        let err = quote_to_position(&tree, div, &TextQuote::new("wolf")).unwrap_err();
        assert_eq!(err, AnchorError::SelectorNotFound);
    }

    #[test]
    fn test_repeated_text_disambiguated_by_context() {
        let (tree, div) = doc("say yes, say no, say maybe");
        let quote = TextQuote {
            exact: "say".to_string(),
            prefix: Some("no, ".to_string()),
            suffix: Some(" maybe".to_string()),
        };
        let position = quote_to_position(&tree, div, &quote).unwrap();
        assert_eq!(position, TextPosition::new(17, 20));
    }

    #[test]
    fn test_repeated_text_without_context_is_deterministic() {
        let (tree, div) = doc("say yes, say no");
        let quote = TextQuote::new("say");
        let first = quote_to_position(&tree, div, &quote).unwrap();
        let second = quote_to_position(&tree, div, &quote).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, TextPosition::new(0, 3));
    }

    #[test]
    fn test_quote_to_range_spans_nodes() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let t1 = tree.create_text("The qui");
        let t2 = tree.create_text("ck fox");
        tree.append_child(tree.root(), div);
        tree.append_child(div, t1);
        tree.append_child(div, t2);

        let range = quote_to_range(&tree, div, &TextQuote::new("quick")).unwrap();
        assert_eq!(
            crate::position::range_text(&tree, div, &range).unwrap(),
            "quick"
        );
    }

    #[test]
    fn test_multibyte_quote_offsets() {
        let (tree, div) = doc("prólogo y final");
        let position = quote_to_position(&tree, div, &TextQuote::new("y")).unwrap();
        assert_eq!(position, TextPosition::new(8, 9));
    }
}
