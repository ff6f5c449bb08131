//! Target and selector wire model
//!
//! A target is the persisted description of where an annotation lives:
//! the id of its anchor element plus selectors describing a sub-range of
//! the anchor's text. Selectors follow the W3C annotation-model shapes
//! (`TextPositionSelector`, `TextQuoteSelector`), tagged by a `type` field
//! in JSON.

use serde::{Deserialize, Serialize};

/// Character offsets into an anchor's text stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPosition {
    /// Offset of the first character of the span
    pub start: u32,
    /// Offset one past the last character of the span
    pub end: u32,
}

impl TextPosition {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Character length of the span
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Quoted-text description of a span: the literal text plus bounded
/// context windows on either side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextQuote {
    /// The literal text of the span at capture time
    pub exact: String,
    /// Text immediately before the span, when any exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Text immediately after the span, when any exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl TextQuote {
    pub fn new(exact: &str) -> Self {
        Self {
            exact: exact.to_string(),
            prefix: None,
            suffix: None,
        }
    }
}

/// A typed, serializable description of a sub-range of an anchor's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Selector {
    /// Offset-based selector, computed against the masked text stream
    TextPositionSelector(TextPosition),
    /// Quote-based selector, the corroborating/fallback signal
    TextQuoteSelector(TextQuote),
}

/// Persisted annotation location: anchor id plus selectors
///
/// Targets produced by this engine always carry both selector types,
/// position first. Consumers must tolerate targets with only a quote
/// selector, or none at all (legacy whole-element annotation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Id of the anchor element, possibly a dotted hierarchical path
    pub anchor_id: String,
    /// Selectors in priority order; empty for legacy whole-element targets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<Selector>,
}

impl Target {
    /// Whole-element target with no selectors
    pub fn whole_element(anchor_id: &str) -> Self {
        Self {
            anchor_id: anchor_id.to_string(),
            selectors: Vec::new(),
        }
    }

    /// First position selector, if any
    pub fn position(&self) -> Option<&TextPosition> {
        position_selector(&self.selectors)
    }

    /// First quote selector, if any
    pub fn quote(&self) -> Option<&TextQuote> {
        quote_selector(&self.selectors)
    }
}

/// First position selector in a list
pub fn position_selector(selectors: &[Selector]) -> Option<&TextPosition> {
    selectors.iter().find_map(|s| match s {
        Selector::TextPositionSelector(p) => Some(p),
        _ => None,
    })
}

/// First quote selector in a list
pub fn quote_selector(selectors: &[Selector]) -> Option<&TextQuote> {
    selectors.iter().find_map(|s| match s {
        Selector::TextQuoteSelector(q) => Some(q),
        _ => None,
    })
}
