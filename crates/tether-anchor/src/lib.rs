//! tether anchor - annotation anchoring engine
//!
//! Anchors user annotations (highlights, comments, issue markers) to spans
//! of text in a rendered document, independent of foreign UI elements
//! injected into it. A live range is volatile: it points at nodes that get
//! re-rendered, reflowed and decorated. A [`Target`] is its portable
//! counterpart: the id of the nearest identified ancestor plus offset- and
//! quote-based selectors, serializable and stable across reloads.
//!
//! Capture: range -> (mask foreign) -> position codec -> quote codec ->
//! target. Replay: target -> anchor resolver -> (mask foreign) -> selector
//! resolution -> range -> marking.
//!
//! ```rust
//! use tether_anchor::{ForeignMatcher, range_to_target, target_to_range};
//! use tether_dom::DomRange;
//!
//! let mut document = tether_html::parse("<p id=\"p1\">The quick fox jumps</p>");
//! let p1 = document.element_by_id("p1").unwrap();
//! let text = document.tree().first_child(p1).unwrap();
//!
//! let matcher = ForeignMatcher::default();
//! let range = DomRange::new(text, 4, text, 9);
//! let target = range_to_target(&mut document, &range, None, &matcher).unwrap();
//! assert_eq!(target.anchor_id, "p1");
//!
//! // ...re-render, reload, drift...
//! let replayed = target_to_range(&mut document, &target, &matcher).unwrap();
//! assert_eq!(replayed.start.node, text);
//! ```

mod capture;
mod error;
mod mark;
mod mask;
mod position;
mod quote;
mod resolve;
mod target;

pub use capture::{position_to_masked_range, range_to_target, target_to_range};
pub use error::{AnchorError, AnchorResult};
pub use mark::{DEFAULT_MARK_TAG, mark_range};
pub use mask::{DEFAULT_FOREIGN_SELECTOR, ForeignMatcher, with_foreign_masked};
pub use position::{position_from_range, position_to_range, range_text};
pub use quote::{CONTEXT_CHARS, quote_from_position, quote_to_position, quote_to_range};
pub use resolve::{resolve_anchor, resolve_selectors};
pub use target::{Selector, Target, TextPosition, TextQuote, position_selector, quote_selector};
