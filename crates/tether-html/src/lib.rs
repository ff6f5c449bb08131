//! tether HTML - markup ingestion
//!
//! Parses HTML into a `tether-dom` document. Built on html5ever's RcDom and
//! converted into the arena, which is simpler and more reliable than
//! implementing TreeSink directly.
//!
//! Whitespace-only text nodes are kept: anchoring offsets are measured
//! against the full text stream, so dropping them would shift every
//! position selector.

mod parser;

pub use parser::HtmlParser;

use tether_dom::Document;

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}
