//! Anchoring errors
//!
//! Structural misuse (missing root) is a hard error at the call site.
//! "Could not find it in this document" outcomes are recoverable: the
//! resolution engine absorbs them and callers see `None`.

use tether_dom::DomError;

/// Result type for anchoring operations
pub type AnchorResult<T> = Result<T, AnchorError>;

/// Anchoring failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnchorError {
    /// A required root element argument is absent
    #[error("missing required root element")]
    MissingRoot,

    /// Neither exact text nor context matched anywhere under the root
    #[error("selector did not match any content")]
    SelectorNotFound,

    /// The selection's anchor lies outside the permitted root
    #[error("selection lies outside the permitted root")]
    OutOfBounds,

    /// Underlying tree mutation failed
    #[error(transparent)]
    Dom(#[from] DomError),
}
