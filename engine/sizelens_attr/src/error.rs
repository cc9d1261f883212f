//! Fatal engine errors.
//!
//! Everything here indicates an upstream invariant break that would make
//! the output meaningless, so the unit run aborts. Recoverable anomalies
//! (dangling origins, overlap collisions, missing names) are handled in
//! place and logged instead.

use thiserror::Error;

/// Fatal internal-consistency failure of an attribution run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttrError {
    /// The reconciliation pass saw records out of ascending start order.
    #[error("address records out of order: {prev:#x} followed by {next:#x}")]
    SortednessViolation { prev: u64, next: u64 },

    /// A node's reported descendants cover more bytes than the node itself.
    #[error(
        "negative self size for {tag} {id}: node covers {size} bytes, \
         reported children cover {children_size}"
    )]
    NegativeSelfSize {
        tag: String,
        id: u64,
        size: u64,
        children_size: u64,
    },

    /// Debug-info nesting deeper than the defensive recursion bound.
    #[error("debug-info nesting exceeds {limit} levels")]
    DepthLimitExceeded { limit: usize },
}
