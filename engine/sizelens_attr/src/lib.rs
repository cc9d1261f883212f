//! Attribution engine: machine-code size, attributed to the source
//! constructs that produced it.
//!
//! This crate provides:
//!
//! - **Origin resolution** ([`origin::resolve_declaration`]) — follow
//!   abstract-origin/specification chains to the canonical declaring
//!   node, safely terminating on dangling or cyclic references.
//!
//! - **Location model** ([`location::size_and_locations`]) — a node's
//!   byte size plus its What/Where identity: the canonical definition
//!   vs. the concrete use site, which differ for inlined code.
//!
//! - **Range reconciliation** ([`RangeSet`]) — duplicate and overlapping
//!   address records collapse into a disjoint attribution, with unclaimed
//!   bytes surfaced as gaps.
//!
//! - **Aggregation** ([`AggregationTree`]) — path-keyed, incrementally
//!   updated size tree over one synthetic root, dumped at caller-chosen
//!   depths.
//!
//! - **The walk** ([`Walker`], [`Reporter`], [`AttrContext`]) — a
//!   depth-first pass over each compile unit that keeps self-size vs.
//!   descendant-size accounting consistent and emits begin/end events.
//!
//! # Pipeline
//!
//! ```text
//! provider tree -> Walker -> (Reporter events, RangeSet records)
//!                                    RangeSet -> drain -> AggregationTree
//! ```
//!
//! Single-threaded by design: one compile unit is processed to completion
//! before the next. A run either completes or aborts on a fatal
//! [`AttrError`]; recoverable anomalies are logged via `tracing` instead.

mod aggregate;
mod error;
pub mod location;
pub mod origin;
mod range_set;
mod reporter;
mod unit;
mod walker;

pub use aggregate::{AggNode, AggNodeId, AggregationTree, DumpRow};
pub use error::AttrError;
pub use location::Attribution;
pub use range_set::{AddressRecord, DrainStats, RangeSet, Reconciled};
pub use reporter::{NullReporter, Reporter};
pub use unit::{AttrContext, UnitReport};
pub use walker::{Walker, MAX_DEPTH};
