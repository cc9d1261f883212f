//! Depth-first attribution walk.
//!
//! Visits a debug-info tree in provider order, computes each node's size
//! and What/Where identity, emits begin/end events to the reporter, and
//! registers the attributed ranges for the reconciliation pass.
//!
//! Accounting invariant: a node's size already subsumes its descendants,
//! so a parent adds its full size to the running total and reports the
//! difference to its reported children as self size at `end`. Reported
//! descendants covering more bytes than their parent is an upstream
//! invariant break and aborts the walk.

use sizelens_ir::{AttrConfig, CodeNode, DebugInfoProvider, Name, StringPool};

use crate::error::AttrError;
use crate::location::{self, Attribution};
use crate::range_set::{AddressRecord, RangeSet};
use crate::reporter::Reporter;

/// Defensive recursion bound. Debug-info nesting is shallow in practice;
/// hitting this means corrupt input.
pub const MAX_DEPTH: usize = 512;

/// One attribution walk over one debug-info tree.
pub struct Walker<'a, P, R> {
    config: &'a AttrConfig,
    pool: &'a StringPool,
    provider: &'a P,
    ranges: &'a mut RangeSet,
    reporter: &'a mut R,
}

impl<'a, P: DebugInfoProvider, R: Reporter> Walker<'a, P, R> {
    pub fn new(
        config: &'a AttrConfig,
        pool: &'a StringPool,
        provider: &'a P,
        ranges: &'a mut RangeSet,
        reporter: &'a mut R,
    ) -> Self {
        Walker {
            config,
            pool,
            provider,
            ranges,
            reporter,
        }
    }

    /// Walk the children of `node` and return the bytes attributed to
    /// the subtree. The node itself (normally the compile unit) is not
    /// reported; the caller accounts for it.
    pub fn walk(&mut self, node: &CodeNode) -> Result<u64, AttrError> {
        self.walk_children(node, 0)
    }

    fn walk_children(&mut self, node: &CodeNode, depth: usize) -> Result<u64, AttrError> {
        if depth >= MAX_DEPTH {
            return Err(AttrError::DepthLimitExceeded { limit: MAX_DEPTH });
        }

        let mut total: u64 = 0;
        for child in &node.children {
            let attr =
                location::size_and_locations(self.config, self.pool, self.provider, child);
            match attr {
                None => {
                    // Zero-size wrapper scope: code can nest beneath it,
                    // so sized descendants still get reported, but the
                    // wrapper contributes nothing to the running total.
                    let _ = self.walk_children(child, depth + 1)?;
                }
                Some(attr) if self.reportable(&attr) => {
                    self.reporter.begin_node(&attr.what, &attr.site);
                    self.register_ranges(child, &attr);

                    let children_size = self.walk_children(child, depth + 1)?;
                    if children_size > attr.size {
                        return Err(AttrError::NegativeSelfSize {
                            tag: child.tag.to_string(),
                            id: child.id.0,
                            size: attr.size,
                            children_size,
                        });
                    }
                    self.reporter.end_node(&attr.what, &attr.site, children_size);
                    total += attr.size;
                }
                Some(_) => {
                    // Filtered out, but its bytes keep flowing upward so
                    // the parent's accounting still balances.
                    total += self.walk_children(child, depth + 1)?;
                }
            }
        }
        Ok(total)
    }

    fn reportable(&self, attr: &Attribution) -> bool {
        !self.config.ignore_unnamed || attr.what.name.is_some()
    }

    fn register_ranges(&mut self, node: &CodeNode, attr: &Attribution) {
        for &range in &node.ranges {
            self.ranges.insert(AddressRecord {
                file: attr.site.file.unwrap_or(Name::UNKNOWN),
                func: attr.what.name.unwrap_or(Name::UNKNOWN),
                line: attr.site.line,
                col: attr.site.col,
                range,
            });
        }
    }
}
