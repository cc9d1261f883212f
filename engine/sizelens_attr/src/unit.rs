//! Per-run context and compile-unit driver.
//!
//! One [`AttrContext`] lives for a whole run: the string pool and the
//! aggregation tree persist across units, the range set is filled and
//! drained once per unit. No globals; parallel runs just use separate
//! contexts.

use sizelens_ir::{AttrConfig, CodeNode, DebugInfoProvider, Name, SharedPool};

use crate::aggregate::AggregationTree;
use crate::error::AttrError;
use crate::range_set::{RangeSet, Reconciled};
use crate::reporter::Reporter;
use crate::walker::Walker;

/// State of one attribution run.
pub struct AttrContext {
    pub config: AttrConfig,
    pub pool: SharedPool,
    pub tree: AggregationTree,
    ranges: RangeSet,
}

/// Totals of one processed compile unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitReport {
    /// Unit name as the debug info gives it, `<unknown>` if missing.
    pub name: String,
    /// Bytes the walk attributed to the unit's reported tree.
    pub walked_size: u64,
    /// Bytes the reconciliation pass handed to the aggregation tree.
    pub attributed_bytes: u64,
    /// Bytes between known ranges, folded into the `gaps` bucket.
    pub gap_bytes: u64,
}

impl AttrContext {
    pub fn new(config: AttrConfig) -> Self {
        AttrContext {
            config,
            pool: SharedPool::new(),
            tree: AggregationTree::new(),
            ranges: RangeSet::new(),
        }
    }

    /// Process one compile unit to completion: walk it, then drain the
    /// reconciled ranges into the aggregation tree.
    ///
    /// Attributed spans land under `<source-path>/<function>`; gap bytes
    /// land under the root-level `gaps` bucket.
    pub fn process_unit<P, R>(
        &mut self,
        provider: &P,
        unit: &CodeNode,
        reporter: &mut R,
    ) -> Result<UnitReport, AttrError>
    where
        P: DebugInfoProvider,
        R: Reporter,
    {
        let name = unit.name.clone().unwrap_or_else(|| "<unknown>".to_owned());
        tracing::debug!(unit = %name, "processing compile unit");

        let walked_size = Walker::new(
            &self.config,
            &self.pool,
            provider,
            &mut self.ranges,
            reporter,
        )
        .walk(unit)?;

        // Drain this unit's records; the tree outlives the set's content.
        let pool = &self.pool;
        let tree = &mut self.tree;
        let stats = self.ranges.drain_to_gaps(|reconciled| match reconciled {
            Reconciled::Span {
                file, func, size, ..
            } => {
                let path = pool.lookup(file);
                let node = tree.intern_path(pool, &path, func);
                tree.accumulate(node, size);
            }
            Reconciled::Gap { size, .. } => {
                let node = tree.intern([Name::GAPS]);
                tree.accumulate(node, size);
            }
        })?;

        tracing::debug!(
            unit = %name,
            walked_size,
            attributed = stats.attributed,
            gaps = stats.gap_bytes,
            "compile unit done"
        );

        Ok(UnitReport {
            name,
            walked_size,
            attributed_bytes: stats.attributed,
            gap_bytes: stats.gap_bytes,
        })
    }
}
