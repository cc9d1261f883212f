//! Address-range reconciliation.
//!
//! The walker registers one record per code range it attributes; ranges
//! from different nodes duplicate and overlap each other (an inlined body
//! lies inside its caller's range, the same definition can be reported
//! twice). This pass reconciles them: duplicates collapse, partial
//! overlaps are split deterministically, and a final in-order drain clamps
//! nested records and surfaces the bytes nobody claimed as gaps.

use std::collections::BTreeMap;

use sizelens_ir::{AddrRange, Name};

use crate::error::AttrError;

/// One attributed address range with its interned source keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressRecord {
    /// Use-site file path.
    pub file: Name,
    /// Canonical function name.
    pub func: Name,
    pub line: Option<u32>,
    pub col: Option<u32>,
    pub range: AddrRange,
}

/// Ordered set of address records, keyed and sorted by range start.
///
/// After insertion the records are start-unique; the drain pass produces
/// the actual disjoint partition. Lives for one reconciliation pass.
#[derive(Default)]
pub struct RangeSet {
    records: BTreeMap<u64, AddressRecord>,
}

/// One drained attribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reconciled {
    /// Bytes attributed to a record; `size` is the clamped effective size,
    /// not necessarily the record's full length.
    Span {
        file: Name,
        func: Name,
        line: Option<u32>,
        col: Option<u32>,
        start: u64,
        size: u64,
    },
    /// Bytes between two known records that nobody claimed.
    Gap { start: u64, size: u64 },
}

/// Byte totals of one drain pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DrainStats {
    pub attributed: u64,
    pub gap_bytes: u64,
    pub spans: usize,
    pub gaps: usize,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in ascending start order.
    pub fn iter(&self) -> impl Iterator<Item = &AddressRecord> {
        self.records.values()
    }

    /// Insert a record, resolving collisions with what is already there.
    ///
    /// Rules, in order:
    /// - empty or malformed ranges are dropped;
    /// - an identical record (same start/end/line/col) is a duplicate and
    ///   is ignored;
    /// - same start and end but differing line/col is ambiguous: the first
    ///   record wins, the incoming one is dropped with a warning;
    /// - overlap with differing ends: the record with the smaller end is
    ///   kept unchanged; the larger one is truncated to start one byte
    ///   past the smaller end and re-inserted (the remainder shrinks every
    ///   step, so this terminates);
    /// - a record nested strictly inside an existing one (distinct start,
    ///   end not past the outer end) is kept alongside it; the drain
    ///   clamp attributes the outer record only up to the inner start.
    pub fn insert(&mut self, record: AddressRecord) {
        let range = record.range;
        if range.is_empty() {
            return;
        }

        if let Some(existing) = self.records.get(&range.start) {
            if existing.range.end == range.end {
                if existing.line == record.line && existing.col == record.col {
                    // Exact duplicate.
                    return;
                }
                tracing::warn!(
                    range = %range,
                    kept_line = ?existing.line,
                    dropped_line = ?record.line,
                    "ambiguous records for the same range, first wins"
                );
                return;
            }
            tracing::warn!(
                existing = %existing.range,
                incoming = %range,
                "overlapping records at the same start, splitting"
            );
            if existing.range.end < range.end {
                // Existing is the smaller record and stays put.
                let small_end = existing.range.end;
                if let Some(rest) = truncate_past(record, small_end) {
                    self.insert(rest);
                }
            } else {
                // Incoming is smaller: it takes the slot, the old record
                // is re-inserted past it.
                let small_end = range.end;
                let displaced = self.records.insert(range.start, record);
                if let Some(rest) = displaced.and_then(|big| truncate_past(big, small_end)) {
                    self.insert(rest);
                }
            }
            return;
        }

        // A predecessor may cover our start.
        if let Some((_, pred)) = self.records.range(..range.start).next_back() {
            if pred.range.overlaps(range) {
                if pred.range.contains_range(range) {
                    // Nested inside the predecessor (an inlined body in
                    // its caller): both stay, the drain clamp carves the
                    // outer record.
                    self.records.insert(range.start, record);
                    return;
                }
                tracing::warn!(
                    existing = %pred.range,
                    incoming = %range,
                    "record sticks out past an overlapping predecessor, splitting"
                );
                let small_end = pred.range.end;
                if let Some(rest) = truncate_past(record, small_end) {
                    self.insert(rest);
                }
                return;
            }
        }

        // We may cover a successor's start.
        let succ = self
            .records
            .range(range.start + 1..)
            .next()
            .map(|(&s, rec)| (s, rec.range));
        if let Some((s, succ_range)) = succ {
            if range.overlaps(succ_range) {
                if range.contains_range(succ_range) {
                    // We contain the successor: both stay.
                    self.records.insert(range.start, record);
                    return;
                }
                tracing::warn!(
                    existing_start = s,
                    incoming = %range,
                    "record overlaps a larger successor, splitting"
                );
                // We end first, so we are the record that stays whole.
                let small_end = range.end;
                self.records.insert(range.start, record);
                if let Some(rest) = self
                    .records
                    .remove(&s)
                    .and_then(|big| truncate_past(big, small_end))
                {
                    self.insert(rest);
                }
                return;
            }
        }

        self.records.insert(range.start, record);
    }

    /// Drain the set in start order, clamping each record against its
    /// successor and reporting unclaimed bytes as gaps.
    ///
    /// The attributed size of each record is
    /// `min(record.end, next.start) - record.start`; when `record.end`
    /// falls short of `next.start` the difference is a gap. The last
    /// record has no successor and is attributed at its full length.
    ///
    /// Records must come out in strictly ascending start order; anything
    /// else is an upstream invariant break and aborts the run.
    pub fn drain_to_gaps<F>(&mut self, mut sink: F) -> Result<DrainStats, AttrError>
    where
        F: FnMut(Reconciled),
    {
        let records: Vec<AddressRecord> =
            std::mem::take(&mut self.records).into_values().collect();
        let mut stats = DrainStats::default();
        let mut prev_start: Option<u64> = None;

        for (i, rec) in records.iter().enumerate() {
            if let Some(prev) = prev_start {
                if rec.range.start <= prev {
                    return Err(AttrError::SortednessViolation {
                        prev,
                        next: rec.range.start,
                    });
                }
            }
            prev_start = Some(rec.range.start);

            let next = records.get(i + 1);
            let effective_end = match next {
                Some(n) => rec.range.end.min(n.range.start),
                None => rec.range.end,
            };
            let size = effective_end.saturating_sub(rec.range.start);
            if size > 0 {
                stats.attributed += size;
                stats.spans += 1;
                sink(Reconciled::Span {
                    file: rec.file,
                    func: rec.func,
                    line: rec.line,
                    col: rec.col,
                    start: rec.range.start,
                    size,
                });
            }

            if let Some(n) = next {
                if rec.range.end < n.range.start {
                    let gap = n.range.start - rec.range.end;
                    stats.gap_bytes += gap;
                    stats.gaps += 1;
                    sink(Reconciled::Gap {
                        start: rec.range.end,
                        size: gap,
                    });
                }
            }
        }

        tracing::debug!(
            attributed = stats.attributed,
            gap_bytes = stats.gap_bytes,
            spans = stats.spans,
            gaps = stats.gaps,
            "drained address records"
        );
        Ok(stats)
    }
}

/// Remainder of `rec` past `small_end`, or `None` if nothing is left.
///
/// The remainder starts one byte past the kept record's end; the skipped
/// byte shows up as a gap in the drain, which is deliberate - it marks
/// where a split happened.
fn truncate_past(mut rec: AddressRecord, small_end: u64) -> Option<AddressRecord> {
    let new_start = small_end + 1;
    if new_start >= rec.range.end {
        return None;
    }
    rec.range.start = new_start;
    Some(rec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rec(start: u64, end: u64) -> AddressRecord {
        AddressRecord {
            file: Name::from_raw(10),
            func: Name::from_raw(11),
            line: Some(1),
            col: Some(1),
            range: AddrRange::new(start, end),
        }
    }

    fn rec_at(start: u64, end: u64, line: u32) -> AddressRecord {
        AddressRecord {
            line: Some(line),
            ..rec(start, end)
        }
    }

    fn drain_all(set: &mut RangeSet) -> (Vec<Reconciled>, DrainStats) {
        let mut out = Vec::new();
        match set.drain_to_gaps(|r| out.push(r)) {
            Ok(stats) => (out, stats),
            Err(e) => panic!("drain failed: {e}"),
        }
    }

    #[test]
    fn test_insert_disjoint() {
        let mut set = RangeSet::new();
        set.insert(rec(0, 10));
        set.insert(rec(20, 30));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_and_malformed_dropped() {
        let mut set = RangeSet::new();
        set.insert(rec(5, 5));
        set.insert(rec(10, 4));
        assert!(set.is_empty());
    }

    #[test]
    fn test_duplicate_is_idempotent() {
        let mut set = RangeSet::new();
        set.insert(rec(0, 10));
        set.insert(rec(0, 10));
        assert_eq!(set.len(), 1);

        let (_, stats) = drain_all(&mut set);
        assert_eq!(stats.attributed, 10);
        assert_eq!(stats.gap_bytes, 0);
    }

    #[test]
    fn test_same_range_differing_line_first_wins() {
        let mut set = RangeSet::new();
        set.insert(rec_at(0, 10, 3));
        set.insert(rec_at(0, 10, 7));
        assert_eq!(set.len(), 1);
        let Some(kept) = set.iter().next() else {
            panic!("record missing");
        };
        assert_eq!(kept.line, Some(3));
    }

    #[test]
    fn test_split_on_partial_overlap() {
        // [0,10) then [5,20): the smaller-ended record survives whole,
        // the larger is truncated one byte past it.
        let mut set = RangeSet::new();
        set.insert(rec(0, 10));
        set.insert(rec(5, 20));

        let ranges: Vec<AddrRange> = set.iter().map(|r| r.range).collect();
        assert_eq!(
            ranges,
            vec![AddrRange::new(0, 10), AddrRange::new(11, 20)]
        );

        let (out, stats) = drain_all(&mut set);
        assert_eq!(stats.attributed, 10 + 9);
        assert_eq!(stats.gap_bytes, 1);
        assert!(out.contains(&Reconciled::Gap { start: 10, size: 1 }));
    }

    #[test]
    fn test_split_insertion_order_does_not_matter() {
        let mut forward = RangeSet::new();
        forward.insert(rec(0, 10));
        forward.insert(rec(5, 20));

        let mut reverse = RangeSet::new();
        reverse.insert(rec(5, 20));
        reverse.insert(rec(0, 10));

        let f: Vec<AddrRange> = forward.iter().map(|r| r.range).collect();
        let r: Vec<AddrRange> = reverse.iter().map(|r| r.range).collect();
        assert_eq!(f, r);
    }

    #[test]
    fn test_same_start_differing_end_splits() {
        let mut set = RangeSet::new();
        set.insert(rec(0, 20));
        set.insert(rec(0, 10));
        let ranges: Vec<AddrRange> = set.iter().map(|r| r.range).collect();
        assert_eq!(
            ranges,
            vec![AddrRange::new(0, 10), AddrRange::new(11, 20)]
        );
    }

    #[test]
    fn test_nested_records_both_kept() {
        // Caller [0,24) with an inlined body [3,24): the drain clamp
        // leaves the caller its leading 3 bytes and the callee the rest.
        let mut set = RangeSet::new();
        set.insert(rec_at(0, 24, 22)); // caller
        set.insert(rec_at(3, 24, 17)); // inlined callee
        assert_eq!(set.len(), 2);

        let (out, stats) = drain_all(&mut set);
        assert_eq!(stats.attributed, 24);
        assert_eq!(stats.gap_bytes, 0);

        let spans: Vec<(u64, u64)> = out
            .iter()
            .filter_map(|r| match r {
                Reconciled::Span { start, size, .. } => Some((*start, *size)),
                Reconciled::Gap { .. } => None,
            })
            .collect();
        assert_eq!(spans, vec![(0, 3), (3, 21)]);
    }

    #[test]
    fn test_tail_record_attributed_in_full() {
        let mut set = RangeSet::new();
        set.insert(rec(0, 8));
        set.insert(rec(16, 32));

        let (out, stats) = drain_all(&mut set);
        assert_eq!(stats.attributed, 8 + 16);
        assert_eq!(stats.gap_bytes, 8);
        assert_eq!(
            out.last(),
            Some(&Reconciled::Span {
                file: Name::from_raw(10),
                func: Name::from_raw(11),
                line: Some(1),
                col: Some(1),
                start: 16,
                size: 16,
            })
        );
    }

    #[test]
    fn test_drain_empties_the_set() {
        let mut set = RangeSet::new();
        set.insert(rec(0, 10));
        let _ = drain_all(&mut set);
        assert!(set.is_empty());
    }
}
