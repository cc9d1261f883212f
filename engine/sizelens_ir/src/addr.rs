//! Machine address ranges.
//!
//! Half-open `[start, end)` ranges over the binary's address space.
//! Debug info is not trusted: a range with `end < start` simply measures
//! zero bytes instead of being an error.

use std::fmt;

/// Half-open machine address range `[start, end)`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct AddrRange {
    pub start: u64,
    pub end: u64,
}

impl AddrRange {
    /// Create a new range.
    #[inline]
    pub const fn new(start: u64, end: u64) -> Self {
        AddrRange { start, end }
    }

    /// Length in bytes. Malformed ranges (`end < start`) measure zero.
    #[inline]
    pub const fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers no bytes (empty or malformed).
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether another range is fully contained within this one.
    #[inline]
    pub fn contains_range(&self, other: AddrRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two ranges share at least one address.
    #[inline]
    pub fn overlaps(&self, other: AddrRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Debug for AddrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}..{:#x}", self.start, self.end)
    }
}

impl fmt::Display for AddrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}..{:#x}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_range_basic() {
        let r = AddrRange::new(0x10, 0x20);
        assert_eq!(r.len(), 0x10);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_malformed_range_is_zero_bytes() {
        let r = AddrRange::new(0x20, 0x10);
        assert_eq!(r.len(), 0);
        assert!(r.is_empty());
    }

    #[test]
    fn test_contains_range() {
        let outer = AddrRange::new(0, 24);
        let inner = AddrRange::new(3, 24);
        assert!(outer.contains_range(inner));
        assert!(!inner.contains_range(outer));
        assert!(outer.contains_range(outer));
    }

    #[test]
    fn test_overlaps() {
        let a = AddrRange::new(0, 10);
        let b = AddrRange::new(5, 20);
        let c = AddrRange::new(10, 20);
        assert!(a.overlaps(b));
        assert!(b.overlaps(a));
        assert!(!a.overlaps(c)); // half-open: they touch, no shared byte
    }

    #[test]
    fn test_debug_format_hex() {
        let r = AddrRange::new(0x400000, 0x400018);
        assert_eq!(format!("{r:?}"), "0x400000..0x400018");
    }
}
