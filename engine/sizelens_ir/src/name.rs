//! Interned string identifier.
//!
//! Compact 32-bit handle into the run's [`StringPool`](crate::StringPool).
//! Equality and hashing compare the index only, so two `Name`s from the
//! same pool are equal exactly when their contents are.

use std::fmt;

/// Interned string identifier.
///
/// A plain index into the pool's storage. Only meaningful together with
/// the pool that produced it; comparing names from different pools is a
/// caller bug the type cannot catch.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Pre-interned `"<unknown>"`, used wherever the debug info is silent.
    pub const UNKNOWN: Name = Name(1);

    /// Pre-interned `"gaps"`, the reserved bucket for unattributed bytes.
    pub const GAPS: Name = Name(2);

    /// Pre-interned `"."`, a no-op path segment.
    pub const DOT: Name = Name(3);

    /// Pre-interned `".."`, the parent path segment.
    pub const DOTDOT: Name = Name(4);

    /// Create from a raw pool index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Get the raw pool index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into the pool's storage vector.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_name_roundtrip() {
        let name = Name::from_raw(1000);
        assert_eq!(name.raw(), 1000);
        assert_eq!(name.index(), 1000);
    }

    #[test]
    fn test_name_constants_distinct() {
        assert_ne!(Name::EMPTY, Name::UNKNOWN);
        assert_ne!(Name::UNKNOWN, Name::GAPS);
        assert_ne!(Name::EMPTY, Name::GAPS);
    }

    #[test]
    fn test_name_default_is_empty() {
        assert_eq!(Name::default(), Name::EMPTY);
    }

    #[test]
    fn test_name_ordering_follows_index() {
        assert!(Name::from_raw(1) < Name::from_raw(2));
    }
}
