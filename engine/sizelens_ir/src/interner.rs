//! Content-deduplicated string pool.
//!
//! One pool per attribution run holds every file path and function name
//! touched by that run. Strings are reference-counted (`Arc<str>`) rather
//! than leaked, so dropping the run's context reclaims the whole table.

// Arc is needed here for SharedPool - one pool handle is cloned into every
// pass of a run (walker, reconciliation, aggregation dump).
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use super::Name;

/// Names baked into every pool; see the `Name` constants.
const PRE_INTERNED: usize = 5;

struct PoolInner {
    /// Map from string content to pool index.
    map: FxHashMap<Arc<str>, u32>,
    /// Storage, indexed by `Name::index()`.
    strings: Vec<Arc<str>>,
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Pool exceeded capacity (over 4 billion strings).
    PoolOverflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::PoolOverflow { count } => write!(
                f,
                "string pool exceeded capacity: {} strings, max is {}",
                count,
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Content-deduplicated string pool.
///
/// Interning the same content twice returns the same [`Name`], which is
/// what lets address records and aggregation nodes compare keys as plain
/// integers. The pool is written during a single-threaded pass; the
/// `RwLock` exists so shared handles can intern through `&self`.
pub struct StringPool {
    inner: RwLock<PoolInner>,
}

impl StringPool {
    /// Create a pool with the well-known names pre-interned.
    pub fn new() -> Self {
        let mut inner = PoolInner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        };
        // Order matters: indices must line up with the Name constants.
        for (name, s) in [
            (Name::EMPTY, ""),
            (Name::UNKNOWN, "<unknown>"),
            (Name::GAPS, "gaps"),
            (Name::DOT, "."),
            (Name::DOTDOT, ".."),
        ] {
            let arc: Arc<str> = Arc::from(s);
            debug_assert_eq!(inner.strings.len(), name.index());
            inner.map.insert(Arc::clone(&arc), name.raw());
            inner.strings.push(arc);
        }
        StringPool {
            inner: RwLock::new(inner),
        }
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        // Fast path: already interned.
        {
            let guard = self.inner.read();
            if let Some(&idx) = guard.map.get(s) {
                return Ok(Name::from_raw(idx));
            }
        }

        let mut guard = self.inner.write();

        // Double-check after acquiring the write lock.
        if let Some(&idx) = guard.map.get(s) {
            return Ok(Name::from_raw(idx));
        }

        let idx = u32::try_from(guard.strings.len()).map_err(|_| InternError::PoolOverflow {
            count: guard.strings.len(),
        })?;
        let arc: Arc<str> = Arc::from(s);
        guard.map.insert(Arc::clone(&arc), idx);
        guard.strings.push(arc);
        Ok(Name::from_raw(idx))
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if the pool exceeds `u32::MAX` strings. Use `try_intern`
    /// for fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Intern an optional string, mapping `None` to [`Name::UNKNOWN`].
    #[inline]
    pub fn intern_or_unknown(&self, s: Option<&str>) -> Name {
        match s {
            Some(s) => self.intern(s),
            None => Name::UNKNOWN,
        }
    }

    /// Look up the string for a Name.
    ///
    /// Returns a cheap clone of the ref-counted content.
    pub fn lookup(&self, name: Name) -> Arc<str> {
        let guard = self.inner.read();
        Arc::clone(&guard.strings[name.index()])
    }

    /// Number of interned strings (including the pre-interned ones).
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Whether only the pre-interned names are present.
    pub fn is_empty(&self) -> bool {
        self.len() <= PRE_INTERNED
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared pool handle for one attribution run.
///
/// This newtype enforces that pool sharing goes through one type rather
/// than ad-hoc `Arc<StringPool>` values. Cloning is cheap; all clones
/// intern into the same table.
#[derive(Clone)]
pub struct SharedPool(Arc<StringPool>);

impl SharedPool {
    /// Create a fresh pool for a run.
    pub fn new() -> Self {
        SharedPool(Arc::new(StringPool::new()))
    }
}

impl Default for SharedPool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedPool {
    type Target = StringPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
