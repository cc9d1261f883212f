//! Definition vs. use-site identities.
//!
//! Node ids are only unique within one provider, and the same definition
//! can be duplicated across binaries, so code is identified by
//! name/file/line/col whenever possible; the id is kept for debugging and
//! for naming unknown code blobs.
//!
//! - [`WhatInfo`]: *what* code is being used — the canonical definition.
//!   The tag is always set; name, file, line and col can be unknown.
//! - [`WhereInfo`]: *where* (and how much of) the code is used. For
//!   inlined code this is the call site, which may differ from the
//!   definition; `size` is always non-zero when a record is produced.

use super::{Name, NodeId, Tag};

/// Canonical definition identity of a piece of code.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct WhatInfo {
    pub tag: Tag,
    pub id: NodeId,
    pub name: Option<Name>,
    pub file: Option<Name>,
    pub line: Option<u32>,
    pub col: Option<u32>,
}

/// Concrete use site of a piece of code.
///
/// Can coincide with the [`WhatInfo`] when definition and use are the
/// same spot; even then the amount of code used at this position is its
/// own fact, carried in `size`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct WhereInfo {
    pub tag: Tag,
    pub id: NodeId,
    pub file: Option<Name>,
    pub line: Option<u32>,
    pub col: Option<u32>,
    pub size: u64,
}

impl WhatInfo {
    /// Whether definition and use describe the same source position.
    ///
    /// Compares tag/file/line/col only; the ids may legitimately differ
    /// (the same spot reached through different nodes).
    pub fn same_position(&self, site: &WhereInfo) -> bool {
        self.tag == site.tag
            && self.file == site.file
            && self.line == site.line
            && self.col == site.col
    }
}
