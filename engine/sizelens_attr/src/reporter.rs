//! Event seam to the presentation layer.
//!
//! The walker emits one `begin`/`end` pair per reported node, in
//! debug-info order. Flat listings, calltree profiles and XML writers all
//! consume this stream; none of them live in this workspace.

use sizelens_ir::{WhatInfo, WhereInfo};

/// Consumer of the walker's ordered event stream.
pub trait Reporter {
    /// A reported node is entered. Descendant events follow before the
    /// matching `end_node`.
    fn begin_node(&mut self, what: &WhatInfo, site: &WhereInfo);

    /// A reported node is left. `children_size` is the bytes already
    /// attributed to its reported descendants; the node's self size is
    /// `site.size - children_size`.
    fn end_node(&mut self, what: &WhatInfo, site: &WhereInfo, children_size: u64);
}

/// Reporter that discards every event.
///
/// For runs that only want the aggregation tree.
#[derive(Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn begin_node(&mut self, _what: &WhatInfo, _site: &WhereInfo) {}

    fn end_node(&mut self, _what: &WhatInfo, _site: &WhereInfo, _children_size: u64) {}
}
