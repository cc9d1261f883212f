//! Seam to the debug-info extraction layer.
//!
//! The engine never reads a binary itself. Whatever does (libdw, gimli, a
//! test fixture) implements [`DebugInfoProvider`], and the engine only
//! asks it two questions: resolve a node reference, resolve a file index.

use super::{CodeNode, FileId, NodeId};

/// What the attribution engine needs from the debug-info layer.
pub trait DebugInfoProvider {
    /// Resolve a node reference (an abstract-origin or specification
    /// target). `None` for a dangling reference; the engine treats that
    /// as non-fatal.
    fn lookup(&self, id: NodeId) -> Option<&CodeNode>;

    /// Resolve a source-file index to a path. The provider owns the
    /// per-compile-unit file tables and the scoping of [`FileId`].
    fn file_path(&self, file: FileId) -> Option<&str>;
}
