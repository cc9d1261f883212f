//! Debug-info node model.
//!
//! A [`CodeNode`] is one scope of compiled code as described by the debug
//! information: a compile unit, a function, an inlined call, a lexical
//! block. The provider builds these per walk; the engine never keeps them
//! past one unit.

use smallvec::SmallVec;
use std::fmt;

use super::AddrRange;

/// Provider-scoped node identity (the DIE-offset analog).
///
/// Only unique within one provider. Used for origin references, cycle
/// detection, and as the debugging identity of What/Where records.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct NodeId(pub u64);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:#x})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}]", self.0)
    }
}

/// Provider-scoped source-file index.
///
/// The provider owns the per-compile-unit file table and may encode the
/// unit in the id however it likes; the engine only passes it back.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct FileId(pub u64);

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

/// Node kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Tag {
    CompileUnit,
    Subprogram,
    InlinedSubroutine,
    LexicalBlock,
    Namespace,
    TryBlock,
    /// Anything else that still carries a code size; the raw tag value is
    /// kept so diagnostics can name it.
    Other(u16),
}

impl Default for Tag {
    fn default() -> Self {
        Tag::Other(0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::CompileUnit => write!(f, "compile_unit"),
            Tag::Subprogram => write!(f, "subprogram"),
            Tag::InlinedSubroutine => write!(f, "inlined_subroutine"),
            Tag::LexicalBlock => write!(f, "lexical_block"),
            Tag::Namespace => write!(f, "namespace"),
            Tag::TryBlock => write!(f, "try_block"),
            Tag::Other(raw) => write!(f, "unknown_{raw:x}"),
        }
    }
}

/// File/line/column position, any part of which the debug info may omit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SourcePos {
    pub file: Option<FileId>,
    pub line: Option<u32>,
    pub col: Option<u32>,
}

impl SourcePos {
    /// Position with every field unknown.
    pub const UNKNOWN: SourcePos = SourcePos {
        file: None,
        line: None,
        col: None,
    };

    /// Fill unknown fields from another position, field by field.
    #[must_use]
    pub fn or(self, fallback: SourcePos) -> SourcePos {
        SourcePos {
            file: self.file.or(fallback.file),
            line: self.line.or(fallback.line),
            col: self.col.or(fallback.col),
        }
    }
}

/// One debug-info scope, as supplied by the provider.
///
/// `ranges` holds the node's disjoint code ranges; a node with no ranges
/// may still carry a bare `entry_pc` (a single known address with no
/// length). `origin` points at the canonical declaration for inlined
/// instances and out-of-line definitions. `call_site` is only meaningful
/// for inlined-use nodes.
#[derive(Clone, Debug, Default)]
pub struct CodeNode {
    pub tag: Tag,
    pub id: NodeId,
    pub name: Option<String>,
    pub decl: SourcePos,
    pub ranges: SmallVec<[AddrRange; 2]>,
    pub entry_pc: Option<u64>,
    pub origin: Option<NodeId>,
    pub call_site: SourcePos,
    pub children: Vec<CodeNode>,
}

impl CodeNode {
    /// A bare node with the given kind and identity.
    pub fn new(tag: Tag, id: NodeId) -> Self {
        CodeNode {
            tag,
            id,
            ..CodeNode::default()
        }
    }

    /// Total bytes covered by the node's ranges.
    ///
    /// Malformed ranges count as zero; a bare `entry_pc` contributes
    /// nothing here (its size is a policy decision, not data).
    pub fn ranges_len(&self) -> u64 {
        self.ranges.iter().map(AddrRange::len).sum()
    }

    /// Whether the node has no ranges but does have a bare start address.
    pub fn has_bare_address(&self) -> bool {
        self.ranges.is_empty() && self.entry_pc.is_some()
    }
}
