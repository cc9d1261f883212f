//! Hierarchical size accumulator.
//!
//! Reconciled sizes are folded into a tree keyed by path segments -
//! source directories, then file, then function. The tree persists for
//! the whole run; one synthetic root holds the grand total.
//!
//! Nodes live in an index-addressed arena: children are owned by their
//! parent as a list of ids, the parent back-reference is a plain id, and
//! nothing is ever removed.

use sizelens_ir::{Name, StringPool};

/// Arena handle of an aggregation node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct AggNodeId(u32);

impl AggNodeId {
    /// The synthetic root, present in every tree.
    pub const ROOT: AggNodeId = AggNodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One aggregation node.
#[derive(Debug)]
pub struct AggNode {
    pub name: Name,
    /// `None` only for the root.
    pub parent: Option<AggNodeId>,
    children: Vec<AggNodeId>,
    /// Bytes accumulated here and in every descendant.
    pub accumulated_size: u64,
    /// Times this node was the direct target of an accumulate call.
    pub use_count: u64,
}

/// One row of a depth-limited dump.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DumpRow {
    /// 0 for direct children of the root.
    pub depth: usize,
    pub name: Name,
    pub size: u64,
    pub use_count: u64,
}

/// Path-keyed hierarchical size accumulator.
pub struct AggregationTree {
    nodes: Vec<AggNode>,
}

impl AggregationTree {
    pub fn new() -> Self {
        AggregationTree {
            nodes: vec![AggNode {
                name: Name::EMPTY,
                parent: None,
                children: Vec::new(),
                accumulated_size: 0,
                use_count: 0,
            }],
        }
    }

    pub fn node(&self, id: AggNodeId) -> &AggNode {
        &self.nodes[id.index()]
    }

    /// Total bytes accumulated over the whole run.
    pub fn total_size(&self) -> u64 {
        self.node(AggNodeId::ROOT).accumulated_size
    }

    /// Walk path segments from the root, creating children on first use.
    ///
    /// Filesystem-style normalization: empty segments and `.` are
    /// no-ops, `..` moves to the parent (the root is its own parent).
    /// Sibling names are unique, so interning the same path twice
    /// returns the same node.
    pub fn intern<I>(&mut self, segments: I) -> AggNodeId
    where
        I: IntoIterator<Item = Name>,
    {
        let mut current = AggNodeId::ROOT;
        for segment in segments {
            current = self.step(current, segment);
        }
        current
    }

    /// Intern a slash-delimited source path plus a leaf segment.
    ///
    /// Only the directory part of the path contributes levels; the
    /// basename names a file, not a scope sizes roll up under, so
    /// `qa/small.c` + `main` lands at `qa/main`.
    pub fn intern_path(&mut self, pool: &StringPool, path: &str, leaf: Name) -> AggNodeId {
        let mut current = AggNodeId::ROOT;
        if let Some((dirs, _basename)) = path.rsplit_once('/') {
            for part in dirs.split('/') {
                // Splitting is cheap; interning dedupes the segments.
                current = self.step(current, pool.intern(part));
            }
        }
        self.step(current, leaf)
    }

    fn step(&mut self, at: AggNodeId, segment: Name) -> AggNodeId {
        // "." and empty segments (leading or doubled slashes) stay put;
        // ".." climbs, with the root as its own parent.
        if segment == Name::EMPTY || segment == Name::DOT {
            return at;
        }
        if segment == Name::DOTDOT {
            return self.node(at).parent.unwrap_or(AggNodeId::ROOT);
        }
        if let Some(&child) = self
            .node(at)
            .children
            .iter()
            .find(|&&c| self.node(c).name == segment)
        {
            return child;
        }
        let id = AggNodeId(
            u32::try_from(self.nodes.len())
                .unwrap_or_else(|_| panic!("aggregation tree exceeded u32::MAX nodes")),
        );
        self.nodes.push(AggNode {
            name: segment,
            parent: Some(at),
            children: Vec::new(),
            accumulated_size: 0,
            use_count: 0,
        });
        self.nodes[at.index()].children.push(id);
        id
    }

    /// Add `size` to a node and every ancestor up to the root.
    ///
    /// Only the target's use count increments; the root's accumulated
    /// size therefore always equals the sum of all accumulate calls.
    pub fn accumulate(&mut self, id: AggNodeId, size: u64) {
        self.nodes[id.index()].use_count += 1;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &mut self.nodes[node_id.index()];
            node.accumulated_size += size;
            current = node.parent;
        }
    }

    /// One-time stable sort of every sibling list by descending
    /// accumulated size; ties keep insertion order.
    pub fn sort_by_size(&mut self) {
        for i in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[i].children);
            children.sort_by_key(|&c| std::cmp::Reverse(self.node(c).accumulated_size));
            self.nodes[i].children = children;
        }
    }

    /// Pre-order dump of the first `depth` levels below the root.
    ///
    /// `depth` of 1 lists only the root's direct children; nodes below
    /// the requested depth are never visited.
    pub fn dump_at_depth<F>(&self, depth: usize, row: &mut F)
    where
        F: FnMut(DumpRow),
    {
        self.dump_children(AggNodeId::ROOT, 0, depth, row);
    }

    fn dump_children<F>(&self, at: AggNodeId, level: usize, depth: usize, row: &mut F)
    where
        F: FnMut(DumpRow),
    {
        if level >= depth {
            return;
        }
        for &child in &self.node(at).children {
            let node = self.node(child);
            row(DumpRow {
                depth: level,
                name: node.name,
                size: node.accumulated_size,
                use_count: node.use_count,
            });
            self.dump_children(child, level + 1, depth, row);
        }
    }
}

impl Default for AggregationTree {
    fn default() -> Self {
        Self::new()
    }
}
