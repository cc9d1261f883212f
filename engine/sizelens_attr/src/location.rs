//! Node size and What/Where identity computation.
//!
//! For every visited node this answers: how many bytes did it produce,
//! what canonical definition do they belong to, and where were they used?
//! Definition attributes come from the resolved declaration; use-site
//! attributes come from the node itself, falling back to the declaration
//! field by field when the call site is incomplete.

use sizelens_ir::{
    AttrConfig, CodeNode, DebugInfoProvider, SourcePos, StringPool, WhatInfo, WhereInfo,
};

use crate::origin;

/// One node's attributed size plus its dual identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Attribution {
    /// Bytes covered by the node, descendants included.
    pub size: u64,
    /// Canonical definition the bytes belong to.
    pub what: WhatInfo,
    /// Concrete site the bytes are used at.
    pub site: WhereInfo,
}

/// Compute a node's size and locations, or `None` if it contributes no
/// bytes (its children may still).
///
/// Size is the sum of the node's range lengths; a node with only a bare
/// start address is charged `config.single_address_size` (0 disables
/// such nodes entirely).
pub fn size_and_locations<P: DebugInfoProvider>(
    config: &AttrConfig,
    pool: &StringPool,
    provider: &P,
    node: &CodeNode,
) -> Option<Attribution> {
    let mut size = node.ranges_len();
    if size == 0 && node.has_bare_address() {
        size = config.single_address_size;
    }
    if size == 0 {
        return None;
    }

    let decl = origin::resolve_declaration(provider, node);

    let decl_pos = resolve_pos(pool, provider, decl.decl);
    let mut what = WhatInfo {
        tag: decl.tag,
        id: decl.id,
        name: decl.name.as_deref().map(|n| pool.intern(n)),
        file: decl_pos.0,
        line: decl_pos.1,
        col: decl_pos.2,
    };

    let site = if decl.id == node.id {
        // Definition site == use site.
        WhereInfo {
            tag: what.tag,
            id: what.id,
            file: what.file,
            line: what.line,
            col: what.col,
            size,
        }
    } else {
        let (file, line, col) = resolve_pos(pool, provider, node.call_site.or(decl.decl));
        WhereInfo {
            tag: node.tag,
            id: node.id,
            file,
            line,
            col,
            size,
        }
    };

    // Same spot reached through different nodes still names one identity.
    if what.same_position(&site) {
        what.id = site.id;
    }

    tracing::debug!(
        node = %node.id,
        tag = %node.tag,
        size,
        "attributed node"
    );

    Some(Attribution { size, what, site })
}

type ResolvedPos = (Option<sizelens_ir::Name>, Option<u32>, Option<u32>);

fn resolve_pos<P: DebugInfoProvider>(
    pool: &StringPool,
    provider: &P,
    pos: SourcePos,
) -> ResolvedPos {
    let file = pos
        .file
        .and_then(|f| provider.file_path(f))
        .map(|p| pool.intern(p));
    (file, pos.line, pos.col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sizelens_ir::{AddrRange, FileId, NodeId, Tag};
    use smallvec::smallvec;

    struct FixtureProvider {
        nodes: Vec<CodeNode>,
        files: Vec<&'static str>,
    }

    impl DebugInfoProvider for FixtureProvider {
        fn lookup(&self, id: NodeId) -> Option<&CodeNode> {
            self.nodes.iter().find(|n| n.id == id)
        }

        fn file_path(&self, file: FileId) -> Option<&str> {
            usize::try_from(file.0)
                .ok()
                .and_then(|i| self.files.get(i))
                .copied()
        }
    }

    fn empty_provider() -> FixtureProvider {
        FixtureProvider {
            nodes: vec![],
            files: vec!["qa/small.c"],
        }
    }

    #[test]
    fn test_zero_size_node_is_none() {
        let pool = StringPool::new();
        let provider = empty_provider();
        let node = CodeNode::new(Tag::Subprogram, NodeId(1));
        let attr = size_and_locations(&AttrConfig::default(), &pool, &provider, &node);
        assert_eq!(attr, None);
    }

    #[test]
    fn test_bare_address_uses_configured_size() {
        let pool = StringPool::new();
        let provider = empty_provider();
        let mut node = CodeNode::new(Tag::Subprogram, NodeId(1));
        node.entry_pc = Some(0x400000);

        let Some(attr) = size_and_locations(&AttrConfig::default(), &pool, &provider, &node)
        else {
            panic!("expected an attribution for a bare-address node");
        };
        assert_eq!(attr.size, 1);

        // 0 disables bare-address attribution entirely.
        let disabled = AttrConfig {
            single_address_size: 0,
            ..AttrConfig::default()
        };
        assert_eq!(size_and_locations(&disabled, &pool, &provider, &node), None);
    }

    #[test]
    fn test_own_declaration_means_what_equals_where() {
        let pool = StringPool::new();
        let provider = empty_provider();
        let mut node = CodeNode::new(Tag::Subprogram, NodeId(0x2e));
        node.name = Some("main".to_owned());
        node.decl = SourcePos {
            file: Some(FileId(0)),
            line: Some(22),
            col: Some(5),
        };
        node.ranges = smallvec![AddrRange::new(0x18, 0x30)];

        let Some(attr) = size_and_locations(&AttrConfig::default(), &pool, &provider, &node)
        else {
            panic!("expected an attribution");
        };
        assert_eq!(attr.size, 0x18);
        assert_eq!(attr.what.tag, Tag::Subprogram);
        assert_eq!(attr.what.id, attr.site.id);
        assert_eq!(attr.what.file, attr.site.file);
        assert_eq!(&*pool.lookup(attr.what.file.unwrap_or_default()), "qa/small.c");
        assert_eq!(attr.what.line, Some(22));
        assert_eq!(attr.site.size, 0x18);
    }

    #[test]
    fn test_inlined_use_site_with_fallback() {
        let pool = StringPool::new();
        let mut decl = CodeNode::new(Tag::Subprogram, NodeId(0x100));
        decl.name = Some("increment".to_owned());
        decl.decl = SourcePos {
            file: Some(FileId(0)),
            line: Some(17),
            col: Some(1),
        };
        let provider = FixtureProvider {
            nodes: vec![decl],
            files: vec!["qa/small-inline.c"],
        };

        let mut inlined = CodeNode::new(Tag::InlinedSubroutine, NodeId(0x200));
        inlined.origin = Some(NodeId(0x100));
        inlined.ranges = smallvec![AddrRange::new(3, 24)];
        // Call site knows the line but not the column.
        inlined.call_site = SourcePos {
            file: Some(FileId(0)),
            line: Some(24),
            col: None,
        };

        let Some(attr) = size_and_locations(&AttrConfig::default(), &pool, &provider, &inlined)
        else {
            panic!("expected an attribution");
        };
        // What: the declaration.
        assert_eq!(attr.what.tag, Tag::Subprogram);
        assert_eq!(attr.what.id, NodeId(0x100));
        assert_eq!(attr.what.line, Some(17));
        // Where: the call site, with the missing column filled in from
        // the declaration.
        assert_eq!(attr.site.tag, Tag::InlinedSubroutine);
        assert_eq!(attr.site.id, NodeId(0x200));
        assert_eq!(attr.site.line, Some(24));
        assert_eq!(attr.site.col, Some(1));
        assert_eq!(attr.site.size, 21);
    }

    #[test]
    fn test_identical_positions_unify_identity() {
        // Out-of-line definition pointing at a declaration with the same
        // tag and source position: the two records must share one id.
        let pool = StringPool::new();
        let pos = SourcePos {
            file: Some(FileId(0)),
            line: Some(9),
            col: Some(2),
        };
        let mut decl = CodeNode::new(Tag::Subprogram, NodeId(0x10));
        decl.name = Some("decrement".to_owned());
        decl.decl = pos;
        let provider = FixtureProvider {
            nodes: vec![decl],
            files: vec!["qa/small-lex.c"],
        };

        let mut def = CodeNode::new(Tag::Subprogram, NodeId(0x20));
        def.origin = Some(NodeId(0x10));
        def.ranges = smallvec![AddrRange::new(0, 0x30)];
        def.call_site = pos;

        let Some(attr) = size_and_locations(&AttrConfig::default(), &pool, &provider, &def)
        else {
            panic!("expected an attribution");
        };
        assert!(attr.what.same_position(&attr.site));
        assert_eq!(attr.what.id, NodeId(0x20));
        assert_eq!(attr.site.id, NodeId(0x20));
    }
}
