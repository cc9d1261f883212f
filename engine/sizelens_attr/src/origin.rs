//! Declaration-chain resolution.
//!
//! Inlined instances and out-of-line definitions point at their canonical
//! declaration through abstract-origin/specification references, and
//! those can chain (instance -> abstract root -> declaration). The chain
//! is followed to its end; a dangling or cyclic chain stops at the last
//! node that did resolve, which is always safe to attribute against.

use rustc_hash::FxHashSet;
use sizelens_ir::{CodeNode, DebugInfoProvider};

/// Resolve a node to its canonical declaring node.
///
/// Follows `origin` references until a node without one is reached.
/// Never fails and always terminates: an unresolvable reference or a
/// revisited node ends the chain at the last valid node, with a warning.
pub fn resolve_declaration<'p, P: DebugInfoProvider>(
    provider: &'p P,
    node: &'p CodeNode,
) -> &'p CodeNode {
    let mut current = node;
    let mut visited = FxHashSet::default();
    visited.insert(current.id);

    while let Some(target) = current.origin {
        if !visited.insert(target) {
            tracing::warn!(
                node = %node.id,
                target = %target,
                "cyclic declaration chain, stopping at last resolved node"
            );
            break;
        }
        match provider.lookup(target) {
            Some(next) => current = next,
            None => {
                tracing::warn!(
                    node = %node.id,
                    target = %target,
                    "dangling declaration reference"
                );
                break;
            }
        }
    }
    current
}
