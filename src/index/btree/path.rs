//! Path resolution from the root to the leaf owning a key.

use tracing::trace;

use crate::common::{BlockId, Result};
use crate::storage::BlockStore;

/// Root-to-leaf route for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePath {
    /// Leaf that owns (or would own) the key.
    pub dest: BlockId,
    /// Every block visited, root first, `dest` last.
    pub chain: Vec<BlockId>,
}

impl TreePath {
    /// Ancestors of the destination leaf, nearest parent first.
    pub fn ancestors(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.chain.iter().rev().skip(1).copied()
    }
}

/// Walk from the root down `depth` internal levels to the leaf owning `key`.
///
/// Nothing is cached: every call re-reads the internal nodes on its route.
/// The caller must ensure the tree is non-empty.
pub(crate) fn resolve(store: &mut BlockStore, key: u32) -> Result<TreePath> {
    let depth = store.header().depth;
    let mut cur = store.header().root_id;
    let mut chain = Vec::with_capacity(depth as usize + 1);

    let mut level = 0;
    loop {
        chain.push(cur);
        if level == depth {
            break;
        }
        let node = store.read_internal(cur)?;
        cur = node.child_for(key);
        level += 1;
    }

    trace!(key, leaf = cur.0, hops = depth, "resolved path");
    Ok(TreePath { dest: cur, chain })
}
