//! Insertion: leaf mutation, split propagation, and root growth.
//!
//! Write ordering for every split: new blocks are appended fully written
//! first, then the existing block is rewritten to point at them, and the
//! header is flushed last by [`insert`].

use tracing::debug;

use crate::common::{BlockId, Result};
use crate::storage::block::{Entry, InternalNode, LeafNode, Node, Separator};
use crate::storage::BlockStore;

use super::path::resolve;

/// Insert one entry and flush the header.
pub(crate) fn insert(store: &mut BlockStore, entry: Entry) -> Result<()> {
    debug_assert!(entry.key != 0, "key 0 is reserved as the empty-slot sentinel");

    match store.node_count() {
        0 => insert_first_leaf(store, entry)?,
        // A single block is a root leaf with no parent; `insert_leaf`
        // builds the first internal root itself when it splits.
        _ => {
            let path = resolve(store, entry.key)?;
            let mut promoted = insert_leaf(store, entry, path.dest)?;

            for node_id in path.ancestors() {
                let Some(sep) = promoted else { break };
                promoted = insert_internal(store, sep, node_id)?;
            }
        }
    }

    store.flush_header()
}

/// Create block 1 as a leaf holding only `entry`.
fn insert_first_leaf(store: &mut BlockStore, entry: Entry) -> Result<()> {
    let leaf = LeafNode::new(vec![entry], BlockId::NONE);
    let id = store.append_node(&Node::Leaf(leaf))?;
    store.set_root(id, 0);
    debug!(root = id.0, "created first leaf");
    Ok(())
}

/// Insert `entry` into the leaf `leaf_id`, splitting it on overflow.
///
/// Returns the separator to insert into the parent when the leaf split:
/// the first key of the new right leaf and that leaf's id. A split of a
/// root leaf grows a new root instead and returns `None`.
pub(crate) fn insert_leaf(
    store: &mut BlockStore,
    entry: Entry,
    leaf_id: BlockId,
) -> Result<Option<Separator>> {
    let capacity = store.capacity();
    let is_root = leaf_id == store.header().root_id;
    let mut leaf = store.read_leaf(leaf_id)?;
    leaf.insert(entry);

    if leaf.entries.len() <= capacity {
        store.write_node(leaf_id, &Node::Leaf(leaf))?;
        return Ok(None);
    }

    let right = leaf.split(capacity);
    let sep_key = right.entries[0].key;
    let right_id = store.append_node(&Node::Leaf(right))?;
    let promoted = Separator::new(sep_key, right_id);

    debug!(
        leaf = leaf_id.0,
        right = right_id.0,
        separator = sep_key,
        is_root,
        "split leaf"
    );

    let new_root = if is_root {
        Some(grow_root(store, leaf_id, promoted)?)
    } else {
        None
    };

    leaf.next = right_id;
    store.write_node(leaf_id, &Node::Leaf(leaf))?;

    match new_root {
        Some(root_id) => {
            promote_root(store, root_id);
            Ok(None)
        }
        None => Ok(Some(promoted)),
    }
}

/// Insert a separator into the internal node `node_id`, splitting on overflow.
///
/// A split of the root allocates a new root above it and ends propagation.
/// Any other split returns the promoted separator for the next ancestor.
pub(crate) fn insert_internal(
    store: &mut BlockStore,
    sep: Separator,
    node_id: BlockId,
) -> Result<Option<Separator>> {
    let capacity = store.capacity();
    let is_root = node_id == store.header().root_id;
    let mut node = store.read_internal(node_id)?;
    node.insert(sep);

    if node.separators.len() <= capacity {
        store.write_node(node_id, &Node::Internal(node))?;
        return Ok(None);
    }

    let (promoted_key, right) = node.split(capacity);
    let right_id = store.append_node(&Node::Internal(right))?;
    let promoted = Separator::new(promoted_key, right_id);

    debug!(
        node = node_id.0,
        right = right_id.0,
        separator = promoted_key,
        is_root,
        "split internal node"
    );

    if is_root {
        let root_id = grow_root(store, node_id, promoted)?;
        store.write_node(node_id, &Node::Internal(node))?;
        promote_root(store, root_id);
        return Ok(None);
    }

    store.write_node(node_id, &Node::Internal(node))?;
    Ok(Some(promoted))
}

/// Append a new root over `old_root` and `sep.child` and return its id.
///
/// The header is left alone; the caller rewrites `old_root` first and then
/// calls [`promote_root`].
fn grow_root(store: &mut BlockStore, old_root: BlockId, sep: Separator) -> Result<BlockId> {
    let root = InternalNode::new(old_root, vec![sep]);
    store.append_node(&Node::Internal(root))
}

/// Point the header at `root_id`, one level deeper than before.
fn promote_root(store: &mut BlockStore, root_id: BlockId) {
    let depth = store.header().depth + 1;
    store.set_root(root_id, depth);
    debug!(root = root_id.0, depth, "promoted new root");
}
