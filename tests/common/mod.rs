//! Shared helpers for the integration tests.

#![allow(dead_code)]

use blocktree::{BPlusTree, BlockId, Entry, Node};
use tempfile::TempDir;

pub fn create_tree(block_size: u32) -> (BPlusTree, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.idx");
    (BPlusTree::create(&path, block_size).unwrap(), dir)
}

/// Walk the whole tree and panic on any structural violation.
///
/// Checks per block: pair count within capacity, keys strictly ascending,
/// keys inside the bounds set by the parent. Checks globally: every leaf
/// sits exactly `depth` hops below the root, and the next-leaf chain from
/// the leftmost leaf visits the leaves in the same order as an in-order
/// walk, ending at pointer 0.
///
/// Returns every entry in leaf-chain order.
pub fn validate_invariants(tree: &BPlusTree) -> Vec<Entry> {
    if !tree.root().is_valid() {
        assert_eq!(tree.node_count(), 0, "empty tree should have no blocks");
        return Vec::new();
    }

    let mut leaves = Vec::new();
    validate_node(tree, tree.root(), 0, None, None, &mut leaves);

    let mut entries = Vec::new();
    let mut chain = Vec::new();
    let mut cur = leaves[0];
    while cur.is_valid() {
        assert!(
            chain.len() < leaves.len(),
            "leaf chain is longer than the tree (cycle?)"
        );
        chain.push(cur);
        match tree.read_node(cur, tree.depth()).unwrap() {
            Node::Leaf(leaf) => {
                entries.extend(leaf.entries.iter().copied());
                cur = leaf.next;
            }
            Node::Internal(_) => unreachable!(),
        }
    }
    assert_eq!(chain, leaves, "leaf chain disagrees with tree order");

    for pair in entries.windows(2) {
        assert!(
            pair[0].key < pair[1].key,
            "leaf chain not ascending: {} then {}",
            pair[0].key,
            pair[1].key
        );
    }
    entries
}

fn validate_node(
    tree: &BPlusTree,
    id: BlockId,
    level: u32,
    lower: Option<u32>,
    upper: Option<u32>,
    leaves: &mut Vec<BlockId>,
) {
    let in_bounds = |key: u32| lower.map_or(true, |l| key >= l) && upper.map_or(true, |u| key < u);
    let node = tree.read_node(id, level).unwrap();
    assert!(
        node.len() <= tree.capacity(),
        "{id} holds {} pairs, capacity {}",
        node.len(),
        tree.capacity()
    );

    match node {
        Node::Leaf(leaf) => {
            assert_eq!(level, tree.depth(), "leaf {id} at wrong depth");
            for pair in leaf.entries.windows(2) {
                assert!(pair[0].key < pair[1].key, "{id} keys not ascending");
            }
            for e in &leaf.entries {
                assert!(in_bounds(e.key), "{id} key {} outside its subtree", e.key);
            }
            leaves.push(id);
        }
        Node::Internal(internal) => {
            assert!(level < tree.depth(), "internal {id} below leaf level");
            for pair in internal.separators.windows(2) {
                assert!(pair[0].key < pair[1].key, "{id} separators not ascending");
            }
            for s in &internal.separators {
                assert!(in_bounds(s.key), "{id} separator {} outside its subtree", s.key);
            }

            let first_upper = internal.separators.first().map(|s| s.key).or(upper);
            validate_node(tree, internal.first_child, level + 1, lower, first_upper, leaves);
            for (i, s) in internal.separators.iter().enumerate() {
                let next_upper = internal
                    .separators
                    .get(i + 1)
                    .map(|n| n.key)
                    .or(upper);
                validate_node(tree, s.child, level + 1, Some(s.key), next_upper, leaves);
            }
        }
    }
}

/// Deterministic permutation of `1..=n`.
///
/// 7919 is prime, so the stride visits every residue unless `n` is a
/// multiple of it.
pub fn scrambled_keys(n: u32) -> Vec<u32> {
    assert!(n % 7919 != 0, "stride must be coprime with n");
    (0..n as u64)
        .map(|i| (i * 7919 % n as u64) as u32 + 1)
        .collect()
}
