//! Node codec: typed views over a [`Block`].
//!
//! Blocks carry no type tag on disk. Whether a block is a leaf or an
//! internal node is decided by the caller from its depth in the tree, and
//! the decoded result is an explicit [`Node`] so the two layouts cannot be
//! confused after that point.
//!
//! # Layouts (B = capacity, fields are 4 bytes)
//! ```text
//! Leaf:      [k1][v1][k2][v2] ... [kB][vB][next]
//! Internal:  [p0][k1][p1][k2][p2] ... [kB][pB]
//! ```
//! Unused pairs are zero-filled; a zero key marks the end of the valid
//! pairs. Any slack bytes past the last field are left zero.

use crate::common::config::capacity_for;
use crate::common::BlockId;

use super::block::Block;

/// Index at which an overflowing node of `capacity` pairs is split.
///
/// `mid = (B - 1) / 2 + 1`, so the left half keeps the larger share when
/// `B` is odd.
#[inline]
pub fn split_point(capacity: usize) -> usize {
    (capacity - 1) / 2 + 1
}

/// A (key, value) pair stored in a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub key: u32,
    pub value: u32,
}

impl Entry {
    pub fn new(key: u32, value: u32) -> Self {
        Self { key, value }
    }
}

/// A (separator key, child pointer) pair stored in an internal node.
///
/// `child` roots the subtree holding keys in `[key, next separator)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separator {
    pub key: u32,
    pub child: BlockId,
}

impl Separator {
    pub fn new(key: u32, child: BlockId) -> Self {
        Self { key, child }
    }
}

/// Leaf node: sorted entries plus the link to the next leaf in key order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeafNode {
    pub entries: Vec<Entry>,
    /// Next leaf to the right, or [`BlockId::NONE`] for the rightmost leaf.
    pub next: BlockId,
}

impl LeafNode {
    pub fn new(entries: Vec<Entry>, next: BlockId) -> Self {
        Self { entries, next }
    }

    /// Decode a leaf from a raw block.
    pub fn decode(block: &Block) -> Self {
        let capacity = capacity_for(block.size() as u32);
        let mut entries = Vec::with_capacity(capacity + 1);
        for i in 0..capacity {
            let key = block.field(2 * i);
            if key == 0 {
                break;
            }
            entries.push(Entry::new(key, block.field(2 * i + 1)));
        }
        let next = BlockId::new(block.field(2 * capacity));
        Self { entries, next }
    }

    /// Encode this leaf into a fresh block of `block_size` bytes.
    ///
    /// # Panics
    /// Panics if the leaf holds more entries than the block can.
    pub fn encode(&self, block_size: u32) -> Block {
        let capacity = capacity_for(block_size);
        assert!(
            self.entries.len() <= capacity,
            "leaf holds {} entries, capacity is {}",
            self.entries.len(),
            capacity
        );

        let mut block = Block::new(block_size);
        for (i, entry) in self.entries.iter().enumerate() {
            block.set_field(2 * i, entry.key);
            block.set_field(2 * i + 1, entry.value);
        }
        block.set_field(2 * capacity, self.next.0);
        block
    }

    /// Insert an entry keeping the entries sorted by key.
    ///
    /// The leaf may temporarily exceed capacity; the caller splits it.
    pub fn insert(&mut self, entry: Entry) {
        let pos = self.entries.partition_point(|e| e.key <= entry.key);
        self.entries.insert(pos, entry);
    }

    /// Value stored under `key`, scanning entries in order.
    pub fn get(&self, key: u32) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value)
    }

    /// Split off the upper half of an overflowing leaf.
    ///
    /// The returned right leaf inherits this leaf's `next` pointer; the
    /// caller re-links `self.next` to the right leaf once it has an id.
    pub fn split(&mut self, capacity: usize) -> LeafNode {
        let mid = split_point(capacity);
        let right = self.entries.split_off(mid);
        LeafNode::new(right, self.next)
    }
}

/// Internal node: a leading child pointer plus sorted separators.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InternalNode {
    /// Subtree holding every key below the first separator.
    pub first_child: BlockId,
    pub separators: Vec<Separator>,
}

impl InternalNode {
    pub fn new(first_child: BlockId, separators: Vec<Separator>) -> Self {
        Self {
            first_child,
            separators,
        }
    }

    /// Decode an internal node from a raw block.
    pub fn decode(block: &Block) -> Self {
        let capacity = capacity_for(block.size() as u32);
        let first_child = BlockId::new(block.field(0));
        let mut separators = Vec::with_capacity(capacity + 1);
        for i in 0..capacity {
            let key = block.field(1 + 2 * i);
            if key == 0 {
                break;
            }
            separators.push(Separator::new(key, BlockId::new(block.field(2 + 2 * i))));
        }
        Self {
            first_child,
            separators,
        }
    }

    /// Encode this node into a fresh block of `block_size` bytes.
    ///
    /// # Panics
    /// Panics if the node holds more separators than the block can.
    pub fn encode(&self, block_size: u32) -> Block {
        let capacity = capacity_for(block_size);
        assert!(
            self.separators.len() <= capacity,
            "internal node holds {} separators, capacity is {}",
            self.separators.len(),
            capacity
        );

        let mut block = Block::new(block_size);
        block.set_field(0, self.first_child.0);
        for (i, sep) in self.separators.iter().enumerate() {
            block.set_field(1 + 2 * i, sep.key);
            block.set_field(2 + 2 * i, sep.child.0);
        }
        block
    }

    /// Child whose subtree owns `key`.
    ///
    /// Follows `first_child` when `key` is below the first separator,
    /// otherwise the child of the last separator that is `<= key`.
    pub fn child_for(&self, key: u32) -> BlockId {
        let idx = self.separators.partition_point(|s| s.key <= key);
        if idx == 0 {
            self.first_child
        } else {
            self.separators[idx - 1].child
        }
    }

    /// Insert a separator keeping separators sorted by key.
    pub fn insert(&mut self, sep: Separator) {
        let pos = self.separators.partition_point(|s| s.key <= sep.key);
        self.separators.insert(pos, sep);
    }

    /// Split an overflowing node.
    ///
    /// The separator at the split point is removed and returned as the key
    /// to promote; its child becomes the right node's leading pointer.
    pub fn split(&mut self, capacity: usize) -> (u32, InternalNode) {
        let mid = split_point(capacity);
        let mut upper = self.separators.split_off(mid);
        let promoted = upper.remove(0);
        (promoted.key, InternalNode::new(promoted.child, upper))
    }

    /// All child pointers, leftmost first.
    pub fn children(&self) -> impl Iterator<Item = BlockId> + '_ {
        std::iter::once(self.first_child).chain(self.separators.iter().map(|s| s.child))
    }
}

/// A decoded block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(LeafNode),
    Internal(InternalNode),
}

impl Node {
    /// Decode a block, choosing the layout from whether it sits at leaf level.
    pub fn decode(block: &Block, is_leaf: bool) -> Self {
        if is_leaf {
            Node::Leaf(LeafNode::decode(block))
        } else {
            Node::Internal(InternalNode::decode(block))
        }
    }

    pub fn encode(&self, block_size: u32) -> Block {
        match self {
            Node::Leaf(leaf) => leaf.encode(block_size),
            Node::Internal(internal) => internal.encode(block_size),
        }
    }

    /// Number of valid pairs in this node.
    pub fn len(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.entries.len(),
            Node::Internal(internal) => internal.separators.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_of(keys: &[u32]) -> LeafNode {
        LeafNode::new(
            keys.iter().map(|&k| Entry::new(k, k * 10)).collect(),
            BlockId::NONE,
        )
    }

    #[test]
    fn test_split_point() {
        assert_eq!(split_point(9), 5);
        assert_eq!(split_point(4), 2);
        assert_eq!(split_point(3), 2);
        assert_eq!(split_point(1), 1);
    }

    #[test]
    fn test_leaf_byte_layout() {
        let leaf = LeafNode::new(vec![Entry::new(3, 30), Entry::new(5, 50)], BlockId::new(7));
        let block = leaf.encode(44); // B = 5

        assert_eq!(block.field(0), 3);
        assert_eq!(block.field(1), 30);
        assert_eq!(block.field(2), 5);
        assert_eq!(block.field(3), 50);
        assert_eq!(block.field(4), 0);
        assert_eq!(block.field(10), 7); // next pointer after B pairs
        assert_eq!(LeafNode::decode(&block), leaf);
    }

    #[test]
    fn test_internal_byte_layout() {
        let node = InternalNode::new(
            BlockId::new(1),
            vec![Separator::new(6, BlockId::new(2)), Separator::new(11, BlockId::new(4))],
        );
        let block = node.encode(44);

        assert_eq!(block.field(0), 1);
        assert_eq!(block.field(1), 6);
        assert_eq!(block.field(2), 2);
        assert_eq!(block.field(3), 11);
        assert_eq!(block.field(4), 4);
        assert_eq!(block.field(5), 0);
        assert_eq!(InternalNode::decode(&block), node);
    }

    #[test]
    fn test_full_leaf_decodes_without_sentinel() {
        let leaf = leaf_of(&[1, 2, 3, 4, 5]);
        let block = leaf.encode(44);
        assert_eq!(LeafNode::decode(&block).entries.len(), 5);
    }

    #[test]
    fn test_slack_bytes_are_ignored() {
        // 80 bytes still gives B = 9; the trailing 4 bytes stay zero.
        let leaf = leaf_of(&[1, 2]);
        let block = leaf.encode(80);
        assert_eq!(block.size(), 80);
        assert_eq!(block.field(19), 0);
        assert_eq!(LeafNode::decode(&block), leaf);
    }

    #[test]
    #[should_panic]
    fn test_encode_overfull_leaf_panics() {
        leaf_of(&[1, 2, 3, 4, 5, 6]).encode(44);
    }

    #[test]
    fn test_leaf_insert_keeps_order() {
        let mut leaf = leaf_of(&[2, 8]);
        leaf.insert(Entry::new(5, 1));
        leaf.insert(Entry::new(1, 1));
        leaf.insert(Entry::new(9, 1));

        let keys: Vec<u32> = leaf.entries.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![1, 2, 5, 8, 9]);
    }

    #[test]
    fn test_leaf_get() {
        let leaf = leaf_of(&[1, 4, 9]);
        assert_eq!(leaf.get(4), Some(40));
        assert_eq!(leaf.get(5), None);
    }

    #[test]
    fn test_leaf_split() {
        let mut leaf = leaf_of(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        leaf.next = BlockId::new(12);

        let right = leaf.split(9);
        assert_eq!(leaf.entries.len(), 5);
        assert_eq!(right.entries.len(), 5);
        assert_eq!(right.entries[0].key, 6);
        assert_eq!(right.next, BlockId::new(12));
    }

    #[test]
    fn test_internal_child_for() {
        let node = InternalNode::new(
            BlockId::new(1),
            vec![
                Separator::new(10, BlockId::new(2)),
                Separator::new(20, BlockId::new(3)),
            ],
        );

        assert_eq!(node.child_for(5), BlockId::new(1));
        assert_eq!(node.child_for(10), BlockId::new(2));
        assert_eq!(node.child_for(15), BlockId::new(2));
        assert_eq!(node.child_for(20), BlockId::new(3));
        assert_eq!(node.child_for(99), BlockId::new(3));
    }

    #[test]
    fn test_internal_split_promotes_middle() {
        let seps = (1..=10)
            .map(|i| Separator::new(i * 10, BlockId::new(i + 1)))
            .collect();
        let mut node = InternalNode::new(BlockId::new(1), seps);

        let (promoted, right) = node.split(9);
        assert_eq!(promoted, 60);
        assert_eq!(node.separators.len(), 5);
        assert_eq!(right.first_child, BlockId::new(7));
        assert_eq!(right.separators.len(), 4);
        assert_eq!(right.separators[0].key, 70);
    }

    #[test]
    fn test_children() {
        let node = InternalNode::new(
            BlockId::new(1),
            vec![Separator::new(10, BlockId::new(2))],
        );
        let children: Vec<BlockId> = node.children().collect();
        assert_eq!(children, vec![BlockId::new(1), BlockId::new(2)]);
    }

    #[test]
    fn test_node_decode_dispatch() {
        let block = leaf_of(&[3]).encode(44);
        assert!(Node::decode(&block, true).is_leaf());
        assert!(!Node::decode(&block, false).is_leaf());
        assert_eq!(Node::decode(&block, true).len(), 1);
    }
}
