//! Block identifier type.

use std::fmt;

/// Identifies a block in the index file.
///
/// Ids are 1-based and assigned in append order; id 0 never names a block
/// and doubles as the "no block" sentinel (an empty tree's root, the
/// next-leaf pointer of the rightmost leaf).
///
/// # Example
/// ```
/// use blocktree::BlockId;
///
/// let block_id = BlockId::new(42);
/// assert!(block_id.is_valid());
/// assert!(!BlockId::NONE.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockId(pub u32);

impl BlockId {
    /// Sentinel for "no block".
    pub const NONE: BlockId = BlockId(0);

    /// Create a new BlockId.
    #[inline]
    pub fn new(id: u32) -> Self {
        BlockId(id)
    }

    /// Check if this id names a block (is not the sentinel).
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }

    /// Byte offset of this block in a file with the given block size.
    ///
    /// `offset(id) = header_size + (id - 1) * block_size`
    #[inline]
    pub fn offset(&self, header_size: usize, block_size: u32) -> u64 {
        debug_assert!(self.is_valid(), "offset of the NONE block");
        header_size as u64 + (self.0 as u64 - 1) * block_size as u64
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NONE {
            write!(f, "Block(NONE)")
        } else {
            write!(f, "Block({})", self.0)
        }
    }
}
