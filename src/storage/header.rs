//! File header.
//!
//! Every index file starts with a [`FileHeader`] describing the tree:
//! - block size, fixed at creation
//! - id of the current root block
//! - depth of the tree

use crate::common::config::{capacity_for, FIELD_SIZE, HEADER_SIZE, MIN_BLOCK_SIZE};
use crate::common::{BlockId, Error, Result};

/// Metadata stored at offset 0 of the index file.
///
/// # Layout (12 bytes, native byte order)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     block_size
/// 4       4     root_id (0 = empty tree)
/// 8       4     depth (0 = root is a leaf)
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Bytes per block. Immutable after creation.
    pub block_size: u32,
    /// Current root block.
    pub root_id: BlockId,
    /// Internal levels above the leaves.
    pub depth: u32,
}

impl FileHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = HEADER_SIZE;

    /// Offset of each field within the header.
    pub const OFFSET_BLOCK_SIZE: usize = 0;
    pub const OFFSET_ROOT_ID: usize = FIELD_SIZE;
    pub const OFFSET_DEPTH: usize = 2 * FIELD_SIZE;

    /// Header of an empty tree.
    ///
    /// # Errors
    /// Returns `Error::CapacityInvariantViolation` if a block of this size
    /// cannot hold a single pair.
    pub fn new(block_size: u32) -> Result<Self> {
        let header = Self {
            block_size,
            root_id: BlockId::NONE,
            depth: 0,
        };
        header.validate()?;
        Ok(header)
    }

    /// Maximum number of pairs per block, `B = floor((block_size - 4) / 8)`.
    #[inline]
    pub fn capacity(&self) -> usize {
        capacity_for(self.block_size)
    }

    /// Fail fast if the block size leaves no room for a pair.
    pub fn validate(&self) -> Result<()> {
        if self.block_size < MIN_BLOCK_SIZE {
            return Err(Error::CapacityInvariantViolation {
                block_size: self.block_size,
            });
        }
        Ok(())
    }

    /// Read a header from the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < FileHeader::SIZE`.
    pub fn from_bytes(data: &[u8]) -> Self {
        assert!(data.len() >= Self::SIZE, "buffer too small for FileHeader");

        Self {
            block_size: read_u32(data, Self::OFFSET_BLOCK_SIZE),
            root_id: BlockId::new(read_u32(data, Self::OFFSET_ROOT_ID)),
            depth: read_u32(data, Self::OFFSET_DEPTH),
        }
    }

    /// Write this header to the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < FileHeader::SIZE`.
    pub fn write_to(&self, data: &mut [u8]) {
        assert!(data.len() >= Self::SIZE, "buffer too small for FileHeader");

        write_u32(data, Self::OFFSET_BLOCK_SIZE, self.block_size);
        write_u32(data, Self::OFFSET_ROOT_ID, self.root_id.0);
        write_u32(data, Self::OFFSET_DEPTH, self.depth);
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        self.write_to(&mut buf);
        buf
    }
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_ne_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn write_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + FIELD_SIZE].copy_from_slice(&value.to_ne_bytes());
}
