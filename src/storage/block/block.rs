//! Block - the fixed-size unit of storage.
//!
//! A [`Block`] is a raw byte buffer of exactly `block_size` bytes that
//! serves as the unit of I/O between the file and the node codec. All
//! integer fields inside it are 4 bytes wide and addressed by field index
//! rather than by hand-computed byte offsets.

use crate::common::config::FIELD_SIZE;

/// A block of data (`block_size` bytes, zero-filled on creation).
///
/// # Clone Implementation
/// `Block` does NOT implement `Clone` in production code; copying a block
/// should be explicit. A `#[cfg(test)]` Clone is provided for tests.
///
/// # Example
/// ```
/// use blocktree::storage::block::Block;
///
/// let mut block = Block::new(76);
/// block.set_field(0, 7);
/// assert_eq!(block.field(0), 7);
/// assert_eq!(block.field_count(), 19);
/// ```
pub struct Block {
    data: Vec<u8>,
}

impl Block {
    /// Create a new zeroed block.
    #[inline]
    pub fn new(block_size: u32) -> Self {
        Self {
            data: vec![0u8; block_size as usize],
        }
    }

    /// Get immutable slice of block data.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get mutable slice of block data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Size of this block in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Number of whole 4-byte fields in this block.
    #[inline]
    pub fn field_count(&self) -> usize {
        self.data.len() / FIELD_SIZE
    }

    /// Read the 4-byte field at `index` (native byte order).
    ///
    /// # Panics
    /// Panics if the field lies outside the block.
    pub fn field(&self, index: usize) -> u32 {
        let start = index * FIELD_SIZE;
        let bytes: [u8; FIELD_SIZE] = self.data[start..start + FIELD_SIZE]
            .try_into()
            .unwrap_or_else(|_| panic!("field {index} out of bounds"));
        u32::from_ne_bytes(bytes)
    }

    /// Write the 4-byte field at `index` (native byte order).
    ///
    /// # Panics
    /// Panics if the field lies outside the block.
    pub fn set_field(&mut self, index: usize, value: u32) {
        let start = index * FIELD_SIZE;
        self.data[start..start + FIELD_SIZE].copy_from_slice(&value.to_ne_bytes());
    }
}

// Clone only available in tests - forces explicit copying in production
#[cfg(test)]
impl Clone for Block {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }
}
