//! Configuration constants for the block file format.

/// Width of every integer field on disk (key, value, pointer, header field).
pub const FIELD_SIZE: usize = 4;

/// Size of one (key, value) or (separator, child) pair.
pub const ENTRY_SIZE: usize = 2 * FIELD_SIZE;

/// Size of the file header: `[block_size][root_id][depth]`.
///
/// # File Layout
/// ```text
/// ┌──────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Header   │ Block 1 │ Block 2 │  ...    │ Block N │
/// │ (12B)    │         │         │         │         │
/// └──────────┴─────────┴─────────┴─────────┴─────────┘
/// Offset: 0   12       12+bs     ...   12+(N-1)×bs
/// ```
pub const HEADER_SIZE: usize = 3 * FIELD_SIZE;

/// Smallest block size that still holds one pair plus a pointer field.
pub const MIN_BLOCK_SIZE: u32 = (FIELD_SIZE + ENTRY_SIZE) as u32;

/// Block size used by the command surface when none is given.
pub const DEFAULT_BLOCK_SIZE: u32 = 4096;

/// Number of pairs a block of `block_size` bytes can hold.
///
/// Every block reserves one pointer field (the next-leaf pointer of a leaf,
/// the leading child pointer of an internal node), and every pair takes
/// [`ENTRY_SIZE`] bytes: `B = floor((block_size - 4) / 8)`.
#[inline]
pub const fn capacity_for(block_size: u32) -> usize {
    (block_size as usize).saturating_sub(FIELD_SIZE) / ENTRY_SIZE
}
