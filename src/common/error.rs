//! Error types for blocktree.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised by the tree engine and its command surface.
///
/// A search miss or an empty range is not an error; those come back as
/// `None` or an empty sequence.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from file operations outside a block read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is shorter than the header, or its body is not a whole
    /// number of blocks.
    #[error("corrupt header: file size {file_size} does not fit block size {block_size}")]
    CorruptHeader { file_size: u64, block_size: u32 },

    /// I/O failure while reading a block region.
    #[error("failed to read block {block_id}: {source}")]
    BlockRead {
        block_id: u32,
        #[source]
        source: std::io::Error,
    },

    /// Block id 0, or an id past the last allocated block.
    #[error("Block {0} not found")]
    BlockNotFound(u32),

    /// The block size cannot hold even one pair plus the pointer field.
    #[error("block size {block_size} is too small to hold a single entry")]
    CapacityInvariantViolation { block_size: u32 },

    /// Malformed command line.
    #[error("usage: {0}")]
    Usage(String),
}
