//! Storage layer - file I/O and block formats.
//!
//! This module handles persistent storage:
//! - [`BlockStore`] - Owns the file handle; all seeks happen here
//! - [`FileHeader`] - The 12-byte header at offset 0
//! - [`block`] - Block buffer and node codec

mod block_store;
mod header;
pub mod block;

pub use block_store::BlockStore;
pub use header::FileHeader;
