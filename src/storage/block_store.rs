//! Block Store - low-level file I/O for index blocks.
//!
//! The [`BlockStore`] handles all direct file operations:
//! - Reading and writing the header
//! - Reading and writing blocks by id
//! - Appending new blocks at end-of-file

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::info;

use crate::common::config::HEADER_SIZE;
use crate::common::{BlockId, Error, Result};
use crate::storage::block::{Block, InternalNode, LeafNode, Node};
use crate::storage::FileHeader;

/// Manages I/O for a single index file.
///
/// # File Layout
/// ```text
/// ┌──────────┬─────────┬─────────┬─────────┐
/// │ Header   │ Block 1 │  ...    │ Block N │
/// └──────────┴─────────┴─────────┴─────────┘
/// ```
///
/// Block `id` is located at file offset `12 + (id - 1) × block_size`.
/// Ids are handed out in append order and never reused.
///
/// # Thread Safety
/// `BlockStore` is **single-threaded**. [`BPlusTree`](crate::BPlusTree)
/// serializes access to it.
///
/// # Durability
/// Writes go to the OS without `fsync()`; call [`BlockStore::sync`] to
/// force them to disk.
pub struct BlockStore {
    file: File,
    header: FileHeader,
    /// Number of blocks in the file.
    node_count: u32,
}

impl BlockStore {
    /// Create (or truncate) an index file holding only an empty header.
    ///
    /// # Errors
    /// Returns `Error::CapacityInvariantViolation` if `block_size` cannot
    /// hold one pair, or an I/O error if the file cannot be written.
    pub fn create<P: AsRef<Path>>(path: P, block_size: u32) -> Result<Self> {
        let header = FileHeader::new(block_size)?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.as_ref())?;
        file.write_all(&header.to_bytes())?;

        info!(
            path = %path.as_ref().display(),
            block_size,
            capacity = header.capacity(),
            "created index file"
        );

        Ok(Self {
            file,
            header,
            node_count: 0,
        })
    }

    /// Open an existing index file.
    ///
    /// # Errors
    /// - `Error::CorruptHeader` if the file is shorter than the header or
    ///   its body is not a whole number of blocks
    /// - `Error::CapacityInvariantViolation` if the stored block size is
    ///   too small to hold one pair
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path.as_ref())?;

        let file_size = file.metadata()?.len();
        if file_size < HEADER_SIZE as u64 {
            return Err(Error::CorruptHeader {
                file_size,
                block_size: 0,
            });
        }

        let mut buf = [0u8; HEADER_SIZE];
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut buf)?;
        let header = FileHeader::from_bytes(&buf);
        header.validate()?;

        let body = file_size - HEADER_SIZE as u64;
        if body % header.block_size as u64 != 0 {
            return Err(Error::CorruptHeader {
                file_size,
                block_size: header.block_size,
            });
        }
        let node_count = (body / header.block_size as u64) as u32;

        info!(
            path = %path.as_ref().display(),
            block_size = header.block_size,
            root = header.root_id.0,
            depth = header.depth,
            node_count,
            "opened index file"
        );

        Ok(Self {
            file,
            header,
            node_count,
        })
    }

    /// Current in-memory header.
    #[inline]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Update root and depth in memory. Persisted by [`flush_header`](Self::flush_header).
    pub fn set_root(&mut self, root_id: BlockId, depth: u32) {
        self.header.root_id = root_id;
        self.header.depth = depth;
    }

    /// Rewrite root id and depth on disk. The block size is never rewritten.
    pub fn flush_header(&mut self) -> Result<()> {
        let bytes = self.header.to_bytes();
        self.file
            .seek(SeekFrom::Start(FileHeader::OFFSET_ROOT_ID as u64))?;
        self.file
            .write_all(&bytes[FileHeader::OFFSET_ROOT_ID..HEADER_SIZE])?;
        Ok(())
    }

    /// Read a block from disk.
    ///
    /// # Errors
    /// - `Error::BlockNotFound` if the id is 0 or past the last block
    /// - `Error::BlockRead` if the read itself fails
    pub fn read_block(&mut self, block_id: BlockId) -> Result<Block> {
        self.check_id(block_id)?;

        let offset = self.offset(block_id);
        let mut block = Block::new(self.header.block_size);
        self.file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.file.read_exact(block.as_mut_slice()))
            .map_err(|source| Error::BlockRead {
                block_id: block_id.0,
                source,
            })?;

        Ok(block)
    }

    /// Overwrite an existing block.
    ///
    /// # Errors
    /// Returns `Error::BlockNotFound` if the block hasn't been appended.
    pub fn write_block(&mut self, block_id: BlockId, block: &Block) -> Result<()> {
        self.check_id(block_id)?;
        debug_assert_eq!(block.size(), self.header.block_size as usize);

        let offset = self.offset(block_id);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(block.as_slice())?;

        Ok(())
    }

    /// Write a fully populated block at end-of-file and return its new id.
    ///
    /// The new id is always `node_count + 1`.
    pub fn append_block(&mut self, block: &Block) -> Result<BlockId> {
        debug_assert_eq!(block.size(), self.header.block_size as usize);

        let block_id = self.next_block_id();
        let offset = self.offset(block_id);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(block.as_slice())?;

        self.node_count += 1;
        Ok(block_id)
    }

    /// Id the next appended block will receive.
    #[inline]
    pub fn next_block_id(&self) -> BlockId {
        BlockId::new(self.node_count + 1)
    }

    /// Read and decode a block at the given level.
    pub fn read_node(&mut self, block_id: BlockId, is_leaf: bool) -> Result<Node> {
        let block = self.read_block(block_id)?;
        Ok(Node::decode(&block, is_leaf))
    }

    pub fn read_leaf(&mut self, block_id: BlockId) -> Result<LeafNode> {
        let block = self.read_block(block_id)?;
        Ok(LeafNode::decode(&block))
    }

    pub fn read_internal(&mut self, block_id: BlockId) -> Result<InternalNode> {
        let block = self.read_block(block_id)?;
        Ok(InternalNode::decode(&block))
    }

    pub fn write_node(&mut self, block_id: BlockId, node: &Node) -> Result<()> {
        let block = node.encode(self.header.block_size);
        self.write_block(block_id, &block)
    }

    pub fn append_node(&mut self, node: &Node) -> Result<BlockId> {
        let block = node.encode(self.header.block_size);
        self.append_block(&block)
    }

    /// Force all written data to disk.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Get the number of blocks in the file.
    #[inline]
    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.header.capacity()
    }

    #[inline]
    pub fn block_size(&self) -> u32 {
        self.header.block_size
    }

    fn offset(&self, block_id: BlockId) -> u64 {
        block_id.offset(HEADER_SIZE, self.header.block_size)
    }

    fn check_id(&self, block_id: BlockId) -> Result<()> {
        if !block_id.is_valid() || block_id.0 > self.node_count {
            return Err(Error::BlockNotFound(block_id.0));
        }
        Ok(())
    }
}
