//! blocktree - a disk-resident B+ tree index over fixed-size blocks.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           blocktree                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Command Surface (command)                   │   │
//! │  │     create | insert | search | range | print             │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Index Layer (index/btree)                   │   │
//! │  │  BPlusTree: path resolve → leaf insert → propagate       │   │
//! │  │             point search, range scan, dump               │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Storage Layer (storage/)                    │   │
//! │  │     BlockStore + FileHeader + Block/Node codec           │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (BlockId, Error, config)
//! - [`storage`] - File I/O and block formats
//! - [`index`] - The B+ tree engine
//! - [`command`] - Command-line surface over the engine
//!
//! # Quick Start
//! ```no_run
//! use blocktree::BPlusTree;
//!
//! let tree = BPlusTree::create("index.bin", 76).unwrap();
//! tree.insert(7, 700).unwrap();
//! assert_eq!(tree.search(7).unwrap(), Some(700));
//!
//! for entry in tree.range(1, 10) {
//!     let entry = entry.unwrap();
//!     println!("{}|{}", entry.key, entry.value);
//! }
//! ```

pub mod command;
pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use command::Command;
pub use common::config::{DEFAULT_BLOCK_SIZE, HEADER_SIZE};
pub use common::{BlockId, Error, Result};

pub use index::btree::{BPlusTree, DumpLevels, RangeScan, TreePath};
pub use storage::block::{Block, Entry, InternalNode, LeafNode, Node, Separator};
pub use storage::{BlockStore, FileHeader};
