//! B+ tree index over fixed-size blocks.
//!
//! # Components
//! - [`BPlusTree`] - Public handle: insert, search, range, dump
//! - [`path`] - Root-to-leaf path resolution
//! - `insert` - Leaf mutation, split propagation, root growth
//! - [`RangeScan`] - Lazy ascending scan along the leaf chain
//! - [`DumpLevels`] - Two-level diagnostic dump

mod dump;
mod insert;
pub mod path;
mod range;
mod tree;

pub use dump::DumpLevels;
pub use path::TreePath;
pub use range::RangeScan;
pub use tree::BPlusTree;
