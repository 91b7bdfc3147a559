//! Block types and layout.
//!
//! This module contains:
//! - [`Block`] - The raw fixed-size data container
//! - [`Node`] - A decoded block, either a [`LeafNode`] or an [`InternalNode`]

#[allow(clippy::module_inception)]
mod block;
mod node;

pub use block::Block;
pub use node::{split_point, Entry, InternalNode, LeafNode, Node, Separator};
