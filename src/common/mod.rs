//! Common types and utilities shared across blocktree.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants
//! - Error types
//! - Block identifiers

pub mod config;
pub mod error;
mod block_id;

pub use block_id::BlockId;
pub use error::{Error, Result};
