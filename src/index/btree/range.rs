//! Ordered range scan over the leaf chain.

use parking_lot::Mutex;

use crate::common::{BlockId, Result};
use crate::storage::block::Entry;
use crate::storage::BlockStore;

use super::path::resolve;

/// Lazy iterator over the entries with keys in `[first, last]`.
///
/// The scan resolves the leaf owning `first`, then follows next-leaf
/// pointers until it meets a key above `last` or the end of the chain.
/// Each leaf is read on demand, taking the store lock only for that read.
/// A fresh call to [`BPlusTree::range`](crate::BPlusTree::range)
/// re-resolves from the root.
///
/// # Example
/// ```ignore
/// for entry in tree.range(3, 8) {
///     let entry = entry?;
///     println!("{}|{}", entry.key, entry.value);
/// }
/// ```
pub struct RangeScan<'a> {
    store: &'a Mutex<BlockStore>,
    first: u32,
    last: u32,
    state: ScanState,
}

enum ScanState {
    /// Nothing read yet.
    Start,
    /// Draining one leaf; `next` is its successor.
    Leaf {
        entries: std::vec::IntoIter<Entry>,
        next: BlockId,
    },
    Done,
}

impl<'a> RangeScan<'a> {
    pub(crate) fn new(store: &'a Mutex<BlockStore>, first: u32, last: u32) -> Self {
        Self {
            store,
            first,
            last,
            state: ScanState::Start,
        }
    }

    fn start(&self) -> Result<ScanState> {
        let mut store = self.store.lock();
        if !store.header().root_id.is_valid() {
            return Ok(ScanState::Done);
        }
        let path = resolve(&mut store, self.first)?;
        let leaf = store.read_leaf(path.dest)?;
        Ok(ScanState::Leaf {
            entries: leaf.entries.into_iter(),
            next: leaf.next,
        })
    }

    fn advance(&self, next: BlockId) -> Result<ScanState> {
        if !next.is_valid() {
            return Ok(ScanState::Done);
        }
        let leaf = self.store.lock().read_leaf(next)?;
        Ok(ScanState::Leaf {
            entries: leaf.entries.into_iter(),
            next: leaf.next,
        })
    }
}

impl Iterator for RangeScan<'_> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = match &mut self.state {
                ScanState::Done => return None,
                ScanState::Start => self.start(),
                ScanState::Leaf { entries, next } => match entries.next() {
                    Some(entry) if entry.key > self.last => Ok(ScanState::Done),
                    Some(entry) if entry.key >= self.first => return Some(Ok(entry)),
                    Some(_) => continue,
                    None => {
                        let next = *next;
                        self.advance(next)
                    }
                },
            };

            match step {
                Ok(state) => self.state = state,
                Err(e) => {
                    self.state = ScanState::Done;
                    return Some(Err(e));
                }
            }
        }
    }
}
