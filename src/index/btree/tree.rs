//! B+ tree handle - the public face of the tree engine.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use parking_lot::Mutex;

use crate::common::{BlockId, Result};
use crate::storage::block::{Entry, Node};
use crate::storage::{BlockStore, FileHeader};

use super::dump::{self, DumpLevels};
use super::insert;
use super::path::{resolve, TreePath};
use super::range::RangeScan;

/// A disk-resident B+ tree mapping `u32` keys to `u32` values.
///
/// There is no in-memory copy of the tree: every operation starts from the
/// header and re-reads the blocks it needs, so the file is the single
/// source of truth.
///
/// # Thread Safety
/// The [`BlockStore`] sits behind a `parking_lot::Mutex`; each operation
/// holds the lock for its duration (a [`RangeScan`] only per leaf read).
/// Nothing protects against another process writing the same file.
///
/// # Keys
/// Keys must be positive. Key 0 marks an empty slot on disk, and
/// duplicate keys are not detected.
///
/// # Example
/// ```no_run
/// use blocktree::BPlusTree;
///
/// let tree = BPlusTree::create("index.bin", 76)?;
/// for k in 1..=10 {
///     tree.insert(k, k * 100)?;
/// }
/// assert_eq!(tree.search(7)?, Some(700));
/// assert_eq!(tree.depth(), 1);
/// # Ok::<(), blocktree::Error>(())
/// ```
pub struct BPlusTree {
    store: Mutex<BlockStore>,
}

impl BPlusTree {
    /// Create (or truncate) an index file with no blocks.
    pub fn create<P: AsRef<Path>>(path: P, block_size: u32) -> Result<Self> {
        Ok(Self::from_store(BlockStore::create(path, block_size)?))
    }

    /// Open an existing index file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_store(BlockStore::open(path)?))
    }

    pub fn from_store(store: BlockStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Insert a key/value pair, splitting blocks as needed.
    pub fn insert(&self, key: u32, value: u32) -> Result<()> {
        self.insert_entry(Entry::new(key, value))
    }

    pub fn insert_entry(&self, entry: Entry) -> Result<()> {
        let mut store = self.store.lock();
        insert::insert(&mut store, entry)
    }

    /// Point lookup. `Ok(None)` means the key was never inserted.
    pub fn search(&self, key: u32) -> Result<Option<u32>> {
        let mut store = self.store.lock();
        if !store.header().root_id.is_valid() {
            return Ok(None);
        }
        let path = resolve(&mut store, key)?;
        let leaf = store.read_leaf(path.dest)?;
        Ok(leaf.get(key))
    }

    /// Lazy scan of the entries with keys in `[first, last]`, ascending.
    pub fn range(&self, first: u32, last: u32) -> RangeScan<'_> {
        RangeScan::new(&self.store, first, last)
    }

    /// [`range`](Self::range), collected.
    pub fn range_vec(&self, first: u32, last: u32) -> Result<Vec<Entry>> {
        self.range(first, last).collect()
    }

    /// Root-to-leaf route for `key`, or `None` for an empty tree.
    pub fn path(&self, key: u32) -> Result<Option<TreePath>> {
        let mut store = self.store.lock();
        if !store.header().root_id.is_valid() {
            return Ok(None);
        }
        resolve(&mut store, key).map(Some)
    }

    /// Write the two-level diagnostic dump to `path`.
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_dump(&mut out)?;
        out.flush()?;
        Ok(())
    }

    pub fn write_dump<W: Write>(&self, out: &mut W) -> Result<()> {
        let levels = self.dump_levels()?;
        dump::write(&levels, out)
    }

    pub fn dump_levels(&self) -> Result<DumpLevels> {
        let mut store = self.store.lock();
        dump::collect(&mut store)
    }

    /// Decode block `block_id`, which sits `level` hops below the root.
    pub fn read_node(&self, block_id: BlockId, level: u32) -> Result<Node> {
        let mut store = self.store.lock();
        let is_leaf = level == store.header().depth;
        store.read_node(block_id, is_leaf)
    }

    /// Force written blocks and header to disk.
    pub fn sync(&self) -> Result<()> {
        self.store.lock().sync()
    }

    pub fn header(&self) -> FileHeader {
        *self.store.lock().header()
    }

    pub fn root(&self) -> BlockId {
        self.header().root_id
    }

    pub fn depth(&self) -> u32 {
        self.header().depth
    }

    pub fn block_size(&self) -> u32 {
        self.header().block_size
    }

    /// Maximum pairs per block.
    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    pub fn node_count(&self) -> u32 {
        self.store.lock().node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tree_76(dir: &tempfile::TempDir) -> BPlusTree {
        BPlusTree::create(dir.path().join("tree.idx"), 76).unwrap()
    }

    #[test]
    fn test_empty_tree() {
        let dir = tempdir().unwrap();
        let tree = tree_76(&dir);

        assert!(tree.is_empty());
        assert_eq!(tree.search(1).unwrap(), None);
        assert!(tree.range_vec(1, 100).unwrap().is_empty());
        assert!(tree.path(1).unwrap().is_none());
        assert_eq!(tree.dump_levels().unwrap(), DumpLevels::default());
    }

    #[test]
    fn test_ten_keys_split_once() {
        let dir = tempdir().unwrap();
        let tree = tree_76(&dir);
        for k in 1..=10 {
            tree.insert(k, k * 100).unwrap();
        }

        assert_eq!(tree.capacity(), 9);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.search(7).unwrap(), Some(700));
        assert_eq!(tree.search(11).unwrap(), None);

        let keys: Vec<u32> = tree
            .range_vec(3, 8)
            .unwrap()
            .iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec![3, 4, 5, 6, 7, 8]);

        match tree.read_node(tree.root(), 0).unwrap() {
            Node::Internal(root) => assert_eq!(root.separators.len(), 1),
            Node::Leaf(_) => panic!("root should be internal"),
        }
    }

    #[test]
    fn test_range_spans_leaves_and_stops_early() {
        let dir = tempdir().unwrap();
        let tree = tree_76(&dir);
        for k in (2..=60).step_by(2) {
            tree.insert(k, k).unwrap();
        }

        let keys: Vec<u32> = tree
            .range_vec(9, 31)
            .unwrap()
            .iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec![10, 12, 14, 16, 18, 20, 22, 24, 26, 28, 30]);

        assert!(tree.range_vec(61, 100).unwrap().is_empty());
        assert!(tree.range_vec(30, 20).unwrap().is_empty());
        assert_eq!(tree.range_vec(1, 2).unwrap(), vec![Entry::new(2, 2)]);
    }

    #[test]
    fn test_range_is_lazy() {
        let dir = tempdir().unwrap();
        let tree = tree_76(&dir);
        for k in 1..=50 {
            tree.insert(k, k).unwrap();
        }

        let mut scan = tree.range(20, 40);
        assert_eq!(scan.next().unwrap().unwrap(), Entry::new(20, 20));
        // The store is free between leaf reads.
        tree.insert(100, 100).unwrap();
        assert_eq!(scan.next().unwrap().unwrap(), Entry::new(21, 21));
    }

    #[test]
    fn test_reopen_keeps_tree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tree.idx");
        {
            let tree = BPlusTree::create(&path, 76).unwrap();
            for k in 1..=30 {
                tree.insert(k, k + 1).unwrap();
            }
            tree.sync().unwrap();
        }

        let tree = BPlusTree::open(&path).unwrap();
        assert_eq!(tree.depth(), 1);
        for k in 1..=30 {
            assert_eq!(tree.search(k).unwrap(), Some(k + 1));
        }
    }

    #[test]
    fn test_dump_two_levels() {
        let dir = tempdir().unwrap();
        let tree = tree_76(&dir);
        for k in 1..=10 {
            tree.insert(k, k * 100).unwrap();
        }

        let mut out = Vec::new();
        tree.write_dump(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<0>\n\n6\n\n<1>\n\n1,2,3,4,5,6,7,8,9,10\n"
        );
    }

    #[test]
    fn test_dump_leaf_root_lists_values() {
        let dir = tempdir().unwrap();
        let tree = tree_76(&dir);
        tree.insert(2, 20).unwrap();
        tree.insert(1, 10).unwrap();

        let levels = tree.dump_levels().unwrap();
        assert_eq!(levels.level0, vec![10, 20]);
        assert!(levels.level1.is_empty());
    }
}
