//! Diagnostic dump of the top two levels.
//!
//! Output format:
//! ```text
//! <0>
//!
//! 6
//!
//! <1>
//!
//! 1,2,3,4,5,6,7,8,9,10
//! ```
//! Level 0 lists the root's separator keys, or its values when the root is
//! a leaf. Level 1 lists the keys found in each child of the root, leftmost
//! child first: entry keys when the children are leaves, separator keys
//! otherwise. Levels below that are not rendered.

use std::io::Write;

use crate::common::Result;
use crate::storage::block::Node;
use crate::storage::BlockStore;

/// The two rendered levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpLevels {
    pub level0: Vec<u32>,
    pub level1: Vec<u32>,
}

pub(crate) fn collect(store: &mut BlockStore) -> Result<DumpLevels> {
    let header = *store.header();
    if !header.root_id.is_valid() {
        return Ok(DumpLevels::default());
    }

    let root = match store.read_node(header.root_id, header.depth == 0)? {
        Node::Leaf(leaf) => {
            return Ok(DumpLevels {
                level0: leaf.entries.iter().map(|e| e.value).collect(),
                level1: Vec::new(),
            });
        }
        Node::Internal(root) => root,
    };

    let level0 = root.separators.iter().map(|s| s.key).collect();
    let mut level1 = Vec::new();
    for child in root.children() {
        match store.read_node(child, header.depth == 1)? {
            Node::Leaf(leaf) => level1.extend(leaf.entries.iter().map(|e| e.key)),
            Node::Internal(node) => level1.extend(node.separators.iter().map(|s| s.key)),
        }
    }

    Ok(DumpLevels { level0, level1 })
}

pub(crate) fn write<W: Write>(levels: &DumpLevels, out: &mut W) -> Result<()> {
    write!(out, "<0>\n\n")?;
    write_list(&levels.level0, out)?;
    write!(out, "\n<1>\n\n")?;
    write_list(&levels.level1, out)?;
    Ok(())
}

fn write_list<W: Write>(values: &[u32], out: &mut W) -> Result<()> {
    if values.is_empty() {
        return Ok(());
    }
    let line = values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    writeln!(out, "{line}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_format() {
        let levels = DumpLevels {
            level0: vec![6],
            level1: vec![1, 2, 3, 6, 7],
        };
        let mut out = Vec::new();
        write(&levels, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<0>\n\n6\n\n<1>\n\n1,2,3,6,7\n"
        );
    }

    #[test]
    fn test_write_empty_levels() {
        let mut out = Vec::new();
        write(&DumpLevels::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<0>\n\n\n<1>\n\n");
    }
}
