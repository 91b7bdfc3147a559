//! Command surface: argument dispatch, input-line parsing, output format.
//!
//! | command  | arguments                  | effect                                   |
//! |----------|----------------------------|------------------------------------------|
//! | `create` | `FILE [BLOCK_SIZE]`        | new index with an empty header           |
//! | `insert` | `FILE INPUT`               | insert every `key\|value` line           |
//! | `search` | `FILE INPUT OUTPUT`        | write `key\|value` (or `key\|-1`) per key |
//! | `range`  | `FILE INPUT OUTPUT`        | write `k\|v ` pairs per `begin-end` line |
//! | `print`  | `FILE OUTPUT`              | two-level dump                           |
//!
//! Commands are matched on their first character, so `c`, `i`, `s`, `r`
//! and `p` work too. Input lines are parsed leniently: digits accumulate
//! and every other byte is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::common::config::DEFAULT_BLOCK_SIZE;
use crate::common::{Error, Result};
use crate::index::btree::BPlusTree;
use crate::storage::block::Entry;

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { file: PathBuf, block_size: u32 },
    Insert { file: PathBuf, input: PathBuf },
    Search { file: PathBuf, input: PathBuf, output: PathBuf },
    Range { file: PathBuf, input: PathBuf, output: PathBuf },
    Print { file: PathBuf, output: PathBuf },
}

impl Command {
    /// Parse arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let name = args
            .first()
            .ok_or_else(|| Error::Usage("missing command".into()))?;
        let arg = |i: usize, what: &str| -> Result<PathBuf> {
            args.get(i)
                .map(PathBuf::from)
                .ok_or_else(|| Error::Usage(format!("{name}: missing {what}")))
        };

        match name.chars().next() {
            Some('c') => {
                let block_size = match args.get(2) {
                    Some(s) => s
                        .trim()
                        .parse()
                        .map_err(|_| Error::Usage(format!("invalid block size {s:?}")))?,
                    None => DEFAULT_BLOCK_SIZE,
                };
                Ok(Command::Create {
                    file: arg(1, "index file")?,
                    block_size,
                })
            }
            Some('i') => Ok(Command::Insert {
                file: arg(1, "index file")?,
                input: arg(2, "input file")?,
            }),
            Some('s') => Ok(Command::Search {
                file: arg(1, "index file")?,
                input: arg(2, "input file")?,
                output: arg(3, "output file")?,
            }),
            Some('r') => Ok(Command::Range {
                file: arg(1, "index file")?,
                input: arg(2, "input file")?,
                output: arg(3, "output file")?,
            }),
            Some('p') => Ok(Command::Print {
                file: arg(1, "index file")?,
                output: arg(2, "output file")?,
            }),
            _ => Err(Error::Usage(format!("unknown command {name:?}"))),
        }
    }

    /// Execute the command against its index file.
    pub fn run(&self) -> Result<()> {
        match self {
            Command::Create { file, block_size } => {
                let tree = BPlusTree::create(file, *block_size)?;
                tree.sync()
            }
            Command::Insert { file, input } => {
                let tree = BPlusTree::open(file)?;
                let count = insert_lines(&tree, open_input(input)?)?;
                tree.sync()?;
                info!(count, depth = tree.depth(), "inserted entries");
                Ok(())
            }
            Command::Search {
                file,
                input,
                output,
            } => {
                let tree = BPlusTree::open(file)?;
                let mut out = create_output(output)?;
                search_lines(&tree, open_input(input)?, &mut out)?;
                out.flush()?;
                Ok(())
            }
            Command::Range {
                file,
                input,
                output,
            } => {
                let tree = BPlusTree::open(file)?;
                let mut out = create_output(output)?;
                range_lines(&tree, open_input(input)?, &mut out)?;
                out.flush()?;
                Ok(())
            }
            Command::Print { file, output } => BPlusTree::open(file)?.dump(output),
        }
    }
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

/// Insert every `key|value` line; returns how many entries were inserted.
pub fn insert_lines<R: BufRead>(tree: &BPlusTree, input: R) -> Result<usize> {
    let mut count = 0;
    for line in input.lines() {
        let line = line?;
        match parse_entry_line(&line) {
            Some(entry) => {
                tree.insert_entry(entry)?;
                count += 1;
            }
            None => debug!(line = %line, "skipped input line"),
        }
    }
    Ok(count)
}

/// Look up one key per line, writing `key|value` or `key|-1`.
pub fn search_lines<R: BufRead, W: Write>(tree: &BPlusTree, input: R, out: &mut W) -> Result<()> {
    for line in input.lines() {
        let Some(key) = parse_key_line(&line?) else {
            continue;
        };
        match tree.search(key)? {
            Some(value) => writeln!(out, "{key}|{value}")?,
            None => writeln!(out, "{key}|-1")?,
        }
    }
    Ok(())
}

/// Scan one `begin-end` range per line, writing `k|v ` pairs then a newline.
pub fn range_lines<R: BufRead, W: Write>(tree: &BPlusTree, input: R, out: &mut W) -> Result<()> {
    for line in input.lines() {
        let Some((first, last)) = parse_range_line(&line?) else {
            continue;
        };
        for entry in tree.range(first, last) {
            let entry = entry?;
            write!(out, "{}|{} ", entry.key, entry.value)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Parse `key|value`. Lines without `|` or with key 0 yield `None`.
pub fn parse_entry_line(line: &str) -> Option<Entry> {
    let (key, value) = line.split_once('|')?;
    let key = accumulate_digits(key)?;
    if key == 0 {
        return None;
    }
    Some(Entry::new(key, accumulate_digits(value).unwrap_or(0)))
}

/// Parse a search key. Lines without digits or with key 0 yield `None`.
pub fn parse_key_line(line: &str) -> Option<u32> {
    accumulate_digits(line).filter(|&key| key != 0)
}

/// Parse `begin-end`.
pub fn parse_range_line(line: &str) -> Option<(u32, u32)> {
    let (first, last) = line.split_once('-')?;
    Some((accumulate_digits(first)?, accumulate_digits(last)?))
}

/// Fold the decimal digits of `s` into a number, ignoring other bytes.
/// Returns `None` if `s` has no digits.
fn accumulate_digits(s: &str) -> Option<u32> {
    let mut seen = false;
    let n = s
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(0u32, |acc, b| {
            seen = true;
            acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        });
    seen.then_some(n)
}
