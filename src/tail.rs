//! Per-file tail pipeline.
//!
//! ```text
//! head window -> first block -> reference table
//! tail window -> last complete block -> last record prefix
//! (table, prefix) -> "chr1:1000" | "unmapped"
//! ```
//!
//! Each call opens its own file handles and shares nothing with other
//! calls, so files can be processed in any order or in parallel by the
//! caller.

use crate::error::{BamTailError, Result};
use crate::io::bam::{last_alignment, read_reference_table, AlignmentPrefix, ReferenceTable};
use crate::io::{bgzf, window};
use log::debug;
use std::fmt;
use std::path::Path;

/// Default number of bytes read from the end of the file.
///
/// Must span one full BGZF block (at most 64 KB) plus any trailing partial
/// block.
pub const DEFAULT_TAIL_SIZE: usize = 124_000;

/// Default number of bytes read from the start of the file.
///
/// Must span the whole first BGZF block.
pub const DEFAULT_HEAD_SIZE: usize = 64_000;

/// Window sizes used when tailing a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailOptions {
    /// Bytes read from the end of the file
    pub tail_size: usize,
    /// Bytes read from the start of the file
    pub head_size: usize,
}

impl Default for TailOptions {
    fn default() -> Self {
        Self {
            tail_size: DEFAULT_TAIL_SIZE,
            head_size: DEFAULT_HEAD_SIZE,
        }
    }
}

impl TailOptions {
    /// Set the tail window size.
    pub fn with_tail_size(mut self, tail_size: usize) -> Self {
        self.tail_size = tail_size;
        self
    }

    /// Set the head window size.
    pub fn with_head_size(mut self, head_size: usize) -> Self {
        self.head_size = head_size;
        self
    }
}

/// Where the last alignment of a file sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastAlignment {
    /// Placed on a reference sequence
    Mapped {
        /// Reference sequence name
        reference_name: String,
        /// 1-based position
        position: i64,
    },
    /// Reference index -1
    Unmapped,
}

impl LastAlignment {
    /// Resolve a record prefix against the reference table.
    ///
    /// # Errors
    ///
    /// Returns [`BamTailError::InvalidReferenceId`] if the index is not -1
    /// and not inside the table.
    pub fn resolve(prefix: &AlignmentPrefix, table: &ReferenceTable) -> Result<Self> {
        if prefix.is_unmapped() {
            return Ok(Self::Unmapped);
        }

        let entry = usize::try_from(prefix.reference_index)
            .ok()
            .and_then(|index| table.get(index))
            .ok_or(BamTailError::InvalidReferenceId {
                value: prefix.reference_index,
                count: table.len(),
            })?;

        Ok(Self::Mapped {
            reference_name: entry.name().into_owned(),
            // BAM positions are 0-based
            position: i64::from(prefix.position) + 1,
        })
    }
}

impl fmt::Display for LastAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mapped {
                reference_name,
                position,
            } => write!(f, "{}:{}", reference_name, position),
            Self::Unmapped => write!(f, "unmapped"),
        }
    }
}

/// Find the last alignment in a BAM file using explicit window sizes.
///
/// # Errors
///
/// Propagates the first failure of any step: I/O, a non-BAM first block,
/// too few block starts in the tail window, a corrupt block, or a malformed
/// record.
pub fn process_with<P: AsRef<Path>>(path: P, options: &TailOptions) -> Result<LastAlignment> {
    let path = path.as_ref();

    let table = read_reference_table(path, options.head_size)?;

    let size = std::fs::metadata(path)
        .map_err(|e| BamTailError::io(path, e))?
        .len();
    let tail = window::read_tail(path, size, options.tail_size)?;

    let span = bgzf::locate_last_complete_block(&tail.bytes)?;
    debug!(
        "{}: last complete block at file offset {} ({} bytes)",
        path.display(),
        tail.offset + span.start as u64,
        span.len()
    );

    let payload = bgzf::decompress_block(span.slice(&tail.bytes))?;
    let prefix = last_alignment(&payload)?;
    debug!(
        "{}: last record refID={} pos={}",
        path.display(),
        prefix.reference_index,
        prefix.position
    );

    LastAlignment::resolve(&prefix, &table)
}

/// Find the last alignment in a BAM file and format it.
///
/// Returns `"<reference>:<1-based position>"` or `"unmapped"`, using the
/// default window sizes.
///
/// # Example
///
/// ```no_run
/// # fn main() -> bamtail::Result<()> {
/// let position = bamtail::process("alignments.bam")?;
/// println!("{}", position); // e.g. "chr1:1000"
/// # Ok(())
/// # }
/// ```
pub fn process<P: AsRef<Path>>(path: P) -> Result<String> {
    process_with(path, &TailOptions::default()).map(|last| last.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix(reference_index: i32, position: i32) -> AlignmentPrefix {
        AlignmentPrefix {
            total_size: 32,
            reference_index,
            position,
        }
    }

    #[test]
    fn test_resolve_mapped() {
        let table = ReferenceTable::from_names(["chr1", "chr2"]);
        let last = LastAlignment::resolve(&prefix(0, 999), &table).unwrap();
        assert_eq!(last.to_string(), "chr1:1000");

        let last = LastAlignment::resolve(&prefix(1, 0), &table).unwrap();
        assert_eq!(last.to_string(), "chr2:1");
    }

    #[test]
    fn test_resolve_unmapped_ignores_position() {
        let table = ReferenceTable::from_names(["chr1"]);
        for pos in [-1, 0, 12345] {
            let last = LastAlignment::resolve(&prefix(-1, pos), &table).unwrap();
            assert_eq!(last, LastAlignment::Unmapped);
            assert_eq!(last.to_string(), "unmapped");
        }
    }

    #[test]
    fn test_resolve_out_of_table() {
        let table = ReferenceTable::from_names(["chr1"]);
        for value in [1, -2] {
            match LastAlignment::resolve(&prefix(value, 0), &table) {
                Err(BamTailError::InvalidReferenceId { value: v, count }) => {
                    assert_eq!(v, value);
                    assert_eq!(count, 1);
                }
                other => panic!("expected InvalidReferenceId, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_resolve_max_position() {
        let table = ReferenceTable::from_names(["chr1"]);
        let last = LastAlignment::resolve(&prefix(0, i32::MAX), &table).unwrap();
        assert_eq!(last.to_string(), format!("chr1:{}", i64::from(i32::MAX) + 1));
    }

    #[test]
    fn test_options_builder() {
        let options = TailOptions::default()
            .with_tail_size(1_000)
            .with_head_size(2_000);
        assert_eq!(options.tail_size, 1_000);
        assert_eq!(options.head_size, 2_000);
        assert_eq!(TailOptions::default().tail_size, DEFAULT_TAIL_SIZE);
    }
}
