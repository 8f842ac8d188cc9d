//! Walk the packed alignment records of one decompressed block.
//!
//! Only the 12-byte prefix of each record is read:
//!
//! ```text
//! - 4 bytes: block_size (uint32, record length excluding this field)
//! - 4 bytes: refID (int32, -1 for unmapped)
//! - 4 bytes: pos (int32, 0-based)
//! - block_size - 8 bytes: remaining fields (not interpreted)
//! ```
//!
//! Records never span BGZF blocks, so a block starts and ends on record
//! boundaries and can be walked in isolation.

use super::cursor::ByteCursor;
use crate::error::{BamTailError, Result};

/// Size of the record prefix that is decoded.
pub const PREFIX_LEN: usize = 12;

/// The leading fields of an alignment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentPrefix {
    /// Record length excluding the `total_size` field itself
    pub total_size: u32,
    /// Reference index, -1 when unmapped
    pub reference_index: i32,
    /// 0-based leftmost position
    pub position: i32,
}

impl AlignmentPrefix {
    /// Whether the record is placed on no reference.
    pub fn is_unmapped(&self) -> bool {
        self.reference_index == -1
    }
}

/// Iterator over record prefixes in a decompressed block.
///
/// Created by [`alignments`]. Yields an error and then stops if a record
/// would run past the end of the block.
pub struct Alignments<'a> {
    cursor: ByteCursor<'a>,
    failed: bool,
}

impl<'a> Alignments<'a> {
    fn read_prefix(&mut self) -> Result<AlignmentPrefix> {
        let offset = self.cursor.position();
        let available = self.cursor.remaining();
        let malformed = |needed: usize| BamTailError::MalformedRecord {
            offset,
            needed,
            available,
        };

        if available < PREFIX_LEN {
            return Err(malformed(PREFIX_LEN));
        }

        let total_size = self.cursor.read_u32("block_size")?;
        let reference_index = self.cursor.read_i32("refID")?;
        let position = self.cursor.read_i32("pos")?;

        // block_size excludes itself
        let needed = (total_size as usize).saturating_add(4);
        if needed < PREFIX_LEN || needed > available {
            return Err(malformed(needed));
        }
        self.cursor.skip(needed - PREFIX_LEN, "alignment record")?;

        Ok(AlignmentPrefix {
            total_size,
            reference_index,
            position,
        })
    }
}

impl<'a> Iterator for Alignments<'a> {
    type Item = Result<AlignmentPrefix>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_empty() {
            return None;
        }

        let result = self.read_prefix();
        self.failed = result.is_err();
        Some(result)
    }
}

/// Iterate over the record prefixes packed in `block`.
pub fn alignments(block: &[u8]) -> Alignments<'_> {
    Alignments {
        cursor: ByteCursor::new(block),
        failed: false,
    }
}

/// Return the prefix of the last record in a decompressed block.
///
/// # Errors
///
/// - [`BamTailError::EmptyBlock`] if the block holds no records
/// - [`BamTailError::MalformedRecord`] if any record's size points past the
///   end of the block
pub fn last_alignment(block: &[u8]) -> Result<AlignmentPrefix> {
    let mut last = None;
    for prefix in alignments(block) {
        last = Some(prefix?);
    }
    last.ok_or(BamTailError::EmptyBlock)
}
