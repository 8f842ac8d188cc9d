//! BAM reference table parsing.
//!
//! Only the part of the header needed to name reference sequences is kept:
//! the SAM text is skipped and reference lengths are discarded.
//!
//! # Format
//!
//! ```text
//! BAM Header:
//! - 4 bytes: Magic ("BAM\1")
//! - 4 bytes: SAM header text length (l_text, int32)
//! - l_text bytes: SAM header text
//! - 4 bytes: Number of reference sequences (n_ref, int32)
//! - For each reference:
//!   - 4 bytes: Reference name length (l_name, int32, includes null terminator)
//!   - l_name bytes: Reference name (null-terminated)
//!   - 4 bytes: Reference length (int32)
//! ```
//!
//! # Limitation
//!
//! The whole reference table must fit in the first BGZF block. Headers that
//! spill into a second block fail with [`BamTailError::UnexpectedEof`].

use super::cursor::ByteCursor;
use crate::error::{BamTailError, Result};
use crate::io::bgzf;
use crate::io::window;
use log::debug;
use std::borrow::Cow;
use std::path::Path;

/// BAM magic bytes.
pub const BAM_MAGIC: &[u8; 4] = b"BAM\x01";

/// One reference sequence from the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// Position in the header, 0-based
    pub index: usize,
    /// Name bytes without the NUL terminator
    pub name: Vec<u8>,
}

impl ReferenceEntry {
    /// Name decoded for display (invalid UTF-8 is replaced).
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }
}

/// Reference sequences in header order; `entries[i].index == i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceTable {
    /// Build a table from names in declaration order.
    pub fn from_names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Vec<u8>>,
    {
        let entries = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| ReferenceEntry {
                index,
                name: name.into(),
            })
            .collect();
        Self { entries }
    }

    /// Get reference by index.
    pub fn get(&self, index: usize) -> Option<&ReferenceEntry> {
        self.entries.get(index)
    }

    /// Number of references.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no references.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in header order.
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.entries.iter()
    }
}

fn read_length(cursor: &mut ByteCursor<'_>, context: &'static str) -> Result<usize> {
    let value = cursor.read_i32(context)?;
    usize::try_from(value).map_err(|_| BamTailError::InvalidHeader {
        message: format!("negative {}: {}", context, value),
    })
}

/// Check the 4-byte BAM magic.
///
/// # Errors
///
/// Returns [`BamTailError::NotABamFile`] if the bytes are not `BAM\1`.
pub fn read_magic(cursor: &mut ByteCursor<'_>) -> Result<()> {
    let magic = cursor.read_array::<4>("magic")?;
    if &magic != BAM_MAGIC {
        return Err(BamTailError::NotABamFile { actual: magic });
    }
    Ok(())
}

/// Read one reference entry, stripping the NUL terminator from its name.
pub fn read_reference(cursor: &mut ByteCursor<'_>, index: usize) -> Result<ReferenceEntry> {
    let name_len = read_length(cursor, "l_name")?;
    let name = cursor.read_bytes(name_len, "reference name")?;

    let name = match name.split_last() {
        Some((0, name)) => name,
        _ => {
            return Err(BamTailError::InvalidHeader {
                message: format!("reference {} name is not NUL-terminated", index),
            })
        }
    };

    // l_ref
    cursor.skip(4, "l_ref")?;

    Ok(ReferenceEntry {
        index,
        name: name.to_vec(),
    })
}

/// Parse the reference table from the first decompressed block.
///
/// # Errors
///
/// - [`BamTailError::NotABamFile`] on a magic mismatch
/// - [`BamTailError::InvalidHeader`] on negative lengths or unterminated names
/// - [`BamTailError::UnexpectedEof`] if the table runs past the block
pub fn parse_reference_table(data: &[u8]) -> Result<ReferenceTable> {
    let mut cursor = ByteCursor::new(data);

    read_magic(&mut cursor)?;
    let text_len = read_length(&mut cursor, "l_text")?;
    cursor.skip(text_len, "SAM header text")?;

    let count = read_length(&mut cursor, "n_ref")?;
    // Each entry takes at least 9 bytes, so cap the reservation by what is left.
    let mut entries = Vec::with_capacity(count.min(cursor.remaining() / 9));
    for index in 0..count {
        entries.push(read_reference(&mut cursor, index)?);
    }

    Ok(ReferenceTable { entries })
}

/// Read the reference table from the first BGZF block of a file.
///
/// `head_size` bytes are read from the start of the file; they must cover
/// the whole first block.
///
/// # Errors
///
/// Returns I/O errors, [`BamTailError::InvalidBlockHeader`] if the file does
/// not start with a BGZF block, [`BamTailError::Decompression`] if the block
/// is corrupt or longer than the head window, and any error from
/// [`parse_reference_table`].
pub fn read_reference_table<P: AsRef<Path>>(path: P, head_size: usize) -> Result<ReferenceTable> {
    let path = path.as_ref();
    let head = window::read_head(path, head_size)?;

    let size = bgzf::block_size(&head.bytes)?;
    if size > head.len() {
        return Err(BamTailError::Decompression(format!(
            "first block is {} bytes but only {} were read (try a larger head window)",
            size,
            head.len()
        )));
    }

    let payload = bgzf::decompress_block(&head.bytes[..size])?;
    let table = parse_reference_table(&payload)?;
    debug!(
        "{}: {} reference sequences in a {} byte first block",
        path.display(),
        table.len(),
        size
    );

    Ok(table)
}
