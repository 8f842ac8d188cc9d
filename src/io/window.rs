//! Bounded byte windows read from either end of a file.
//!
//! Only two regions of a BAM are ever read: the head (to recover the
//! reference table from the first BGZF block) and the tail (to find the last
//! complete block). Both are read in one shot into an owned buffer; the file
//! handle is closed before the window is returned.

use crate::error::{BamTailError, Result};
use log::trace;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Raw bytes read from a file, along with where they started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWindow {
    /// File position of `bytes[0]`
    pub offset: u64,
    /// Window contents
    pub bytes: Vec<u8>,
}

impl RawWindow {
    /// Number of bytes in the window.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Read the last `min(tail_size, file_size)` bytes of a file.
///
/// The window starts at `file_size - tail_size`, or at 0 when the file is
/// smaller than the requested window. `file_size` is supplied by the caller
/// so the file is only stat-ed once per run.
///
/// # Errors
///
/// Returns [`BamTailError::Io`] if the file cannot be opened, seeked or read.
pub fn read_tail<P: AsRef<Path>>(path: P, file_size: u64, tail_size: usize) -> Result<RawWindow> {
    let path = path.as_ref();
    let offset = file_size.saturating_sub(tail_size as u64);
    let len = file_size - offset;

    let mut file = File::open(path).map_err(|e| BamTailError::io(path, e))?;
    file.seek(SeekFrom::Start(offset))
        .map_err(|e| BamTailError::io(path, e))?;

    let mut bytes = Vec::with_capacity(len as usize);
    file.take(len)
        .read_to_end(&mut bytes)
        .map_err(|e| BamTailError::io(path, e))?;

    trace!(
        "{}: read {} tail bytes at offset {}",
        path.display(),
        bytes.len(),
        offset
    );

    Ok(RawWindow { offset, bytes })
}

/// Read the first `min(head_size, file_size)` bytes of a file.
///
/// # Errors
///
/// Returns [`BamTailError::Io`] if the file cannot be opened or read.
pub fn read_head<P: AsRef<Path>>(path: P, head_size: usize) -> Result<RawWindow> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| BamTailError::io(path, e))?;
    let file_size = file
        .metadata()
        .map_err(|e| BamTailError::io(path, e))?
        .len();
    let len = file_size.min(head_size as u64);

    let mut bytes = Vec::with_capacity(len as usize);
    file.take(len)
        .read_to_end(&mut bytes)
        .map_err(|e| BamTailError::io(path, e))?;

    trace!("{}: read {} head bytes", path.display(), bytes.len());

    Ok(RawWindow { offset: 0, bytes })
}
