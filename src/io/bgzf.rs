//! BGZF block handling: boundary scanning, header parsing, single-block
//! inflate and deflate.
//!
//! # Block Structure
//!
//! Each BGZF block is a complete gzip member:
//! - Bytes 0-3: `1F 8B 08 04` (gzip magic, deflate, FEXTRA flag)
//! - Bytes 4-9: MTIME, XFL, OS
//! - Bytes 10-11: XLEN (extra field length, 6 for BGZF)
//! - Bytes 12-17: subfield SI1='B', SI2='C', SLEN=2, BSIZE (u16 LE)
//! - Deflate data, then CRC32 and ISIZE
//!
//! BSIZE is the total block size minus one.

use crate::error::{BamTailError, Result};
use flate2::read::GzDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use log::trace;
use std::io::{self, Read, Write};

/// Signature that opens every BGZF block.
pub const BGZF_MAGIC: [u8; 4] = [0x1f, 0x8b, 0x08, 0x04];

/// Length of the fixed BGZF header up to and including BSIZE.
pub const BGZF_HEADER_LEN: usize = 18;

/// Largest compressed block BSIZE can describe.
pub const MAX_BLOCK_SIZE: usize = 64 * 1024;

/// The empty block that terminates a complete BGZF file (28 bytes).
pub const BGZF_EOF_MARKER: [u8; 28] = [
    31, 139, 8, 4, 0, 0, 0, 0, 0, 255, // Header
    6, 0, 66, 67, 2, 0, 27, 0, // Extra field, BSIZE=27
    3, 0, // Empty deflate block
    0, 0, 0, 0, // CRC32
    0, 0, 0, 0, // ISIZE
];

/// Byte range `[start, end)` of one compressed block inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    /// First byte of the block (inclusive)
    pub start: usize,
    /// One past the last byte of the block
    pub end: usize,
}

impl BlockSpan {
    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The bytes this span covers in `data`.
    pub fn slice<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.start..self.end]
    }
}

/// Find every offset in `data` where a BGZF block signature begins.
///
/// Offsets are returned in ascending order. The signature is four bytes and
/// block headers never nest, so matches cannot overlap in a real file.
pub fn find_block_starts(data: &[u8]) -> Vec<usize> {
    data.windows(BGZF_MAGIC.len())
        .enumerate()
        .filter(|(_, window)| *window == BGZF_MAGIC)
        .map(|(offset, _)| offset)
        .collect()
}

/// Locate the last block guaranteed to be complete within a tail window.
///
/// The final signature in the window may open a block cut off by the end of
/// the file (an archive still being written) or the empty EOF marker of a
/// finished archive. Either way the block between the second-to-last and the
/// last signature is the last one fully present with real records in it.
///
/// # Errors
///
/// Returns [`BamTailError::InsufficientWindow`] when fewer than two
/// signatures are found. The remedy is a larger window; no retry happens
/// here.
pub fn locate_last_complete_block(data: &[u8]) -> Result<BlockSpan> {
    let starts = find_block_starts(data);
    trace!("found {} block starts in {} bytes", starts.len(), data.len());

    match starts[..] {
        [.., start, end] => Ok(BlockSpan { start, end }),
        _ => Err(BamTailError::InsufficientWindow {
            found: starts.len(),
            window_len: data.len(),
        }),
    }
}

/// Read the total size of the block whose header begins `header`.
///
/// # Errors
///
/// Returns [`BamTailError::InvalidBlockHeader`] if fewer than 18 bytes are
/// available, the signature is wrong, or the extra field does not hold a
/// `BC` subfield in the BGZF position.
pub fn block_size(header: &[u8]) -> Result<usize> {
    if header.len() < BGZF_HEADER_LEN {
        return Err(BamTailError::InvalidBlockHeader {
            message: format!(
                "need {} bytes, only {} available",
                BGZF_HEADER_LEN,
                header.len()
            ),
        });
    }

    if header[..4] != BGZF_MAGIC {
        return Err(BamTailError::InvalidBlockHeader {
            message: format!(
                "expected signature {:?}, got {:?}",
                BGZF_MAGIC,
                &header[..4]
            ),
        });
    }

    let xlen = u16::from_le_bytes([header[10], header[11]]);
    let slen = u16::from_le_bytes([header[14], header[15]]);
    if xlen < 6 || header[12] != b'B' || header[13] != b'C' || slen != 2 {
        return Err(BamTailError::InvalidBlockHeader {
            message: "missing BC subfield".to_string(),
        });
    }

    let bsize = u16::from_le_bytes([header[16], header[17]]);
    Ok(bsize as usize + 1)
}

/// Inflate a single complete BGZF block.
///
/// # Errors
///
/// Returns [`BamTailError::Decompression`] on corrupt or truncated data,
/// including CRC32/ISIZE mismatches reported by the decoder.
pub fn decompress_block(block: &[u8]) -> Result<Vec<u8>> {
    if block.len() < BGZF_HEADER_LEN {
        return Err(BamTailError::Decompression(format!(
            "block of {} bytes is shorter than a BGZF header",
            block.len()
        )));
    }

    let mut decoder = GzDecoder::new(block);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| BamTailError::Decompression(e.to_string()))?;

    trace!(
        "inflated {} byte block to {} bytes",
        block.len(),
        decompressed.len()
    );
    Ok(decompressed)
}

/// Compress `data` into one BGZF block.
///
/// # Errors
///
/// Returns `InvalidInput` if the payload does not fit in a single block.
pub fn encode_block(data: &[u8]) -> io::Result<Vec<u8>> {
    if data.len() > MAX_BLOCK_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("payload of {} bytes exceeds one BGZF block", data.len()),
        ));
    }

    let mut deflate = DeflateEncoder::new(Vec::new(), Compression::default());
    deflate.write_all(data)?;
    let deflated = deflate.finish()?;

    let total_size = BGZF_HEADER_LEN + deflated.len() + 8;
    if total_size > MAX_BLOCK_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("compressed block of {} bytes exceeds BSIZE range", total_size),
        ));
    }

    let mut block = Vec::with_capacity(total_size);
    block.extend_from_slice(&BGZF_MAGIC);
    block.extend_from_slice(&[0, 0, 0, 0]); // MTIME
    block.push(0); // XFL
    block.push(255); // OS (unknown)
    block.extend_from_slice(&6u16.to_le_bytes()); // XLEN
    block.extend_from_slice(b"BC");
    block.extend_from_slice(&2u16.to_le_bytes()); // SLEN
    block.extend_from_slice(&((total_size - 1) as u16).to_le_bytes());
    block.extend_from_slice(&deflated);
    block.extend_from_slice(&crc32fast::hash(data).to_le_bytes());
    block.extend_from_slice(&(data.len() as u32).to_le_bytes());

    Ok(block)
}
