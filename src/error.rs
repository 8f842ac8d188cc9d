//! Error types for bamtail

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bamtail operations
pub type Result<T> = std::result::Result<T, BamTailError>;

/// Error types that can occur while tailing a BAM file.
///
/// Every variant is scoped to the file being processed: callers handling
/// several files report the error and move on to the next one.
#[derive(Debug, Error)]
pub enum BamTailError {
    /// Open, seek or read failure on the input file
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// First decompressed block does not start with `BAM\x01`
    #[error("file does not appear to be a BAM file (magic {actual:?}, expected [66, 65, 77, 1])")]
    NotABamFile {
        /// The four bytes found where the magic should be
        actual: [u8; 4],
    },

    /// Fewer than two BGZF block starts inside the tail window
    #[error(
        "not enough data: found {found} BGZF block start(s) in a {window_len} byte window, \
         at least 2 are required (try a larger tail window)"
    )]
    InsufficientWindow {
        /// Number of block signatures found
        found: usize,
        /// Length of the scanned window
        window_len: usize,
    },

    /// A compressed member could not be inflated
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// BGZF block header missing the signature or the BSIZE subfield
    #[error("Invalid BGZF block header: {message}")]
    InvalidBlockHeader {
        /// What was wrong with the header
        message: String,
    },

    /// BAM header carries an impossible length or count
    #[error("Invalid BAM header: {message}")]
    InvalidHeader {
        /// What was wrong with the header
        message: String,
    },

    /// A read ran past the end of a decompressed buffer
    #[error(
        "Unexpected end of data while parsing {context} at offset {offset}: \
         expected {expected} bytes, got {actual}"
    )]
    UnexpectedEof {
        /// What was being parsed
        context: &'static str,
        /// Cursor position when the read was attempted
        offset: usize,
        /// Bytes requested
        expected: usize,
        /// Bytes left in the buffer
        actual: usize,
    },

    /// Alignment record size arithmetic points past the end of the block
    #[error(
        "Malformed alignment record at offset {offset}: needs {needed} bytes, \
         {available} available"
    )]
    MalformedRecord {
        /// Offset of the record within the decompressed block
        offset: usize,
        /// Bytes the record claims to occupy
        needed: usize,
        /// Bytes remaining in the block from `offset`
        available: usize,
    },

    /// The last complete block decompressed to zero bytes
    #[error("last complete BGZF block contains no alignment records")]
    EmptyBlock,

    /// Reference index neither -1 nor inside the reference table
    #[error("Invalid reference ID {value} (reference table has {count} entries)")]
    InvalidReferenceId {
        /// Reference index read from the record
        value: i32,
        /// Number of entries in the reference table
        count: usize,
    },
}

impl BamTailError {
    /// Attach a path to an I/O error.
    pub fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<BamTailError> for io::Error {
    fn from(e: BamTailError) -> Self {
        match e {
            BamTailError::Io { source, .. } => source,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = BamTailError::io(
            "missing.bam",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("missing.bam"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_into_io_error_preserves_kind() {
        let err = BamTailError::io("x.bam", io::Error::new(io::ErrorKind::NotFound, "gone"));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);

        let io_err: io::Error = BamTailError::EmptyBlock.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_insufficient_window_suggests_remedy() {
        let err = BamTailError::InsufficientWindow {
            found: 1,
            window_len: 100,
        };
        assert!(err.to_string().contains("larger tail window"));
    }
}
