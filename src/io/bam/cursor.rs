//! Bounds-checked little-endian reader over a byte slice.
//!
//! Every read checks the remaining length first and fails with
//! [`BamTailError::UnexpectedEof`] instead of indexing past the end.

use crate::error::{BamTailError, Result};

/// Forward-only cursor over a decompressed buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether the cursor has reached the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn check(&self, len: usize, context: &'static str) -> Result<()> {
        if len > self.remaining() {
            return Err(BamTailError::UnexpectedEof {
                context,
                offset: self.pos,
                expected: len,
                actual: self.remaining(),
            });
        }
        Ok(())
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize, context: &'static str) -> Result<&'a [u8]> {
        self.check(len, context)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Advance `len` bytes without looking at them.
    pub fn skip(&mut self, len: usize, context: &'static str) -> Result<()> {
        self.check(len, context)?;
        self.pos += len;
        Ok(())
    }

    /// Read a fixed-size array.
    pub fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, context)?);
        Ok(out)
    }

    /// Read a little-endian `i32`.
    pub fn read_i32(&mut self, context: &'static str) -> Result<i32> {
        self.read_array::<4>(context).map(i32::from_le_bytes)
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self, context: &'static str) -> Result<u32> {
        self.read_array::<4>(context).map(u32::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let mut data = Vec::new();
        data.extend_from_slice(&(-1i32).to_le_bytes());
        data.extend_from_slice(&1000u32.to_le_bytes());
        data.extend_from_slice(b"xy");

        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_i32("a").unwrap(), -1);
        assert_eq!(cursor.read_u32("b").unwrap(), 1000);
        assert_eq!(cursor.position(), 8);
        assert_eq!(cursor.read_bytes(2, "c").unwrap(), b"xy");
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_short_read_does_not_advance() {
        let data = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&data);

        let err = cursor.read_i32("n_ref").unwrap_err();
        match err {
            BamTailError::UnexpectedEof {
                context,
                offset,
                expected,
                actual,
            } => {
                assert_eq!(context, "n_ref");
                assert_eq!(offset, 0);
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(cursor.remaining(), 3);
    }

    #[test]
    fn test_skip_past_end_fails() {
        let data = [0u8; 8];
        let mut cursor = ByteCursor::new(&data);
        cursor.skip(8, "text").unwrap();
        assert!(cursor.skip(1, "text").is_err());
    }
}
