//! I/O module: byte windows, BGZF blocks and BAM decoding
//!
//! Nothing here reads a whole file. [`window`] pulls bounded byte ranges
//! from the head or tail, [`bgzf`] finds and inflates single blocks, and
//! [`bam`] decodes the reference table and record prefixes.

pub mod bam;
pub mod bgzf;
pub mod window;

pub use bgzf::{decompress_block, locate_last_complete_block, BlockSpan};
pub use window::{read_head, read_tail, RawWindow};
