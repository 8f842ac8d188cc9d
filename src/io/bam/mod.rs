//! Minimal BAM decoding for tailing.
//!
//! Two pieces of a BAM are decoded, each from a single decompressed BGZF
//! block:
//! - the reference table, from the first block ([`header`])
//! - the record prefixes, from the last complete block ([`scanner`])
//!
//! Both parse through a bounds-checked [`cursor::ByteCursor`] so malformed
//! lengths surface as errors instead of out-of-range reads.
//!
//! # Example
//!
//! ```no_run
//! use bamtail::io::bam::{last_alignment, read_reference_table};
//!
//! # fn main() -> bamtail::Result<()> {
//! let table = read_reference_table("alignments.bam", 64_000)?;
//! println!("{} references", table.len());
//! # let block: Vec<u8> = Vec::new();
//! let last = last_alignment(&block)?;
//! println!("last record on reference {}", last.reference_index);
//! # Ok(())
//! # }
//! ```

pub mod cursor;
pub mod header;
pub mod scanner;

pub use cursor::ByteCursor;
pub use header::{parse_reference_table, read_reference_table, ReferenceEntry, ReferenceTable};
pub use scanner::{alignments, last_alignment, AlignmentPrefix, Alignments};
