//! bamtail: `tail` for BAM files
//!
//! # Overview
//!
//! Reports the position of the last alignment in a BAM file without
//! decompressing the whole archive. Useful for watching the progress of a
//! coordinate-sorted BAM while it is still being written.
//!
//! Only two regions are read:
//! - the first BGZF block, for the reference sequence names
//! - a window at the end of the file, for the last complete BGZF block
//!
//! ## Quick Start
//!
//! ```no_run
//! # fn main() -> bamtail::Result<()> {
//! let position = bamtail::process("alignments.bam")?;
//! println!("{}", position); // "chr1:1000" or "unmapped"
//! # Ok(())
//! # }
//! ```
//!
//! ## Assumptions
//!
//! - No alignment record spans a BGZF block boundary.
//! - The reference table fits in the first BGZF block.
//!
//! ## Module Organization
//!
//! - [`io`]: byte windows, BGZF blocks and BAM decoding
//! - [`tail`]: the per-file pipeline and window options
//! - [`error`]: error type shared by every step

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod io;
pub mod tail;

// Re-export commonly used types
pub use error::{BamTailError, Result};
pub use tail::{process, process_with, LastAlignment, TailOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
