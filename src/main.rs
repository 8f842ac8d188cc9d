//! bamtail CLI - report where the last alignment of each BAM sits
//!
//! # Usage
//!
//! ```bash
//! # One file: prints "chr1:1000" or "unmapped"
//! bamtail sorted.bam
//!
//! # Several files: each line prefixed with "<path>: "
//! bamtail a.bam b.bam
//!
//! # Larger tail window for archives with big blocks
//! bamtail --tail-size 250000 in-progress.bam
//! ```
//!
//! Set `RUST_LOG=debug` to see block offsets and sizes.

use bamtail::tail::{DEFAULT_HEAD_SIZE, DEFAULT_TAIL_SIZE};
use bamtail::TailOptions;
use clap::Parser;
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bamtail")]
#[command(about = "tail for BAMs", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// BAMs on which to perform the tail operation
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Suppress output of filenames
    #[arg(short, long)]
    quiet: bool,

    /// Print the version
    #[arg(short = 'v', long)]
    version: bool,

    /// Bytes to read from the end of each file; must hold one complete
    /// BGZF block plus any trailing partial block
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_TAIL_SIZE)]
    tail_size: usize,

    /// Bytes to read from the start of each file; must hold the first
    /// BGZF block
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_HEAD_SIZE)]
    head_size: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.version {
        println!("bamtail version {}", bamtail::VERSION);
        return ExitCode::SUCCESS;
    }

    let options = TailOptions::default()
        .with_tail_size(cli.tail_size)
        .with_head_size(cli.head_size);
    let show_names = cli.files.len() > 1 && !cli.quiet;

    let mut failures = 0usize;
    for path in &cli.files {
        match bamtail::process_with(path, &options) {
            Ok(last) if show_names => println!("{}: {}", path.display(), last),
            Ok(last) => println!("{}", last),
            Err(e) => {
                eprintln!("bamtail: {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        warn!("{} of {} file(s) failed", failures, cli.files.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
