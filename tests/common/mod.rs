//! Synthetic BAM archives for integration tests.

#![allow(dead_code)]

use bamtail::io::bgzf::{encode_block, BGZF_EOF_MARKER};
use std::io::Write;
use tempfile::NamedTempFile;

/// Uncompressed BAM header: magic, SAM text and reference dictionary.
pub fn header_payload(names: &[&str]) -> Vec<u8> {
    let mut text = String::from("@HD\tVN:1.6\tSO:coordinate\n");
    for name in names {
        text.push_str(&format!("@SQ\tSN:{}\tLN:1000000\n", name));
    }

    let mut data = Vec::new();
    data.extend_from_slice(b"BAM\x01");
    data.extend_from_slice(&(text.len() as i32).to_le_bytes());
    data.extend_from_slice(text.as_bytes());
    data.extend_from_slice(&(names.len() as i32).to_le_bytes());
    for name in names {
        data.extend_from_slice(&(name.len() as i32 + 1).to_le_bytes());
        data.extend_from_slice(name.as_bytes());
        data.push(0);
        data.extend_from_slice(&1_000_000i32.to_le_bytes());
    }
    data
}

/// One complete alignment record: 4 bases, 4M cigar, no tags.
pub fn record(reference_index: i32, position: i32, serial: usize) -> Vec<u8> {
    let read_name = format!("read{}\0", serial);
    let flag: u16 = if reference_index == -1 { 4 } else { 0 };

    let mut body = Vec::new();
    body.extend_from_slice(&reference_index.to_le_bytes());
    body.extend_from_slice(&position.to_le_bytes());
    body.push(read_name.len() as u8); // l_read_name
    body.push(60); // MAPQ
    body.extend_from_slice(&4680u16.to_le_bytes()); // bin
    body.extend_from_slice(&1u16.to_le_bytes()); // n_cigar_op
    body.extend_from_slice(&flag.to_le_bytes());
    body.extend_from_slice(&4i32.to_le_bytes()); // l_seq
    body.extend_from_slice(&(-1i32).to_le_bytes()); // next_refID
    body.extend_from_slice(&(-1i32).to_le_bytes()); // next_pos
    body.extend_from_slice(&0i32.to_le_bytes()); // tlen
    body.extend_from_slice(read_name.as_bytes());
    body.extend_from_slice(&(4u32 << 4).to_le_bytes()); // 4M
    body.extend_from_slice(&[0x12, 0x48]); // ACGT
    body.extend_from_slice(&[30, 31, 32, 33]);

    let mut data = Vec::with_capacity(body.len() + 4);
    data.extend_from_slice(&(body.len() as u32).to_le_bytes());
    data.extend_from_slice(&body);
    data
}

/// Records packed back to back into one block payload.
pub fn records_payload(records: &[(i32, i32)]) -> Vec<u8> {
    records
        .iter()
        .enumerate()
        .flat_map(|(serial, &(reference_index, position))| {
            record(reference_index, position, serial)
        })
        .collect()
}

/// BGZF-compress each payload as its own block.
pub fn encode_blocks(payloads: &[Vec<u8>]) -> Vec<Vec<u8>> {
    payloads
        .iter()
        .map(|payload| encode_block(payload).unwrap())
        .collect()
}

/// Concatenate blocks, optionally followed by the EOF marker, into a file.
pub fn write_archive(blocks: &[Vec<u8>], terminated: bool) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for block in blocks {
        file.write_all(block).unwrap();
    }
    if terminated {
        file.write_all(&BGZF_EOF_MARKER).unwrap();
    }
    file.flush().unwrap();
    file
}

/// A finished archive: header block, one block per record list, EOF marker.
pub fn build_bam(names: &[&str], record_blocks: &[Vec<(i32, i32)>]) -> NamedTempFile {
    let mut payloads = vec![header_payload(names)];
    payloads.extend(record_blocks.iter().map(|records| records_payload(records)));
    write_archive(&encode_blocks(&payloads), true)
}
