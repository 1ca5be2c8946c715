//! Bank interleaving.
//!
//! A byte stream is dealt out across `count` banks, `width` bytes at a time:
//! with `2x4`, positions 0-1 go to bank 0, 2-3 to bank 1, 4-5 to bank 2,
//! 6-7 to bank 3, 8-9 back to bank 0, and so on. Positions are relative to
//! the start of the buffer being split.

use crate::model::{BankConfig, OutputArtifact};

/// Bank receiving the byte at `position`.
pub fn bank_of(position: u64, bank: BankConfig) -> u32 {
    let width = u64::from(bank.width());
    let cycle = width * u64::from(bank.count());
    ((position % cycle) / width) as u32
}

/// Split `buffer` into `bank.count()` buffers. Every bank is present in the
/// result, even if it receives no bytes.
pub fn split(buffer: &[u8], bank: BankConfig) -> Vec<Vec<u8>> {
    let width = bank.width() as usize;
    let count = bank.count() as usize;
    let mut banks = vec![Vec::new(); count];
    for (index, chunk) in buffer.chunks(width).enumerate() {
        banks[index % count].extend_from_slice(chunk);
    }
    banks
}

/// Split one artifact into per-bank artifacts, tagging each key with its
/// bank index.
pub fn split_artifact(artifact: OutputArtifact, bank: BankConfig) -> Vec<OutputArtifact> {
    split(&artifact.bytes, bank)
        .into_iter()
        .enumerate()
        .map(|(index, bytes)| {
            OutputArtifact::new(artifact.key.clone().with_bank(index as u32), bytes)
        })
        .collect()
}
