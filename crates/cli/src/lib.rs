pub mod commands;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use elf2bin_core::loader::read_image;
use elf2bin_core::InputImage;
use sha2::{Digest, Sha256};

pub use elf2bin_core::config::parse_address;

/// Read and parse one input file. The file is named in diagnostics and in
/// `%f` / `%F` exactly as it was given on the command line.
pub fn read_input_image(path: &Path) -> Result<InputImage> {
    let data = fs::read(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    Ok(read_image(path.to_string_lossy(), &data)?)
}

/// Compute the SHA-256 hash of a buffer and return it as a hex string.
pub fn sha256_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}
