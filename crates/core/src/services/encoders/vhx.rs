//! Verilog hex rendering: one uppercase two-digit hex byte per line, no
//! addresses.

use crate::model::OutputArtifact;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

pub fn render(bytes: &[u8]) -> Vec<u8> {
    let mut text = Vec::with_capacity(bytes.len() * 3);
    for &byte in bytes {
        text.push(HEX_DIGITS[usize::from(byte >> 4)]);
        text.push(HEX_DIGITS[usize::from(byte & 0x0F)]);
        text.push(b'\n');
    }
    text
}

/// Replace a raw artifact's bytes with their VHX text.
pub fn render_artifact(artifact: OutputArtifact) -> OutputArtifact {
    let bytes = render(&artifact.bytes);
    OutputArtifact { key: artifact.key, bytes }
}
