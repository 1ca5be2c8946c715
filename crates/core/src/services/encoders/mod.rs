//! Format encoders.
//!
//! `OutputMode` is dispatched once here. The record-based formats (Intel hex,
//! S-records) encode each image group straight to text. The bin/vhx family
//! is built in two steps: `bin` lays out raw byte buffers, the bank splitter
//! runs on those raw bytes, and `vhx` renders the result as text when needed.

pub mod bin;
pub mod ihex;
pub mod srec;
pub mod vhx;

use crate::error::ConversionError;
use crate::model::{InputImage, OutputArtifact, OutputMode, OutputSpec};
use crate::services::assemble::{AssembledSegment, ImageGroup};
use crate::services::banks;

/// Encode every image group according to `spec.mode`.
pub fn encode(
    groups: &[ImageGroup<'_>],
    spec: &OutputSpec,
) -> Result<Vec<OutputArtifact>, ConversionError> {
    match spec.mode {
        OutputMode::IntelHex => groups
            .iter()
            .map(|group| ihex::encode_image(group, spec.record_length, spec.entry_point_record))
            .collect(),
        OutputMode::MotorolaHex => {
            groups.iter().map(|group| srec::encode_image(group, spec.record_length)).collect()
        }
        OutputMode::BinPerSegment
        | OutputMode::BinCombined
        | OutputMode::VhxPerSegment
        | OutputMode::VhxCombined => {
            let mut raw = Vec::new();
            for group in groups {
                if spec.mode.is_per_segment() {
                    raw.extend(bin::per_segment(group));
                } else {
                    raw.push(bin::combined(group, spec.base_override)?);
                }
            }

            let laid_out = match spec.bank {
                Some(bank) => raw
                    .into_iter()
                    .flat_map(|artifact| banks::split_artifact(artifact, bank))
                    .collect(),
                None => raw,
            };

            if spec.mode.is_vhx() {
                Ok(laid_out.into_iter().map(vhx::render_artifact).collect())
            } else {
                Ok(laid_out)
            }
        }
    }
}

/// Fail unless `record_length` is a usable data record size for `mode`.
pub fn check_record_length(mode: OutputMode, record_length: u32) -> Result<(), ConversionError> {
    match mode.max_record_length() {
        Some(max) if record_length == 0 || record_length > max => {
            Err(ConversionError::RecordLengthOutOfRange { mode, requested: record_length, max })
        }
        _ => Ok(()),
    }
}

/// Fail unless every byte of `segment` has an address below 2^32.
pub(crate) fn check_32bit_range(
    input: &str,
    segment: &AssembledSegment,
) -> Result<(), ConversionError> {
    if segment.bytes.is_empty() {
        return Ok(());
    }
    let last = segment.base_address.checked_add(segment.bytes.len() as u64 - 1);
    match last {
        Some(last) if last <= u64::from(u32::MAX) => Ok(()),
        _ => Err(ConversionError::AddressOverflow {
            input: input.to_string(),
            address: segment.base_address,
        }),
    }
}

/// The image entry point as a 32-bit value.
pub(crate) fn entry_point_32(image: &InputImage) -> Result<u32, ConversionError> {
    u32::try_from(image.entry_point).map_err(|_| ConversionError::EntryPointOverflow {
        input: image.source_name.clone(),
        entry_point: image.entry_point,
    })
}

/// Split a segment into data records of at most `record_length` bytes,
/// starting at the segment base. Yields `(start_address, bytes)`.
///
/// Callers run `check_32bit_range` first, so the addresses fit in 32 bits.
pub(crate) fn data_records(
    segment: &AssembledSegment,
    record_length: u32,
) -> impl Iterator<Item = (u32, &[u8])> + '_ {
    let step = record_length as usize;
    segment.bytes.chunks(step).enumerate().map(move |(index, chunk)| {
        let address = segment.base_address + (index * step) as u64;
        (address as u32, chunk)
    })
}
