//! Motorola S-record output.
//!
//! Data always goes in `S3` records (32-bit addresses) even when a shorter
//! address would fit, and the file is closed by an `S7` record carrying the
//! entry point. No `S0` header or `S5` count record is written.

use srec::{Address32, Data, Record};

use crate::error::ConversionError;
use crate::model::{ArtifactKey, OutputArtifact, OutputMode};
use crate::services::assemble::ImageGroup;
use crate::services::encoders::{
    check_32bit_range, check_record_length, data_records, entry_point_32,
};

/// The count byte also covers four address bytes and the checksum.
pub const MAX_RECORD_LENGTH: u32 = 255 - 5;

/// Encode all segments of one image into a single S-record file.
pub fn encode_image(
    group: &ImageGroup<'_>,
    record_length: u32,
) -> Result<OutputArtifact, ConversionError> {
    check_record_length(OutputMode::MotorolaHex, record_length)?;
    let input = group.image.source_name.as_str();

    let mut records = Vec::new();
    for segment in &group.segments {
        check_32bit_range(input, segment)?;
        for (address, chunk) in data_records(segment, record_length) {
            records.push(Record::S3(Data { address: Address32(address), data: chunk.to_vec() }));
        }
    }
    let count = records.len();
    records.push(Record::S7(Address32(entry_point_32(group.image)?)));

    log::debug!("{input}: encoded {count} S3 record(s)");
    let text = srec::writer::generate_srec_file(&records);
    Ok(OutputArtifact::new(ArtifactKey::image(input), text.into_bytes()))
}
