//! Intel hex output.
//!
//! Data records use 32-bit linear addressing: an Extended Linear Address
//! record is emitted whenever the upper half of a record's start address
//! changes (the upper half starts out as zero), and each data record carries
//! the low 16 bits. A record that runs across a 64K boundary is not split.

use ihex::Record;

use crate::error::ConversionError;
use crate::model::{ArtifactKey, OutputArtifact, OutputMode};
use crate::services::assemble::ImageGroup;
use crate::services::encoders::{
    check_32bit_range, check_record_length, data_records, entry_point_32,
};

/// The byte count field of an Intel hex record is one byte wide.
pub const MAX_RECORD_LENGTH: u32 = 255;

/// Encode all segments of one image into a single Intel hex file.
pub fn encode_image(
    group: &ImageGroup<'_>,
    record_length: u32,
    entry_point_record: bool,
) -> Result<OutputArtifact, ConversionError> {
    check_record_length(OutputMode::IntelHex, record_length)?;
    let input = group.image.source_name.as_str();

    let mut records = Vec::new();
    let mut upper_half: u16 = 0;
    for segment in &group.segments {
        check_32bit_range(input, segment)?;
        for (address, chunk) in data_records(segment, record_length) {
            let record_upper = (address >> 16) as u16;
            if record_upper != upper_half {
                records.push(Record::ExtendedLinearAddress(record_upper));
                upper_half = record_upper;
            }
            records.push(Record::Data { offset: address as u16, value: chunk.to_vec() });
        }
    }

    if entry_point_record {
        records.push(Record::StartLinearAddress(entry_point_32(group.image)?));
    }
    records.push(Record::EndOfFile);

    let mut text = String::new();
    for record in &records {
        let line = record.to_record_string().map_err(|e| ConversionError::Encoding {
            input: input.to_string(),
            mode: OutputMode::IntelHex,
            message: format!("{e:?}"),
        })?;
        text.push_str(&line);
        text.push('\n');
    }

    log::debug!("{input}: encoded {} Intel hex record(s)", records.len());
    Ok(OutputArtifact::new(ArtifactKey::image(input), text.into_bytes()))
}
