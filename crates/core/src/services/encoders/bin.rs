//! Raw binary layout, shared by the bin and vhx modes.

use crate::error::ConversionError;
use crate::model::{ArtifactKey, OutputArtifact};
use crate::services::assemble::{AssembledSegment, ImageGroup};

/// One artifact per segment, holding exactly its assembled bytes. The base
/// address only shows up in the artifact key.
pub fn per_segment(group: &ImageGroup<'_>) -> Vec<OutputArtifact> {
    group
        .segments
        .iter()
        .map(|segment| {
            OutputArtifact::new(
                ArtifactKey::segment(&group.image.source_name, segment.base_address),
                segment.bytes.clone(),
            )
        })
        .collect()
}

/// All segments of one image in a single zero-padded buffer.
///
/// The buffer starts at `base_override` if given (it may only move the start
/// down), otherwise at the lowest segment address, and ends at the highest
/// end of any segment's bytes.
pub fn combined(
    group: &ImageGroup<'_>,
    base_override: Option<u64>,
) -> Result<OutputArtifact, ConversionError> {
    let input = group.image.source_name.as_str();
    let key = ArtifactKey::image(input);

    check_overlaps(input, &group.segments)?;

    let Some(lowest) = group.segments.iter().map(|s| s.base_address).min() else {
        return Ok(OutputArtifact::new(key, Vec::new()));
    };
    let base = match base_override {
        Some(base) if base > lowest => {
            return Err(ConversionError::BaseAboveSegment { input: input.to_string(), lowest, base })
        }
        Some(base) => base,
        None => lowest,
    };

    let too_large = || ConversionError::ImageTooLarge { input: input.to_string(), base };
    let mut end = base;
    for segment in &group.segments {
        end = end.max(segment.end().ok_or_else(too_large)?);
    }
    let size = usize::try_from(end - base).map_err(|_| too_large())?;

    let mut buffer = vec![0u8; size];
    for segment in &group.segments {
        let offset = (segment.base_address - base) as usize;
        buffer[offset..offset + segment.bytes.len()].copy_from_slice(&segment.bytes);
    }

    log::debug!("{input}: combined image at {base:#x}, {size:#x} bytes");
    Ok(OutputArtifact::new(key, buffer))
}

/// Reject any two segments whose memory extents intersect. Segments that
/// merely abut are fine.
pub fn check_overlaps(input: &str, segments: &[AssembledSegment]) -> Result<(), ConversionError> {
    // Empty segments occupy no memory.
    let mut ordered: Vec<&AssembledSegment> =
        segments.iter().filter(|s| s.mem_end() > s.base_address).collect();
    ordered.sort_by_key(|s| (s.base_address, s.mem_end()));

    let mut furthest: Option<&AssembledSegment> = None;
    for segment in ordered {
        if let Some(previous) = furthest {
            if segment.base_address < previous.mem_end() {
                return Err(ConversionError::OverlappingSegments {
                    input: input.to_string(),
                    first_start: previous.base_address,
                    first_end: previous.mem_end(),
                    second_start: segment.base_address,
                    second_end: segment.mem_end(),
                });
            }
        }
        if furthest.map_or(true, |previous| segment.mem_end() > previous.mem_end()) {
            furthest = Some(segment);
        }
    }
    Ok(())
}
