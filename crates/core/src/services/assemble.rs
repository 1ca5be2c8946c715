use crate::model::{InputImage, Segment};
use crate::services::select::{group_by_image, SelectedSegment};

/// Logical byte content of one selected segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledSegment {
    pub base_address: u64,
    /// In-memory size from the program header, kept for overlap checks.
    pub mem_size: u64,
    pub bytes: Vec<u8>,
}

impl AssembledSegment {
    /// Exclusive end address of the assembled bytes, if it fits in 64 bits.
    pub fn end(&self) -> Option<u64> {
        self.base_address.checked_add(self.bytes.len() as u64)
    }

    /// Exclusive end of the region the segment occupies in memory, counting
    /// both its bytes and its zero-initialized tail.
    pub fn mem_end(&self) -> u64 {
        let extent = self.mem_size.max(self.bytes.len() as u64);
        self.base_address.saturating_add(extent)
    }
}

/// The assembled segments of one input image, in selection order.
#[derive(Debug, Clone)]
pub struct ImageGroup<'a> {
    pub image: &'a InputImage,
    pub segments: Vec<AssembledSegment>,
}

/// File bytes of `segment`, extended with zeros up to its memory size when
/// `include_zero_init` is set.
pub fn assemble(segment: &Segment, include_zero_init: bool) -> Vec<u8> {
    let mut bytes = segment.file_bytes().to_vec();
    if include_zero_init {
        bytes.resize(bytes.len() + segment.zero_fill_size() as usize, 0);
    }
    bytes
}

/// Assemble every selected segment, grouped by input image.
pub fn assemble_selection<'a>(
    selection: &[SelectedSegment<'a>],
    include_zero_init: bool,
) -> Vec<ImageGroup<'a>> {
    group_by_image(selection)
        .into_iter()
        .map(|(image, members)| ImageGroup {
            image,
            segments: members
                .into_iter()
                .map(|selected| AssembledSegment {
                    base_address: selected.base_address,
                    mem_size: selected.segment.mem_size(),
                    bytes: assemble(selected.segment, include_zero_init),
                })
                .collect(),
        })
        .collect()
}
