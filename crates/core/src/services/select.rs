use std::collections::BTreeSet;

use crate::error::ConversionError;
use crate::model::{AddressKind, InputImage, Segment};

/// A segment chosen for output, with its resolved load address.
#[derive(Debug, Clone, Copy)]
pub struct SelectedSegment<'a> {
    pub image: &'a InputImage,
    pub segment: &'a Segment,
    pub base_address: u64,
}

/// Pick the segments to convert, in image-then-program-header order.
///
/// With an `address_filter`, a segment is kept only if its load address
/// (physical or virtual, per `address_kind`) is listed. Filter entries that
/// match nothing are fine, since one list may be shared by several images,
/// but an empty overall selection is an error.
pub fn select<'a>(
    images: &'a [InputImage],
    address_filter: Option<&BTreeSet<u64>>,
    address_kind: AddressKind,
) -> Result<Vec<SelectedSegment<'a>>, ConversionError> {
    let mut selected = Vec::new();

    for image in images {
        if image.segments.is_empty() {
            return Err(ConversionError::NoLoadableSegments { input: image.source_name.clone() });
        }

        for segment in &image.segments {
            let base_address = segment.address(address_kind);
            if let Some(filter) = address_filter {
                if !filter.contains(&base_address) {
                    log::debug!(
                        "{}: skipping segment at {base_address:#x} (not in --segments)",
                        image.source_name
                    );
                    continue;
                }
            }
            selected.push(SelectedSegment { image, segment, base_address });
        }
    }

    if selected.is_empty() {
        let requested = address_filter.map(|f| f.iter().copied().collect()).unwrap_or_default();
        return Err(ConversionError::EmptySelection { requested });
    }

    log::debug!("selected {} segment(s) from {} image(s)", selected.len(), images.len());
    Ok(selected)
}

/// Group a selection by input image, keeping first-seen image order.
pub fn group_by_image<'s, 'a>(
    selection: &'s [SelectedSegment<'a>],
) -> Vec<(&'a InputImage, Vec<&'s SelectedSegment<'a>>)> {
    let mut groups: Vec<(&'a InputImage, Vec<&'s SelectedSegment<'a>>)> = Vec::new();
    for selected in selection {
        match groups.iter_mut().find(|(image, _)| std::ptr::eq(*image, selected.image)) {
            Some((_, members)) => members.push(selected),
            None => groups.push((selected.image, vec![selected])),
        }
    }
    groups
}
