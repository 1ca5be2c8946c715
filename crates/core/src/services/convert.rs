use crate::error::ConversionError;
use crate::model::{InputImage, OutputSpec, ResolvedOutput};
use crate::services::assemble::assemble_selection;
use crate::services::encoders::{self, check_record_length};
use crate::services::naming::{self, OutputTarget};
use crate::services::select::{group_by_image, select, SelectedSegment};

/// Convert `images` according to `spec`.
///
/// Either every output is returned, with distinct paths, or a single error
/// is. Configuration problems (record length, banks, output target, pattern
/// directives, ambiguous single output) are detected before any encoding.
pub fn convert(
    images: &[InputImage],
    spec: &OutputSpec,
) -> Result<Vec<ResolvedOutput>, ConversionError> {
    let target = validate(spec)?;

    let selection = select(images, spec.address_filter.as_ref(), spec.address_kind())?;
    let planned = planned_artifact_count(&selection, spec);
    target.check_count(planned)?;

    let groups = assemble_selection(&selection, spec.include_zero_init);
    let artifacts = encoders::encode(&groups, spec)?;
    log::debug!("{} output(s) encoded as {}", artifacts.len(), spec.mode);

    naming::resolve(artifacts, target)
}

/// Check the parts of `spec` that do not depend on the input images.
pub fn validate(spec: &OutputSpec) -> Result<OutputTarget<'_>, ConversionError> {
    check_record_length(spec.mode, spec.record_length)?;

    if spec.bank.is_some() && !spec.mode.supports_banks() {
        return Err(ConversionError::BanksUnsupported { mode: spec.mode });
    }

    let target = OutputTarget::from_spec(spec)?;
    if let OutputTarget::Pattern(pattern) = target {
        pattern.check_fields(spec.mode.is_per_segment(), spec.bank.is_some())?;
    }
    Ok(target)
}

/// Number of artifacts a run over `selection` will produce.
pub fn planned_artifact_count(selection: &[SelectedSegment<'_>], spec: &OutputSpec) -> usize {
    let per_bank = if spec.mode.is_per_segment() {
        selection.len()
    } else {
        group_by_image(selection).len()
    };
    per_bank * spec.bank.map_or(1, |bank| bank.count() as usize)
}
