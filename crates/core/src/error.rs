use std::path::PathBuf;

use thiserror::Error;

use crate::model::{ArtifactKey, OutputMode};

/// Error type for a conversion run.
///
/// Configuration problems are reported before any encoding happens; data
/// problems abort the run while encoding. Either way the run produces no
/// output at all.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("{input}: no loadable segments found")]
    NoLoadableSegments { input: String },

    #[error("no segments selected for output{}", describe_filter(.requested))]
    EmptySelection { requested: Vec<u64> },

    #[error(
        "segment at address {address:#x} has file size {file_size:#x} larger than its memory size {mem_size:#x}"
    )]
    InvalidSegmentSizes { address: u64, file_size: u64, mem_size: u64 },

    #[error("data record length {requested} is out of range for {mode} output (allowed: 1..={max})")]
    RecordLengthOutOfRange { mode: OutputMode, requested: u32, max: u32 },

    #[error("{input}: data address does not fit in 32 bits")]
    AddressOverflow { input: String, address: u64 },

    #[error("{input}: entry point does not fit in 32 bits")]
    EntryPointOverflow { input: String, entry_point: u64 },

    #[error(
        "{input}: segments at address ranges [{first_start:#x},{first_end:#x}) and [{second_start:#x},{second_end:#x}) overlap"
    )]
    OverlappingSegments {
        input: String,
        first_start: u64,
        first_end: u64,
        second_start: u64,
        second_end: u64,
    },

    #[error(
        "{input}: first segment is at address {lowest:#x}, below the specified base address {base:#x}"
    )]
    BaseAboveSegment { input: String, lowest: u64, base: u64 },

    #[error("{input}: combined image starting at {base:#x} is too large to build in memory")]
    ImageTooLarge { input: String, base: u64 },

    #[error("invalid bank configuration '{spec}': expected WIDTHxCOUNT with both values at least 1 and COUNT at most {}", crate::model::MAX_BANK_COUNT)]
    InvalidBankConfig { spec: String },

    #[error("--banks cannot be used with {mode} output")]
    BanksUnsupported { mode: OutputMode },

    #[error("no output target: give an output file (-o) or an output file name pattern (-O)")]
    MissingOutputTarget,

    #[error("an output file (-o) and an output file name pattern (-O) cannot both be given")]
    ConflictingOutputTarget,

    #[error(
        "this command writes {count} output files, so the single output file '{}' is ambiguous; use an output file name pattern (-O)",
        .path.display()
    )]
    AmbiguousOutputTarget { count: usize, path: PathBuf },

    #[error("output file name pattern '{pattern}': invalid directive '{directive}': {reason}")]
    InvalidPatternDirective { pattern: String, directive: String, reason: String },

    #[error(
        "output file '{}' would be written more than once by this command ({first}; {second})",
        .path.display()
    )]
    DuplicateOutputPath { path: PathBuf, first: ArtifactKey, second: ArtifactKey },

    #[error("{input}: failed to encode {mode} output: {message}")]
    Encoding { input: String, mode: OutputMode, message: String },
}

impl ConversionError {
    /// Stable machine-readable identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::NoLoadableSegments { .. } => "no_loadable_segments",
            ConversionError::EmptySelection { .. } => "empty_selection",
            ConversionError::InvalidSegmentSizes { .. } => "invalid_segment_sizes",
            ConversionError::RecordLengthOutOfRange { .. } => "record_length_out_of_range",
            ConversionError::AddressOverflow { .. } => "address_overflow",
            ConversionError::EntryPointOverflow { .. } => "entry_point_overflow",
            ConversionError::OverlappingSegments { .. } => "overlapping_segments",
            ConversionError::BaseAboveSegment { .. } => "base_above_segment",
            ConversionError::ImageTooLarge { .. } => "image_too_large",
            ConversionError::InvalidBankConfig { .. } => "invalid_bank_config",
            ConversionError::BanksUnsupported { .. } => "banks_unsupported",
            ConversionError::MissingOutputTarget => "missing_output_target",
            ConversionError::ConflictingOutputTarget => "conflicting_output_target",
            ConversionError::AmbiguousOutputTarget { .. } => "ambiguous_output_target",
            ConversionError::InvalidPatternDirective { .. } => "invalid_pattern_directive",
            ConversionError::DuplicateOutputPath { .. } => "duplicate_output_path",
            ConversionError::Encoding { .. } => "encoding",
        }
    }

    /// True for errors caused by the invocation rather than the input data.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ConversionError::EmptySelection { .. }
                | ConversionError::RecordLengthOutOfRange { .. }
                | ConversionError::BaseAboveSegment { .. }
                | ConversionError::InvalidBankConfig { .. }
                | ConversionError::BanksUnsupported { .. }
                | ConversionError::MissingOutputTarget
                | ConversionError::ConflictingOutputTarget
                | ConversionError::AmbiguousOutputTarget { .. }
                | ConversionError::InvalidPatternDirective { .. }
                | ConversionError::DuplicateOutputPath { .. }
        )
    }
}

fn describe_filter(requested: &[u64]) -> String {
    if requested.is_empty() {
        return String::new();
    }
    let list: Vec<String> = requested.iter().map(|address| format!("{address:#x}")).collect();
    format!(" (no segment is based at any of {})", list.join(", "))
}
