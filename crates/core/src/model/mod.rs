//! Core data model for a conversion run.
//!
//! - `Segment` / `InputImage`: what the ELF reader hands to the engine.
//! - `OutputSpec` and its parts (`OutputMode`, `BankConfig`): the fully
//!   resolved configuration of one invocation.
//! - `OutputArtifact` / `ResolvedOutput`: what the encoders produce and what
//!   the engine finally returns.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::services::naming::NamePattern;

/// Default number of data bytes per Intel hex / S-record line.
pub const DEFAULT_RECORD_LENGTH: u32 = 16;

/// Which program header field supplies a segment's load address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    /// `p_paddr`, the load-time address.
    #[default]
    Physical,
    /// `p_vaddr`, the run-time address.
    Virtual,
}

/// One `PT_LOAD` region of an input image.
///
/// The file contents can never be longer than the in-memory size; the only
/// constructor enforces that, so every downstream stage can rely on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    physical_address: u64,
    virtual_address: u64,
    file_offset: u64,
    data: Vec<u8>,
    mem_size: u64,
}

impl Segment {
    /// Build a segment from its two addresses, its file contents and its
    /// in-memory size.
    pub fn new(
        physical_address: u64,
        virtual_address: u64,
        data: Vec<u8>,
        mem_size: u64,
    ) -> Result<Self, ConversionError> {
        let file_size = data.len() as u64;
        if file_size > mem_size {
            return Err(ConversionError::InvalidSegmentSizes {
                address: physical_address,
                file_size,
                mem_size,
            });
        }
        Ok(Self { physical_address, virtual_address, file_offset: 0, data, mem_size })
    }

    /// Segment whose physical and virtual addresses coincide.
    pub fn at(address: u64, data: Vec<u8>, mem_size: u64) -> Result<Self, ConversionError> {
        Self::new(address, address, data, mem_size)
    }

    /// Segment with no zero-initialized tail.
    pub fn with_data(address: u64, data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let mem_size = data.len() as u64;
        Self { physical_address: address, virtual_address: address, file_offset: 0, data, mem_size }
    }

    /// Record where the segment's bytes came from in the source file.
    pub fn with_file_offset(mut self, file_offset: u64) -> Self {
        self.file_offset = file_offset;
        self
    }

    pub fn physical_address(&self) -> u64 {
        self.physical_address
    }

    pub fn virtual_address(&self) -> u64 {
        self.virtual_address
    }

    /// Load address according to `kind`.
    pub fn address(&self, kind: AddressKind) -> u64 {
        match kind {
            AddressKind::Physical => self.physical_address,
            AddressKind::Virtual => self.virtual_address,
        }
    }

    pub fn file_offset(&self) -> u64 {
        self.file_offset
    }

    pub fn file_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn file_size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn mem_size(&self) -> u64 {
        self.mem_size
    }

    /// Number of zero bytes between the end of the file contents and the end
    /// of the in-memory image.
    pub fn zero_fill_size(&self) -> u64 {
        self.mem_size - self.file_size()
    }
}

/// All loadable segments of one input file plus its entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputImage {
    /// Name the file was given as (used for `%f` / `%F` and diagnostics).
    pub source_name: String,
    /// Segments in program header order.
    pub segments: Vec<Segment>,
    pub entry_point: u64,
}

impl InputImage {
    pub fn new(source_name: impl Into<String>, segments: Vec<Segment>, entry_point: u64) -> Self {
        Self { source_name: source_name.into(), segments, entry_point }
    }
}

/// Output format selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputMode {
    #[serde(rename = "ihex")]
    IntelHex,
    #[serde(rename = "srec")]
    MotorolaHex,
    #[serde(rename = "bin")]
    BinPerSegment,
    #[serde(rename = "bincombined")]
    BinCombined,
    #[serde(rename = "vhx")]
    VhxPerSegment,
    #[serde(rename = "vhxcombined")]
    VhxCombined,
}

impl OutputMode {
    pub const ALL: [OutputMode; 6] = [
        OutputMode::IntelHex,
        OutputMode::MotorolaHex,
        OutputMode::BinPerSegment,
        OutputMode::BinCombined,
        OutputMode::VhxPerSegment,
        OutputMode::VhxCombined,
    ];

    /// Command-line spelling of the mode (without the leading `--`).
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::IntelHex => "ihex",
            OutputMode::MotorolaHex => "srec",
            OutputMode::BinPerSegment => "bin",
            OutputMode::BinCombined => "bincombined",
            OutputMode::VhxPerSegment => "vhx",
            OutputMode::VhxCombined => "vhxcombined",
        }
    }

    /// Modes writing one artifact per selected segment.
    pub fn is_per_segment(&self) -> bool {
        matches!(self, OutputMode::BinPerSegment | OutputMode::VhxPerSegment)
    }

    /// Intel hex and S-records carry their own addressing.
    pub fn is_record_based(&self) -> bool {
        matches!(self, OutputMode::IntelHex | OutputMode::MotorolaHex)
    }

    pub fn is_vhx(&self) -> bool {
        matches!(self, OutputMode::VhxPerSegment | OutputMode::VhxCombined)
    }

    /// Bank interleaving only makes sense for the address-free formats.
    pub fn supports_banks(&self) -> bool {
        !self.is_record_based()
    }

    /// Largest data record length the format can express, if it has records.
    pub fn max_record_length(&self) -> Option<u32> {
        match self {
            OutputMode::IntelHex => Some(crate::services::encoders::ihex::MAX_RECORD_LENGTH),
            OutputMode::MotorolaHex => Some(crate::services::encoders::srec::MAX_RECORD_LENGTH),
            _ => None,
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputMode::ALL.into_iter().find(|mode| mode.as_str() == s).ok_or_else(|| {
            format!(
                "unknown output mode '{s}'; expected one of: {}",
                OutputMode::ALL.map(|m| m.as_str()).join(", ")
            )
        })
    }
}

/// Largest number of banks one output may be split into.
pub const MAX_BANK_COUNT: u32 = 1024;

/// Interleaving of one byte stream across `count` outputs, `width` bytes at
/// a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BankConfig {
    width: u32,
    count: u32,
}

impl BankConfig {
    pub fn new(width: u32, count: u32) -> Result<Self, ConversionError> {
        if width == 0 || count == 0 || count > MAX_BANK_COUNT {
            return Err(ConversionError::InvalidBankConfig { spec: format!("{width}x{count}") });
        }
        Ok(Self { width, count })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl fmt::Display for BankConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.count)
    }
}

impl FromStr for BankConfig {
    type Err = ConversionError;

    /// Parses `WIDTHxCOUNT`, e.g. `2x4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConversionError::InvalidBankConfig { spec: s.to_string() };
        let (width, count) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
        let count = count.trim().parse::<u32>().map_err(|_| invalid())?;
        BankConfig::new(width, count).map_err(|_| invalid())
    }
}

/// Fully resolved configuration for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub mode: OutputMode,
    /// Lower start address for combined images (`--base`).
    pub base_override: Option<u64>,
    pub bank: Option<BankConfig>,
    /// Keep only segments whose base address is listed (`--segments`).
    pub address_filter: Option<BTreeSet<u64>>,
    /// Data bytes per hex record (`--datareclen`).
    pub record_length: u32,
    /// Extend segments with zeros up to their memory size (`--zi`).
    pub include_zero_init: bool,
    pub use_virtual_address: bool,
    pub name_pattern: Option<NamePattern>,
    pub single_output_path: Option<PathBuf>,
    /// Emit the Intel hex start linear address record.
    pub entry_point_record: bool,
}

impl OutputSpec {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            base_override: None,
            bank: None,
            address_filter: None,
            record_length: DEFAULT_RECORD_LENGTH,
            include_zero_init: false,
            use_virtual_address: false,
            name_pattern: None,
            single_output_path: None,
            entry_point_record: true,
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.single_output_path = Some(path.into());
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, ConversionError> {
        self.name_pattern = Some(pattern.parse()?);
        Ok(self)
    }

    pub fn with_base(mut self, base: u64) -> Self {
        self.base_override = Some(base);
        self
    }

    pub fn with_banks(mut self, bank: BankConfig) -> Self {
        self.bank = Some(bank);
        self
    }

    pub fn with_segments(mut self, addresses: impl IntoIterator<Item = u64>) -> Self {
        self.address_filter = Some(addresses.into_iter().collect());
        self
    }

    pub fn with_record_length(mut self, record_length: u32) -> Self {
        self.record_length = record_length;
        self
    }

    pub fn with_zero_init(mut self, include_zero_init: bool) -> Self {
        self.include_zero_init = include_zero_init;
        self
    }

    pub fn with_virtual_addresses(mut self, use_virtual_address: bool) -> Self {
        self.use_virtual_address = use_virtual_address;
        self
    }

    pub fn without_entry_point_record(mut self) -> Self {
        self.entry_point_record = false;
        self
    }

    pub fn address_kind(&self) -> AddressKind {
        if self.use_virtual_address {
            AddressKind::Virtual
        } else {
            AddressKind::Physical
        }
    }
}

/// Identifies an artifact for naming and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub source_name: String,
    /// Segment base address, only for per-segment modes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<u64>,
    /// Bank index, only when banks are in use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<u32>,
}

impl ArtifactKey {
    /// Key for an artifact covering a whole input image.
    pub fn image(source_name: impl Into<String>) -> Self {
        Self { source_name: source_name.into(), address: None, bank: None }
    }

    /// Key for an artifact holding one segment.
    pub fn segment(source_name: impl Into<String>, address: u64) -> Self {
        Self { source_name: source_name.into(), address: Some(address), bank: None }
    }

    pub fn with_bank(mut self, bank: u32) -> Self {
        self.bank = Some(bank);
        self
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source_name)?;
        if let Some(address) = self.address {
            write!(f, " segment {address:#x}")?;
        }
        if let Some(bank) = self.bank {
            write!(f, " bank {bank}")?;
        }
        Ok(())
    }
}

/// Encoded output awaiting a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub key: ArtifactKey,
    pub bytes: Vec<u8>,
}

impl OutputArtifact {
    pub fn new(key: ArtifactKey, bytes: Vec<u8>) -> Self {
        Self { key, bytes }
    }
}

/// Final product of a run: where to write, and what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutput {
    pub path: PathBuf,
    pub key: ArtifactKey,
    pub bytes: Vec<u8>,
}
