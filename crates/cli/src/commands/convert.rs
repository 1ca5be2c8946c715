use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use elf2bin_core::config::{load_config, ConversionConfig};
use elf2bin_core::services::naming::NamePattern;
use elf2bin_core::{AddressKind, BankConfig, InputImage, OutputMode, OutputSpec, ResolvedOutput};

use crate::read_input_image;

/// Conversion options as given on the command line, before a config file
/// fills in whatever was left unset.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub mode: Option<OutputMode>,
    pub output: Option<PathBuf>,
    pub output_pattern: Option<String>,
    pub base: Option<u64>,
    pub banks: Option<String>,
    pub segments: Option<Vec<u64>>,
    pub datareclen: Option<u32>,
    pub zi: Option<bool>,
    pub addresses: Option<AddressKind>,
    pub entry_point_record: Option<bool>,
    pub config: Option<PathBuf>,
    pub inputs: Vec<PathBuf>,
}

/// Merge command-line options over `config` into a complete `OutputSpec`.
pub fn build_output_spec(opts: &ConvertOptions, config: &ConversionConfig) -> Result<OutputSpec> {
    let mode = opts.mode.or(config.mode).ok_or_else(|| {
        anyhow!(
            "No output format given: use one of {}",
            OutputMode::ALL.map(|m| format!("--{m}")).join(", ")
        )
    })?;
    let mut spec = OutputSpec::new(mode);

    // -o / -O on the command line replace both config entries.
    let (output, pattern) = if opts.output.is_some() || opts.output_pattern.is_some() {
        (opts.output.clone(), opts.output_pattern.clone())
    } else {
        (config.output.clone(), config.output_pattern.clone())
    };
    spec.single_output_path = output;
    spec.name_pattern = pattern.as_deref().map(str::parse::<NamePattern>).transpose()?;

    spec.base_override = match opts.base {
        Some(base) => Some(base),
        None => config.base_address()?,
    };
    spec.bank = opts
        .banks
        .as_deref()
        .or(config.banks.as_deref())
        .map(str::parse::<BankConfig>)
        .transpose()?;
    let segments = match &opts.segments {
        Some(segments) => Some(segments.clone()),
        None => config.segment_addresses()?,
    };
    spec.address_filter = segments.map(|list| list.into_iter().collect());
    if let Some(record_length) = opts.datareclen.or(config.datareclen) {
        spec.record_length = record_length;
    }
    spec.include_zero_init = opts.zi.or(config.zi).unwrap_or(false);
    spec.use_virtual_address =
        opts.addresses.or(config.addresses).unwrap_or_default() == AddressKind::Virtual;
    spec.entry_point_record =
        opts.entry_point_record.or(config.entry_point_record).unwrap_or(true);

    Ok(spec)
}

/// Read every input file, in command-line order.
pub fn load_inputs(inputs: &[PathBuf]) -> Result<Vec<InputImage>> {
    inputs.iter().map(|path| read_input_image(path)).collect()
}

/// Run a conversion without writing anything.
pub fn convert_command(opts: &ConvertOptions) -> Result<Vec<ResolvedOutput>> {
    let config = match &opts.config {
        Some(path) => load_config(path)?,
        None => ConversionConfig::default(),
    };
    let spec = build_output_spec(opts, &config)?;
    if opts.inputs.is_empty() {
        return Err(anyhow!("No input files given"));
    }
    let images = load_inputs(&opts.inputs)?;
    log::debug!("converting {} input file(s) to {}", images.len(), spec.mode);

    Ok(elf2bin_core::convert(&images, &spec)?)
}

/// Write each resolved output to its path.
pub fn write_outputs(outputs: &[ResolvedOutput]) -> Result<()> {
    for output in outputs {
        fs::write(&output.path, &output.bytes).with_context(|| {
            format!("Failed to write output file: {}", output.path.display())
        })?;
        log::info!(
            "wrote {} ({} bytes) for {}",
            output.path.display(),
            output.bytes.len(),
            output.key
        );
    }
    Ok(())
}
