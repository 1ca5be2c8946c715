use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, ArgGroup, Parser};
use elf2bin::commands::{convert_command, print_report, write_outputs, ConvertOptions};
use elf2bin::parse_address;
use elf2bin_core::{AddressKind, OutputMode};

/// Convert ELF executables into flat binary, Intel hex, Motorola S-record
/// or Verilog hex images.
///
/// This CLI is a thin wrapper around `elf2bin-core` (exposed in code as
/// `elf2bin_core`). All conversion logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "elf2bin",
    version,
    about = "Convert ELF images to binary and hex formats",
    long_about = None
)]
#[command(group(ArgGroup::new("mode").multiple(false)))]
struct Cli {
    /// Write Intel hex, one file per input.
    #[arg(long, group = "mode")]
    ihex: bool,

    /// Write Motorola S-records (S3/S7), one file per input.
    #[arg(long, group = "mode")]
    srec: bool,

    /// Write one raw binary file per segment.
    #[arg(long, group = "mode")]
    bin: bool,

    /// Write one raw binary per input, gaps between segments zero-filled.
    #[arg(long, group = "mode")]
    bincombined: bool,

    /// Write one Verilog hex file per segment.
    #[arg(long, group = "mode")]
    vhx: bool,

    /// Write one Verilog hex file per input, gaps zero-filled.
    #[arg(long, group = "mode")]
    vhxcombined: bool,

    /// Single output file. Only valid when exactly one file is produced.
    #[arg(short = 'o', long, conflicts_with = "output_pattern")]
    output: Option<PathBuf>,

    /// Output file name pattern.
    ///
    /// Directives: %f input file name without extension, %F full input file
    /// name, %a segment address (lower hex), %A segment address (upper hex),
    /// %b bank number, %% a literal percent sign.
    #[arg(short = 'O', long)]
    output_pattern: Option<String>,

    /// Start combined images at this address instead of the lowest segment.
    #[arg(long, value_parser = parse_address)]
    base: Option<u64>,

    /// Split each output into COUNT banks of WIDTH-byte chunks, e.g. `2x4`.
    #[arg(long, value_name = "WIDTHxCOUNT")]
    banks: Option<String>,

    /// Only convert the segments starting at these addresses.
    #[arg(long, value_parser = parse_address, value_delimiter = ',', value_name = "ADDR[,ADDR...]")]
    segments: Option<Vec<u64>>,

    /// Data bytes per Intel hex / S-record line (default 16).
    #[arg(long)]
    datareclen: Option<u32>,

    /// Include zero-initialized memory (e.g. `.bss`) in the output.
    #[arg(long, conflicts_with = "no_zi")]
    zi: bool,

    /// Leave zero-initialized memory out, even if the config file asks for it.
    #[arg(long)]
    no_zi: bool,

    /// Place segments at their physical (load) addresses. This is the default.
    #[arg(long, conflicts_with = "virtual_addresses")]
    physical: bool,

    /// Place segments at their virtual (run-time) addresses.
    #[arg(long = "virtual")]
    virtual_addresses: bool,

    /// Emit the Intel hex start linear address record. This is the default.
    #[arg(long, conflicts_with = "no_entry")]
    entry: bool,

    /// Do not emit the Intel hex start linear address record.
    #[arg(long)]
    no_entry: bool,

    /// YAML or JSON file supplying defaults for any of these options.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report what would be written without writing anything.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Print a JSON report of the outputs.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Input ELF files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

impl Cli {
    fn mode(&self) -> Option<OutputMode> {
        [
            (self.ihex, OutputMode::IntelHex),
            (self.srec, OutputMode::MotorolaHex),
            (self.bin, OutputMode::BinPerSegment),
            (self.bincombined, OutputMode::BinCombined),
            (self.vhx, OutputMode::VhxPerSegment),
            (self.vhxcombined, OutputMode::VhxCombined),
        ]
        .into_iter()
        .find_map(|(set, mode)| set.then_some(mode))
    }

    fn addresses(&self) -> Option<AddressKind> {
        if self.virtual_addresses {
            Some(AddressKind::Virtual)
        } else if self.physical {
            Some(AddressKind::Physical)
        } else {
            None
        }
    }

    /// `Some` only when one flag of a `--x` / `--no-x` pair was given.
    fn switch(on: bool, off: bool) -> Option<bool> {
        match (on, off) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            mode: self.mode(),
            output: self.output.clone(),
            output_pattern: self.output_pattern.clone(),
            base: self.base,
            banks: self.banks.clone(),
            segments: self.segments.clone(),
            datareclen: self.datareclen,
            zi: Self::switch(self.zi, self.no_zi),
            addresses: self.addresses(),
            entry_point_record: Self::switch(self.entry, self.no_entry),
            config: self.config.clone(),
            inputs: self.inputs.clone(),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli) -> Result<()> {
    let outputs = convert_command(&cli.convert_options())?;
    if !cli.dry_run {
        write_outputs(&outputs)?;
    }
    print_report(&outputs, cli.json, cli.dry_run)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("elf2bin: {err:#}");
            ExitCode::FAILURE
        }
    }
}
