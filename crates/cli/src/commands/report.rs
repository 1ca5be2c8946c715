use anyhow::{Context, Result};
use elf2bin_core::ResolvedOutput;
use serde::{Deserialize, Serialize};

use crate::sha256_bytes;

/// One line of the `--json` / `--dry-run` report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputReport {
    pub path: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<u32>,
    pub size: usize,
    pub sha256: String,
}

impl OutputReport {
    pub fn from_output(output: &ResolvedOutput) -> Self {
        Self {
            path: output.path.to_string_lossy().to_string(),
            source: output.key.source_name.clone(),
            address: output.key.address,
            bank: output.key.bank,
            size: output.bytes.len(),
            sha256: sha256_bytes(&output.bytes),
        }
    }
}

pub fn build_report(outputs: &[ResolvedOutput]) -> Vec<OutputReport> {
    outputs.iter().map(OutputReport::from_output).collect()
}

/// Print what was (or, for a dry run, would be) written.
///
/// A plain successful run prints nothing.
pub fn print_report(outputs: &[ResolvedOutput], json: bool, dry_run: bool) -> Result<()> {
    if json {
        let serialized = serde_json::to_string_pretty(&build_report(outputs))
            .context("Failed to serialize output report to JSON")?;
        println!("{}", serialized);
    } else if dry_run {
        println!("Would write {} file(s):", outputs.len());
        for output in outputs {
            println!(
                "  - {} ({} bytes) from {}",
                output.path.display(),
                output.bytes.len(),
                output.key
            );
        }
    }
    Ok(())
}
