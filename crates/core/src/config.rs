//! Optional per-invocation config file.
//!
//! A config file supplies defaults for any conversion option; frontends let
//! explicit command-line flags win over it. YAML (`.yaml`, `.yml`) and JSON
//! (`.json`) are accepted. Example:
//!
//! ```yaml
//! mode: bincombined
//! output-pattern: "%f-%b.bin"
//! base: 0x8000
//! banks: 2x4
//! segments: [0x8000, "0x9000"]
//! zi: true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AddressKind, OutputMode};

/// Error type for loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse config JSON {}: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },

    #[error("Failed to parse config YAML {}: {source}", .path.display())]
    Yaml { path: PathBuf, source: serde_yaml::Error },

    #[error("Unknown config file format for {} (expected .yaml, .yml or .json)", .path.display())]
    UnknownFormat { path: PathBuf },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidValue { field: String, value: String, reason: String },
}

/// An address given either as a YAML/JSON integer or as text such as
/// `"0x8000"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddressValue {
    Number(u64),
    Text(String),
}

impl AddressValue {
    pub fn resolve(&self, field: &str) -> Result<u64, ConfigError> {
        match self {
            AddressValue::Number(n) => Ok(*n),
            AddressValue::Text(text) => parse_address(text).map_err(|reason| {
                ConfigError::InvalidValue { field: field.to_string(), value: text.clone(), reason }
            }),
        }
    }
}

/// Serializable defaults for one conversion invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ConversionConfig {
    pub mode: Option<OutputMode>,
    pub output: Option<PathBuf>,
    pub output_pattern: Option<String>,
    pub base: Option<AddressValue>,
    /// `WIDTHxCOUNT`, e.g. `2x4`.
    pub banks: Option<String>,
    pub segments: Option<Vec<AddressValue>>,
    pub datareclen: Option<u32>,
    pub zi: Option<bool>,
    pub addresses: Option<AddressKind>,
    pub entry_point_record: Option<bool>,
}

impl ConversionConfig {
    /// The `base` value as a number, if present.
    pub fn base_address(&self) -> Result<Option<u64>, ConfigError> {
        self.base.as_ref().map(|value| value.resolve("base")).transpose()
    }

    /// The `segments` list as numbers, if present.
    pub fn segment_addresses(&self) -> Result<Option<Vec<u64>>, ConfigError> {
        self.segments
            .as_ref()
            .map(|values| values.iter().map(|value| value.resolve("segments")).collect())
            .transpose()
    }
}

/// Load a config file, picking the parser from its extension.
pub fn load_config(path: &Path) -> Result<ConversionConfig, ConfigError> {
    let text = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

    let extension = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
    let config = match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
            .map_err(|source| ConfigError::Yaml { path: path.to_path_buf(), source })?,
        Some("json") => serde_json::from_str(&text)
            .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })?,
        _ => return Err(ConfigError::UnknownFormat { path: path.to_path_buf() }),
    };
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Parse an address or size written in decimal or with a `0x` prefix.
pub fn parse_address(text: &str) -> Result<u64, String> {
    let trimmed = text.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|e| format!("'{text}' is not a valid address ({e})"))
}
