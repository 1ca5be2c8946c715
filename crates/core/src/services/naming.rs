//! Output file naming.
//!
//! A run writes either to one explicit path or to paths built from a name
//! pattern. Pattern directives:
//!
//! - `%f`: input file name without directory or extension
//! - `%F`: input file name without directory
//! - `%a` / `%A`: segment base address in lower / upper case hex, no leading
//!   zeros
//! - `%b`: bank index in decimal
//! - `%%`: a literal `%`
//!
//! All paths of a run are computed before any of them is handed out, so a
//! collision anywhere fails the whole run.

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use crate::error::ConversionError;
use crate::model::{ArtifactKey, OutputArtifact, OutputSpec, ResolvedOutput};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    FileStem,
    FileName,
    AddressLower,
    AddressUpper,
    Bank,
}

impl Piece {
    fn directive(&self) -> &'static str {
        match self {
            Piece::Literal(_) => "",
            Piece::FileStem => "%f",
            Piece::FileName => "%F",
            Piece::AddressLower => "%a",
            Piece::AddressUpper => "%A",
            Piece::Bank => "%b",
        }
    }
}

/// A parsed output file name pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    text: String,
    pieces: Vec<Piece>,
}

impl NamePattern {
    pub fn parse(text: &str) -> Result<Self, ConversionError> {
        let invalid = |directive: String, reason: &str| ConversionError::InvalidPatternDirective {
            pattern: text.to_string(),
            directive,
            reason: reason.to_string(),
        };

        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let piece = match chars.next() {
                Some('%') => {
                    literal.push('%');
                    continue;
                }
                Some('f') => Piece::FileStem,
                Some('F') => Piece::FileName,
                Some('a') => Piece::AddressLower,
                Some('A') => Piece::AddressUpper,
                Some('b') => Piece::Bank,
                Some(other) => {
                    return Err(invalid(
                        format!("%{other}"),
                        "unknown directive (expected %f, %F, %a, %A, %b or %%)",
                    ))
                }
                None => return Err(invalid("%".to_string(), "pattern ends with a lone '%'")),
            };
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(piece);
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self { text: text.to_string(), pieces })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn uses_address(&self) -> bool {
        self.pieces.iter().any(|p| matches!(p, Piece::AddressLower | Piece::AddressUpper))
    }

    pub fn uses_bank(&self) -> bool {
        self.pieces.iter().any(|p| matches!(p, Piece::Bank))
    }

    /// Fail if the pattern refers to data the run's artifacts will not have.
    pub fn check_fields(&self, has_address: bool, has_bank: bool) -> Result<(), ConversionError> {
        for piece in &self.pieces {
            let reason = match piece {
                Piece::AddressLower | Piece::AddressUpper if !has_address => {
                    "segment addresses are only available in the per-segment output modes (bin, vhx)"
                }
                Piece::Bank if !has_bank => "bank numbers are only available together with --banks",
                _ => continue,
            };
            return Err(self.invalid(piece, reason));
        }
        Ok(())
    }

    /// Build the file name for `key`.
    pub fn expand(&self, key: &ArtifactKey) -> Result<PathBuf, ConversionError> {
        let source = Path::new(&key.source_name);
        let mut name = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => name.push_str(text),
                Piece::FileStem => name.push_str(&file_part(source.file_stem(), &key.source_name)),
                Piece::FileName => name.push_str(&file_part(source.file_name(), &key.source_name)),
                Piece::AddressLower | Piece::AddressUpper => {
                    let address = key.address.ok_or_else(|| {
                        self.invalid(piece, &format!("output for {key} has no segment address"))
                    })?;
                    if matches!(piece, Piece::AddressLower) {
                        name.push_str(&format!("{address:x}"));
                    } else {
                        name.push_str(&format!("{address:X}"));
                    }
                }
                Piece::Bank => {
                    let bank = key.bank.ok_or_else(|| {
                        self.invalid(piece, &format!("output for {key} has no bank number"))
                    })?;
                    name.push_str(&bank.to_string());
                }
            }
        }
        Ok(PathBuf::from(name))
    }

    fn invalid(&self, piece: &Piece, reason: &str) -> ConversionError {
        ConversionError::InvalidPatternDirective {
            pattern: self.text.clone(),
            directive: piece.directive().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for NamePattern {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NamePattern::parse(s)
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn file_part(part: Option<&std::ffi::OsStr>, fallback: &str) -> String {
    part.map(|p| p.to_string_lossy().into_owned()).unwrap_or_else(|| fallback.to_string())
}

/// Where a run's artifacts go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget<'a> {
    Single(&'a Path),
    Pattern(&'a NamePattern),
}

impl<'a> OutputTarget<'a> {
    /// Pick the target out of an `OutputSpec`; exactly one form must be present.
    pub fn from_spec(spec: &'a OutputSpec) -> Result<Self, ConversionError> {
        match (&spec.single_output_path, &spec.name_pattern) {
            (Some(path), None) => Ok(OutputTarget::Single(path)),
            (None, Some(pattern)) => Ok(OutputTarget::Pattern(pattern)),
            (None, None) => Err(ConversionError::MissingOutputTarget),
            (Some(_), Some(_)) => Err(ConversionError::ConflictingOutputTarget),
        }
    }

    /// Fail if this target cannot name `count` artifacts.
    pub fn check_count(&self, count: usize) -> Result<(), ConversionError> {
        match self {
            OutputTarget::Single(path) if count > 1 => {
                Err(ConversionError::AmbiguousOutputTarget { count, path: path.to_path_buf() })
            }
            _ => Ok(()),
        }
    }
}

/// Assign a path to every artifact and verify that no two coincide.
pub fn resolve(
    artifacts: Vec<OutputArtifact>,
    target: OutputTarget<'_>,
) -> Result<Vec<ResolvedOutput>, ConversionError> {
    target.check_count(artifacts.len())?;

    let mut resolved = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = match target {
            OutputTarget::Single(path) => path.to_path_buf(),
            OutputTarget::Pattern(pattern) => pattern.expand(&artifact.key)?,
        };
        resolved.push(ResolvedOutput { path, key: artifact.key, bytes: artifact.bytes });
    }

    check_duplicates(&resolved)?;
    Ok(resolved)
}

/// Report the first path claimed by two artifacts.
pub fn check_duplicates(outputs: &[ResolvedOutput]) -> Result<(), ConversionError> {
    let mut seen: HashMap<PathBuf, usize> = HashMap::with_capacity(outputs.len());
    for (index, output) in outputs.iter().enumerate() {
        if let Some(&first) = seen.get(&normalize_path(&output.path)) {
            return Err(ConversionError::DuplicateOutputPath {
                path: output.path.clone(),
                first: outputs[first].key.clone(),
                second: output.key.clone(),
            });
        }
        seen.insert(normalize_path(&output.path), index);
    }
    Ok(())
}

/// Lexical normalization: drops `.` components and redundant separators.
/// Case and `..` components are kept as written.
pub fn normalize_path(path: &Path) -> PathBuf {
    let normalized: PathBuf =
        path.components().filter(|c| !matches!(c, Component::CurDir)).collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}
