//! elf2bin-core
//!
//! Core library for turning the loadable segments of ELF images into raw
//! binary, Intel hex, Motorola S-record and Verilog hex output.
//!
//! This crate defines the segment model, the conversion pipeline (segment
//! selection, byte-stream assembly, format encoders, bank interleaving and
//! output naming), the ELF reader that feeds it, and the optional config file
//! format used by frontends.
//!
//! The conversion pipeline itself never touches the file system: it maps
//! `InputImage`s plus an `OutputSpec` to a list of `(path, bytes)` pairs, so
//! it can be tested with synthesized segments and reused from any frontend.

pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod services;

pub use error::ConversionError;
pub use model::{
    AddressKind, ArtifactKey, BankConfig, InputImage, OutputArtifact, OutputMode, OutputSpec,
    ResolvedOutput, Segment,
};
pub use services::convert::convert;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
