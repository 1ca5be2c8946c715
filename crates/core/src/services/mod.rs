//! Conversion pipeline stages.
//!
//! Each stage is a plain function from explicit inputs to explicit outputs:
//! `select` -> `assemble` -> `encoders` (with `banks` for the bin/vhx
//! family) -> `naming`. `convert` strings them together.

pub mod assemble;
pub mod banks;
pub mod convert;
pub mod encoders;
pub mod naming;
pub mod select;
