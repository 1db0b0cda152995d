#![deny(missing_docs)]

//! Element types for FieldsFile variant words and field payloads.
//!
//! Every word on disk is a big-endian integer or IEEE float of the file's word size, or a
//! 32-bit value for reduced-precision payloads. [`PType`] names the concrete element type and
//! [`Kind`] the integer/floating-point split that the file format declares for each block.

pub use kind::*;
pub use ptype::*;

mod kind;
mod ptype;
