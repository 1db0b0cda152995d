#![allow(clippy::cast_possible_truncation)]
//! Read and write FieldsFile variants, the binary files used by the Unified Model to store
//! gridded fields together with the metadata that describes them.
//!
//! # File Format
//!
//! Every word in a file has the same width, 4 or 8 bytes, and is stored big-endian. Word
//! numbers in the file's own pointers are 1-based.
//!
//! ```text
//! ┌───────────────────────────────┐  word 1
//! │ fixed length header (256)     │  pointers: <component>_start, <component>_shape
//! ├───────────────────────────────┤  word 257
//! │ constants blocks (optional)   │  integer/real/level/row/column constants, ...
//! ├───────────────────────────────┤  lookup_start
//! │ LOOKUP (width x fields)       │  45 integer words + real words per field
//! ├ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ┤  padding to a whole sector (2048 words)
//! │ DATA                          │  data_start: per-field payloads, each sector padded
//! └───────────────────────────────┘
//! ```
//!
//! # Reading
//!
//! [`VariantFile::open`] reads the fixed length header, the constants blocks and the LOOKUP
//! table eagerly. Field payloads are decoded lazily by [`FieldRecord::read_data`], so a file
//! with one undecodable field can still be opened and its other fields read. Archival packed
//! payloads are handed to an [`Unpacker`] configured through [`FfvOpenOptions`].
//!
//! # Writing
//!
//! Files opened in [`Mode::Update`] or [`Mode::Create`] are written in full when closed: the
//! layout is computed by [`VariantFile::prepare_header`], the file is written to a temporary
//! path, and that path then replaces the original.

pub use component::*;
pub use file::*;
pub use header::*;
pub use locator::*;
pub use lookup::*;
pub use open::*;
pub use packing::{Compression, NumberFormat, Packing};
pub use unpack::*;

mod component;
mod file;
mod header;
mod locator;
mod lookup;
mod open;
mod packing;
mod unpack;
mod write;

#[cfg(test)]
mod tests;
