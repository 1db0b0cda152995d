//! Core blocking IO for FieldsFile variants.
//!
//! Everything in a FieldsFile variant is addressed in words: big-endian integers or floats of
//! a fixed [`WordSize`]. This crate provides positioned reads over a [stateless reader][FfvReadAt],
//! a [cursor][WordReader] that decodes words into [`Values`](ffv_array::Values), and a
//! [writer][WordWriter] that encodes them.

pub use buf::*;
pub use codec::*;
pub use file::*;
pub use read::*;
pub use word::*;
pub use write::*;

mod buf;
mod codec;
mod file;
mod read;
mod word;
mod write;

/// The number of words in a disk sector. Payloads are padded to whole sectors.
pub const WORDS_PER_SECTOR: u64 = 2048;
