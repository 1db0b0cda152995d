//! Owned n-dimensional numeric arrays.
//!
//! An [`Array`] is a flat buffer of [`Values`] plus a shape and the [`Order`] in which the
//! buffer enumerates that shape. Field payloads are row-major; constants blocks and the LOOKUP
//! table are stored column-major on disk and are kept that way in memory so that rewriting a
//! file reproduces the original byte layout.

pub use array::*;
pub use order::*;
pub use values::*;

mod array;
mod order;
mod values;
