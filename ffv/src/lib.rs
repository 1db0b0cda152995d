//! Read and write FieldsFile variants.

pub use ffv_file::*;
pub use {
    ffv_array as array, ffv_dtype as dtype, ffv_error as error, ffv_file as file, ffv_io as io,
};
