//! The LOOKUP table: one header record per field, each naming where its payload lives.

pub use record::*;
pub use schema::*;

mod record;
mod schema;
