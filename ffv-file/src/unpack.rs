use ffv_array::Array;
use ffv_error::{FfvResult, ffv_bail};

/// Decodes the payload of an archival (WGDOS) packed field.
///
/// The unpacker receives exactly the packed bytes of one field, the grid shape and the field's
/// missing data indicator, and returns the decoded grid unmodified by the caller.
pub trait Unpacker: Send + Sync {
    fn unpack(&self, bytes: &[u8], rows: usize, cols: usize, mdi: f64) -> FfvResult<Array>;
}

impl<F> Unpacker for F
where
    F: Fn(&[u8], usize, usize, f64) -> FfvResult<Array> + Send + Sync,
{
    fn unpack(&self, bytes: &[u8], rows: usize, cols: usize, mdi: f64) -> FfvResult<Array> {
        self(bytes, rows, cols, mdi)
    }
}

/// The default unpacker, which rejects every archival packed field.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUnpacker;

impl Unpacker for NoUnpacker {
    fn unpack(&self, bytes: &[u8], rows: usize, cols: usize, _mdi: f64) -> FfvResult<Array> {
        ffv_bail!(
            UnsupportedEncoding: "no unpacker is configured for archival packed data ({} bytes for {}x{} grid)",
            bytes.len(),
            rows,
            cols
        )
    }
}
