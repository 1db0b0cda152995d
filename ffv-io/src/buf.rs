use std::io;

use bytes::Bytes;
use ffv_array::Values;
use ffv_dtype::PType;
use ffv_error::{FfvResult, ffv_err};

use crate::{FfvReadAt, check_range, decode_values};

/// A stateful reader that wraps an internal [stateless reader][FfvReadAt].
///
/// Read operations will advance the cursor.
#[derive(Clone)]
pub struct WordReader<R> {
    inner: R,
    pos: u64,
}

impl<R> WordReader<R> {
    /// Create a new reader wrapping a stateless reader, with reads beginning at offset 0.
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    /// Set the position of the next read directly.
    ///
    /// Note: this method will not fail if the position is past the end of the valid range,
    /// the failure will occur at read time.
    pub fn set_position(&mut self, pos: u64) {
        self.pos = pos;
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: FfvReadAt> WordReader<R> {
    /// Perform an exactly-sized read at the current cursor position, advancing
    /// the cursor and returning the bytes.
    pub fn read_bytes(&mut self, len: u64) -> io::Result<Bytes> {
        check_range(self.pos, len, self.inner.size()?)?;
        let result = self.inner.read_byte_range(self.pos, len)?;
        self.pos += len;
        Ok(result)
    }

    /// Read and decode `count` big-endian elements of the given type.
    ///
    /// Running out of data is reported as a format error rather than an IO error: the file's
    /// own structure promised values that are not there.
    pub fn read_values(&mut self, ptype: PType, count: usize) -> FfvResult<Values> {
        let start = self.pos;
        let len = count
            .checked_mul(ptype.byte_width())
            .and_then(|len| u64::try_from(len).ok())
            .ok_or_else(|| ffv_err!(Format: "{} {} values cannot be addressed", count, ptype))?;
        let bytes = self.read_bytes(len).map_err(|err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                ffv_err!(
                    Format: "expected {} {} values at byte {}: {}",
                    count,
                    ptype,
                    start,
                    err
                )
            } else {
                err.into()
            }
        })?;
        decode_values(bytes, ptype)
    }
}
