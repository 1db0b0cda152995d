use std::io::{self, Read, Seek, SeekFrom, Write};

use ffv_array::Values;
use ffv_dtype::Kind;
use ffv_error::FfvResult;

use crate::{WordSize, encode_values};

/// A positioned writer of big-endian words.
pub struct WordWriter<W> {
    inner: W,
    word_size: WordSize,
}

impl<W: Write + Seek> WordWriter<W> {
    pub fn new(inner: W, word_size: WordSize) -> Self {
        Self { inner, word_size }
    }

    pub fn word_size(&self) -> WordSize {
        self.word_size
    }

    /// The current byte offset.
    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    /// The number of whole words before the current position.
    pub fn word_position(&mut self) -> io::Result<u64> {
        Ok(self.position()? / self.word_size.bytes_u64())
    }

    pub fn seek(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos)).map(|_| ())
    }

    /// Move to a 1-based word number.
    pub fn seek_word(&mut self, word: i64) -> FfvResult<()> {
        let pos = self.word_size.word_offset(word)?;
        Ok(self.seek(pos)?)
    }

    /// Write values as words of the given kind, converting them if necessary.
    pub fn write_values(&mut self, values: &Values, kind: Kind) -> FfvResult<()> {
        let bytes = encode_values(values, self.word_size.ptype(kind));
        self.inner.write_all(&bytes)?;
        Ok(())
    }

    /// Write zero bytes until the position is a multiple of `boundary` bytes.
    pub fn pad_to(&mut self, boundary: u64) -> io::Result<u64> {
        let overrun = self.position()? % boundary;
        if overrun == 0 {
            return Ok(0);
        }
        let padding = boundary - overrun;
        io::copy(&mut io::repeat(0).take(padding), &mut self.inner)?;
        Ok(padding)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
