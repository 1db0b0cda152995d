use std::io;
use std::sync::Arc;

use bytes::Bytes;

/// A trait for types that support blocking positional reads.
///
/// Readers are shared between the file that owns them and every field that lazily decodes
/// its payload, so reads take `&self` and implementations serialize access internally.
pub trait FfvReadAt: Send + Sync {
    /// Read exactly `len` bytes starting at `pos`.
    ///
    /// If the reader does not have the requested number of bytes, this returns an
    /// [`UnexpectedEof`][io::ErrorKind::UnexpectedEof] error.
    fn read_byte_range(&self, pos: u64, len: u64) -> io::Result<Bytes>;

    /// The number of bytes of data readable.
    fn size(&self) -> io::Result<u64>;
}

/// Fail with [`UnexpectedEof`][io::ErrorKind::UnexpectedEof] unless `len` bytes from `pos` lie
/// within `size` bytes.
pub fn check_range(pos: u64, len: u64, size: u64) -> io::Result<()> {
    if pos.checked_add(len).is_none_or(|end| end > size) {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("unexpected eof: requested {len} bytes at {pos} of {size}"),
        ));
    }
    Ok(())
}

impl<T: FfvReadAt + ?Sized> FfvReadAt for Arc<T> {
    fn read_byte_range(&self, pos: u64, len: u64) -> io::Result<Bytes> {
        T::read_byte_range(self, pos, len)
    }

    fn size(&self) -> io::Result<u64> {
        T::size(self)
    }
}

impl<T: FfvReadAt + ?Sized> FfvReadAt for &T {
    fn read_byte_range(&self, pos: u64, len: u64) -> io::Result<Bytes> {
        T::read_byte_range(self, pos, len)
    }

    fn size(&self) -> io::Result<u64> {
        T::size(self)
    }
}

impl FfvReadAt for Bytes {
    fn read_byte_range(&self, pos: u64, len: u64) -> io::Result<Bytes> {
        check_range(pos, len, self.size()?)?;
        let start = usize::try_from(pos).map_err(io::Error::other)?;
        let end = usize::try_from(pos + len).map_err(io::Error::other)?;
        Ok(self.slice(start..end))
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }
}
