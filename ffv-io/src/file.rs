use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;

use crate::{FfvReadAt, check_range};

/// An open file handle shared between a file and the fields that read from it.
///
/// Closing the handle is explicit and affects every clone: subsequent reads fail rather than
/// reopening the file.
#[derive(Debug, Clone)]
pub struct SharedFile {
    inner: Arc<Mutex<Option<File>>>,
}

impl SharedFile {
    pub fn new(file: File) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(file))),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().is_none()
    }

    /// Drop the underlying handle. Closing an already closed file does nothing.
    pub fn close(&self) {
        if self.inner.lock().take().is_some() {
            log::trace!("closed file handle");
        }
    }

    fn closed_error() -> io::Error {
        io::Error::new(io::ErrorKind::NotConnected, "file has been closed")
    }
}

impl FfvReadAt for SharedFile {
    fn read_byte_range(&self, pos: u64, len: u64) -> io::Result<Bytes> {
        let mut guard = self.inner.lock();
        let file = guard.as_mut().ok_or_else(Self::closed_error)?;
        // The length comes from the file's own word counts, so check it before allocating.
        check_range(pos, len, file.metadata()?.len())?;
        let len = usize::try_from(len).map_err(io::Error::other)?;
        file.seek(SeekFrom::Start(pos))?;
        let mut buffer = BytesMut::zeroed(len);
        file.read_exact(&mut buffer)?;
        Ok(buffer.freeze())
    }

    fn size(&self) -> io::Result<u64> {
        let guard = self.inner.lock();
        let file = guard.as_ref().ok_or_else(Self::closed_error)?;
        Ok(file.metadata()?.len())
    }
}
