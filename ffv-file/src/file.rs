use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use ffv_array::Array;
use ffv_error::{FfvResult, ffv_bail};
use ffv_io::{SharedFile, WordSize};
use itertools::Itertools;

use crate::{Component, FfvOpenOptions, FieldRecord, FixedHeader, Mode};

/// A FieldsFile variant opened from, or to be written to, a path on disk.
///
/// The header, constants and fields are all held in memory and may be modified freely. Files
/// opened for [update](Mode::Update) or [creation](Mode::Create) are written out in full when
/// they are [closed](VariantFile::close), which also happens when the file is dropped.
pub struct VariantFile {
    path: PathBuf,
    mode: Mode,
    options: FfvOpenOptions,
    source: SharedFile,
    header: FixedHeader,
    constants: [Option<Array>; Component::COUNT],
    fields: Vec<FieldRecord>,
    closed: bool,
}

impl VariantFile {
    pub(crate) fn new(
        path: PathBuf,
        mode: Mode,
        options: FfvOpenOptions,
        source: SharedFile,
        header: FixedHeader,
        constants: [Option<Array>; Component::COUNT],
        fields: Vec<FieldRecord>,
    ) -> Self {
        Self {
            path,
            mode,
            options,
            source,
            header,
            constants,
            fields,
            closed: false,
        }
    }

    /// Open a file with default options apart from the word size.
    pub fn open(path: impl AsRef<Path>, mode: Mode, word_size: WordSize) -> FfvResult<Self> {
        FfvOpenOptions::default()
            .with_word_size(word_size)
            .open(path, mode)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn word_size(&self) -> WordSize {
        self.options.word_size()
    }

    pub(crate) fn options(&self) -> &FfvOpenOptions {
        &self.options
    }

    pub fn header(&self) -> &FixedHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut FixedHeader {
        &mut self.header
    }

    /// The values of a constants block, or `None` if the block is absent.
    pub fn constants(&self, component: Component) -> Option<&Array> {
        self.constants[component.index()].as_ref()
    }

    /// Replace or remove a constants block.
    ///
    /// Multi-dimensional blocks must match the number of dimensions the header records for them.
    pub fn set_constants(&mut self, component: Component, values: Option<Array>) -> FfvResult<()> {
        if let Some(array) = &values {
            let dims = self.header.component_shape(component).len();
            if array.ndim() != dims {
                ffv_bail!(
                    Layout: "{} has {} dimensions but was given shape ({})",
                    component,
                    dims,
                    array.shape().iter().join(", ")
                );
            }
        }
        self.constants[component.index()] = values;
        Ok(())
    }

    pub(crate) fn components(&self) -> impl Iterator<Item = (Component, &Array)> {
        Component::ALL
            .into_iter()
            .filter_map(|component| self.constants(component).map(|values| (component, values)))
    }

    pub fn fields(&self) -> &[FieldRecord] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Vec<FieldRecord> {
        &mut self.fields
    }

    pub fn push_field(&mut self, field: FieldRecord) {
        self.fields.push(field);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Write out any pending changes and release the file handle.
    ///
    /// Files opened for update or creation are written to a temporary file in full, which then
    /// atomically replaces the original path. Closing a closed file does nothing.
    pub fn close(&mut self) -> FfvResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let result = if self.mode.is_writable() {
            self.replace()
        } else {
            Ok(())
        };
        self.source.close();
        result
    }

    fn replace(&mut self) -> FfvResult<()> {
        let dir = match (self.options().temp_dir(), self.path.parent()) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(parent)) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        log::debug!("writing {} via {}", self.path.display(), tmp.path().display());
        self.write_to(tmp.as_file_mut())
            .map_err(|err| err.with_context(format!("writing {}", self.path.display())))?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl Display for VariantFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<FieldsFileVariant: dataset_type={}>",
            self.header.dataset_type()
        )
    }
}

impl Drop for VariantFile {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::warn!("failed to close {}: {}", self.path.display(), err);
        }
    }
}
