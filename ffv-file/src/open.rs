use std::fmt::{Display, Formatter};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use ffv_array::{Array, Order, num_elements};
use ffv_error::{FfvError, FfvResult, ffv_bail, ffv_err};
use ffv_io::{DEFAULT_WORD_SIZE, FfvReadAt, SharedFile, WordReader, WordSize, decode_values};
use itertools::Itertools;

use crate::{
    Component, DataLocator, DataSource, FieldRecord, FixedHeader, LBEGIN_OFFSET, LBLREC_OFFSET,
    LBNREC_OFFSET, LocatorKind, NUM_FIELD_INTS, NoUnpacker, PADDING_MARKER, Unpacker, VariantFile,
};

/// How a file is opened, and whether closing it writes anything back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Read an existing file. Closing writes nothing.
    Read,
    /// Read an existing file, rewriting it in full on close.
    Update,
    /// Start from an empty file, writing it on close.
    Create,
}

impl Mode {
    /// Whether closing a file in this mode writes it out.
    pub const fn is_writable(&self) -> bool {
        matches!(self, Mode::Update | Mode::Create)
    }
}

impl FromStr for Mode {
    type Err = FfvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "read" => Ok(Mode::Read),
            "r+" | "update" => Ok(Mode::Update),
            "w" | "create" => Ok(Mode::Create),
            _ => ffv_bail!(InvalidMode: "'{}'", s),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Read => write!(f, "read"),
            Mode::Update => write!(f, "update"),
            Mode::Create => write!(f, "create"),
        }
    }
}

/// Options for opening a [`VariantFile`].
#[derive(Clone)]
pub struct FfvOpenOptions {
    word_size: WordSize,
    unpacker: Arc<dyn Unpacker>,
    temp_dir: Option<PathBuf>,
}

impl Default for FfvOpenOptions {
    fn default() -> Self {
        Self {
            word_size: DEFAULT_WORD_SIZE,
            unpacker: Arc::new(NoUnpacker),
            temp_dir: None,
        }
    }
}

impl FfvOpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the width of every word in the file.
    pub fn with_word_size(mut self, word_size: WordSize) -> Self {
        self.word_size = word_size;
        self
    }

    /// Configure how archival packed fields are decoded.
    pub fn with_unpacker(mut self, unpacker: Arc<dyn Unpacker>) -> Self {
        self.unpacker = unpacker;
        self
    }

    /// Configure where the replacement file is staged when closing.
    ///
    /// This defaults to the directory of the file itself, so that the final rename does not
    /// cross file systems.
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(temp_dir.into());
        self
    }

    pub fn word_size(&self) -> WordSize {
        self.word_size
    }

    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    /// Open the file at `path`.
    pub fn open(self, path: impl AsRef<Path>, mode: Mode) -> FfvResult<VariantFile> {
        let path = path.as_ref();
        let file = match mode {
            Mode::Read => File::open(path),
            Mode::Update => OpenOptions::new().read(true).write(true).open(path),
            Mode::Create => File::create(path),
        }
        .map_err(|err| FfvError::from(err).with_context(format!("opening {}", path.display())))?;
        let source = SharedFile::new(file);

        let (header, constants, fields) = if mode == Mode::Create {
            (FixedHeader::empty(), Default::default(), Vec::new())
        } else {
            self.read_contents(&source)
                .map_err(|err| err.with_context(format!("reading {}", path.display())))?
        };
        log::debug!(
            "opened {} for {} with {} fields",
            path.display(),
            mode,
            fields.len()
        );

        Ok(VariantFile::new(
            path.to_path_buf(),
            mode,
            self,
            source,
            header,
            constants,
            fields,
        ))
    }

    #[allow(clippy::type_complexity)]
    fn read_contents(
        &self,
        source: &SharedFile,
    ) -> FfvResult<(
        FixedHeader,
        [Option<Array>; Component::COUNT],
        Vec<FieldRecord>,
    )> {
        let mut reader = WordReader::new(source);
        let header = FixedHeader::read(&mut reader, self.word_size)?;

        let mut constants: [Option<Array>; Component::COUNT] = Default::default();
        for component in Component::ALL {
            constants[component.index()] = self
                .read_component(&mut reader, &header, component)
                .map_err(|err| err.with_context(format!("reading {component}")))?;
        }

        let fields = self.read_lookup(&mut reader, &header, source)?;
        Ok((header, constants, fields))
    }

    fn read_component<R: FfvReadAt>(
        &self,
        reader: &mut WordReader<R>,
        header: &FixedHeader,
        component: Component,
    ) -> FfvResult<Option<Array>> {
        let start = header.component_start(component);
        if start <= 0 {
            return Ok(None);
        }
        let shape = dimensions(header.component_shape(component))?;
        let count = element_count(&shape)?;
        reader.set_position(self.word_size.word_offset(start)?);
        let values = reader.read_values(self.word_size.ptype(component.kind()), count)?;
        Array::try_new(values, shape, Order::ColumnMajor).map(Some)
    }

    fn read_lookup<R: FfvReadAt>(
        &self,
        reader: &mut WordReader<R>,
        header: &FixedHeader,
        source: &SharedFile,
    ) -> FfvResult<Vec<FieldRecord>> {
        let start = header.lookup_start();
        if start <= 0 {
            return Ok(Vec::new());
        }
        let &[width, count] = dimensions(header.lookup_shape())?.as_slice() else {
            ffv_bail!(Format: "LOOKUP must be two-dimensional");
        };
        if width < NUM_FIELD_INTS {
            ffv_bail!(
                Format: "LOOKUP entries have {} words, fewer than the {} integer words",
                width,
                NUM_FIELD_INTS
            );
        }

        let ws = self.word_size;
        let len = element_count(&[width, count, ws.bytes()])?;
        reader.set_position(ws.word_offset(start)?);
        let bytes = reader
            .read_bytes(len as u64)
            .map_err(|err| ffv_err!(Format: "reading {} LOOKUP entries: {}", count, err))?;

        let shared: Arc<dyn FfvReadAt> = Arc::new(source.clone());
        let kind = LocatorKind::for_dataset_type(header.dataset_type());
        let entry_bytes = width * ws.bytes();
        let int_bytes = NUM_FIELD_INTS * ws.bytes();

        let mut columns = Vec::with_capacity(count);
        for i in 0..count {
            let entry = bytes.slice(i * entry_bytes..(i + 1) * entry_bytes);
            let ints = decode_values(entry.slice(..int_bytes), ws.int_ptype())?.to_vec::<i64>();
            let reals = decode_values(entry.slice(int_bytes..), ws.float_ptype())?.to_vec::<f64>();
            columns.push((ints, reals));
        }

        // Model dumps leave LBNREC unset and store their payloads back to back.
        let relative = columns
            .first()
            .is_some_and(|(ints, _)| ints[LBNREC_OFFSET] == 0);
        log::debug!(
            "reading {} LOOKUP entries of {} words with {} addressing",
            count,
            width,
            if relative { "relative" } else { "direct" }
        );

        // Zero-based; checked against the file only when a payload is decoded.
        let mut running_word = header.data_start().saturating_sub(1);
        let mut fields = Vec::with_capacity(count);
        for (ints, reals) in columns {
            let data = if ints[0] == PADDING_MARKER {
                DataSource::None
            } else {
                let word = if relative {
                    running_word
                } else {
                    ints[LBEGIN_OFFSET]
                };
                log::trace!("field {} payload at word {}", fields.len(), word);
                DataSource::Locator(DataLocator::new(
                    shared.clone(),
                    word,
                    ws,
                    kind,
                    self.unpacker.clone(),
                ))
            };
            if relative {
                // Unset lengths on padding records do not move the payload cursor.
                running_word = running_word.saturating_add(ints[LBLREC_OFFSET].max(0));
            }
            fields.push(FieldRecord::new(ints, reals, data)?);
        }
        Ok(fields)
    }
}

fn element_count(shape: &[usize]) -> FfvResult<usize> {
    num_elements(shape).ok_or_else(|| {
        ffv_err!(
            Format: "header dimensions ({}) cannot be addressed",
            shape.iter().join(", ")
        )
    })
}

/// Convert header dimensions to lengths, rejecting negative values.
fn dimensions(shape: &[i64]) -> FfvResult<Vec<usize>> {
    shape
        .iter()
        .map(|&dim| {
            usize::try_from(dim).map_err(|_| ffv_err!(Format: "invalid dimension {} in header", dim))
        })
        .collect()
}
