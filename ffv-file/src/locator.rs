use std::fmt::{Debug, Formatter};
use std::io;
use std::sync::Arc;

use ffv_array::{Array, Order, num_elements};
use ffv_dtype::{Kind, PType};
use ffv_error::{FfvResult, ffv_bail, ffv_err};
use ffv_io::{FfvReadAt, WordReader, WordSize};
use itertools::Itertools;

use crate::packing::Packing;
use crate::{FieldRecord, Unpacker};

/// The byte width of an archival packed word.
const WGDOS_WORD_BYTES: u64 = 4;

/// How a field's payload is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorKind {
    /// A `lbrow x lbnpt` grid.
    Normal,
    /// Lateral boundary conditions: `lbhem - 100` levels of unrolled boundary points.
    Boundary,
}

impl LocatorKind {
    pub const fn for_dataset_type(dataset_type: i64) -> Self {
        if dataset_type == 5 {
            LocatorKind::Boundary
        } else {
            LocatorKind::Normal
        }
    }
}

/// Where a field's payload lives and how to decode it.
///
/// Decoding is not cached: every call re-reads the payload from the shared source. The start
/// word is kept as stored, so a record pointing outside the file only fails when it is decoded.
#[derive(Clone)]
pub struct DataLocator {
    source: Arc<dyn FfvReadAt>,
    word: i64,
    word_size: WordSize,
    kind: LocatorKind,
    unpacker: Arc<dyn Unpacker>,
}

impl DataLocator {
    pub fn new(
        source: Arc<dyn FfvReadAt>,
        word: i64,
        word_size: WordSize,
        kind: LocatorKind,
        unpacker: Arc<dyn Unpacker>,
    ) -> Self {
        Self {
            source,
            word,
            word_size,
            kind,
            unpacker,
        }
    }

    /// The zero-based word at which the payload starts.
    pub fn word(&self) -> i64 {
        self.word
    }

    /// The byte offset of the payload.
    pub fn offset(&self) -> FfvResult<u64> {
        u64::try_from(self.word)
            .ok()
            .and_then(|word| word.checked_mul(self.word_size.bytes_u64()))
            .ok_or_else(|| ffv_err!(Format: "payload start word {} is outside the file", self.word))
    }

    pub fn kind(&self) -> LocatorKind {
        self.kind
    }

    /// Read and decode the payload described by `record`'s header words.
    pub fn decode(&self, record: &FieldRecord) -> FfvResult<Array> {
        let packing = Packing::try_from_code(record.lbpack())?;
        let offset = self.offset()?;
        let mut reader = WordReader::new(self.source.as_ref());
        reader.set_position(offset);

        let Some(width) = packing.element_width(self.word_size.bytes()) else {
            return self.unpack(&mut reader, record);
        };

        let kind = Kind::from_data_type(record.lbuser1()).ok_or_else(|| {
            ffv_err!(
                UnsupportedEncoding: "unsupported data type {} for packing code {}",
                record.lbuser1(),
                packing.code()
            )
        })?;
        let ptype = PType::try_new(kind, width)?;

        let shape = match self.kind {
            LocatorKind::Normal => vec![
                dimension("LBROW", record.lbrow())?,
                dimension("LBNPT", record.lbnpt())?,
            ],
            LocatorKind::Boundary => boundary_shape(record.lbhem(), record.lblrec())?,
        };
        let count = num_elements(&shape).ok_or_else(|| {
            ffv_err!(Format: "a field of shape ({}) cannot be addressed", shape.iter().join(", "))
        })?;
        log::trace!(
            "decoding {} {} values at byte {} as ({})",
            count,
            ptype,
            offset,
            shape.iter().join(", ")
        );
        let values = reader.read_values(ptype, count)?;
        Array::try_new(values, shape, Order::RowMajor)
    }

    fn unpack<R: FfvReadAt>(
        &self,
        reader: &mut WordReader<R>,
        record: &FieldRecord,
    ) -> FfvResult<Array> {
        let lbnrec = record.lbnrec();
        if lbnrec < 1 {
            ffv_bail!(Format: "archival packed field has record length {}", lbnrec);
        }
        let len = lbnrec
            .checked_mul(2)
            .and_then(|words| u64::try_from(words - 1).ok())
            .and_then(|words| words.checked_mul(WGDOS_WORD_BYTES))
            .ok_or_else(|| ffv_err!(Format: "archival packed field has record length {}", lbnrec))?;
        let bytes = reader.read_bytes(len).map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => {
                ffv_err!(Format: "archival packed field of {} bytes: {}", len, err)
            }
            _ => err.into(),
        })?;
        let rows = dimension("LBROW", record.lbrow())?;
        let cols = dimension("LBNPT", record.lbnpt())?;
        self.unpacker.unpack(&bytes, rows, cols, record.bmdi())
    }
}

impl Debug for DataLocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLocator")
            .field("word", &self.word)
            .field("word_size", &self.word_size)
            .field("kind", &self.kind)
            .finish()
    }
}

fn dimension(name: &str, value: i64) -> FfvResult<usize> {
    usize::try_from(value).map_err(|_| ffv_err!(Format: "{} is negative: {}", name, value))
}

fn boundary_shape(lbhem: i64, lblrec: i64) -> FfvResult<Vec<usize>> {
    let levels = match lbhem.checked_sub(100) {
        Some(levels) if levels >= 1 => levels,
        _ => ffv_bail!(Format: "boundary field has LBHEM {}, implying no levels", lbhem),
    };
    let count = dimension("LBLREC", lblrec)?;
    let levels = dimension("LBHEM", levels)?;
    if count % levels != 0 {
        ffv_bail!(
            Format: "boundary field of {} values cannot be split into {} levels",
            count,
            levels
        );
    }
    Ok(vec![levels, count / levels])
}
