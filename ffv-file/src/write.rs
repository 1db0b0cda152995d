use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use ffv_array::{Array, Order};
use ffv_dtype::Kind;
use ffv_error::{FfvResult, ffv_bail};
use ffv_io::{WORDS_PER_SECTOR, WordWriter};
use itertools::Itertools;

use crate::packing::without_compression;
use crate::{
    Component, FieldRecord, LBEGIN_OFFSET, LBLREC_OFFSET, LBNREC_OFFSET, LBPACK_OFFSET, NUM_WORDS,
    Pointer, VariantFile,
};

/// Dataset types whose payloads are written back to back, without sector padding.
const UNPADDED_DATASET_TYPES: [i64; 2] = [1, 2];

/// The dataset type of lateral boundary condition files.
const BOUNDARY_DATASET_TYPE: i64 = 5;

const SECTOR: i64 = WORDS_PER_SECTOR as i64;

/// Round a word count up to a whole number of sectors.
fn round_up_to_sector(words: i64) -> i64 {
    words + (-words).rem_euclid(SECTOR)
}

impl VariantFile {
    /// Lay out the constants, LOOKUP and DATA components, recording their positions in the
    /// fixed length header.
    ///
    /// The DATA extent is only known once payloads are written, so it is left untouched unless
    /// there are no fields at all.
    pub fn prepare_header(&mut self) -> FfvResult<()> {
        let mut header = self.header().clone();
        let mut word = NUM_WORDS as i64 + 1;

        for component in Component::ALL {
            match self.constants(component) {
                Some(values) => {
                    let shape: Vec<i64> = values
                        .shape()
                        .iter()
                        .map(|&dim| i64::try_from(dim))
                        .try_collect()?;
                    header.set_start(component.into(), word);
                    header
                        .set_shape(component.into(), &shape)
                        .map_err(|err| err.with_context(format!("laying out {component}")))?;
                    word += i64::try_from(values.len())?;
                }
                None => header.clear_pointer(component.into()),
            }
        }

        if self.fields().is_empty() {
            header.clear_pointer(Pointer::Lookup);
            header.clear_pointer(Pointer::Data);
        } else {
            let widths = self
                .fields()
                .iter()
                .map(|field| field.num_values())
                .unique()
                .sorted()
                .collect::<Vec<_>>();
            let &[width] = widths.as_slice() else {
                ffv_bail!(
                    Layout: "inconsistent field header lengths - {}",
                    widths.iter().join(", ")
                );
            };
            let width = i64::try_from(width)?;
            let count = i64::try_from(self.fields().len())?;

            header.set_start(Pointer::Lookup, word);
            header.set_shape(Pointer::Lookup, &[width, count])?;
            word += width * count;

            header.set_start(Pointer::Data, round_up_to_sector(word - 1) + 1);
            log::debug!(
                "LOOKUP of {} entries at word {}, DATA at word {}",
                count,
                header.lookup_start(),
                header.data_start()
            );
        }

        *self.header_mut() = header;
        Ok(())
    }

    /// Write the complete file to a new path, leaving this file's own path untouched.
    pub fn write_new(&mut self, path: impl AsRef<Path>) -> FfvResult<()> {
        let mut file = File::create(path.as_ref())?;
        self.write_to(&mut file)
    }

    /// Write the complete file to `out`.
    ///
    /// Components are written in file order, apart from the LOOKUP table and the fixed length
    /// header, which are written last so that they carry the final payload positions. Those
    /// positions are only recorded in memory once everything has been written.
    pub fn write_to<W: Write + Seek>(&mut self, out: W) -> FfvResult<()> {
        self.prepare_header()?;
        let word_size = self.word_size();
        let mut header = self.header().clone();
        let mut writer = WordWriter::new(out, word_size);

        writer.seek_word(NUM_WORDS as i64 + 1)?;
        for (component, values) in self.components() {
            writer.write_values(values.to_order(Order::ColumnMajor).values(), component.kind())?;
        }

        let mut placements = Vec::with_capacity(self.fields().len());
        if !self.fields().is_empty() {
            let data_start = header.data_start();
            let dataset_type = header.dataset_type();
            let pad = !UNPADDED_DATASET_TYPES.contains(&dataset_type);
            let sector_bytes = WORDS_PER_SECTOR * word_size.bytes_u64();

            writer.seek_word(data_start)?;
            for (i, field) in self.fields().iter().enumerate() {
                let Some(data) = field.read_data()? else {
                    placements.push(None);
                    continue;
                };
                let lbegin = i64::try_from(writer.word_position()?)?;
                let len = i64::try_from(data.len())?;

                let kind =
                    Kind::from_data_type(field.lbuser1()).unwrap_or_else(|| data.ptype().kind());
                writer.write_values(data.to_order(Order::RowMajor).values(), kind)?;
                if pad {
                    writer.pad_to(sector_bytes)?;
                }
                log::trace!("field {} written at word {} ({} values)", i, lbegin, len);

                // The payload is now stored decoded, so the record must no longer describe it as
                // packed, in memory or on disk.
                let unpacked = (field.lbpack().rem_euclid(1000) != 0).then_some(data);
                placements.push(Some(Placement {
                    lbegin,
                    lbnrec: round_up_to_sector(len),
                    lblrec: len,
                    unpacked,
                }));
            }

            let data_shape = if dataset_type == BOUNDARY_DATASET_TYPE {
                0
            } else {
                i64::try_from(writer.word_position()?)? - data_start + 1
            };
            header.set_shape(Pointer::Data, &[data_shape])?;

            writer.seek_word(header.lookup_start())?;
            for (field, placement) in self.fields().iter().zip(&placements) {
                let mut ints = field.int_headers().to_vec();
                if let Some(placement) = placement {
                    placement.patch(&mut ints);
                }
                writer.write_values(&ints.into(), Kind::Int)?;
                writer.write_values(&field.real_headers().to_vec().into(), Kind::Float)?;
            }
        }

        writer.seek(0)?;
        writer.write_values(&header.raw().to_vec().into(), Kind::Int)?;
        writer.flush()?;

        *self.header_mut() = header;
        for (field, placement) in self.fields_mut().iter_mut().zip(placements) {
            if let Some(placement) = placement {
                placement.apply(field);
            }
        }
        Ok(())
    }
}

/// Where a record's payload was written.
struct Placement {
    lbegin: i64,
    lbnrec: i64,
    lblrec: i64,
    /// The decoded payload of a record that was packed.
    unpacked: Option<Array>,
}

impl Placement {
    fn patch(&self, ints: &mut [i64]) {
        ints[LBEGIN_OFFSET] = self.lbegin;
        ints[LBNREC_OFFSET] = self.lbnrec;
        if self.unpacked.is_some() {
            ints[LBPACK_OFFSET] = without_compression(ints[LBPACK_OFFSET]);
            ints[LBLREC_OFFSET] = self.lblrec;
        }
    }

    fn apply(self, field: &mut FieldRecord) {
        self.patch(field.int_headers_mut());
        if let Some(data) = self.unpacked {
            field.set_data(data);
        }
    }
}
