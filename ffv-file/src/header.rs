//! The fixed length header: 256 integer words at the start of every file.

use std::ops::Range;
use std::sync::LazyLock;

use ffv_error::{FfvExpect, FfvResult, ffv_bail, ffv_err};
use ffv_io::{FfvReadAt, WordReader, WordSize};
use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::{Component, Pointer};

/// The number of words in the fixed length header.
pub const NUM_WORDS: usize = 256;

/// The value of an unset integer word.
pub const IMDI: i64 = -32768;

/// Word index of the corrected one-dimensional length of the DATA component.
const MAX_LENGTH_WORD: usize = 161;

/// The items of the fixed length header and the zero-based words they occupy.
///
/// Multi-word entries are either pointers (a start word followed by one or more dimension
/// lengths) or validity times.
pub static FF_HEADER: &[(&str, &[usize])] = &[
    ("data_set_format_version", &[0]),
    ("sub_model", &[1]),
    ("vert_coord_type", &[2]),
    ("horiz_grid_type", &[3]),
    ("dataset_type", &[4]),
    ("run_identifier", &[5]),
    ("experiment_number", &[6]),
    ("calendar", &[7]),
    ("grid_staggering", &[8]),
    ("time_type", &[9]),
    ("projection_number", &[10]),
    ("model_version", &[11]),
    ("obs_file_type", &[14]),
    ("last_fieldop_type", &[15]),
    ("first_validity_time", &[20, 21, 22, 23, 24, 25, 26]),
    ("last_validity_time", &[27, 28, 29, 30, 31, 32, 33]),
    ("misc_validity_time", &[34, 35, 36, 37, 38, 39, 40]),
    ("integer_constants", &[99, 100]),
    ("real_constants", &[104, 105]),
    ("level_dependent_constants", &[109, 110, 111]),
    ("row_dependent_constants", &[114, 115, 116]),
    ("column_dependent_constants", &[119, 120, 121]),
    ("fields_of_constants", &[124, 125, 126]),
    ("extra_constants", &[129, 130]),
    ("temp_historyfile", &[134, 135]),
    ("compressed_field_index1", &[139, 140]),
    ("compressed_field_index2", &[141, 142]),
    ("compressed_field_index3", &[143, 144]),
    ("lookup_table", &[149, 150, 151]),
    ("total_prognostic_fields", &[152]),
    ("data", &[159, 160, 161]),
];

/// The multi-word entries of [`FF_HEADER`] that locate other parts of the file.
static FF_HEADER_POINTERS: &[&str] = &[
    "integer_constants",
    "real_constants",
    "level_dependent_constants",
    "row_dependent_constants",
    "column_dependent_constants",
    "fields_of_constants",
    "extra_constants",
    "temp_historyfile",
    "compressed_field_index1",
    "compressed_field_index2",
    "compressed_field_index3",
    "lookup_table",
    "data",
];

/// A named view of a header word or run of words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderSlot {
    Word(usize),
    Shape(Range<usize>),
}

#[derive(Debug, Clone)]
struct PointerSlots {
    start: usize,
    shape: Range<usize>,
}

/// Named accessors derived once from [`FF_HEADER`].
struct HeaderSchema {
    names: Vec<(String, HeaderSlot)>,
    by_name: FxHashMap<String, HeaderSlot>,
    pointers: FxHashMap<&'static str, PointerSlots>,
}

impl HeaderSchema {
    fn new() -> Self {
        let mut names = Vec::new();
        let mut pointers = FxHashMap::default();

        for &(name, offsets) in FF_HEADER {
            if let [offset] = offsets {
                names.push((name.to_string(), HeaderSlot::Word(*offset)));
            } else if FF_HEADER_POINTERS.contains(&name) {
                let (name, offsets) = match name {
                    "lookup_table" => ("lookup", offsets),
                    // The DATA component is one-dimensional; its last word is `max_length`.
                    "data" => (name, &offsets[..offsets.len() - 1]),
                    _ => (name, offsets),
                };
                let start = offsets[0];
                let shape = offsets[1]..offsets[offsets.len() - 1] + 1;
                names.push((format!("{name}_start"), HeaderSlot::Word(start)));
                names.push((format!("{name}_shape"), HeaderSlot::Shape(shape.clone())));
                pointers.insert(name, PointerSlots { start, shape });
            }
            // The validity times do not generalise across file variants and are only
            // reachable through the raw words.
        }
        names.push(("max_length".to_string(), HeaderSlot::Word(MAX_LENGTH_WORD)));

        let by_name = names.iter().cloned().collect();
        Self {
            names,
            by_name,
            pointers,
        }
    }

    fn slot(&self, name: &str) -> FfvResult<&HeaderSlot> {
        self.by_name
            .get(name)
            .ok_or_else(|| ffv_err!("no fixed length header item named {}", name))
    }

    fn pointer(&self, pointer: Pointer) -> &PointerSlots {
        self.pointers
            .get(pointer.name())
            .ffv_expect("every pointer is described by the header table")
    }

    fn word(&self, name: &str) -> usize {
        match self.by_name.get(name) {
            Some(HeaderSlot::Word(index)) => *index,
            _ => ffv_error::ffv_panic!("{} is not a single word header item", name),
        }
    }
}

static HEADER_SCHEMA: LazyLock<HeaderSchema> = LazyLock::new(HeaderSchema::new);

/// The fixed length header of a FieldsFile variant.
///
/// Simple items are available by name through [`FixedHeader::get`] and [`FixedHeader::set`].
/// Items that do not have a stable name across file variants can be accessed through
/// [`FixedHeader::raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedHeader {
    words: Vec<i64>,
}

impl FixedHeader {
    /// A header with every word unset.
    pub fn empty() -> Self {
        Self {
            words: vec![IMDI; NUM_WORDS],
        }
    }

    /// Create a header from exactly [`NUM_WORDS`] words.
    pub fn try_new(words: Vec<i64>) -> FfvResult<Self> {
        if words.len() != NUM_WORDS {
            ffv_bail!(
                Format: "incorrect number of words - given {} but should be {}",
                words.len(),
                NUM_WORDS
            );
        }
        Ok(Self { words })
    }

    /// Read a header from the start of a file.
    pub fn read<R: FfvReadAt>(reader: &mut WordReader<R>, word_size: WordSize) -> FfvResult<Self> {
        reader.set_position(0);
        let values = reader
            .read_values(word_size.int_ptype(), NUM_WORDS)
            .map_err(|err| err.with_context("reading the fixed length header"))?;
        Self::try_new(values.to_vec::<i64>())
    }

    pub fn raw(&self) -> &[i64] {
        &self.words
    }

    pub fn raw_mut(&mut self) -> &mut [i64] {
        &mut self.words
    }

    /// The names of every named item, in header order.
    pub fn names() -> impl Iterator<Item = (&'static str, &'static HeaderSlot)> {
        HEADER_SCHEMA
            .names
            .iter()
            .map(|(name, slot)| (name.as_str(), slot))
    }

    /// The value of a single-word item, e.g. `sub_model` or `lookup_start`.
    pub fn get(&self, name: &str) -> FfvResult<i64> {
        match HEADER_SCHEMA.slot(name)? {
            HeaderSlot::Word(index) => Ok(self.words[*index]),
            HeaderSlot::Shape(_) => ffv_bail!("{} is a shape, not a single word", name),
        }
    }

    pub fn set(&mut self, name: &str, value: i64) -> FfvResult<()> {
        match HEADER_SCHEMA.slot(name)? {
            HeaderSlot::Word(index) => self.words[*index] = value,
            HeaderSlot::Shape(range) => self.words[range.clone()].fill(value),
        }
        Ok(())
    }

    /// The dimension lengths of a `<name>_shape` item.
    pub fn get_shape(&self, name: &str) -> FfvResult<&[i64]> {
        match HEADER_SCHEMA.slot(name)? {
            HeaderSlot::Shape(range) => Ok(&self.words[range.clone()]),
            HeaderSlot::Word(_) => ffv_bail!("{} is a single word, not a shape", name),
        }
    }

    /// The 1-based start word of a pointer, or [`IMDI`] if the region is absent.
    pub fn start(&self, pointer: Pointer) -> i64 {
        self.words[HEADER_SCHEMA.pointer(pointer).start]
    }

    pub fn set_start(&mut self, pointer: Pointer, start: i64) {
        self.words[HEADER_SCHEMA.pointer(pointer).start] = start;
    }

    pub fn shape(&self, pointer: Pointer) -> &[i64] {
        &self.words[HEADER_SCHEMA.pointer(pointer).shape.clone()]
    }

    /// Set every dimension length of a pointer. The number of dimensions is fixed by the header.
    pub fn set_shape(&mut self, pointer: Pointer, shape: &[i64]) -> FfvResult<()> {
        let range = HEADER_SCHEMA.pointer(pointer).shape.clone();
        if range.len() != shape.len() {
            ffv_bail!(
                Layout: "{} has {} dimensions in the header but was given shape ({})",
                pointer.name(),
                range.len(),
                shape.iter().join(", ")
            );
        }
        self.words[range].copy_from_slice(shape);
        Ok(())
    }

    /// Mark a pointer's region as absent.
    pub fn clear_pointer(&mut self, pointer: Pointer) {
        let PointerSlots { start, shape } = HEADER_SCHEMA.pointer(pointer).clone();
        self.words[start] = IMDI;
        self.words[shape].fill(IMDI);
    }

    fn word(&self, name: &str) -> i64 {
        self.words[HEADER_SCHEMA.word(name)]
    }

    fn set_word(&mut self, name: &str, value: i64) {
        self.words[HEADER_SCHEMA.word(name)] = value;
    }

    pub fn dataset_type(&self) -> i64 {
        self.word("dataset_type")
    }

    pub fn set_dataset_type(&mut self, value: i64) {
        self.set_word("dataset_type", value)
    }

    pub fn sub_model(&self) -> i64 {
        self.word("sub_model")
    }

    pub fn total_prognostic_fields(&self) -> i64 {
        self.word("total_prognostic_fields")
    }

    pub fn lookup_start(&self) -> i64 {
        self.start(Pointer::Lookup)
    }

    pub fn lookup_shape(&self) -> &[i64] {
        self.shape(Pointer::Lookup)
    }

    pub fn data_start(&self) -> i64 {
        self.start(Pointer::Data)
    }

    /// The length of the DATA component in words.
    pub fn data_shape(&self) -> i64 {
        self.shape(Pointer::Data)[0]
    }

    pub fn max_length(&self) -> i64 {
        self.word("max_length")
    }

    pub fn set_max_length(&mut self, value: i64) {
        self.set_word("max_length", value)
    }

    pub fn component_start(&self, component: Component) -> i64 {
        self.start(component.into())
    }

    pub fn component_shape(&self, component: Component) -> &[i64] {
        self.shape(component.into())
    }
}

impl Default for FixedHeader {
    fn default() -> Self {
        Self::empty()
    }
}
