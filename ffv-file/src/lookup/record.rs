use std::fmt::{Display, Formatter};

use ffv_array::Array;
use ffv_error::{FfvResult, ffv_bail, ffv_err};

use super::schema::{
    BMDI_OFFSET, FieldHeaderSchema, FieldSlot, LBEGIN_OFFSET, LBHEM_OFFSET, LBLREC_OFFSET,
    LBNPT_OFFSET, LBNREC_OFFSET, LBPACK_OFFSET, LBREL_OFFSET, LBROW_OFFSET, LBUSER1_OFFSET,
    NUM_FIELD_INTS,
};
use crate::DataLocator;

/// The value of the first integer word of a padding record.
pub const PADDING_MARKER: i64 = -99;

/// The value of a named header item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaderValue {
    Int(i64),
    Real(f64),
}

impl Display for HeaderValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderValue::Int(v) => write!(f, "{v}"),
            HeaderValue::Real(v) => write!(f, "{v}"),
        }
    }
}

/// Where a record's payload comes from.
#[derive(Debug, Clone, Default)]
pub enum DataSource {
    /// Padding records have no payload.
    #[default]
    None,
    /// A payload held in memory.
    Array(Array),
    /// A payload read lazily from the file.
    Locator(DataLocator),
}

/// One LOOKUP entry and its payload.
#[derive(Debug, Clone)]
pub struct FieldRecord {
    int_headers: Vec<i64>,
    real_headers: Vec<f64>,
    data: DataSource,
}

impl FieldRecord {
    /// Create a record from exactly [`NUM_FIELD_INTS`] integer words and any number of real
    /// words.
    pub fn new(int_headers: Vec<i64>, real_headers: Vec<f64>, data: DataSource) -> FfvResult<Self> {
        if int_headers.len() != NUM_FIELD_INTS {
            ffv_bail!(
                "a field record has {} integer words, given {}",
                NUM_FIELD_INTS,
                int_headers.len()
            );
        }
        Ok(Self {
            int_headers,
            real_headers,
            data,
        })
    }

    /// Create a record whose payload is held in memory.
    pub fn with_data(int_headers: Vec<i64>, real_headers: Vec<f64>, data: Array) -> FfvResult<Self> {
        Self::new(int_headers, real_headers, DataSource::Array(data))
    }

    /// The schema selected by this record's release number.
    pub fn schema(&self) -> FieldHeaderSchema {
        FieldHeaderSchema::for_release(self.lbrel())
    }

    pub fn int_headers(&self) -> &[i64] {
        &self.int_headers
    }

    pub fn int_headers_mut(&mut self) -> &mut [i64] {
        &mut self.int_headers
    }

    pub fn real_headers(&self) -> &[f64] {
        &self.real_headers
    }

    pub fn real_headers_mut(&mut self) -> &mut [f64] {
        &mut self.real_headers
    }

    pub fn data_source(&self) -> &DataSource {
        &self.data
    }

    /// Replace the payload with one held in memory.
    pub fn set_data(&mut self, data: Array) {
        self.data = DataSource::Array(data);
    }

    /// The total number of header words.
    pub fn num_values(&self) -> usize {
        self.int_headers.len() + self.real_headers.len()
    }

    pub fn is_padding(&self) -> bool {
        self.int_headers[0] == PADDING_MARKER
    }

    fn slot(&self, name: &str) -> FfvResult<FieldSlot> {
        let schema = self.schema();
        schema
            .slot(name)
            .ok_or_else(|| ffv_err!("{} field headers have no item named {}", schema, name))
    }

    fn real(&self, index: usize) -> FfvResult<f64> {
        self.real_headers
            .get(index)
            .copied()
            .ok_or_else(|| ffv_err!(OutOfBounds: index, 0, self.real_headers.len()))
    }

    /// Look up a header item by name through this record's schema.
    pub fn get(&self, name: &str) -> FfvResult<HeaderValue> {
        match self.slot(name)? {
            FieldSlot::Int(index) => Ok(HeaderValue::Int(self.int_headers[index])),
            FieldSlot::Real(index) => self.real(index).map(HeaderValue::Real),
        }
    }

    pub fn set_int(&mut self, name: &str, value: i64) -> FfvResult<()> {
        match self.slot(name)? {
            FieldSlot::Int(index) => {
                self.int_headers[index] = value;
                Ok(())
            }
            FieldSlot::Real(_) => ffv_bail!("{} is a real header item", name),
        }
    }

    pub fn set_real(&mut self, name: &str, value: f64) -> FfvResult<()> {
        match self.slot(name)? {
            FieldSlot::Real(index) => {
                let len = self.real_headers.len();
                let slot = self
                    .real_headers
                    .get_mut(index)
                    .ok_or_else(|| ffv_err!(OutOfBounds: index, 0, len))?;
                *slot = value;
                Ok(())
            }
            FieldSlot::Int(_) => ffv_bail!("{} is an integer header item", name),
        }
    }

    pub fn lblrec(&self) -> i64 {
        self.int_headers[LBLREC_OFFSET]
    }

    pub fn lbhem(&self) -> i64 {
        self.int_headers[LBHEM_OFFSET]
    }

    pub fn lbrow(&self) -> i64 {
        self.int_headers[LBROW_OFFSET]
    }

    pub fn lbnpt(&self) -> i64 {
        self.int_headers[LBNPT_OFFSET]
    }

    pub fn lbpack(&self) -> i64 {
        self.int_headers[LBPACK_OFFSET]
    }

    pub fn lbrel(&self) -> i64 {
        self.int_headers[LBREL_OFFSET]
    }

    pub fn lbegin(&self) -> i64 {
        self.int_headers[LBEGIN_OFFSET]
    }

    pub fn lbnrec(&self) -> i64 {
        self.int_headers[LBNREC_OFFSET]
    }

    /// The data type selector: 1 for reals, 2 for integers and 3 for logicals.
    pub fn lbuser1(&self) -> i64 {
        self.int_headers[LBUSER1_OFFSET]
    }

    /// The missing data indicator. Records with a truncated real segment report NaN.
    pub fn bmdi(&self) -> f64 {
        self.real(BMDI_OFFSET - NUM_FIELD_INTS).unwrap_or(f64::NAN)
    }

    /// The decoded payload, or `None` for a record without one.
    ///
    /// Payloads in the file are decoded afresh on every call.
    pub fn read_data(&self) -> FfvResult<Option<Array>> {
        match &self.data {
            DataSource::None => Ok(None),
            DataSource::Array(array) => Ok(Some(array.clone())),
            DataSource::Locator(locator) => locator.decode(self).map(Some),
        }
    }

    /// Compare header words and decoded payloads.
    ///
    /// Failing to decode either payload is an error rather than an inequality.
    pub fn try_eq(&self, other: &FieldRecord) -> FfvResult<bool> {
        if self.int_headers != other.int_headers || self.real_headers != other.real_headers {
            return Ok(false);
        }
        Ok(self.read_data()? == other.read_data()?)
    }
}
