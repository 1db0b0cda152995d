use std::fmt::{Display, Formatter};

use ffv_error::{FfvResult, ffv_bail};

/// The number format digit (thousands) of a packing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberFormat {
    Native,
    Cray,
    Ieee,
}

/// The compression digits (units to hundreds) of a packing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    None,
    /// WGDOS archival packing, decoded by an [`Unpacker`](crate::Unpacker).
    Archival,
    /// 32-bit values regardless of the file's word size.
    Cray32,
}

impl Display for NumberFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberFormat::Native => write!(f, "native"),
            NumberFormat::Cray => write!(f, "cray"),
            NumberFormat::Ieee => write!(f, "ieee"),
        }
    }
}

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Archival => write!(f, "wgdos"),
            Compression::Cray32 => write!(f, "cray32"),
        }
    }
}

/// A decoded LBPACK word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Packing {
    code: i64,
    number_format: NumberFormat,
    compression: Compression,
}

impl Packing {
    pub fn try_from_code(code: i64) -> FfvResult<Self> {
        let number_format = match code.div_euclid(1000).rem_euclid(10) {
            0 => NumberFormat::Native,
            2 => NumberFormat::Cray,
            3 => NumberFormat::Ieee,
            n => ffv_bail!(
                UnsupportedEncoding: "unsupported number format {} in packing code {}",
                n,
                code
            ),
        };
        let compression = match code.rem_euclid(1000) {
            0 => Compression::None,
            1 => Compression::Archival,
            2 => Compression::Cray32,
            _ => ffv_bail!(UnsupportedEncoding: "unsupported packing code {}", code),
        };
        Ok(Self {
            code,
            number_format,
            compression,
        })
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn number_format(&self) -> NumberFormat {
        self.number_format
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// The element width in bytes of uncompressed data, or `None` for archival packing.
    pub fn element_width(&self, word_bytes: usize) -> Option<usize> {
        match self.compression {
            Compression::None => Some(word_bytes),
            Compression::Cray32 => Some(4),
            Compression::Archival => None,
        }
    }
}

/// The packing code with its compression digits cleared, keeping any higher digits.
pub fn without_compression(code: i64) -> i64 {
    code - code.rem_euclid(1000)
}

impl Display for Packing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.code, self.number_format, self.compression)
    }
}
