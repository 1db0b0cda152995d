use std::fmt::{Display, Formatter};
use std::str::FromStr;

use ffv_dtype::{Kind, PType};
use ffv_error::{FfvError, FfvResult, ffv_bail, ffv_err};

/// The width of every word in a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WordSize {
    /// 32-bit words.
    Four,
    /// 64-bit words.
    #[default]
    Eight,
}

/// The word size assumed when none is given.
pub const DEFAULT_WORD_SIZE: WordSize = WordSize::Eight;

impl WordSize {
    /// The number of bytes in one word.
    pub const fn bytes(&self) -> usize {
        match self {
            WordSize::Four => 4,
            WordSize::Eight => 8,
        }
    }

    /// The number of bytes in one word, as a file offset.
    pub const fn bytes_u64(&self) -> u64 {
        self.bytes() as u64
    }

    /// The element type used for words of the given kind.
    pub fn ptype(&self, kind: Kind) -> PType {
        match (kind, self) {
            (Kind::Int, WordSize::Four) => PType::I32,
            (Kind::Int, WordSize::Eight) => PType::I64,
            (Kind::Float, WordSize::Four) => PType::F32,
            (Kind::Float, WordSize::Eight) => PType::F64,
        }
    }

    pub fn int_ptype(&self) -> PType {
        self.ptype(Kind::Int)
    }

    pub fn float_ptype(&self) -> PType {
        self.ptype(Kind::Float)
    }

    /// The byte offset of a 1-based word number.
    pub fn word_offset(&self, word: i64) -> FfvResult<u64> {
        word.checked_sub(1)
            .and_then(|zero_based| u64::try_from(zero_based).ok())
            .and_then(|zero_based| zero_based.checked_mul(self.bytes_u64()))
            .ok_or_else(|| ffv_err!(Format: "word number {} does not address the file", word))
    }
}

impl TryFrom<usize> for WordSize {
    type Error = FfvError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(WordSize::Four),
            8 => Ok(WordSize::Eight),
            _ => ffv_bail!("word size must be 4 or 8 bytes, got {}", value),
        }
    }
}

impl FromStr for WordSize {
    type Err = FfvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: usize = s
            .trim()
            .parse()
            .map_err(|_| ffv_err!("word size must be 4 or 8 bytes, got {}", s))?;
        WordSize::try_from(bytes)
    }
}

impl Display for WordSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.bytes())
    }
}
