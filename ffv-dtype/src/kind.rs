use std::fmt::{Display, Formatter};

/// Whether a block of words holds integers or floating point values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Signed two's complement integers.
    Int,
    /// IEEE-754 floating point.
    Float,
}

impl Kind {
    /// The kind implied by a field's data type selector (LBUSER1).
    ///
    /// Selector 1 is real data, 2 and 3 are integer and logical data. Any other selector has no
    /// fixed kind.
    pub fn from_data_type(selector: i64) -> Option<Self> {
        match selector {
            1 => Some(Kind::Float),
            2 | 3 => Some(Kind::Int),
            _ => None,
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Int => write!(f, "i"),
            Kind::Float => write!(f, "f"),
        }
    }
}
