use std::fmt::{Debug, Display, Formatter};

use bytes::{Buf, BufMut};
use ffv_error::{FfvResult, ffv_bail};
use num_traits::AsPrimitive;

use crate::Kind;

/// The primitive element types that can appear in a FieldsFile variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PType {
    /// A signed 32-bit integer
    I32,
    /// A signed 64-bit integer
    I64,
    /// An IEEE-754 32-bit floating point number
    F32,
    /// An IEEE-754 64-bit floating point number
    F64,
}

impl PType {
    /// Resolve the element type for a kind at the given width in bytes.
    pub fn try_new(kind: Kind, byte_width: usize) -> FfvResult<Self> {
        Ok(match (kind, byte_width) {
            (Kind::Int, 4) => PType::I32,
            (Kind::Int, 8) => PType::I64,
            (Kind::Float, 4) => PType::F32,
            (Kind::Float, 8) => PType::F64,
            _ => ffv_bail!(UnsupportedEncoding: "no {}-byte element type of kind {}", byte_width, kind),
        })
    }

    /// The width of one element in bytes.
    pub const fn byte_width(&self) -> usize {
        match self {
            PType::I32 | PType::F32 => 4,
            PType::I64 | PType::F64 => 8,
        }
    }

    /// Whether the element is an integer or a float.
    pub const fn kind(&self) -> Kind {
        match self {
            PType::I32 | PType::I64 => Kind::Int,
            PType::F32 | PType::F64 => Kind::Float,
        }
    }
}

impl Display for PType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PType::I32 => write!(f, "i32"),
            PType::I64 => write!(f, "i64"),
            PType::F32 => write!(f, "f32"),
            PType::F64 => write!(f, "f64"),
        }
    }
}

/// A Rust primitive that corresponds to a [`PType`].
///
/// Values are always stored big-endian on disk.
pub trait NativePType:
    Send
    + Sync
    + Clone
    + Copy
    + Debug
    + Display
    + Default
    + PartialEq
    + PartialOrd
    + 'static
    + AsPrimitive<i32>
    + AsPrimitive<i64>
    + AsPrimitive<f32>
    + AsPrimitive<f64>
{
    /// The PType that corresponds to this native type.
    const PTYPE: PType;

    /// Decode one big-endian value from the front of `buf`, advancing it.
    fn get_be<B: Buf>(buf: &mut B) -> Self;

    /// Append `self` to `buf` in big-endian byte order.
    fn put_be<B: BufMut>(self, buf: &mut B);
}

macro_rules! native_ptype {
    ($T:ty, $ptype:tt, $get:ident, $put:ident) => {
        impl NativePType for $T {
            const PTYPE: PType = PType::$ptype;

            #[inline]
            fn get_be<B: Buf>(buf: &mut B) -> Self {
                buf.$get()
            }

            #[inline]
            fn put_be<B: BufMut>(self, buf: &mut B) {
                buf.$put(self)
            }
        }
    };
}

native_ptype!(i32, I32, get_i32, put_i32);
native_ptype!(i64, I64, get_i64, put_i64);
native_ptype!(f32, F32, get_f32, put_f32);
native_ptype!(f64, F64, get_f64, put_f64);

/// Dispatch on a [`PType`], binding the corresponding native type to the given identifier.
///
/// ```
/// use ffv_dtype::{match_each_native_ptype, NativePType, PType};
///
/// let width = match_each_native_ptype!(PType::F32, |$T| size_of::<$T>());
/// assert_eq!(width, 4);
/// ```
#[macro_export]
macro_rules! match_each_native_ptype {
    ($self:expr, | $_:tt $tp:ident | $($body:tt)*) => ({
        macro_rules! __with__ {( $_ $tp:ident ) => ( $($body)* )}
        use $crate::PType;
        match $self {
            PType::I32 => __with__! { i32 },
            PType::I64 => __with__! { i64 },
            PType::F32 => __with__! { f32 },
            PType::F64 => __with__! { f64 },
        }
    })
}
