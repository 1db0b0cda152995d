use ffv_dtype::{NativePType, PType, match_each_native_ptype};
use num_traits::AsPrimitive;

/// A flat buffer of elements of a single [`PType`].
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

macro_rules! match_each_values {
    ($values:expr, | $v:ident | $body:expr) => {
        match $values {
            Values::I32($v) => $body,
            Values::I64($v) => $body,
            Values::F32($v) => $body,
            Values::F64($v) => $body,
        }
    };
}

impl Values {
    pub fn ptype(&self) -> PType {
        match self {
            Values::I32(_) => PType::I32,
            Values::I64(_) => PType::I64,
            Values::F32(_) => PType::F32,
            Values::F64(_) => PType::F64,
        }
    }

    pub fn len(&self) -> usize {
        match_each_values!(self, |v| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the elements as a slice of `T`, if `T` is the stored element type.
    pub fn as_slice<T: ValuesNative>(&self) -> Option<&[T]> {
        T::from_values(self)
    }

    /// Convert every element to `T` with `as` semantics.
    ///
    /// Floats are truncated towards zero when converted to integers.
    pub fn to_vec<T>(&self) -> Vec<T>
    where
        T: NativePType,
        i32: AsPrimitive<T>,
        i64: AsPrimitive<T>,
        f32: AsPrimitive<T>,
        f64: AsPrimitive<T>,
    {
        match_each_values!(self, |v| v.iter().map(|&x| x.as_()).collect())
    }

    /// Convert every element to the given element type.
    pub fn cast(&self, ptype: PType) -> Values {
        if self.ptype() == ptype {
            return self.clone();
        }
        match_each_native_ptype!(ptype, |$T| Values::from(self.to_vec::<$T>()))
    }

    /// The element at a storage position, widened to `f64`.
    pub fn get_f64(&self, idx: usize) -> Option<f64> {
        match_each_values!(self, |v| v.get(idx).map(|&x| x.as_()))
    }

    /// Gather elements by storage position.
    pub(crate) fn take(&self, indices: &[usize]) -> Values {
        match_each_values!(self, |v| Values::from(
            indices.iter().map(|&i| v[i]).collect::<Vec<_>>()
        ))
    }
}

/// Native element types that can be stored in [`Values`].
pub trait ValuesNative: NativePType {
    fn from_values(values: &Values) -> Option<&[Self]>;
}

macro_rules! values_native {
    ($T:ty, $variant:ident) => {
        impl ValuesNative for $T {
            fn from_values(values: &Values) -> Option<&[Self]> {
                match values {
                    Values::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<Vec<$T>> for Values {
            fn from(value: Vec<$T>) -> Self {
                Values::$variant(value)
            }
        }
    };
}

values_native!(i32, I32);
values_native!(i64, I64);
values_native!(f32, F32);
values_native!(f64, F64);
