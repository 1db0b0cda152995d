use std::fmt::{Display, Formatter};

use ffv_dtype::PType;
use ffv_error::{FfvResult, ffv_bail};
use itertools::Itertools;

use crate::{Order, Values, ValuesNative};

/// The number of elements in an array of the given shape, or `None` if it overflows `usize`.
pub fn num_elements(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// An owned n-dimensional array of numbers.
///
/// Equality is logical: two arrays are equal if they have the same shape and element type and
/// hold equal elements at every index, regardless of their storage [`Order`].
#[derive(Debug, Clone)]
pub struct Array {
    values: Values,
    shape: Vec<usize>,
    order: Order,
}

impl Array {
    /// Create an array over `values`, which must hold exactly `product(shape)` elements.
    pub fn try_new(values: Values, shape: Vec<usize>, order: Order) -> FfvResult<Self> {
        if num_elements(&shape) != Some(values.len()) {
            ffv_bail!(
                "cannot view {} values as shape ({})",
                values.len(),
                shape.iter().join(", ")
            );
        }
        Ok(Self {
            values,
            shape,
            order,
        })
    }

    /// Create a row-major array from a vector of native values.
    pub fn from_vec<T: ValuesNative>(values: Vec<T>, shape: Vec<usize>) -> FfvResult<Self>
    where
        Values: From<Vec<T>>,
    {
        Self::try_new(Values::from(values), shape, Order::RowMajor)
    }

    /// A one-dimensional array over `values`.
    pub fn flat(values: Values) -> Self {
        let shape = vec![values.len()];
        Self {
            values,
            shape,
            order: Order::RowMajor,
        }
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn into_values(self) -> Values {
        self.values
    }

    pub fn ptype(&self) -> PType {
        self.values.ptype()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// The total number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the storage as a slice of `T`, in storage order.
    pub fn as_slice<T: ValuesNative>(&self) -> Option<&[T]> {
        self.values.as_slice()
    }

    /// Reinterpret the storage with a new shape and order without moving any elements.
    pub fn reshape(self, shape: Vec<usize>, order: Order) -> FfvResult<Self> {
        Self::try_new(self.values, shape, order)
    }

    /// Rearrange the storage into the given order, keeping every element at the same index.
    pub fn to_order(&self, order: Order) -> Array {
        if order == self.order || self.ndim() < 2 {
            return Array {
                values: self.values.clone(),
                shape: self.shape.clone(),
                order,
            };
        }
        let permutation = self.order.permutation(order, &self.shape);
        Array {
            values: self.values.take(&permutation),
            shape: self.shape.clone(),
            order,
        }
    }

    /// Convert every element to the given type, keeping shape and order.
    pub fn cast(&self, ptype: PType) -> Array {
        Array {
            values: self.values.cast(ptype),
            shape: self.shape.clone(),
            order: self.order,
        }
    }

    /// The element at a multi-dimensional index, widened to `f64`.
    pub fn get_f64(&self, index: &[usize]) -> Option<f64> {
        self.order
            .offset(&self.shape, index)
            .and_then(|pos| self.values.get_f64(pos))
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        if self.shape != other.shape || self.ptype() != other.ptype() {
            return false;
        }
        if self.order == other.order || self.ndim() < 2 {
            return self.values == other.values;
        }
        self.to_order(other.order).values == other.values
    }
}

impl Display for Array {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.ptype(), self.shape.iter().join(", "))
    }
}
