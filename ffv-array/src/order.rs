/// The order in which a flat buffer enumerates the elements of an n-dimensional shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// The last dimension varies fastest (C order).
    #[default]
    RowMajor,
    /// The first dimension varies fastest (Fortran order).
    ColumnMajor,
}

impl Order {
    /// The element stride of each dimension of `shape` in this order.
    pub fn strides(&self, shape: &[usize]) -> Vec<usize> {
        let mut strides = vec![0; shape.len()];
        let mut acc = 1;
        match self {
            Order::RowMajor => {
                for (stride, dim) in strides.iter_mut().zip(shape).rev() {
                    *stride = acc;
                    acc *= dim;
                }
            }
            Order::ColumnMajor => {
                for (stride, dim) in strides.iter_mut().zip(shape) {
                    *stride = acc;
                    acc *= dim;
                }
            }
        }
        strides
    }

    /// The storage position of a multi-dimensional index, or `None` if it is out of range.
    pub fn offset(&self, shape: &[usize], index: &[usize]) -> Option<usize> {
        if index.len() != shape.len() || index.iter().zip(shape).any(|(i, d)| i >= d) {
            return None;
        }
        Some(
            index
                .iter()
                .zip(self.strides(shape))
                .map(|(i, s)| i * s)
                .sum(),
        )
    }

    /// For each storage position in `to` order, the storage position holding the same element
    /// in `self` order.
    pub(crate) fn permutation(&self, to: Order, shape: &[usize]) -> Vec<usize> {
        let len: usize = shape.iter().product();
        let src = self.strides(shape);
        let dst = to.strides(shape);
        (0..len)
            .map(|k| {
                shape
                    .iter()
                    .zip(dst.iter().zip(&src))
                    .map(|(dim, (d, s))| ((k / d) % dim) * s)
                    .sum()
            })
            .collect()
    }
}
