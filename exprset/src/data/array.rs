use ndarray::{Array2, ArrayD, Axis};

use crate::data::data_traits::{HasShape, Selectable};
use crate::data::selector::{BoundedSelector, Selector, Shape};
use crate::error::{ensure_dim, Result};

impl<T: Clone> HasShape for Array2<T> {
    fn shape(&self) -> Shape {
        self.dim().into()
    }
}

impl<T: Clone> Selectable for Array2<T> {
    fn select<S: AsRef<Selector>>(&self, info: &[S]) -> Result<Self> {
        ensure_dim!(info.len() == 2, "matrices take 2 selectors, got {}", info.len());
        let rows = info[0].as_ref().bound(self.nrows())?;
        let cols = info[1].as_ref().bound(self.ncols())?;
        Ok(select_2d(self, &rows, &cols))
    }
}

/// Gather `arr[rows[i], cols[j]]` into a new matrix. Selectors must already be
/// bounded by the matrix shape.
pub(crate) fn select_2d<T: Clone>(
    arr: &Array2<T>,
    rows: &BoundedSelector,
    cols: &BoundedSelector,
) -> Array2<T> {
    if rows.is_full() && cols.is_full() {
        arr.clone()
    } else {
        Array2::from_shape_fn((rows.len(), cols.len()), |(i, j)| {
            arr[[rows.index(i), cols.index(j)]].clone()
        })
    }
}

/// Remove every axis of length one, e.g. a single selected column becomes a
/// vector and a single cell becomes a zero-dimensional array.
pub fn drop_unit_axes<T>(arr: Array2<T>) -> ArrayD<T> {
    let mut arr = arr.into_dyn();
    for axis in (0..arr.ndim()).rev() {
        if arr.len_of(Axis(axis)) == 1 {
            arr = arr.index_axis_move(Axis(axis), 0);
        }
    }
    arr
}
