use smallvec::SmallVec;

use crate::data::selector::{Selector, Shape};
use crate::error::{ensure_dim, Result};

/// Anything that has a shape.
pub trait HasShape {
    fn shape(&self) -> Shape;
}

impl<T> HasShape for &T
where
    T: HasShape,
{
    fn shape(&self) -> Shape {
        (*self).shape()
    }
}

pub trait Selectable: HasShape {
    /// Select along every axis at once; `info` holds one selector per axis.
    fn select<S>(&self, info: &[S]) -> Result<Self>
    where
        S: AsRef<Selector>,
        Self: Sized;

    fn select_axis<S>(&self, axis: usize, select: S) -> Result<Self>
    where
        S: AsRef<Selector>,
        Self: Sized,
    {
        let ndim = self.shape().ndim();
        ensure_dim!(axis < ndim, "axis {} does not exist in {} dimensions", axis, ndim);
        let full = Selector::All;
        let info: SmallVec<[&Selector; 3]> = (0..ndim)
            .map(|i| if i == axis { select.as_ref() } else { &full })
            .collect();
        self.select(info.as_slice())
    }
}
