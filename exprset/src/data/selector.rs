use itertools::Itertools;
use smallvec::{smallvec, SmallVec};
use std::borrow::Cow;
use std::ops::{Range, RangeFull};

use crate::error::{ensure_dim, ExprSetError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape(SmallVec<[usize; 3]>);

impl Shape {
    pub fn ndim(&self) -> usize {
        self.0.len()
    }
}

impl From<usize> for Shape {
    fn from(shape: usize) -> Self {
        Self(smallvec![shape])
    }
}

impl From<(usize, usize)> for Shape {
    fn from((nrows, ncols): (usize, usize)) -> Self {
        Self(smallvec![nrows, ncols])
    }
}

/// Selection along one axis of a container.
///
/// Index selections may repeat, reorder or omit positions; the order of the
/// indices determines the order of the output. Masks must match the axis length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selector {
    #[default]
    All,
    Index(Vec<usize>),
    Mask(Vec<bool>),
    Range(Range<usize>),
}

impl Selector {
    pub fn all() -> Self {
        Self::All
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Selector::All)
    }

    /// Resolve the selector against an axis of length `len`.
    pub fn bound(&self, len: usize) -> Result<BoundedSelector<'_>> {
        BoundedSelector::new(self, len)
    }
}

impl AsRef<Selector> for Selector {
    fn as_ref(&self) -> &Selector {
        self
    }
}

impl From<Vec<usize>> for Selector {
    fn from(x: Vec<usize>) -> Self {
        Self::Index(x)
    }
}

impl From<&[usize]> for Selector {
    fn from(x: &[usize]) -> Self {
        Self::Index(x.to_vec())
    }
}

impl From<&Vec<usize>> for Selector {
    fn from(x: &Vec<usize>) -> Self {
        x.as_slice().into()
    }
}

impl From<Vec<bool>> for Selector {
    fn from(x: Vec<bool>) -> Self {
        Self::Mask(x)
    }
}

impl From<&[bool]> for Selector {
    fn from(x: &[bool]) -> Self {
        Self::Mask(x.to_vec())
    }
}

impl From<usize> for Selector {
    fn from(x: usize) -> Self {
        Self::Index(vec![x])
    }
}

impl From<Range<usize>> for Selector {
    fn from(x: Range<usize>) -> Self {
        Self::Range(x)
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Self::All
    }
}

/// A selector that has been checked against the length of its axis.
///
/// Only [`Selector::bound`] creates one, so every position it yields is
/// smaller than [`BoundedSelector::axis_len`].
#[derive(Debug, Clone)]
pub struct BoundedSelector<'a> {
    axis_len: usize,
    elem: BoundedElem<'a>,
}

#[derive(Debug, Clone)]
enum BoundedElem<'a> {
    Full,
    Index(Cow<'a, [usize]>),
    Range(Range<usize>),
}

impl<'a> BoundedSelector<'a> {
    fn new(select: &'a Selector, bound: usize) -> Result<Self> {
        let elem = match select {
            Selector::All => BoundedElem::Full,
            Selector::Index(idx) => {
                if let Some(&index) = idx.iter().find(|&&i| i >= bound) {
                    return Err(ExprSetError::IndexOutOfRange { index, len: bound });
                }
                BoundedElem::Index(Cow::Borrowed(idx.as_slice()))
            }
            Selector::Mask(mask) => {
                ensure_dim!(
                    mask.len() == bound,
                    "boolean mask of length {} cannot select from an axis of length {}",
                    mask.len(),
                    bound
                );
                BoundedElem::Index(Cow::Owned(mask.iter().positions(|x| *x).collect()))
            }
            Selector::Range(range) => {
                if range.start > bound {
                    return Err(ExprSetError::IndexOutOfRange { index: range.start, len: bound });
                } else if range.start >= range.end {
                    BoundedElem::Range(range.start..range.start)
                } else if range.end > bound {
                    return Err(ExprSetError::IndexOutOfRange { index: range.end - 1, len: bound });
                } else {
                    BoundedElem::Range(range.clone())
                }
            }
        };
        Ok(Self { axis_len: bound, elem })
    }

    /// Length of the axis this selector was checked against.
    pub fn axis_len(&self) -> usize {
        self.axis_len
    }

    /// Fail unless the selector was checked against an axis of length `len`.
    pub(crate) fn check_axis(&self, len: usize) -> Result<()> {
        ensure_dim!(
            self.axis_len == len,
            "selector bounded for an axis of length {} applied to an axis of length {}",
            self.axis_len,
            len
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        match &self.elem {
            BoundedElem::Full => self.axis_len,
            BoundedElem::Index(idx) => idx.len(),
            BoundedElem::Range(range) => range.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        matches!(self.elem, BoundedElem::Full)
    }

    /// Position in the source axis of the `i`-th selected element.
    pub fn index(&self, i: usize) -> usize {
        match &self.elem {
            BoundedElem::Full => i,
            BoundedElem::Index(idx) => idx[i],
            BoundedElem::Range(range) => range.start + i,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).map(move |i| self.index(i))
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}
