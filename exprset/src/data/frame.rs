use polars::prelude::{DataFrame, IdxCa, IdxSize, NamedFrom, Series};

use crate::data::data_traits::{HasShape, Selectable};
use crate::data::index::NameIndex;
use crate::data::selector::{BoundedSelector, Selector, Shape};
use crate::error::{ensure_dim, ExprSetError, Result};

/// An annotation table whose rows are bound to the identifiers of one axis.
///
/// A table without columns is valid for any number of identifiers; its height
/// is always the length of the index.
#[derive(Debug, Clone)]
pub struct AnnotationFrame {
    index: NameIndex,
    data: DataFrame,
}

impl std::cmp::PartialEq for AnnotationFrame {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.data.equals_missing(&other.data)
    }
}

impl AnnotationFrame {
    pub fn new(index: NameIndex, data: DataFrame) -> Result<Self> {
        ensure_dim!(
            data.width() == 0 || data.height() == index.len(),
            "annotation table has {} rows but {} identifiers",
            data.height(),
            index.len()
        );
        Ok(Self { index, data })
    }

    pub fn empty(index: NameIndex) -> Self {
        Self {
            index,
            data: DataFrame::empty(),
        }
    }

    pub fn height(&self) -> usize {
        self.index.len()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn names(&self) -> &NameIndex {
        &self.index
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.data.get_column_names()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.get_column_index(name).is_some()
    }

    pub fn column(&self, name: &str) -> Result<&Series> {
        self.data
            .column(name)
            .map_err(|_| ExprSetError::UnknownField(name.to_string()))
    }

    /// Add a column, or replace the column with the same name.
    pub fn set_column(&mut self, series: Series) -> Result<()> {
        ensure_dim!(
            series.len() == self.height(),
            "field '{}' has {} values but the table has {} rows",
            series.name(),
            series.len(),
            self.height()
        );
        self.data.with_column(series)?;
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Result<Series> {
        if !self.has_column(name) {
            return Err(ExprSetError::UnknownField(name.to_string()));
        }
        Ok(self.data.drop_in_place(name)?)
    }

    pub fn set_names(&mut self, index: NameIndex) -> Result<()> {
        ensure_dim!(
            self.index.len() == index.len(),
            "cannot replace {} identifiers with {}",
            self.index.len(),
            index.len()
        );
        self.index = index;
        Ok(())
    }

    /// Select rows; identifiers follow the selection.
    pub fn select_rows(&self, select: &BoundedSelector) -> Result<Self> {
        let index = self.index.select(select)?;
        let data = if select.is_full() || self.data.width() == 0 {
            self.data.clone()
        } else {
            self.data.take(&to_idx(select))?
        };
        Ok(Self { index, data })
    }
}

impl HasShape for AnnotationFrame {
    fn shape(&self) -> Shape {
        (self.height(), self.width()).into()
    }
}

impl Selectable for AnnotationFrame {
    fn select<S: AsRef<Selector>>(&self, info: &[S]) -> Result<Self> {
        ensure_dim!(
            info.len() == 2,
            "annotation tables take 2 selectors, got {}",
            info.len()
        );
        let rows = self.select_rows(&info[0].as_ref().bound(self.height())?)?;
        let cols = info[1].as_ref().bound(self.width())?;
        if cols.is_full() {
            return Ok(rows);
        }
        let columns = rows.data.get_columns();
        let data = DataFrame::new(cols.iter().map(|j| columns[j].clone()).collect())?;
        Ok(Self {
            index: rows.index,
            data,
        })
    }
}

impl HasShape for Series {
    fn shape(&self) -> Shape {
        self.len().into()
    }
}

impl Selectable for Series {
    fn select<S: AsRef<Selector>>(&self, info: &[S]) -> Result<Self> {
        ensure_dim!(info.len() == 1, "series take 1 selector, got {}", info.len());
        let select = info[0].as_ref().bound(self.len())?;
        if select.is_full() {
            Ok(self.clone())
        } else {
            Ok(self.take(&to_idx(&select))?)
        }
    }
}

fn to_idx(select: &BoundedSelector) -> IdxCa {
    IdxCa::from_vec("idx", select.iter().map(|i| i as IdxSize).collect())
}

/// Null-filled column used when aligning tables with different fields.
pub(crate) fn null_column(name: &str, len: usize, like: &Series) -> Series {
    Series::full_null(name, len, like.dtype())
}

/// Column holding the same label for every row.
pub(crate) fn label_column(name: &str, label: String, len: usize) -> Series {
    Series::new(name, vec![label; len])
}
