//! Annotated expression matrices.
//!
//! An [`ExpressionSet`] bundles one or more feature x sample matrices
//! ("channels") with a feature annotation table, a sample annotation table and
//! a description of the experiment. Subsetting always moves matrix columns and
//! sample annotation rows together, so measurements and phenotypes cannot
//! drift apart.
//!
//! ```
//! use exprset::{ExpressionSet, Selector};
//! use ndarray::array;
//!
//! let eset = ExpressionSet::builder()
//!     .channel("exprs", array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
//!     .sample_names(["s1", "s2", "s3"])
//!     .build()
//!     .unwrap();
//! let sub = eset.subset(Selector::All, vec![2usize, 0]).unwrap();
//! assert_eq!(sub.sample_names().to_vec(), vec!["s3", "s1"]);
//! assert_eq!(sub.exprs().unwrap(), &array![[3.0, 1.0], [6.0, 4.0]]);
//! ```

pub mod concat;
pub mod data;
pub mod error;
mod expression_set;
pub mod lookup;

pub use concat::concat_samples;
pub use data::{
    AnnotationFrame, BoundedSelector, ExperimentMetadata, HasShape, NameIndex, Selectable,
    Selector, Shape,
};
pub use error::{ExprSetError, Result};
pub use expression_set::{ExpressionSet, ExpressionSetBuilder, DEFAULT_CHANNEL};
pub use lookup::FeatureLookup;
