pub mod array;
pub mod data_traits;
pub mod frame;
pub mod index;
pub mod metadata;
pub mod selector;

pub use array::drop_unit_axes;
pub use data_traits::{HasShape, Selectable};
pub use frame::AnnotationFrame;
pub use index::NameIndex;
pub use metadata::ExperimentMetadata;
pub use selector::{BoundedSelector, Selector, Shape};

pub(crate) const FEATURE: &str = "feature";
pub(crate) const SAMPLE: &str = "sample";
