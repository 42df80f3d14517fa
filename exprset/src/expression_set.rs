use crate::{
    data::{
        array::select_2d, drop_unit_axes, AnnotationFrame, ExperimentMetadata, HasShape,
        NameIndex, Selectable, Selector, Shape, FEATURE, SAMPLE,
    },
    error::{ensure_dim, ExprSetError, Result},
    lookup::FeatureLookup,
};

use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use ndarray::{Array2, ArrayD};
use polars::prelude::{DataFrame, NamedFrom, Series};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

/// Name of the channel holding the primary expression values.
pub const DEFAULT_CHANNEL: &str = "exprs";

/// One or more feature x sample matrices with their feature annotation,
/// sample annotation and experiment description.
///
/// Row `i` of every channel and of the feature annotation describe the same
/// feature; column `j` of every channel and row `j` of the sample annotation
/// describe the same sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionSet {
    channels: IndexMap<String, Array2<f64>>,
    features: AnnotationFrame,
    samples: AnnotationFrame,
    metadata: ExperimentMetadata,
    annotation: Option<String>,
}

impl std::fmt::Display for ExpressionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ExpressionSet with n_features x n_samples = {} x {}",
            self.n_features(),
            self.n_samples(),
        )?;
        write!(f, "\n    channels: '{}'", self.channels.keys().join("', '"))?;
        let fields = self.features.column_names();
        if !fields.is_empty() {
            write!(f, "\n    feature fields: '{}'", fields.into_iter().join("', '"))?;
        }
        let fields = self.samples.column_names();
        if !fields.is_empty() {
            write!(f, "\n    sample fields: '{}'", fields.into_iter().join("', '"))?;
        }
        if let Some(annotation) = &self.annotation {
            write!(f, "\n    annotation: {}", annotation)?;
        }
        if let Some(title) = &self.metadata.title {
            write!(f, "\n    experiment: {}", title)?;
        }
        Ok(())
    }
}

impl ExpressionSet {
    pub fn builder() -> ExpressionSetBuilder {
        ExpressionSetBuilder::default()
    }

    /// Expression set with a single channel and default annotations.
    pub fn from_matrix<S: Into<String>>(name: S, matrix: Array2<f64>) -> Result<Self> {
        Self::builder().channel(name, matrix).build()
    }

    pub(crate) fn from_parts(
        channels: IndexMap<String, Array2<f64>>,
        features: AnnotationFrame,
        samples: AnnotationFrame,
        metadata: ExperimentMetadata,
        annotation: Option<String>,
    ) -> Result<Self> {
        ensure_dim!(
            !channels.is_empty(),
            "an expression set needs at least one channel"
        );
        let dim = (features.height(), samples.height());
        for (name, arr) in channels.iter() {
            ensure_dim!(
                arr.dim() == dim,
                "channel '{}' has shape {} x {}, expected {} x {}",
                name,
                arr.nrows(),
                arr.ncols(),
                dim.0,
                dim.1
            );
        }
        Ok(Self {
            channels,
            features,
            samples,
            metadata,
            annotation,
        })
    }

    pub fn n_features(&self) -> usize {
        self.features.height()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.height()
    }

    /// (number of features, number of samples)
    pub fn dim(&self) -> (usize, usize) {
        (self.n_features(), self.n_samples())
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.keys().map(|x| x.as_str()).collect()
    }

    pub fn matrix(&self, channel: &str) -> Result<&Array2<f64>> {
        self.channels
            .get(channel)
            .ok_or_else(|| ExprSetError::UnknownChannel(channel.to_string()))
    }

    pub fn exprs(&self) -> Result<&Array2<f64>> {
        self.matrix(DEFAULT_CHANNEL)
    }

    pub fn feature_names(&self) -> &NameIndex {
        self.features.names()
    }

    pub fn sample_names(&self) -> &NameIndex {
        self.samples.names()
    }

    pub fn row_annotation(&self) -> &AnnotationFrame {
        &self.features
    }

    pub fn col_annotation(&self) -> &AnnotationFrame {
        &self.samples
    }

    /// A sample annotation field, aligned to `sample_names`.
    pub fn column_field(&self, name: &str) -> Result<&Series> {
        self.samples.column(name)
    }

    /// A feature annotation field, aligned to `feature_names`.
    pub fn row_field(&self, name: &str) -> Result<&Series> {
        self.features.column(name)
    }

    pub fn metadata(&self) -> &ExperimentMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut ExperimentMetadata {
        &mut self.metadata
    }

    /// Name of the platform annotation package, e.g. "hgu95av2".
    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    pub fn set_annotation<S: Into<String>>(&mut self, annotation: Option<S>) {
        self.annotation = annotation.map(Into::into);
    }

    /// Positions of the given feature identifiers.
    pub fn feature_ix<I, S>(&self, names: I) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        positions(self.feature_names(), FEATURE, names)
    }

    /// Positions of the given sample identifiers.
    pub fn sample_ix<I, S>(&self, names: I) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        positions(self.sample_names(), SAMPLE, names)
    }

    /// Return a new expression set restricted to the selected features (rows)
    /// and samples (columns), in selector order. The source is left untouched.
    pub fn subset<R, C>(&self, rows: R, cols: C) -> Result<Self>
    where
        R: Into<Selector>,
        C: Into<Selector>,
    {
        let (rows, cols): (Selector, Selector) = (rows.into(), cols.into());
        let rows = rows.bound(self.n_features())?;
        let cols = cols.bound(self.n_samples())?;
        debug!(
            "subsetting expression set from {} x {} to {} x {}",
            self.n_features(),
            self.n_samples(),
            rows.len(),
            cols.len()
        );
        let channels = self
            .channels
            .par_iter()
            .map(|(name, arr)| (name.clone(), select_2d(arr, &rows, &cols)))
            .collect();
        Ok(Self {
            channels,
            features: self.features.select_rows(&rows)?,
            samples: self.samples.select_rows(&cols)?,
            metadata: self.metadata.clone(),
            annotation: self.annotation.clone(),
        })
    }

    /// Subset by identifiers. `None` keeps the whole axis.
    pub fn subset_by_name<S: AsRef<str>>(
        &self,
        features: Option<&[S]>,
        samples: Option<&[S]>,
    ) -> Result<Self> {
        let rows = match features {
            Some(names) => Selector::Index(self.feature_ix(names)?),
            None => Selector::All,
        };
        let cols = match samples {
            Some(names) => Selector::Index(self.sample_ix(names)?),
            None => Selector::All,
        };
        self.subset(rows, cols)
    }

    /// Extract part of one channel. With `drop` set, axes of length one are
    /// removed from the result; otherwise it stays two-dimensional.
    pub fn select_matrix<R, C>(&self, channel: &str, rows: R, cols: C, drop: bool) -> Result<ArrayD<f64>>
    where
        R: Into<Selector>,
        C: Into<Selector>,
    {
        let arr = self.matrix(channel)?;
        let (rows, cols): (Selector, Selector) = (rows.into(), cols.into());
        let sub = select_2d(
            arr,
            &rows.bound(self.n_features())?,
            &cols.bound(self.n_samples())?,
        );
        if drop {
            Ok(drop_unit_axes(sub))
        } else {
            Ok(sub.into_dyn())
        }
    }

    /// Add or replace a sample annotation field.
    pub fn set_column_field(&mut self, field: Series) -> Result<()> {
        self.samples.set_column(field)
    }

    /// Add or replace a feature annotation field.
    pub fn set_row_field(&mut self, field: Series) -> Result<()> {
        self.features.set_column(field)
    }

    pub fn remove_column_field(&mut self, name: &str) -> Result<Series> {
        self.samples.remove_column(name)
    }

    pub fn remove_row_field(&mut self, name: &str) -> Result<Series> {
        self.features.remove_column(name)
    }

    pub fn set_sample_names<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.samples.set_names(NameIndex::try_new(SAMPLE, names)?)
    }

    pub fn set_feature_names<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features.set_names(NameIndex::try_new(FEATURE, names)?)
    }

    /// Reorder samples in place; `order` must be a permutation of the sample
    /// positions.
    pub fn reorder_samples(&mut self, order: &[usize]) -> Result<()> {
        check_permutation(order, self.n_samples())?;
        *self = self.subset(Selector::All, order)?;
        Ok(())
    }

    /// Reorder features in place; `order` must be a permutation of the feature
    /// positions.
    pub fn reorder_features(&mut self, order: &[usize]) -> Result<()> {
        check_permutation(order, self.n_features())?;
        *self = self.subset(order, Selector::All)?;
        Ok(())
    }

    /// Query an external annotation service for every feature and store the
    /// answers as the feature field `field`. Unknown features get nulls.
    /// Returns the number of features the service resolved.
    pub fn annotate_features<L>(&mut self, field: &str, lookup: &L) -> Result<usize>
    where
        L: FeatureLookup + ?Sized,
    {
        let values = self
            .feature_names()
            .iter()
            .map(|id| lookup.lookup(id))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let hits = values.iter().filter(|x| x.is_some()).count();
        debug!(
            "annotation lookup resolved {} of {} features for field '{}'",
            hits,
            values.len(),
            field
        );
        self.features.set_column(Series::new(field, values))?;
        Ok(hits)
    }
}

impl HasShape for ExpressionSet {
    fn shape(&self) -> Shape {
        self.dim().into()
    }
}

impl Selectable for ExpressionSet {
    fn select<S: AsRef<Selector>>(&self, info: &[S]) -> Result<Self> {
        ensure_dim!(
            info.len() == 2,
            "expression sets take 2 selectors, got {}",
            info.len()
        );
        self.subset(info[0].as_ref().clone(), info[1].as_ref().clone())
    }
}

fn positions<I, S>(index: &NameIndex, kind: &'static str, names: I) -> Result<Vec<usize>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| {
            let name = name.as_ref();
            index
                .get_index(name)
                .ok_or_else(|| ExprSetError::UnknownIdentifier {
                    kind,
                    name: name.to_string(),
                })
        })
        .collect()
}

fn check_permutation(order: &[usize], len: usize) -> Result<()> {
    ensure_dim!(
        order.len() == len,
        "reordering needs {} positions, got {}",
        len,
        order.len()
    );
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len {
            return Err(ExprSetError::IndexOutOfRange { index: i, len });
        }
        ensure_dim!(!seen[i], "position {} appears more than once in the new order", i);
        seen[i] = true;
    }
    Ok(())
}

/// Collects the parts of an expression set; validation happens in `build`.
#[derive(Debug, Default)]
pub struct ExpressionSetBuilder {
    channels: Vec<(String, Array2<f64>)>,
    feature_names: Option<Vec<String>>,
    sample_names: Option<Vec<String>>,
    row_annotation: Option<DataFrame>,
    col_annotation: Option<DataFrame>,
    metadata: ExperimentMetadata,
    annotation: Option<String>,
}

impl ExpressionSetBuilder {
    pub fn channel<S: Into<String>>(mut self, name: S, matrix: Array2<f64>) -> Self {
        self.channels.push((name.into(), matrix));
        self
    }

    pub fn feature_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn sample_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sample_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn row_annotation(mut self, data: DataFrame) -> Self {
        self.row_annotation = Some(data);
        self
    }

    pub fn col_annotation(mut self, data: DataFrame) -> Self {
        self.col_annotation = Some(data);
        self
    }

    pub fn metadata(mut self, metadata: ExperimentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn annotation<S: Into<String>>(mut self, annotation: S) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn build(self) -> Result<ExpressionSet> {
        let (n_features, n_samples) = self
            .channels
            .first()
            .map(|(_, arr)| arr.dim())
            .ok_or_else(|| {
                ExprSetError::DimensionMismatch(
                    "an expression set needs at least one channel".to_string(),
                )
            })?;
        let mut channels = IndexMap::with_capacity(self.channels.len());
        for (name, arr) in self.channels {
            if channels.contains_key(&name) {
                return Err(ExprSetError::DuplicateIdentifier { kind: "channel", name });
            }
            channels.insert(name, arr);
        }
        let features = annotation_frame(FEATURE, n_features, self.feature_names, self.row_annotation)?;
        let samples = annotation_frame(SAMPLE, n_samples, self.sample_names, self.col_annotation)?;
        ExpressionSet::from_parts(channels, features, samples, self.metadata, self.annotation)
    }
}

fn annotation_frame(
    kind: &'static str,
    n: usize,
    names: Option<Vec<String>>,
    data: Option<DataFrame>,
) -> Result<AnnotationFrame> {
    let index = match names {
        Some(names) => {
            ensure_dim!(
                names.len() == n,
                "{} {} names given for {} matrix entries",
                names.len(),
                kind,
                n
            );
            NameIndex::try_new(kind, names)?
        }
        None => NameIndex::range(n),
    };
    match data {
        Some(data) => AnnotationFrame::new(index, data),
        None => Ok(AnnotationFrame::empty(index)),
    }
}
