use std::borrow::Cow;

use indexmap::{IndexMap, IndexSet};
use log::warn;
use ndarray::{concatenate, Axis};
use polars::frame::DataFrame;
use polars::series::Series;

use crate::data::frame::{label_column, null_column};
use crate::data::{AnnotationFrame, NameIndex, Selector, SAMPLE};
use crate::error::{ensure_dim, ExprSetError, Result};
use crate::ExpressionSet;

/// Combine expression sets along the sample axis.
///
/// Every input must carry the feature identifiers of the first one, in any
/// order, and every channel of the first one. Sample fields are unioned by
/// name; a field missing from an input is null for its samples. If `label` is
/// given as `(field, keys)`, a leading field records which input each sample
/// came from.
pub fn concat_samples<S: ToString>(
    esets: &[ExpressionSet],
    label: Option<(&str, &[S])>,
) -> Result<ExpressionSet> {
    let first = esets.first().ok_or_else(|| {
        ExprSetError::DimensionMismatch("cannot concatenate zero expression sets".to_string())
    })?;
    if let Some((_, keys)) = label {
        ensure_dim!(
            keys.len() == esets.len(),
            "{} labels given for {} expression sets",
            keys.len(),
            esets.len()
        );
    }

    let aligned = esets
        .iter()
        .map(|eset| align_features(eset, first.feature_names()))
        .collect::<Result<Vec<_>>>()?;

    let mut channels = IndexMap::with_capacity(first.channel_names().len());
    for name in first.channel_names() {
        let views = aligned
            .iter()
            .map(|eset| eset.matrix(name).map(|arr| arr.view()))
            .collect::<Result<Vec<_>>>()?;
        let arr = concatenate(Axis(1), &views)
            .map_err(|e| ExprSetError::DimensionMismatch(e.to_string()))?;
        channels.insert(name.to_string(), arr);
    }

    let sample_names = NameIndex::try_new(
        SAMPLE,
        aligned.iter().flat_map(|eset| eset.sample_names().to_vec()),
    )?;
    let labels = label.map(|(field, keys)| {
        (field, keys.iter().map(|k| k.to_string()).collect::<Vec<_>>())
    });
    let data = stack_frames(
        aligned.iter().map(|eset| eset.col_annotation()).collect(),
        labels.as_ref().map(|(field, keys)| (*field, keys.as_slice())),
    )?;

    for eset in esets.iter().skip(1) {
        if eset.annotation() != first.annotation() {
            warn!(
                "annotation '{}' differs from '{}'; keeping the latter",
                eset.annotation().unwrap_or("none"),
                first.annotation().unwrap_or("none"),
            );
        }
    }

    ExpressionSet::from_parts(
        channels,
        first.row_annotation().clone(),
        AnnotationFrame::new(sample_names, data)?,
        first.metadata().clone(),
        first.annotation().map(str::to_string),
    )
}

/// Reorder the features of `eset` to follow `features`.
fn align_features<'a>(
    eset: &'a ExpressionSet,
    features: &NameIndex,
) -> Result<Cow<'a, ExpressionSet>> {
    if eset.feature_names() == features {
        return Ok(Cow::Borrowed(eset));
    }
    ensure_dim!(
        eset.n_features() == features.len(),
        "expression set has {} features, expected {}",
        eset.n_features(),
        features.len()
    );
    let order = eset.feature_ix(features.iter())?;
    Ok(Cow::Owned(eset.subset(order, Selector::All)?))
}

/// Stack sample tables vertically over the union of their fields.
fn stack_frames(
    frames: Vec<&AnnotationFrame>,
    label: Option<(&str, &[String])>,
) -> Result<DataFrame> {
    let mut fields: IndexMap<String, &Series> = IndexMap::new();
    for frame in frames.iter() {
        for series in frame.data().get_columns() {
            fields.entry(series.name().to_string()).or_insert(series);
        }
    }
    if let Some((field, _)) = label {
        if fields.contains_key(field) {
            return Err(ExprSetError::DuplicateIdentifier {
                kind: "field",
                name: field.to_string(),
            });
        }
    }
    if fields.is_empty() && label.is_none() {
        return Ok(DataFrame::empty());
    }

    let names: IndexSet<&str> = fields.keys().map(|x| x.as_str()).collect();
    let mut result: Option<DataFrame> = None;
    for (i, frame) in frames.iter().enumerate() {
        let height = frame.height();
        let mut columns = Vec::with_capacity(names.len() + 1);
        if let Some((field, keys)) = label {
            columns.push(label_column(field, keys[i].clone(), height));
        }
        for name in names.iter() {
            let column = match frame.column(name) {
                Ok(series) => series.clone(),
                Err(_) => null_column(name, height, fields[*name]),
            };
            columns.push(column);
        }
        let df = DataFrame::new(columns)?;
        match result.as_mut() {
            None => result = Some(df),
            Some(acc) => {
                acc.vstack_mut(&df)?;
            }
        }
    }
    Ok(result.unwrap_or_else(DataFrame::empty))
}
