#![allow(dead_code)]

use exprset::*;

use ndarray::{Array2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use polars::prelude::{DataFrame, NamedFrom, Series};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;

////////////////////////////////////////////////////////////////////////////////
/// Fixtures
////////////////////////////////////////////////////////////////////////////////

/// The 3 x 4 example used throughout the tests.
pub fn small_eset() -> ExpressionSet {
    let expr = ndarray::array![
        [1.0, 2.0, 3.0, 4.0],
        [5.0, 6.0, 7.0, 8.0],
        [9.0, 10.0, 11.0, 12.0]
    ];
    let samples = DataFrame::new(vec![
        Series::new("sex", &["F", "M", "M", "F"]),
        Series::new("age", &[31i32, 45, 52, 28]),
        Series::new("diagnosis", &["ALL", "ALL", "AML", "AML"]),
    ])
    .unwrap();
    let features = DataFrame::new(vec![
        Series::new("gene_id", &["TP53", "BRCA1", "MYC"]),
        Series::new("location", &["17p13.1", "17q21.31", "8q24.21"]),
    ])
    .unwrap();
    ExpressionSet::builder()
        .channel("expr", expr)
        .feature_names(["p1_at", "p2_at", "p3_at"])
        .sample_names(["s1", "s2", "s3", "s4"])
        .row_annotation(features)
        .col_annotation(samples)
        .metadata(ExperimentMetadata::new().with_title("Leukemia subtypes"))
        .annotation("hgu95av2")
        .build()
        .unwrap()
}

pub fn rand_matrix(n_features: usize, n_samples: usize) -> Array2<f64> {
    Array2::random((n_features, n_samples), Uniform::new(0.0, 16.0))
}

pub fn str_values(series: &Series) -> Vec<String> {
    series
        .str()
        .unwrap()
        .into_iter()
        .map(|x| x.unwrap_or("null").to_string())
        .collect()
}

////////////////////////////////////////////////////////////////////////////////
/// Strategies
////////////////////////////////////////////////////////////////////////////////

pub fn matrix_strat(n_features: usize, n_samples: usize) -> impl Strategy<Value = Array2<f64>> {
    proptest::collection::vec(-100.0f64..100.0, n_features * n_samples)
        .prop_map(move |v| Array2::from_shape_vec((n_features, n_samples), v).unwrap())
}

/// Strategy for generating a random expression set with annotated samples
/// ("sex", "age") and features ("gene_id").
pub fn eset_strat(n_features: usize, n_samples: usize) -> impl Strategy<Value = ExpressionSet> {
    let channels = (1usize..3).prop_flat_map(move |n| {
        proptest::collection::vec(matrix_strat(n_features, n_samples), n)
    });
    let sex = proptest::collection::vec(any::<bool>(), n_samples);
    let age = proptest::collection::vec(18i32..90, n_samples);
    (channels, sex, age).prop_map(move |(channels, sex, age)| {
        let samples = DataFrame::new(vec![
            Series::new(
                "sex",
                sex.iter().map(|&x| if x { "F" } else { "M" }).collect::<Vec<_>>(),
            ),
            Series::new("age", age),
        ])
        .unwrap();
        let features = DataFrame::new(vec![Series::new(
            "gene_id",
            (0..n_features).map(|i| format!("g{}", i)).collect::<Vec<_>>(),
        )])
        .unwrap();
        let mut builder = ExpressionSet::builder()
            .feature_names((0..n_features).map(|i| format!("f_{}", i)))
            .sample_names((0..n_samples).map(|i| format!("s_{}", i)))
            .row_annotation(features)
            .col_annotation(samples);
        for (i, arr) in channels.into_iter().enumerate() {
            let name = if i == 0 {
                DEFAULT_CHANNEL.to_string()
            } else {
                format!("channel_{}", i)
            };
            builder = builder.channel(name, arr);
        }
        builder.build().unwrap()
    })
}

pub fn select_strat(n: usize) -> BoxedStrategy<Selector> {
    if n == 0 {
        prop_oneof![Just(Selector::All), Just(Selector::Index(Vec::new()))].boxed()
    } else {
        let indices = proptest::collection::vec(0..n, 0..2 * n).prop_map(Selector::from);
        let mask = proptest::collection::vec(any::<bool>(), n).prop_map(Selector::from);
        let range = (0..n)
            .prop_flat_map(move |start| (Just(start), (start + 1)..=n))
            .prop_map(|(start, stop)| Selector::from(start..stop));
        prop_oneof![Just(Selector::All), indices, mask, range].boxed()
    }
}

pub fn permutation_strat(n: usize) -> impl Strategy<Value = Vec<usize>> {
    Just((0..n).collect::<Vec<_>>()).prop_shuffle()
}

/// A random expression set together with a feature and a sample selector.
pub fn eset_select_strat() -> impl Strategy<Value = (ExpressionSet, Selector, Selector)> {
    (0usize..20, 0usize..20).prop_flat_map(|(n_features, n_samples)| {
        (
            eset_strat(n_features, n_samples),
            select_strat(n_features),
            select_strat(n_samples),
        )
    })
}

////////////////////////////////////////////////////////////////////////////////
/// Reference implementations
////////////////////////////////////////////////////////////////////////////////

pub fn array_select(arr: &Array2<f64>, rows: &Selector, cols: &Selector) -> Array2<f64> {
    let i = rows.bound(arr.nrows()).unwrap().to_vec();
    let j = cols.bound(arr.ncols()).unwrap().to_vec();
    arr.select(Axis(0), &i).select(Axis(1), &j)
}
