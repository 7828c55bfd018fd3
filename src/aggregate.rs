//! Reduce multi-sample items to one vector per item.
//!
//! A collection is either `(N, F)`, already one vector per item, or `(N, S, F)`
//! with `S` samples per item. The sample axis is collapsed by an [`Aggregation`].

use std::fmt;
use std::str::FromStr;

use ndarray::{s, Array2, ArrayView2, ArrayView3, ArrayViewD, CowArray, Ix2, Ix3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Input, TopKError};

/// Added before taking the logarithm in [`Aggregation::RobustMean`] to avoid `ln(0)`.
pub const ROBUST_EPS: f64 = 1e-8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Elementwise arithmetic mean.
    #[default]
    Mean,
    /// Elementwise median; the lower middle value for an even sample count.
    Median,
    /// Geometric mean of `x + 1e-8`. Damps large outliers compared to `Mean`.
    RobustMean,
}

impl Aggregation {
    pub const ALL: [Aggregation; 3] = [Aggregation::Mean, Aggregation::Median, Aggregation::RobustMean];

    pub fn name(self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Median => "median",
            Aggregation::RobustMean => "robust_mean",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|a| a.name()).collect()
    }

    /// Collapse the sample axis of an `(N, S, F)` array into `(N, F)`.
    /// `S` must be non-zero.
    pub fn aggregate(self, samples: ArrayView3<'_, f32>) -> Array2<f32> {
        let (n, count, f) = samples.dim();
        debug_assert!(count > 0);
        Array2::from_shape_fn((n, f), |(i, k)| {
            let lane = samples.slice(s![i, .., k]);
            match self {
                Aggregation::Mean => {
                    (lane.iter().map(|&x| x as f64).sum::<f64>() / count as f64) as f32
                }
                Aggregation::Median => {
                    let mut v = lane.to_vec();
                    let mid = (count - 1) / 2;
                    v.select_nth_unstable_by(mid, f32::total_cmp);
                    v[mid]
                }
                Aggregation::RobustMean => {
                    let logs = lane.iter().map(|&x| (x as f64 + ROBUST_EPS).ln()).sum::<f64>();
                    (logs / count as f64).exp() as f32
                }
            }
        })
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Aggregation {
    type Err = TopKError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| TopKError::UnknownAggregation { value: s.to_string(), valid: Self::names() })
    }
}

/// Reject anything that is not rank 2 or 3, and rank-3 inputs without samples.
pub fn check_shape(input: &ArrayViewD<'_, f32>, which: Input) -> Result<(), TopKError> {
    match input.ndim() {
        2 => Ok(()),
        3 if input.shape()[1] == 0 => Err(TopKError::EmptySamples { input: which }),
        3 => Ok(()),
        ndim => Err(TopKError::InvalidRank { input: which, ndim }),
    }
}

/// One vector per item: rank-2 inputs are borrowed as they are, rank-3 inputs are
/// aggregated over their sample axis.
pub fn collapse<'a>(
    input: ArrayViewD<'a, f32>,
    aggregation: Aggregation,
    which: Input,
) -> Result<CowArray<'a, f32, Ix2>, TopKError> {
    check_shape(&input, which)?;
    let ndim = input.ndim();
    if ndim == 2 {
        let view: ArrayView2<'a, f32> = input
            .into_dimensionality::<Ix2>()
            .map_err(|_| TopKError::InvalidRank { input: which, ndim })?;
        return Ok(CowArray::from(view));
    }
    let samples = input
        .into_dimensionality::<Ix3>()
        .map_err(|_| TopKError::InvalidRank { input: which, ndim })?;
    debug!(input = %which, shape = ?samples.dim(), %aggregation, "aggregating samples");
    Ok(CowArray::from(aggregation.aggregate(samples)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3, ArrayD, Axis, IxDyn};
    use proptest::prelude::*;

    #[test]
    fn parses_names() {
        for a in Aggregation::ALL {
            assert_eq!(a.name().parse::<Aggregation>().unwrap(), a);
        }
        let err = "mode".parse::<Aggregation>().unwrap_err();
        assert_eq!(
            err,
            TopKError::UnknownAggregation { value: "mode".into(), valid: vec!["mean", "median", "robust_mean"] }
        );
        assert!(err.to_string().contains("mode"));
    }

    #[test]
    fn identical_samples_agree_across_strategies() {
        let base = array![[0.7f32, 0.2, 0.1], [0.3, 0.5, 0.2]];
        let samples = Array3::from_shape_fn((2, 4, 3), |(i, _, k)| base[[i, k]]);
        for a in Aggregation::ALL {
            let out = a.aggregate(samples.view());
            assert_eq!(out.dim(), (2, 3));
            for (x, y) in out.iter().zip(base.iter()) {
                assert!((x - y).abs() < 1e-6, "{a}: {x} vs {y}");
            }
        }
    }

    #[test]
    fn mean_median_and_robust_values() {
        // one item, four samples, two features
        let samples = Array3::from_shape_vec((1, 4, 2), vec![1.0f32, 4.0, 3.0, 4.0, 2.0, 1.0, 10.0, 16.0]).unwrap();
        let mean = Aggregation::Mean.aggregate(samples.view());
        assert_eq!(mean, array![[4.0f32, 6.25]]);
        let median = Aggregation::Median.aggregate(samples.view());
        // lower middle of [1, 2, 3, 10] and [1, 4, 4, 16]
        assert_eq!(median, array![[2.0f32, 4.0]]);
        let robust = Aggregation::RobustMean.aggregate(samples.view());
        let expected = (1.0f64 * 3.0 * 2.0 * 10.0).powf(0.25) as f32;
        assert!((robust[[0, 0]] - expected).abs() < 1e-5);
        assert!(robust[[0, 1]] < mean[[0, 1]]);
    }

    #[test]
    fn robust_mean_of_zeros_stays_finite() {
        let samples = Array3::<f32>::zeros((1, 3, 2));
        let out = Aggregation::RobustMean.aggregate(samples.view());
        assert!(out.iter().all(|x| x.is_finite() && x.abs() < 1e-6));
    }

    #[test]
    fn rank_two_passes_through() {
        let m = array![[1.0f32, 2.0], [3.0, 4.0]].into_dyn();
        let out = collapse(m.view(), Aggregation::Median, Input::A).unwrap();
        assert_eq!(out.view(), array![[1.0f32, 2.0], [3.0, 4.0]].view());
    }

    #[test]
    fn rank_three_is_collapsed() {
        let m = Array3::<f32>::ones((5, 2, 3)).into_dyn();
        let out = collapse(m.view(), Aggregation::Mean, Input::B).unwrap();
        assert_eq!(out.dim(), (5, 3));
    }

    #[test]
    fn other_ranks_are_rejected() {
        let v = ArrayD::<f32>::zeros(IxDyn(&[4]));
        assert_eq!(
            collapse(v.view(), Aggregation::Mean, Input::A).unwrap_err(),
            TopKError::InvalidRank { input: Input::A, ndim: 1 }
        );
        let v = ArrayD::<f32>::zeros(IxDyn(&[2, 2, 2, 2]));
        assert_eq!(
            collapse(v.view(), Aggregation::Mean, Input::B).unwrap_err(),
            TopKError::InvalidRank { input: Input::B, ndim: 4 }
        );
        let v = ArrayD::<f32>::zeros(IxDyn(&[2, 0, 3]));
        assert_eq!(
            collapse(v.view(), Aggregation::Mean, Input::A).unwrap_err(),
            TopKError::EmptySamples { input: Input::A }
        );
    }

    proptest! {
        #[test]
        fn mean_and_median_ignore_sample_order(
            values in prop::collection::vec(-5.0f32..5.0, 2 * 5 * 3),
            rotate in 0usize..5,
        ) {
            let samples = Array3::from_shape_vec((2, 5, 3), values).unwrap();
            let mut order: Vec<usize> = (0..5).rev().collect();
            order.rotate_left(rotate);
            let shuffled = samples.select(Axis(1), &order);
            for a in [Aggregation::Mean, Aggregation::Median] {
                let x = a.aggregate(samples.view());
                let y = a.aggregate(shuffled.view());
                for (p, q) in x.iter().zip(y.iter()) {
                    prop_assert!((p - q).abs() < 1e-5, "{}: {} vs {}", a, p, q);
                }
            }
        }
    }
}
