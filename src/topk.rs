use ndarray::ArrayViewD;
use tracing::debug;

use crate::aggregate::{check_shape, collapse, Aggregation};
use crate::error::{Input, TopKError};
use crate::eval::{check_k_range, score};
use crate::matrix::distance_matrix;
use crate::metric::Metric;
use crate::rank::diagonal_ranks;
use crate::types::{ScoreReport, TopKParams};

/// Top-K distance between two paired collections.
///
/// Row `i` of the first collection is the ground-truth match of row `i` of the
/// second. Each collection is `(N, F)` or `(N, S, F)`; rank-3 inputs are reduced
/// to one vector per item with the configured [`Aggregation`] first.
#[derive(Clone, Debug, Default)]
pub struct TopKDistance {
    params: TopKParams,
}

impl TopKDistance {
    pub fn new(params: TopKParams) -> Self { Self { params } }

    /// Build from metric and aggregation names, failing on unknown names.
    pub fn from_names(metric: &str, aggregation: &str) -> Result<Self, TopKError> {
        let metric: Metric = metric.parse()?;
        let aggregation: Aggregation = aggregation.parse()?;
        Ok(Self::new(TopKParams { metric, aggregation, ..TopKParams::default() }))
    }

    pub fn params(&self) -> &TopKParams { &self.params }

    /// Score with the configured K range.
    pub fn evaluate(&self, a: ArrayViewD<'_, f32>, b: ArrayViewD<'_, f32>) -> Result<ScoreReport, TopKError> {
        self.evaluate_with_k(a, b, &self.params.k_range)
    }

    /// Score with an explicit K range.
    pub fn evaluate_with_k(
        &self,
        a: ArrayViewD<'_, f32>,
        b: ArrayViewD<'_, f32>,
        k_range: &[f64],
    ) -> Result<ScoreReport, TopKError> {
        check_k_range(k_range)?;
        let ranks = self.ranks(a, b)?;
        score(&ranks, k_range)
    }

    /// 1-based rank of the true match for every item.
    pub fn ranks(&self, a: ArrayViewD<'_, f32>, b: ArrayViewD<'_, f32>) -> Result<Vec<usize>, TopKError> {
        // both shapes are checked before any aggregation work starts
        check_shape(&a, Input::A)?;
        check_shape(&b, Input::B)?;

        let TopKParams { metric, aggregation, threads, .. } = self.params;
        let a = collapse(a, aggregation, Input::A)?;
        let b = collapse(b, aggregation, Input::B)?;
        if a.nrows() != b.nrows() {
            return Err(TopKError::ItemCountMismatch { a: a.nrows(), b: b.nrows() });
        }
        if a.ncols() != b.ncols() {
            return Err(TopKError::FeatureMismatch { a: a.ncols(), b: b.ncols() });
        }
        if a.nrows() == 0 { return Err(TopKError::Empty); }
        debug!(n = a.nrows(), dim = a.ncols(), %metric, %aggregation, "evaluating top-k distance");

        let matrix = distance_matrix(a.view(), b.view(), metric, threads)?;
        diagonal_ranks(matrix.view(), threads)
    }
}
