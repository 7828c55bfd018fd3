use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::error::TopKError;
use crate::flat::FlatRows;
use crate::metric::Metric;
use crate::par::map_range;

/// Full pairwise distance matrix: entry `(i, j)` is the distance from row `i` of `a`
/// to row `j` of `b`. Shapes `(N, F)` and `(M, F)` give an `(N, M)` matrix.
/// Cells are computed on up to `threads` workers.
pub fn distance_matrix(
    a: ArrayView2<'_, f32>,
    b: ArrayView2<'_, f32>,
    metric: Metric,
    threads: usize,
) -> Result<Array2<f32>, TopKError> {
    if a.ncols() != b.ncols() {
        return Err(TopKError::FeatureMismatch { a: a.ncols(), b: b.ncols() });
    }
    let a = FlatRows::from_view(a);
    let b = FlatRows::from_view(b);
    let (n, m) = (a.len(), b.len());
    debug!(n, m, dim = a.dim(), %metric, threads, "computing distance matrix");

    let cells = map_range(n * m, threads, |idx| metric.distance(a.row(idx / m), b.row(idx % m)));
    Array2::from_shape_vec((n, m), cells).map_err(|e| TopKError::MatrixShape(e.to_string()))
}
