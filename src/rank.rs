use ndarray::ArrayView2;
use tracing::debug;

use crate::error::TopKError;
use crate::par::map_range;

/// Rank (1 = closest) of the true match for every item of a square distance matrix.
///
/// Column `i` holds the distances from every row to reference item `i`. Its row
/// indices are stably sorted by ascending distance and the rank is the position of
/// row `i` plus one. Equal distances keep row order, so a tie with a lower row
/// index counts as closer. NaN distances sort after every number, whatever their sign.
pub fn diagonal_ranks(matrix: ArrayView2<'_, f32>, threads: usize) -> Result<Vec<usize>, TopKError> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(TopKError::ItemCountMismatch { a: rows, b: cols });
    }
    debug!(n = rows, threads, "ranking diagonal matches");
    Ok(map_range(cols, threads, |i| column_rank(&matrix, i)))
}

fn column_rank(matrix: &ArrayView2<'_, f32>, i: usize) -> usize {
    // one positive NaN for every NaN payload and sign, and `+ 0.0` folds -0.0
    // into +0.0, so NaN sorts last and both zeros tie under total ordering
    let column: Vec<f32> = matrix
        .column(i)
        .iter()
        .map(|&d| if d.is_nan() { f32::NAN } else { d + 0.0 })
        .collect();
    let mut order: Vec<usize> = (0..column.len()).collect();
    order.sort_by(|&x, &y| column[x].total_cmp(&column[y]));
    // row `i` is always present in a square matrix
    order.iter().position(|&row| row == i).unwrap_or(i) + 1
}
