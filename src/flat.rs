use ndarray::ArrayView2;

/// Row-major copy of an item collection: `len()` rows of `dim()` features each.
pub struct FlatRows {
    dim: usize,
    len: usize,
    vecs: Vec<f32>, // concatenated rows of length `dim`
}

impl FlatRows {
    pub fn from_view(view: ArrayView2<'_, f32>) -> Self {
        let (len, dim) = view.dim();
        // `iter` walks in logical row-major order whatever the source strides are
        Self { dim, len, vecs: view.iter().copied().collect() }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn dim(&self) -> usize { self.dim }

    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        let start = i * self.dim; let end = start + self.dim; &self.vecs[start..end]
    }
}
