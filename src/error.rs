use thiserror::Error;

/// Which of the two collections an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input { A, B }

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::A => f.write_str("collection_a"),
            Input::B => f.write_str("collection_b"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TopKError {
    #[error("{value} not in list of defined methods, choose from {valid:?}")]
    UnknownMetric { value: String, valid: Vec<&'static str> },
    #[error("{value} not in list of defined aggregations, choose from {valid:?}")]
    UnknownAggregation { value: String, valid: Vec<&'static str> },
    #[error("{input} should be a 2D or 3D array, but got {ndim}D")]
    InvalidRank { input: Input, ndim: usize },
    #[error("{input} has no samples along the aggregation axis")]
    EmptySamples { input: Input },
    #[error("k value {k} must be a finite percentage in (0, 100]")]
    InvalidK { k: f64 },
    #[error("collection_a has {a} items but collection_b has {b}")]
    ItemCountMismatch { a: usize, b: usize },
    #[error("collection_a has {a} features per item but collection_b has {b}")]
    FeatureMismatch { a: usize, b: usize },
    #[error("cannot shape distance matrix: {0}")]
    MatrixShape(String),
    #[error("cannot score empty collections")]
    Empty,
}
