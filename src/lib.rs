//! topk_distance — top-K retrieval quality between paired embedding collections.
//!
//! Row `i` of one collection is the true match of row `i` of the other. The score
//! reports how often that match lands among the closest K% of candidates.
//!
//! Modules:
//! - `aggregate`: collapse `(N, S, F)` sample groups into `(N, F)`.
//! - `metric`: the six pairwise distances.
//! - `flat`: row-major copy of a collection.
//! - `matrix`: full pairwise distance matrix.
//! - `rank`: 1-based rank of every diagonal match.
//! - `eval`: top-K, mean rank and exact-match percentages.
//! - `topk`: `TopKDistance`, the whole pipeline.
//! - `par`: deterministic scoped-thread fill over output slots.

pub mod aggregate;
pub mod error;
pub mod eval;
pub mod flat;
pub mod matrix;
pub mod metric;
pub mod par;
pub mod rank;
pub mod topk;
pub mod types;

pub use aggregate::Aggregation;
pub use error::{Input, TopKError};
pub use metric::Metric;
pub use topk::TopKDistance;
pub use types::{ScoreReport, TopKParams, TopKScore, DEFAULT_K_RANGE};
