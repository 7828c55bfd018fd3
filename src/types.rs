use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::aggregate::Aggregation;
use crate::metric::Metric;

/// K percentages scored when the caller does not pick any.
pub const DEFAULT_K_RANGE: [f64; 3] = [1.0, 5.0, 10.0];

/// Percentage of items whose true match lies within the closest `k`% of candidates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopKScore { pub k: f64, pub score: f64 }

impl TopKScore {
    /// `top1`, `top5`, `top2.5`, ...
    pub fn key(&self) -> String { format!("top{}", self.k) }
}

/// Result of one evaluation. Every value is a percentage in `[0, 100]`.
///
/// Serializes as a flat map: the `top{K}` entries in request order, then
/// `mean_ranks` and `exact_matching`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreReport {
    pub top_k: Vec<TopKScore>,
    /// Mean rank of the true match, as a percentage of the item count.
    pub mean_ranks: f64,
    /// Share of items whose true match is the single closest candidate.
    pub exact_matching: f64,
}

impl ScoreReport {
    /// Look a value up by its report key.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "mean_ranks" => Some(self.mean_ranks),
            "exact_matching" => Some(self.exact_matching),
            _ => self.top_k.iter().find(|t| t.key() == key).map(|t| t.score),
        }
    }

    /// All `(key, value)` pairs in report order.
    pub fn entries(&self) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = self.top_k.iter().map(|t| (t.key(), t.score)).collect();
        out.push(("mean_ranks".to_string(), self.mean_ranks));
        out.push(("exact_matching".to_string(), self.exact_matching));
        out
    }
}

impl Serialize for ScoreReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (k, v) in &entries { map.serialize_entry(k, v)?; }
        map.end()
    }
}

/// Pipeline configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopKParams {
    pub metric: Metric,
    pub aggregation: Aggregation,
    pub k_range: Vec<f64>,
    /// Worker threads for the distance matrix and ranks; `<= 1` runs serially.
    pub threads: usize,
}

impl Default for TopKParams {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            aggregation: Aggregation::default(),
            k_range: DEFAULT_K_RANGE.to_vec(),
            threads: 1,
        }
    }
}
