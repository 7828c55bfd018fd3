use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TopKError;

/// Distance used to compare an item of one collection against an item of the other.
/// Similarity-style metrics are reported as `1 - similarity`, so smaller is always closer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Euclidean,
    Cosine,
    Correlation,
    Chebyshev,
    Minkowski,
    Cityblock,
}

/// Order of the Minkowski norm.
pub const MINKOWSKI_P: f64 = 3.0;

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Euclidean,
        Metric::Cosine,
        Metric::Correlation,
        Metric::Chebyshev,
        Metric::Minkowski,
        Metric::Cityblock,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Cosine => "cosine",
            Metric::Correlation => "correlation",
            Metric::Chebyshev => "chebyshev",
            Metric::Minkowski => "minkowski",
            Metric::Cityblock => "cityblock",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.name()).collect()
    }

    /// Distance between two equal-length vectors.
    #[inline]
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        let d = match self {
            Metric::Euclidean => l2_distance(a, b),
            Metric::Cosine => 1.0 - cosine_sim(a, b),
            Metric::Correlation => 1.0 - correlation(a, b),
            Metric::Chebyshev => chebyshev_distance(a, b),
            Metric::Minkowski => minkowski_distance(a, b, MINKOWSKI_P),
            Metric::Cityblock => cityblock_distance(a, b),
        };
        // rounding can push 1 - sim a hair below zero; `+ 0.0` folds -0.0 into +0.0
        let d = if d < 0.0 { 0.0 } else { d };
        d as f32 + 0.0
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Metric {
    type Err = TopKError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| TopKError::UnknownMetric { value: s.to_string(), valid: Self::names() })
    }
}

#[inline]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f64 {
    let mut s = 0.0f64;
    for i in 0..a.len() {
        let d = a[i] as f64 - b[i] as f64;
        s += d * d;
    }
    s.sqrt()
}

#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    let mut s = 0.0f64;
    for i in 0..a.len() { s += a[i] as f64 * b[i] as f64; }
    s
}

/// Cosine similarity; a zero-norm vector has similarity 0 to everything.
#[inline]
pub fn cosine_sim(a: &[f32], b: &[f32]) -> f64 {
    let num = dot(a, b);
    let na = dot(a, a).sqrt();
    let nb = dot(b, b).sqrt();
    if na == 0.0 || nb == 0.0 { 0.0 } else { num / (na * nb) }
}

/// Pearson correlation of the two vectors. A constant vector (zero centered norm)
/// correlates 0 with everything.
#[inline]
pub fn correlation(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() { return 0.0; }
    let ma = a.iter().map(|&x| x as f64).sum::<f64>() / a.len() as f64;
    let mb = b.iter().map(|&x| x as f64).sum::<f64>() / b.len() as f64;
    let (mut num, mut va, mut vb) = (0.0f64, 0.0f64, 0.0f64);
    for i in 0..a.len() {
        let ca = a[i] as f64 - ma;
        let cb = b[i] as f64 - mb;
        num += ca * cb;
        va += ca * ca;
        vb += cb * cb;
    }
    let na = va.sqrt();
    let nb = vb.sqrt();
    if na == 0.0 || nb == 0.0 { 0.0 } else { num / (na * nb) }
}

#[inline]
pub fn chebyshev_distance(a: &[f32], b: &[f32]) -> f64 {
    let mut m = 0.0f64;
    for i in 0..a.len() {
        let d = (a[i] as f64 - b[i] as f64).abs();
        if d > m { m = d; }
    }
    m
}

#[inline]
pub fn minkowski_distance(a: &[f32], b: &[f32], p: f64) -> f64 {
    let mut s = 0.0f64;
    for i in 0..a.len() { s += (a[i] as f64 - b[i] as f64).abs().powf(p); }
    s.powf(1.0 / p)
}

#[inline]
pub fn cityblock_distance(a: &[f32], b: &[f32]) -> f64 {
    let mut s = 0.0f64;
    for i in 0..a.len() { s += (a[i] as f64 - b[i] as f64).abs(); }
    s
}
