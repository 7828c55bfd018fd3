use tracing::debug;

use crate::error::TopKError;
use crate::types::{ScoreReport, TopKScore};

/// Reject K values that are not finite percentages in `(0, 100]`.
pub fn check_k_range(k_range: &[f64]) -> Result<(), TopKError> {
    match k_range.iter().find(|&&k| !(k.is_finite() && k > 0.0 && k <= 100.0)) {
        Some(&k) => Err(TopKError::InvalidK { k }),
        None => Ok(()),
    }
}

/// Top-K@%: share of items whose 1-based rank is within `N * k / 100`.
/// The threshold is compared as is, without rounding: with N = 10 a threshold
/// of 2.5 or 2.9 admits ranks 1 and 2, while 3.0 also admits rank 3.
pub fn top_k_percent(ranks: &[usize], k: f64) -> f64 {
    let n = ranks.len() as f64;
    let threshold = n * (k / 100.0);
    let hit = ranks.iter().filter(|&&r| (r as f64) <= threshold).count();
    (hit as f64 / n) * 100.0
}

/// Mean rank as a percentage of the item count.
pub fn mean_rank_percent(ranks: &[usize]) -> f64 {
    let n = ranks.len() as f64;
    let mean = ranks.iter().map(|&r| r as f64).sum::<f64>() / n;
    (mean / n) * 100.0
}

/// Share of items ranked first. Ranks are 1-based, so this counts `rank == 1`.
pub fn exact_match_percent(ranks: &[usize]) -> f64 {
    let hit = ranks.iter().filter(|&&r| r == 1).count();
    (hit as f64 / ranks.len() as f64) * 100.0
}

/// Turn a rank vector into the full report, one `top{K}` entry per `k_range` value.
pub fn score(ranks: &[usize], k_range: &[f64]) -> Result<ScoreReport, TopKError> {
    check_k_range(k_range)?;
    if ranks.is_empty() { return Err(TopKError::Empty); }
    let top_k = k_range.iter().map(|&k| TopKScore { k, score: top_k_percent(ranks, k) }).collect();
    let report = ScoreReport {
        top_k,
        mean_ranks: mean_rank_percent(ranks),
        exact_matching: exact_match_percent(ranks),
    };
    debug!(n = ranks.len(), exact = report.exact_matching, "scored ranks");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fractional_threshold_is_not_rounded() {
        let ranks: Vec<usize> = (1..=10).collect();
        // thresholds 2.5 and 2.9 both admit ranks 1..=2
        assert_eq!(top_k_percent(&ranks, 25.0), 20.0);
        assert_eq!(top_k_percent(&ranks, 29.0), 20.0);
        // threshold 3.0 admits rank 3
        assert_eq!(top_k_percent(&ranks, 30.0), 30.0);
        assert_eq!(top_k_percent(&ranks, 100.0), 100.0);
        // threshold 0.1 admits nothing
        assert_eq!(top_k_percent(&ranks, 1.0), 0.0);
    }

    #[test]
    fn exact_match_counts_rank_one() {
        // a zero-based reading would count nothing here
        let ranks = vec![1, 1, 2, 3];
        assert_eq!(exact_match_percent(&ranks), 50.0);
        assert_eq!(exact_match_percent(&[2, 3]), 0.0);
    }

    #[test]
    fn mean_rank_is_normalized_by_item_count() {
        let ranks = vec![1, 1, 1];
        assert!((mean_rank_percent(&ranks) - 100.0 / 3.0).abs() < 1e-12);
        let ranks = vec![4, 4, 4, 4];
        assert_eq!(mean_rank_percent(&ranks), 100.0);
    }

    #[test]
    fn report_keeps_request_order() {
        let ranks = vec![1, 2, 3, 4];
        let report = score(&ranks, &[50.0, 25.0]).unwrap();
        let keys: Vec<String> = report.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["top50", "top25", "mean_ranks", "exact_matching"]);
        assert_eq!(report.get("top50"), Some(50.0));
        assert_eq!(report.get("top25"), Some(25.0));
        assert_eq!(report.mean_ranks, 62.5);
        assert_eq!(report.exact_matching, 25.0);
    }

    #[test]
    fn rejects_bad_k_and_empty_ranks() {
        assert_eq!(score(&[1], &[0.0]).unwrap_err(), TopKError::InvalidK { k: 0.0 });
        assert_eq!(score(&[1], &[5.0, 101.0]).unwrap_err(), TopKError::InvalidK { k: 101.0 });
        assert!(matches!(score(&[1], &[f64::NAN]), Err(TopKError::InvalidK { .. })));
        assert_eq!(score(&[], &[1.0]).unwrap_err(), TopKError::Empty);
    }

    proptest! {
        #[test]
        fn monotonic_in_k_and_bounded(
            ranks in prop::collection::vec(1usize..50, 1..50),
            k1 in 0.1f64..100.0,
            k2 in 0.1f64..100.0,
        ) {
            let (lo, hi) = if k1 <= k2 { (k1, k2) } else { (k2, k1) };
            let a = top_k_percent(&ranks, lo);
            let b = top_k_percent(&ranks, hi);
            prop_assert!(a <= b);
            prop_assert!((0.0..=100.0).contains(&a) && (0.0..=100.0).contains(&b));
            let e = exact_match_percent(&ranks);
            prop_assert!((0.0..=100.0).contains(&e));
        }
    }
}
