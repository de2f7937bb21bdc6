//! Ranker: deterministic top-K selection over a score column.

use std::cmp::Ordering;

/// Descending by score, ascending row index among equal scores. NaN sorts last.
fn rank_order(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    let key = |s: f32| if s.is_nan() { f32::NEG_INFINITY } else { s };
    key(b.1)
        .total_cmp(&key(a.1))
        .then_with(|| a.0.cmp(&b.0))
}

/// Returns up to `k` `(row, score)` pairs, best first.
///
/// A corpus smaller than `k` returns every row.
pub fn top_k(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    if k == 0 {
        return Vec::new();
    }
    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    if k < ranked.len() {
        // Partition first so only the winners are fully sorted.
        ranked.select_nth_unstable_by(k - 1, rank_order);
        ranked.truncate(k);
    }
    ranked.sort_unstable_by(rank_order);
    ranked
}
