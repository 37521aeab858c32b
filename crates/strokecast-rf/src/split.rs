//! Exhaustive Gini-impurity split search.

use crate::dataset::{Dataset, row_label};

/// The best split found for a partition.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SplitCandidate {
    /// Feature column used for the split.
    pub(crate) feature: usize,
    /// Threshold value (an observed data value, not a midpoint).
    pub(crate) threshold: f64,
    /// Weighted Gini impurity of the resulting partition.
    pub(crate) weighted_gini: f64,
}

/// Gini impurity of a group from its per-class counts.
///
/// `1 - p0² - p1²`; an empty group has impurity 0.
pub(crate) fn gini(count_0: usize, count_1: usize) -> f64 {
    let n = count_0 + count_1;
    if n == 0 {
        return 0.0;
    }
    let p0 = count_0 as f64 / n as f64;
    let p1 = count_1 as f64 / n as f64;
    1.0 - (p0 * p0 + p1 * p1)
}

/// Majority class of a group: 1 only on a strict majority of 1-labels,
/// ties (including the empty group) resolve to 0.
pub(crate) fn majority_label(count_0: usize, count_1: usize) -> u8 {
    u8::from(count_1 > count_0)
}

/// Weighted Gini impurity of splitting `partition` on `feature <= threshold`.
///
/// `(|left|·gini(left) + |right|·gini(right)) / |partition|`.
fn weighted_gini(data: &Dataset, partition: &[usize], feature: usize, threshold: f64) -> f64 {
    let mut left = (0usize, 0usize);
    let mut right = (0usize, 0usize);

    for &row_index in partition {
        let row = &data.rows()[row_index];
        let side = if row[feature] <= threshold { &mut left } else { &mut right };
        if row_label(row) == 0 {
            side.0 += 1;
        } else {
            side.1 += 1;
        }
    }

    let n_left = left.0 + left.1;
    let n_right = right.0 + right.1;
    let n = n_left + n_right;

    (n_left as f64 * gini(left.0, left.1) + n_right as f64 * gini(right.0, right.1)) / n as f64
}

/// Search every (feature, observed value) pair for the minimum weighted
/// Gini impurity.
///
/// Candidates are scanned with features in index order and thresholds in
/// partition row order; the comparison is strict, so the first candidate
/// seen wins ties. Returns `None` only for an empty partition.
///
/// Each candidate costs one pass over the partition, giving
/// O(F·|partition|²) per call — exhaustive by design, sized for
/// small and medium row counts.
pub(crate) fn find_best_split(data: &Dataset, partition: &[usize]) -> Option<SplitCandidate> {
    let mut best: Option<SplitCandidate> = None;

    for feature in 0..data.n_features() {
        for &row_index in partition {
            let threshold = data.rows()[row_index][feature];
            let score = weighted_gini(data, partition, feature, threshold);
            if best.is_none_or(|b| score < b.weighted_gini) {
                best = Some(SplitCandidate { feature, threshold, weighted_gini: score });
            }
        }
    }

    best
}
