//! Binary confusion matrix and derived classification metrics.

use std::fmt;

use crate::error::ForestError;

/// A 2x2 confusion matrix for binary classification.
///
/// Class 1 is the positive class. Entry `[true_label][predicted]` counts
/// how many records with that true label received that prediction.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    matrix: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    /// Build a confusion matrix from parallel true and predicted labels.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::EmptyTestSet`] when `true_labels` is empty.
    pub fn from_labels(true_labels: &[u8], predicted: &[u8]) -> Result<Self, ForestError> {
        if true_labels.is_empty() {
            return Err(ForestError::EmptyTestSet);
        }
        let mut matrix = [[0usize; 2]; 2];
        for (&t, &p) in true_labels.iter().zip(predicted.iter()) {
            matrix[usize::from(t)][usize::from(p)] += 1;
        }
        Ok(Self { matrix })
    }

    /// Correctly predicted positives.
    #[must_use]
    pub fn true_positives(&self) -> usize {
        self.matrix[1][1]
    }

    /// Correctly predicted negatives.
    #[must_use]
    pub fn true_negatives(&self) -> usize {
        self.matrix[0][0]
    }

    /// Negatives predicted as positive.
    #[must_use]
    pub fn false_positives(&self) -> usize {
        self.matrix[0][1]
    }

    /// Positives predicted as negative.
    #[must_use]
    pub fn false_negatives(&self) -> usize {
        self.matrix[1][0]
    }

    /// Overall accuracy: proportion of correct predictions.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let correct = self.true_positives() + self.true_negatives();
        let total: usize = self.matrix.iter().flatten().sum();
        correct as f64 / total as f64
    }

    /// Precision: TP / (TP + FP). 0.0 when nothing was predicted positive.
    #[must_use]
    pub fn precision(&self) -> f64 {
        let tp = self.true_positives();
        let fp = self.false_positives();
        if tp + fp == 0 {
            0.0
        } else {
            tp as f64 / (tp + fp) as f64
        }
    }

    /// Recall: TP / (TP + FN). 0.0 when there are no true positives.
    #[must_use]
    pub fn recall(&self) -> f64 {
        let tp = self.true_positives();
        let fn_ = self.false_negatives();
        if tp + fn_ == 0 {
            0.0
        } else {
            tp as f64 / (tp + fn_) as f64
        }
    }

    /// F1: harmonic mean of precision and recall. 0.0 when both are zero.
    #[must_use]
    pub fn f1(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>8} {:>7} {:>7}", "", "pred_0", "pred_1")?;
        for (i, row) in self.matrix.iter().enumerate() {
            writeln!(f, "true_{i:>3} {:>7} {:>7}", row[0], row[1])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions() {
        let truth = vec![0, 0, 1, 1];
        let cm = ConfusionMatrix::from_labels(&truth, &truth).unwrap();

        assert!((cm.accuracy() - 1.0).abs() < f64::EPSILON);
        assert!((cm.precision() - 1.0).abs() < f64::EPSILON);
        assert!((cm.recall() - 1.0).abs() < f64::EPSILON);
        assert!((cm.f1() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn known_mixed_counts() {
        // True: [0,0,0,1,1,1], Pred: [0,1,0,1,1,0]
        let cm = ConfusionMatrix::from_labels(&[0, 0, 0, 1, 1, 1], &[0, 1, 0, 1, 1, 0]).unwrap();

        assert_eq!(cm.true_negatives(), 2);
        assert_eq!(cm.false_positives(), 1);
        assert_eq!(cm.true_positives(), 2);
        assert_eq!(cm.false_negatives(), 1);
        assert!((cm.accuracy() - 4.0 / 6.0).abs() < 1e-10);
        assert!((cm.precision() - 2.0 / 3.0).abs() < 1e-10);
        assert!((cm.recall() - 2.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn all_negative_predictions_zero_precision() {
        let cm = ConfusionMatrix::from_labels(&[0, 1, 1], &[0, 0, 0]).unwrap();
        assert!((cm.precision() - 0.0).abs() < f64::EPSILON);
        assert!((cm.recall() - 0.0).abs() < f64::EPSILON);
        assert!((cm.f1() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_labels_error() {
        let err = ConfusionMatrix::from_labels(&[], &[]).unwrap_err();
        assert!(matches!(err, ForestError::EmptyTestSet));
    }

    #[test]
    fn display_formatting() {
        let cm = ConfusionMatrix::from_labels(&[0, 1], &[0, 1]).unwrap();
        let output = format!("{cm}");
        assert!(output.contains("pred_0"));
        assert!(output.contains("true_"));
    }
}
