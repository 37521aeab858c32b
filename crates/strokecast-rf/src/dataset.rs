//! In-memory dataset of fixed-length numeric patient records.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::ForestError;

/// A validated, fully materialized collection of numeric records.
///
/// Each record is `n_features` feature values followed by a binary label
/// (0.0 or 1.0). Uniform record length, finite values, and binary labels
/// are enforced once at construction; training and prediction rely on
/// these invariants without re-checking rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<Vec<f64>>,
    row_len: usize,
}

impl Dataset {
    /// Build a dataset from raw records, validating every row.
    ///
    /// # Errors
    ///
    /// | Variant                                 | When                                   |
    /// |-----------------------------------------|----------------------------------------|
    /// | [`ForestError::EmptyDataset`]           | `rows` is empty                        |
    /// | [`ForestError::RecordTooShort`]         | first record has fewer than 2 values   |
    /// | [`ForestError::RecordLengthMismatch`]   | a record differs in length from the first |
    /// | [`ForestError::NonFiniteValue`]         | any value is NaN or infinite           |
    /// | [`ForestError::InvalidLabel`]           | a trailing label is neither 0 nor 1    |
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ForestError> {
        if rows.is_empty() {
            return Err(ForestError::EmptyDataset);
        }

        let row_len = rows[0].len();
        if row_len < 2 {
            return Err(ForestError::RecordTooShort { len: row_len });
        }

        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != row_len {
                return Err(ForestError::RecordLengthMismatch {
                    expected: row_len,
                    got: row.len(),
                    row_index,
                });
            }
            for (col_index, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(ForestError::NonFiniteValue { row_index, col_index });
                }
            }
            let label = row[row_len - 1];
            if label != 0.0 && label != 1.0 {
                return Err(ForestError::InvalidLabel { row_index, label });
            }
        }

        debug!(n_rows = rows.len(), n_features = row_len - 1, "dataset validated");
        Ok(Self { rows, row_len })
    }

    /// Build a dataset from rows that already satisfy the invariants.
    ///
    /// Used for bootstrap resamples and split halves, which may be empty.
    pub(crate) fn from_validated(rows: Vec<Vec<f64>>, row_len: usize) -> Self {
        Self { rows, row_len }
    }

    /// Return the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return `true` if the dataset has zero records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Return the number of feature columns (record length minus the label).
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.row_len - 1
    }

    /// Return the raw records.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Return the feature prefix of the record at `row_index`.
    #[must_use]
    pub fn features(&self, row_index: usize) -> &[f64] {
        &self.rows[row_index][..self.row_len - 1]
    }

    /// Return the label of the record at `row_index`.
    #[must_use]
    pub fn label(&self, row_index: usize) -> u8 {
        row_label(&self.rows[row_index])
    }

    /// Count the records per class, returning `(count_0, count_1)`.
    #[must_use]
    pub fn label_counts(&self) -> (usize, usize) {
        let count_1 = self.rows.iter().filter(|r| row_label(r) == 1).count();
        (self.rows.len() - count_1, count_1)
    }

    /// Shannon entropy (base 2) of the label distribution.
    ///
    /// 0.0 for a pure or empty dataset, 1.0 for an even class split.
    #[must_use]
    pub fn label_entropy(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let (count_0, count_1) = self.label_counts();
        let n = self.rows.len() as f64;
        let mut entropy = 0.0;
        for count in [count_0, count_1] {
            if count > 0 {
                let p = count as f64 / n;
                entropy -= p * p.log2();
            }
        }
        entropy
    }

    /// Shuffle the records with a seeded generator and split off the first
    /// `train_size` rows as the training set, the rest as the test set.
    ///
    /// Either half may be empty; both retain the record length.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::InvalidTrainSize`] when `train_size` exceeds
    /// the dataset size.
    pub fn shuffled_split(
        &self,
        train_size: usize,
        seed: u64,
    ) -> Result<(Dataset, Dataset), ForestError> {
        if train_size > self.rows.len() {
            return Err(ForestError::InvalidTrainSize {
                train_size,
                n_rows: self.rows.len(),
            });
        }

        let mut shuffled = self.rows.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        shuffled.shuffle(&mut rng);

        let test_rows = shuffled.split_off(train_size);
        Ok((
            Dataset::from_validated(shuffled, self.row_len),
            Dataset::from_validated(test_rows, self.row_len),
        ))
    }
}

/// Label of a single record (the trailing value, validated to be 0 or 1).
pub(crate) fn row_label(row: &[f64]) -> u8 {
    u8::from(row[row.len() - 1] == 1.0)
}
