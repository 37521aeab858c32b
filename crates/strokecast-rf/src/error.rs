/// Errors from dataset construction, training, and prediction.
#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    /// Returned when n_trees is zero.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid n_trees value provided.
        n_trees: usize,
    },

    /// Returned when a dataset with zero rows is constructed or trained on.
    #[error("dataset has zero rows")]
    EmptyDataset,

    /// Returned when `evaluate` is called with a test set of zero rows.
    #[error("test set has zero rows")]
    EmptyTestSet,

    /// Returned when a record is too short to hold one feature and a label.
    #[error("records need at least one feature and a label, got length {len}")]
    RecordTooShort {
        /// The offending record length.
        len: usize,
    },

    /// Returned when a record has a different length than the first record.
    #[error("record {row_index} has {got} values, expected {expected}")]
    RecordLengthMismatch {
        /// The expected record length (from the first record).
        expected: usize,
        /// The actual length of the offending record.
        got: usize,
        /// The zero-based index of the offending record.
        row_index: usize,
    },

    /// Returned when a record value is NaN or infinite.
    #[error("non-finite value at record {row_index}, column {col_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending record.
        row_index: usize,
        /// The zero-based index of the offending column.
        col_index: usize,
    },

    /// Returned when a record's trailing label is neither 0 nor 1.
    #[error("label of record {row_index} must be 0 or 1, got {label}")]
    InvalidLabel {
        /// The zero-based index of the offending record.
        row_index: usize,
        /// The label value found.
        label: f64,
    },

    /// Returned when a requested train split exceeds the dataset size.
    #[error("train size {train_size} exceeds dataset size {n_rows}")]
    InvalidTrainSize {
        /// The requested number of training rows.
        train_size: usize,
        /// The number of rows in the dataset.
        n_rows: usize,
    },

    /// Returned when a prediction input has the wrong number of features.
    #[error("prediction input has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The number of features the model was trained on.
        expected: usize,
        /// The actual number of features in the prediction input.
        got: usize,
    },

    /// Returned when `predict` or `evaluate` is called before `train`.
    #[error("model has not been trained")]
    NotTrained,
}
