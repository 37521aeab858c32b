//! Random Forest training with parallel tree construction.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::dataset::Dataset;
use crate::error::ForestError;
use crate::split::majority_label;
use crate::tree::DecisionTree;

/// A bagged ensemble of decision trees with majority-vote aggregation.
///
/// Construct via [`RandomForest::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter   | Default                              |
/// |-------------|--------------------------------------|
/// | `seed`      | 42                                   |
/// | `max_depth` | `None` (feature count at train time) |
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    seed: u64,
    max_depth: Option<usize>,
    n_features: Option<usize>,
}

impl RandomForest {
    /// Create an untrained forest holding `n_trees` trees.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, ForestError> {
        if n_trees == 0 {
            return Err(ForestError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            trees: vec![DecisionTree::new(); n_trees],
            seed: 42,
            max_depth: None,
            n_features: None,
        })
    }

    /// Set the random seed feeding the per-tree bootstrap draws.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the maximum tree depth.
    ///
    /// `None` couples depth to the dataset's feature count at train time.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return the configured depth limit, if any.
    #[must_use]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Return `true` once the forest has been trained.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.n_features.is_some()
    }

    /// Train every tree on an independent bootstrap resample of the dataset.
    ///
    /// Per-tree seeds are drawn from a master generator seeded with the
    /// forest seed; each tree then owns its own generator, so bootstrap
    /// draws stay statistically independent across the parallel workers.
    /// Each resample draws `data.len()` rows uniformly with replacement.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::EmptyDataset`] when `data` has zero rows.
    #[instrument(skip_all, fields(n_trees = self.trees.len(), n_samples = data.len()))]
    pub fn train(&mut self, data: &Dataset) -> Result<(), ForestError> {
        if data.is_empty() {
            return Err(ForestError::EmptyDataset);
        }

        let max_depth = self.max_depth.unwrap_or(data.n_features());

        info!(
            n_samples = data.len(),
            n_features = data.n_features(),
            max_depth,
            "training random forest"
        );

        let mut master_rng = ChaCha8Rng::seed_from_u64(self.seed);
        let tree_seeds: Vec<u64> = (0..self.trees.len()).map(|_| master_rng.r#gen()).collect();

        self.trees = tree_seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let sample = bootstrap_sample(data, &mut rng);
                let mut tree = DecisionTree::new();
                tree.train(&sample, max_depth);
                tree
            })
            .collect();
        self.n_features = Some(data.n_features());

        debug!(n_trees_trained = self.trees.len(), "tree training complete");
        Ok(())
    }

    /// Predict the class label for a single feature vector by majority
    /// vote: 1 only when strictly more trees vote 1 than 0.
    ///
    /// # Errors
    ///
    /// | Variant                               | When                                   |
    /// |---------------------------------------|----------------------------------------|
    /// | [`ForestError::NotTrained`]           | called before [`RandomForest::train`]  |
    /// | [`ForestError::FeatureCountMismatch`] | `features.len()` differs from training |
    pub fn predict(&self, features: &[f64]) -> Result<u8, ForestError> {
        let n_features = self.n_features.ok_or(ForestError::NotTrained)?;
        if features.len() != n_features {
            return Err(ForestError::FeatureCountMismatch {
                expected: n_features,
                got: features.len(),
            });
        }

        let mut votes = [0usize; 2];
        for tree in &self.trees {
            votes[usize::from(tree.predict(features)?)] += 1;
        }
        Ok(majority_label(votes[0], votes[1]))
    }

    /// Holdout accuracy: the fraction of test records whose predicted
    /// label (from the feature prefix) matches the trailing label.
    ///
    /// # Errors
    ///
    /// | Variant                       | When                                  |
    /// |-------------------------------|---------------------------------------|
    /// | [`ForestError::EmptyTestSet`] | `test` has zero rows                  |
    /// | [`ForestError::NotTrained`]   | called before [`RandomForest::train`] |
    pub fn evaluate(&self, test: &Dataset) -> Result<f64, ForestError> {
        if test.is_empty() {
            return Err(ForestError::EmptyTestSet);
        }

        let mut correct = 0usize;
        for i in 0..test.len() {
            if self.predict(test.features(i))? == test.label(i) {
                correct += 1;
            }
        }
        Ok(correct as f64 / test.len() as f64)
    }
}

/// Draw a bootstrap resample: `data.len()` rows, uniformly with replacement.
fn bootstrap_sample(data: &Dataset, rng: &mut impl Rng) -> Dataset {
    let n = data.len();
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|_| data.rows()[rng.gen_range(0..n)].clone())
        .collect();
    Dataset::from_validated(rows, data.n_features() + 1)
}
