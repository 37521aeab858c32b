//! CART decision-tree induction by exhaustive Gini split search.

use tracing::{debug, instrument};

use crate::dataset::Dataset;
use crate::error::ForestError;
use crate::node::Node;
use crate::split::{find_best_split, majority_label};

/// A binary-classification decision tree.
///
/// Created untrained; [`DecisionTree::train`] builds the root and
/// discards any prior one. Prediction routes left at each interior node
/// when `features[feature] <= threshold`, right otherwise, and returns
/// the reached leaf's label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionTree {
    root: Option<Node>,
    n_features: usize,
}

impl DecisionTree {
    /// Create an untrained tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree of depth at most `max_depth` from the dataset.
    ///
    /// Replaces any previously trained root. Training is deterministic:
    /// the same dataset and depth always produce a structurally identical
    /// tree. `max_depth` of 0 yields a single majority-class leaf.
    ///
    /// A partition whose best achievable split scores exactly zero
    /// weighted Gini impurity becomes a majority leaf; the split is not
    /// applied.
    #[instrument(skip_all, fields(n_samples = data.len(), max_depth))]
    pub fn train(&mut self, data: &Dataset, max_depth: usize) {
        let partition: Vec<usize> = (0..data.len()).collect();
        self.root = Some(build_node(data, &partition, max_depth, 0));
        self.n_features = data.n_features();
        debug!(n_nodes = self.n_nodes(), depth = self.depth(), "decision tree built");
    }

    /// Predict the class label for a single feature vector.
    ///
    /// # Errors
    ///
    /// | Variant                               | When                                    |
    /// |---------------------------------------|-----------------------------------------|
    /// | [`ForestError::NotTrained`]           | called before [`DecisionTree::train`]   |
    /// | [`ForestError::FeatureCountMismatch`] | `features.len()` differs from training  |
    pub fn predict(&self, features: &[f64]) -> Result<u8, ForestError> {
        let mut node = self.root.as_ref().ok_or(ForestError::NotTrained)?;
        if features.len() != self.n_features {
            return Err(ForestError::FeatureCountMismatch {
                expected: self.n_features,
                got: features.len(),
            });
        }

        loop {
            match node {
                Node::Leaf { label } => return Ok(*label),
                Node::Internal { feature, threshold, left, right } => {
                    node = if features[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Return `true` once the tree has been trained.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.root.is_some()
    }

    /// Return the total number of nodes (splits and leaves). 0 if untrained.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        let mut count = 0;
        self.walk(|_| count += 1);
        count
    }

    /// Return the number of leaf nodes. 0 if untrained.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        let mut count = 0;
        self.walk(|node| {
            if node.is_leaf() {
                count += 1;
            }
        });
        count
    }

    /// Return the maximum depth of the tree.
    ///
    /// A single-leaf tree (and an untrained one) has depth 0. Uses an
    /// explicit work stack rather than recursion.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&Node, usize)> = self.root.iter().map(|n| (n, 0)).collect();

        while let Some((node, depth)) = stack.pop() {
            match node {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }

        max_depth
    }

    /// Visit every node with an explicit work stack.
    fn walk(&self, mut visit: impl FnMut(&Node)) {
        let mut stack: Vec<&Node> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            visit(node);
            if let Node::Internal { left, right, .. } = node {
                stack.push(left);
                stack.push(right);
            }
        }
    }
}

/// Recursively build the subtree for `partition` at `depth`.
fn build_node(data: &Dataset, partition: &[usize], max_depth: usize, depth: usize) -> Node {
    if partition.is_empty() || depth >= max_depth {
        return majority_leaf(data, partition);
    }

    let best = match find_best_split(data, partition) {
        Some(split) => split,
        None => return majority_leaf(data, partition),
    };

    // A zero-impurity split terminates as a leaf instead of recursing.
    if best.weighted_gini == 0.0 {
        return majority_leaf(data, partition);
    }

    let mut left = Vec::new();
    let mut right = Vec::new();
    for &row_index in partition {
        if data.rows()[row_index][best.feature] <= best.threshold {
            left.push(row_index);
        } else {
            right.push(row_index);
        }
    }

    Node::Internal {
        feature: best.feature,
        threshold: best.threshold,
        left: Box::new(build_node(data, &left, max_depth, depth + 1)),
        right: Box::new(build_node(data, &right, max_depth, depth + 1)),
    }
}

/// Leaf holding the partition's majority class (ties resolve to 0).
fn majority_leaf(data: &Dataset, partition: &[usize]) -> Node {
    let count_1 = partition.iter().filter(|&&i| data.label(i) == 1).count();
    Node::Leaf { label: majority_label(partition.len() - count_1, count_1) }
}
