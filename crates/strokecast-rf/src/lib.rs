//! Stroke-risk classification: train, evaluate, predict.
//!
//! Provides a hand-rolled binary Random Forest classifier built from
//! CART decision trees with exhaustive Gini split search, bootstrap
//! resampling with an explicit seeded generator, parallel tree training
//! via rayon, majority-vote aggregation, and holdout evaluation.

mod confusion;
mod dataset;
mod error;
mod forest;
mod node;
mod split;
mod tree;

pub use confusion::ConfusionMatrix;
pub use dataset::Dataset;
pub use error::ForestError;
pub use forest::RandomForest;
pub use node::Node;
pub use tree::DecisionTree;
