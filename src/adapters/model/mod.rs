//! Trained classifiers: Implementations of `Classifier`.
//!
//! The model artifact is a JSON document tagged by `kind`:
//! - `logistic_regression`: linear model, no feature importances
//! - `random_forest`: flattened decision trees, exposes feature importances

mod forest;
mod logistic;

use serde::{Deserialize, Serialize};

pub use forest::{DecisionTree, ForestModel, TreeNode};
pub use logistic::LogisticModel;

use crate::ports::{Classifier, ScaledVector};

/// A classifier loaded from the model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrainedModel {
    LogisticRegression(LogisticModel),
    RandomForest(ForestModel),
}

impl TrainedModel {
    /// Validate parameters and derive anything the artifact left implicit.
    ///
    /// # Errors
    /// Returns a description of the first unusable parameter.
    pub fn prepare(&mut self) -> Result<(), String> {
        match self {
            Self::LogisticRegression(m) => m.check(),
            Self::RandomForest(m) => m.prepare(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => "logistic_regression",
            Self::RandomForest(_) => "random_forest",
        }
    }
}

impl Classifier for TrainedModel {
    fn n_features(&self) -> usize {
        match self {
            Self::LogisticRegression(m) => m.n_features(),
            Self::RandomForest(m) => m.n_features(),
        }
    }

    fn positive_probability(&self, scaled: &ScaledVector) -> f64 {
        match self {
            Self::LogisticRegression(m) => m.positive_probability(scaled),
            Self::RandomForest(m) => m.positive_probability(scaled),
        }
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        match self {
            Self::LogisticRegression(m) => m.feature_importances(),
            Self::RandomForest(m) => m.feature_importances(),
        }
    }
}
