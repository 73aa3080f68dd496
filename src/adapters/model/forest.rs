//! Random forest classifier.
//!
//! Trees are stored flattened: node 0 is the root and every split points to
//! children with larger indices, so traversal always terminates.
//!
//! ```json
//! { "nodes": [
//!     { "feature": 2, "threshold": 0.5, "left": 1, "right": 2 },
//!     { "value": [30, 5] },
//!     { "value": [4, 21] }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::ports::{Classifier, ScaledVector};

/// One node of a flattened decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Samples with `x[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Training class counts `[negative, positive]` that reached this leaf.
    Leaf { value: [f64; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn check(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!("node {i} splits on unknown feature {feature}"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {i} has a non-finite threshold"));
                    }
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(format!("node {i} points to invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    let invalid = value.iter().any(|v| !v.is_finite() || *v < 0.0);
                    if invalid || value[0] + value[1] <= 0.0 {
                        return Err(format!("leaf {i} has invalid class counts"));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf(&self, x: &[f64]) -> &[f64; 2] {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if x[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }

    /// Positive fraction of the leaf `x` falls into.
    fn positive_fraction(&self, x: &[f64]) -> f64 {
        let [negative, positive] = *self.leaf(x);
        positive / (negative + positive)
    }

    /// Samples reaching each node, from leaf counts upward.
    fn node_samples(&self) -> Vec<f64> {
        let mut samples = vec![0.0; self.nodes.len()];
        for i in (0..self.nodes.len()).rev() {
            samples[i] = match &self.nodes[i] {
                TreeNode::Leaf { value } => value[0] + value[1],
                TreeNode::Split { left, right, .. } => samples[*left] + samples[*right],
            };
        }
        samples
    }

    fn add_importances(&self, importances: &mut [f64]) {
        let samples = self.node_samples();
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { feature, .. } = node {
                importances[*feature] += samples[i];
            }
        }
    }
}

/// Ensemble of decision trees; probability is the mean of per-tree leaf
/// fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
}

impl ForestModel {
    /// Validate the trees and fill in importances when the artifact omits them.
    ///
    /// # Errors
    /// Returns a description of the first unusable tree or importance list.
    pub fn prepare(&mut self) -> Result<(), String> {
        if self.n_features == 0 {
            return Err("forest has no features".into());
        }
        if self.trees.is_empty() {
            return Err("forest has no trees".into());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_features)
                .map_err(|e| format!("tree {t}: {e}"))?;
        }

        match &self.feature_importances {
            Some(importances) => {
                if importances.len() != self.n_features {
                    return Err(format!(
                        "forest has {} features but {} importances",
                        self.n_features,
                        importances.len()
                    ));
                }
                if importances.iter().any(|v| !v.is_finite()) {
                    return Err("feature importances must be finite".into());
                }
            }
            None => self.feature_importances = Some(self.split_importances()),
        }
        Ok(())
    }

    /// Sample-weighted split counts, normalized to sum to 1.
    fn split_importances(&self) -> Vec<f64> {
        let mut importances = vec![0.0; self.n_features];
        for tree in &self.trees {
            tree.add_importances(&mut importances);
        }
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for v in &mut importances {
                *v /= total;
            }
        }
        importances
    }
}

impl Classifier for ForestModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn positive_probability(&self, scaled: &ScaledVector) -> f64 {
        let x = scaled.values();
        let sum: f64 = self.trees.iter().map(|t| t.positive_fraction(x)).sum();
        sum / self.trees.len() as f64
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }
}
