//! Scorer port: Traits for the trained scaler and classifier.
//!
//! These traits abstract the fitted artifacts from the application logic.

use crate::domain::{FeatureSchema, FeatureVector, PredictionResult};

/// Errors raised when a feature vector does not fit the trained artifacts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScalingError {
    #[error("Feature count mismatch: got {actual}, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Feature {position} is {actual:?}, expected {expected:?}")]
    OrderMismatch {
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("Feature {0:?} scaled to a non-finite value")]
    NonFinite(String),
}

/// Feature values after the training-time normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledVector {
    values: Vec<f64>,
}

impl ScaledVector {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Numeric transform fitted at training time.
pub trait Scaler: Send + Sync {
    /// Number of features the scaler was fit on.
    fn n_features(&self) -> usize;

    /// Apply the fitted transform.
    ///
    /// # Errors
    /// Returns `ScalingError` if the vector's shape or column order differs
    /// from what the scaler was fit on.
    fn scale(&self, vector: &FeatureVector) -> Result<ScaledVector, ScalingError>;
}

/// Trained binary classifier.
pub trait Classifier: Send + Sync {
    /// Number of features the classifier was trained on.
    fn n_features(&self) -> usize;

    /// Probability of the positive class for a scaled vector of
    /// `n_features()` values.
    fn positive_probability(&self, scaled: &ScaledVector) -> f64;

    /// Per-feature importances in schema order, if the model exposes them.
    fn feature_importances(&self) -> Option<&[f64]> {
        None
    }
}

/// Turns an encoded feature vector into a prediction.
pub trait Scorer: Send + Sync {
    /// Score a vector encoded against `schema`.
    ///
    /// # Errors
    /// Returns `ScalingError` if the vector is not shape- and order-compatible
    /// with the trained artifacts.
    fn score(
        &self,
        vector: &FeatureVector,
        schema: &FeatureSchema,
    ) -> Result<PredictionResult, ScalingError>;

    /// Per-feature importances in schema order, if the model exposes them.
    fn feature_importances(&self) -> Option<&[f64]> {
        None
    }
}
