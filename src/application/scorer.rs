//! Scorer built from a fitted scaler and a trained classifier.

use crate::domain::{FeatureSchema, FeatureVector, PredictionResult};
use crate::ports::{Classifier, Scaler, ScalingError, Scorer};

/// Scales a feature vector, then asks the classifier for the positive
/// class probability.
#[derive(Debug, Clone)]
pub struct ModelScorer<S, C> {
    scaler: S,
    classifier: C,
}

impl<S: Scaler, C: Classifier> ModelScorer<S, C> {
    pub fn new(scaler: S, classifier: C) -> Self {
        Self { scaler, classifier }
    }
}

impl<S: Scaler, C: Classifier> Scorer for ModelScorer<S, C> {
    fn score(
        &self,
        vector: &FeatureVector,
        schema: &FeatureSchema,
    ) -> Result<PredictionResult, ScalingError> {
        if vector.len() != schema.len() {
            return Err(ScalingError::ShapeMismatch {
                expected: schema.len(),
                actual: vector.len(),
            });
        }
        if let Some((position, (expected, actual))) = schema
            .columns()
            .iter()
            .zip(vector.names())
            .enumerate()
            .find(|(_, (expected, actual))| expected != actual)
        {
            return Err(ScalingError::OrderMismatch {
                position,
                expected: expected.clone(),
                actual: actual.clone(),
            });
        }

        let scaled = self.scaler.scale(vector)?;
        if scaled.len() != self.classifier.n_features() {
            return Err(ScalingError::ShapeMismatch {
                expected: self.classifier.n_features(),
                actual: scaled.len(),
            });
        }

        let probability = self.classifier.positive_probability(&scaled);
        if !probability.is_finite() {
            return Err(ScalingError::NonFinite("probability".into()));
        }

        Ok(PredictionResult::from_probability(probability.clamp(0.0, 1.0)))
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.classifier.feature_importances()
    }
}
