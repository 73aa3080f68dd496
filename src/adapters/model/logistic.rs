//! Logistic regression classifier.

use serde::{Deserialize, Serialize};

use crate::ports::{Classifier, ScaledVector};

/// Linear model with a logistic link: `p = sigmoid(w . x + b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    /// # Errors
    /// Returns a description of the first unusable parameter.
    pub fn check(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("logistic model has no coefficients".into());
        }
        if let Some(i) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(format!("coefficient {i} is not finite"));
        }
        if !self.intercept.is_finite() {
            return Err("intercept is not finite".into());
        }
        Ok(())
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Classifier for LogisticModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn positive_probability(&self, scaled: &ScaledVector) -> f64 {
        let logit: f64 = self
            .coefficients
            .iter()
            .zip(scaled.values())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        sigmoid(logit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability() {
        let model = LogisticModel {
            coefficients: vec![2.0, -1.0],
            intercept: 0.5,
        };

        let p = model.positive_probability(&ScaledVector::new(vec![0.0, 0.5]));
        assert!((p - 0.5).abs() < 1e-12);

        let high = model.positive_probability(&ScaledVector::new(vec![3.0, 0.0]));
        assert!(high > 0.99);
        assert!(model.feature_importances().is_none());
    }

    #[test]
    fn test_check() {
        let empty = LogisticModel {
            coefficients: vec![],
            intercept: 0.0,
        };
        assert!(empty.check().is_err());
    }
}
