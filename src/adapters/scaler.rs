//! Standard scaler: Implementation of `Scaler`.
//!
//! Mirrors a fitted z-score scaler exported as JSON:
//!
//! ```json
//! { "feature_names_in": ["age", "sex"], "mean": [54.4, 0.68], "scale": [9.0, 0.47] }
//! ```
//!
//! `feature_names_in` is optional; when present the scaler also rejects
//! vectors whose column order differs from the one it was fit on.

use serde::{Deserialize, Serialize};

use crate::domain::FeatureVector;
use crate::ports::{ScaledVector, Scaler, ScalingError};

/// Fitted standardization `z = (x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default)]
    pub feature_names_in: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Check the fitted parameters are usable.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn check(&self) -> Result<(), String> {
        let n = self.mean.len();
        if n == 0 {
            return Err("scaler has no features".into());
        }
        if self.scale.len() != n {
            return Err(format!(
                "mean has {n} values but scale has {}",
                self.scale.len()
            ));
        }
        if let Some(names) = &self.feature_names_in {
            if names.len() != n {
                return Err(format!(
                    "mean has {n} values but feature_names_in has {}",
                    names.len()
                ));
            }
        }
        if let Some(i) = self
            .mean
            .iter()
            .chain(self.scale.iter())
            .position(|v| !v.is_finite())
        {
            return Err(format!("parameter {} is not finite", i % n));
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn scale(&self, vector: &FeatureVector) -> Result<ScaledVector, ScalingError> {
        if vector.len() != self.mean.len() {
            return Err(ScalingError::ShapeMismatch {
                expected: self.mean.len(),
                actual: vector.len(),
            });
        }

        if let Some(fitted) = &self.feature_names_in {
            if let Some((position, (expected, actual))) = fitted
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
        }

        let mut out = Vec::with_capacity(vector.len());
        for (i, (name, x)) in vector.iter().enumerate() {
            // A constant training column has scale 0; it passes through centered.
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            let z = (x - self.mean[i]) / scale;
            if !z.is_finite() {
                return Err(ScalingError::NonFinite(name.to_string()));
            }
            out.push(z);
        }

        Ok(ScaledVector::new(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureSchema;

    fn vector(columns: &[&str], values: &[f64]) -> FeatureVector {
        let schema = FeatureSchema::new(columns.iter().copied()).expect("valid schema");
        let mut v = FeatureVector::zeros(&schema);
        for (i, x) in values.iter().enumerate() {
            v.set(i, *x);
        }
        v
    }

    #[test]
    fn test_standardizes() {
        let scaler = StandardScaler {
            feature_names_in: None,
            mean: vec![50.0, 0.5],
            scale: vec![10.0, 0.0],
        };
        let scaled = scaler
            .scale(&vector(&["age", "sex"], &[60.0, 1.0]))
            .expect("should scale");
        assert_eq!(scaled.values(), &[1.0, 0.5]);
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let scaler = StandardScaler {
            feature_names_in: None,
            mean: vec![0.0; 3],
            scale: vec![1.0; 3],
        };
        let err = scaler
            .scale(&vector(&["age", "sex"], &[1.0, 1.0]))
            .expect_err("must fail");
        assert_eq!(
            err,
            ScalingError::ShapeMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_rejects_order_mismatch() {
        let scaler = StandardScaler {
            feature_names_in: Some(vec!["age".into(), "sex".into()]),
            mean: vec![0.0; 2],
            scale: vec![1.0; 2],
        };
        let err = scaler
            .scale(&vector(&["sex", "age"], &[1.0, 1.0]))
            .expect_err("must fail");
        assert!(matches!(err, ScalingError::OrderMismatch { position: 0, .. }));
    }

    #[test]
    fn test_check_catches_inconsistent_parameters() {
        let bad = StandardScaler {
            feature_names_in: None,
            mean: vec![0.0; 2],
            scale: vec![1.0],
        };
        assert!(bad.check().is_err());

        let nan = StandardScaler {
            feature_names_in: None,
            mean: vec![f64::NAN],
            scale: vec![1.0],
        };
        assert!(nan.check().is_err());
    }
}
