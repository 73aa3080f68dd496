//! Assessment result types.
//!
//! Represents the output of the heart disease classifier.

use serde::{Deserialize, Serialize};

/// Binary risk verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLabel {
    /// Classifier predicts no heart disease
    LowRisk,
    /// Classifier predicts heart disease
    HighRisk,
}

impl RiskLabel {
    /// Headline shown for the verdict.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self {
            Self::LowRisk => "Low Risk of Heart Disease",
            Self::HighRisk => "High Risk of Heart Disease",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::LowRisk => (16, 185, 129), // Emerald (#10B981)
            Self::HighRisk => (244, 63, 94), // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowRisk => write!(f, "Low Risk"),
            Self::HighRisk => write!(f, "High Risk"),
        }
    }
}

/// Classifier output for one feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: RiskLabel,

    /// Probability of the positive ("disease present") class, 0.0 to 1.0
    pub probability: f64,
}

impl PredictionResult {
    /// Derive the label from the positive class probability.
    ///
    /// The positive class wins only when strictly more likely than the
    /// negative one, so 0.5 is low risk.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        let label = if probability > 0.5 {
            RiskLabel::HighRisk
        } else {
            RiskLabel::LowRisk
        };
        Self { label, probability }
    }

    /// Probability of the predicted label.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        match self.label {
            RiskLabel::HighRisk => self.probability,
            RiskLabel::LowRisk => 1.0 - self.probability,
        }
    }

    /// Confidence sentence, e.g. "72.50% chance of heart disease."
    #[must_use]
    pub fn confidence_text(&self) -> String {
        let outcome = match self.label {
            RiskLabel::HighRisk => "heart disease",
            RiskLabel::LowRisk => "no heart disease",
        };
        format!("{:.2}% chance of {outcome}.", self.confidence() * 100.0)
    }
}

/// A completed assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub result: PredictionResult,

    /// When the classifier produced the result
    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    #[must_use]
    pub fn new(result: PredictionResult) -> Self {
        Self {
            result,
            assessed_at: chrono::Utc::now(),
        }
    }
}

/// Contribution of one feature to the trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}
