//! Assessment service: validate, encode and score one clinical input.
//!
//! The service owns the encoder (resolved once against the schema) and a
//! scorer. It holds no per-request state, so one instance serves every
//! submission.

use std::path::Path;

use crate::adapters::{LoadOptions, ModelArtifacts, StandardScaler, TrainedModel};
use crate::application::ModelScorer;
use crate::domain::{
    Assessment, ClinicalInput, EncodingError, FeatureEncoder, FeatureImportance, FeatureSchema,
    FieldViolation,
};
use crate::ports::Scorer;

/// Service backed by artifacts loaded from disk.
pub type ArtifactAssessmentService = AssessmentService<ModelScorer<StandardScaler, TrainedModel>>;

/// Service for assessing heart disease risk.
pub struct AssessmentService<Sc: Scorer> {
    encoder: FeatureEncoder,
    scorer: Sc,
}

impl<Sc: Scorer> AssessmentService<Sc> {
    pub fn new(schema: FeatureSchema, scorer: Sc) -> Self {
        Self {
            encoder: FeatureEncoder::new(schema),
            scorer,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        self.encoder.schema()
    }

    /// Run one assessment.
    ///
    /// # Errors
    /// Returns `CardioscanError::Encoding` for invalid input and
    /// `CardioscanError::Scaling` when the vector does not fit the artifacts.
    pub fn assess(&self, input: &ClinicalInput) -> crate::Result<Assessment> {
        let vector = self.encoder.encode(input).map_err(|e| {
            // Field names only; the values stay out of the log.
            if let EncodingError::InvalidInput(invalid) = &e {
                let fields: Vec<&str> = invalid.violations.iter().map(FieldViolation::field).collect();
                tracing::warn!("Assessment rejected, invalid fields: {}", fields.join(", "));
            }
            e
        })?;

        let result = self
            .scorer
            .score(&vector, self.encoder.schema())
            .map_err(|e| {
                tracing::error!("Scoring failed: {}", e);
                e
            })?;

        tracing::info!("Assessment completed: {}", result.label);
        Ok(Assessment::new(result))
    }

    /// The `n` most important features, highest first.
    ///
    /// Returns `None` when the model has no importances.
    #[must_use]
    pub fn top_feature_importances(&self, n: usize) -> Option<Vec<FeatureImportance>> {
        let importances = self.scorer.feature_importances()?;

        let mut ranked: Vec<FeatureImportance> = self
            .schema()
            .columns()
            .iter()
            .zip(importances)
            .map(|(feature, &importance)| FeatureImportance {
                feature: feature.clone(),
                importance,
            })
            .collect();
        // Stable sort keeps schema order among ties.
        ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        ranked.truncate(n);
        Some(ranked)
    }
}

impl ArtifactAssessmentService {
    /// Build the service from loaded artifacts.
    #[must_use]
    pub fn from_artifacts(artifacts: ModelArtifacts) -> Self {
        let ModelArtifacts {
            schema,
            scaler,
            model,
        } = artifacts;
        Self::new(schema, ModelScorer::new(scaler, model))
    }

    /// Load the artifacts in `dir` and build the service.
    ///
    /// # Errors
    /// Returns `CardioscanError::ArtifactLoad` when the directory is refused.
    pub fn open(dir: &Path, options: LoadOptions) -> crate::Result<Self> {
        let artifacts = ModelArtifacts::load(dir, options)?;
        Ok(Self::from_artifacts(artifacts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureVector, PredictionResult, RiskLabel};
    use crate::ports::ScalingError;
    use crate::CardioscanError;

    /// Scores by looking at a single column.
    struct ColumnScorer {
        column: &'static str,
        importances: Option<Vec<f64>>,
    }

    impl Scorer for ColumnScorer {
        fn score(
            &self,
            vector: &FeatureVector,
            schema: &FeatureSchema,
        ) -> Result<PredictionResult, ScalingError> {
            assert_eq!(vector.names(), schema.columns());
            let p = vector.get(self.column).unwrap_or(0.0);
            Ok(PredictionResult::from_probability(p))
        }

        fn feature_importances(&self) -> Option<&[f64]> {
            self.importances.as_deref()
        }
    }

    fn service(importances: Option<Vec<f64>>) -> AssessmentService<ColumnScorer> {
        let schema =
            FeatureSchema::new(["age", "sex", "exang", "cp_asymptomatic"]).expect("valid schema");
        AssessmentService::new(
            schema,
            ColumnScorer {
                column: "exang",
                importances,
            },
        )
    }

    #[test]
    fn test_assess_encodes_then_scores() {
        let service = service(None);
        let mut input = ClinicalInput::default();

        let low = service.assess(&input).expect("valid input");
        assert_eq!(low.result.label, RiskLabel::LowRisk);

        input.exercise_angina = true;
        let high = service.assess(&input).expect("valid input");
        assert_eq!(high.result.label, RiskLabel::HighRisk);
        assert_eq!(high.result.probability, 1.0);
    }

    #[test]
    fn test_assess_rejects_invalid_input() {
        let service = service(None);
        let input = ClinicalInput {
            age: 12,
            ..ClinicalInput::default()
        };

        let err = service.assess(&input).expect_err("must fail");
        assert!(matches!(
            err,
            CardioscanError::Encoding(EncodingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_top_importances_sorted_and_truncated() {
        let service = service(Some(vec![0.3, 0.1, 0.5, 0.1]));
        let top = service.top_feature_importances(3).expect("importances");

        let names: Vec<&str> = top.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(names, ["exang", "age", "sex"]);
    }

    #[test]
    fn test_no_importances() {
        let service = service(None);
        assert!(service.top_feature_importances(10).is_none());
    }

    #[test]
    fn test_from_artifacts() {
        let artifacts = ModelArtifacts {
            schema: FeatureSchema::new(["age", "sex"]).expect("valid schema"),
            scaler: StandardScaler {
                feature_names_in: None,
                mean: vec![50.0, 0.5],
                scale: vec![10.0, 0.5],
            },
            model: TrainedModel::LogisticRegression(crate::adapters::model::LogisticModel {
                coefficients: vec![0.0, 0.0],
                intercept: 0.0,
            }),
        };
        let service = ArtifactAssessmentService::from_artifacts(artifacts);

        let assessment = service.assess(&ClinicalInput::default()).expect("valid input");
        assert_eq!(assessment.result.probability, 0.5);
        assert_eq!(assessment.result.label, RiskLabel::LowRisk);
    }

    #[test]
    fn test_open_reports_artifact_errors() {
        let temp = tempfile::tempdir().expect("tempdir");
        let result = ArtifactAssessmentService::open(&temp.path().join("nope"), LoadOptions::default());
        assert!(matches!(result, Err(CardioscanError::ArtifactLoad(_))));
    }
}
