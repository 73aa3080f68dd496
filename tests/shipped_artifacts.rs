//! End-to-end checks against the artifacts in `models/`.

use std::path::PathBuf;

use cardioscan::adapters::{LoadOptions, ModelArtifacts};
use cardioscan::application::ArtifactAssessmentService;
use cardioscan::domain::{ChestPainType, ClinicalInput, RiskLabel, StSlope, Thalassemia};

fn service() -> ArtifactAssessmentService {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models");
    let artifacts = ModelArtifacts::load(&dir, LoadOptions::default()).expect("shipped artifacts load");
    ArtifactAssessmentService::from_artifacts(artifacts)
}

#[test]
fn default_form_is_low_risk() {
    let assessment = service()
        .assess(&ClinicalInput::default())
        .expect("defaults are valid");

    assert_eq!(assessment.result.label, RiskLabel::LowRisk);
    assert!(assessment.result.probability < 0.5);
    assert!(assessment.result.confidence_text().ends_with("chance of no heart disease."));
}

#[test]
fn typical_high_risk_profile() {
    let input = ClinicalInput {
        age: 62,
        chest_pain_type: ChestPainType::Asymptomatic,
        resting_bp: 150,
        cholesterol: 280,
        max_heart_rate: 120,
        exercise_angina: true,
        st_depression: 2.5,
        st_slope: StSlope::Flat,
        major_vessel_count: 2,
        thalassemia: Thalassemia::ReversableDefect,
        ..ClinicalInput::default()
    };

    let assessment = service().assess(&input).expect("valid input");
    assert_eq!(assessment.result.label, RiskLabel::HighRisk);
    assert!(assessment.result.probability > 0.8);
}

#[test]
fn forest_exposes_top_ten_importances() {
    let service = service();
    let top = service.top_feature_importances(10).expect("forest has importances");

    assert_eq!(top.len(), 10);
    assert!(top.windows(2).all(|w| w[0].importance >= w[1].importance));

    let total: f64 = service
        .top_feature_importances(usize::MAX)
        .expect("forest has importances")
        .iter()
        .map(|f| f.importance)
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
}
