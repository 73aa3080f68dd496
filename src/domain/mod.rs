//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O. The feature encoder lives
//! here because it is a deterministic function of the input and the schema.

mod assessment;
mod clinical;
mod encoder;
mod features;

pub use assessment::{Assessment, FeatureImportance, PredictionResult, RiskLabel};
pub use clinical::{
    CategoricalField, Category, ChestPainType, ClinicalInput, FieldViolation, RestingEcg, Sex,
    StSlope, Thalassemia, ValidationError, AGE_RANGE, CHOLESTEROL_RANGE, MAJOR_VESSELS_RANGE,
    MAX_HEART_RATE_RANGE, RESTING_BP_RANGE, ST_DEPRESSION_RANGE, ST_DEPRESSION_STEP,
};
pub use encoder::{encode, FeatureEncoder, NumericColumn};
pub use features::{EncodingError, FeatureSchema, FeatureVector};
