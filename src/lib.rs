//! # CardioScan
//!
//! Heart disease risk assessment from a clinical attribute form.
//!
//! This crate provides:
//! - Validation and one-hot feature encoding of clinical inputs
//! - Loading of a pre-trained scaler and classifier from JSON artifacts
//! - A terminal form that shows the verdict and feature importances
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (ClinicalInput, FeatureSchema) and the feature encoder
//! - `ports`: Trait definitions for the scaler, classifier and scorer
//! - `adapters`: Concrete implementations (JSON artifacts, forest, log redaction)
//! - `application`: The assessment use case
//! - `config`: Environment configuration
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Assessment, ClinicalInput, FeatureSchema, FeatureVector, PredictionResult, RiskLabel};

/// Result type for CardioScan operations
pub type Result<T> = std::result::Result<T, CardioscanError>;

/// Main error type for CardioScan
#[derive(Debug, thiserror::Error)]
pub enum CardioscanError {
    #[error("Failed to load artifacts: {0}")]
    ArtifactLoad(#[from] adapters::ArtifactLoadError),

    #[error("Feature encoding failed: {0}")]
    Encoding(#[from] domain::EncodingError),

    #[error("Scoring failed: {0}")]
    Scaling(#[from] ports::ScalingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
