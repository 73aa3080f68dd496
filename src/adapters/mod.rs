//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifacts`: loads and verifies the JSON artifact directory
//! - `model`: logistic regression and random forest classifiers
//! - `scaler`: fitted standard scaler
//! - `sanitize`: redaction of clinical values in logs

pub mod artifacts;
pub mod model;
pub mod sanitize;
pub mod scaler;

pub use artifacts::{ArtifactKind, ArtifactLoadError, LoadOptions, ModelArtifacts};
pub use model::TrainedModel;
pub use scaler::StandardScaler;
