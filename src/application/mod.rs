//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the assessment use case.

mod assessment;
mod scorer;

pub use assessment::{ArtifactAssessmentService, AssessmentService};
pub use scorer::ModelScorer;
