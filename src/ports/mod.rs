//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application and the trained artifacts.

mod scorer;

pub use scorer::{Classifier, ScaledVector, Scaler, ScalingError, Scorer};
