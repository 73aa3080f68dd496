//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides:
//! - The clinical attribute form
//! - The risk verdict with its probability
//! - An optional feature importance chart

mod app;
mod styles;
mod ui;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
