//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod assessment;
mod training;

pub use assessment::AssessmentService;
pub use training::{TrainingAnalysis, TrainingOutput};
