//! Risk model port: Trait for the scoring backend.
//!
//! The shipped backend is the deterministic composite scorer. A trained model
//! would implement this trait and replace it without touching the services.

use crate::domain::ScoringInputs;

/// Trait for risk scoring backends.
///
/// Implementations must be deterministic for a given input and return a
/// score within [0.05, 0.95].
pub trait RiskModel: Send + Sync {
    /// Score one patient.
    fn score(&self, inputs: &ScoringInputs) -> f64;

    /// Confidence attached to every assessment.
    fn confidence(&self) -> f64;

    /// Version tag attached to every assessment.
    fn model_version(&self) -> &str;

    /// True when no trained model artifact is loaded.
    fn is_demo_mode(&self) -> bool;
}
