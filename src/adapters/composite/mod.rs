//! Composite adapter: Implementation of RiskModel.
//!
//! Wraps the domain [`RiskScorer`]. Model loading is a stub: no trained
//! artifact exists yet, so the adapter always runs in demo mode and reports
//! a fixed confidence.

use std::path::Path;

use crate::domain::{RiskScorer, ScoringInputs, MODEL_VERSION};
use crate::ports::RiskModel;

/// Fixed confidence placeholder until a trained model supplies one.
pub const DEMO_CONFIDENCE: f64 = 0.85;

#[derive(Debug, Clone)]
pub struct CompositeRiskModel {
    scorer: RiskScorer,
    version: String,
}

impl CompositeRiskModel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scorer: RiskScorer::new(),
            version: MODEL_VERSION.to_string(),
        }
    }

    /// Look for trained model artifacts under `model_dir`.
    ///
    /// Trained artifacts are not supported yet; the composite scorer is
    /// returned either way and the outcome is logged.
    #[must_use]
    pub fn load(model_dir: Option<&Path>) -> Self {
        match model_dir {
            Some(dir) if dir.exists() => {
                tracing::warn!(
                    "Model directory {:?} found but trained models are not supported; using demo mode",
                    dir
                );
            }
            Some(dir) => {
                tracing::warn!("Model directory {:?} not found; using demo mode", dir);
            }
            None => tracing::info!("No model directory configured; using composite scorer"),
        }
        Self::new()
    }
}

impl Default for CompositeRiskModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskModel for CompositeRiskModel {
    fn score(&self, inputs: &ScoringInputs) -> f64 {
        self.scorer.score(inputs)
    }

    fn confidence(&self) -> f64 {
        DEMO_CONFIDENCE
    }

    fn model_version(&self) -> &str {
        &self.version
    }

    fn is_demo_mode(&self) -> bool {
        true
    }
}
