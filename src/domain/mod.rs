//! Domain layer: Core clinical types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! All types are serializable and implement strict validation.

mod assessment;
pub mod bins;
mod features;
mod note;
mod patient;
mod recommendation;
mod risk;

pub use assessment::{AssessmentInsights, AssessmentReport, RiskAssessment, MODEL_VERSION};
pub use bins::{AgeGroup, BmiCategory, BpCategory, Gad7Category, Phq9Category};
pub use features::{
    education_risk, employment_risk, EngineeredFeatures, FeatureDeriver, DEFAULT_AGE,
    DEFAULT_EDUCATION, DEFAULT_EMPLOYMENT,
};
pub use note::{NoteFinding, NoteScreen};
pub use patient::{
    LabeledRecord, Outcome, PatientRecord, GAD7_MAX, GAD7_MODERATE, GAD7_SEVERE, PHQ9_MAX,
    PHQ9_MODERATE, PHQ9_SEVERE,
};
pub use recommendation::RecommendationEngine;
pub use risk::{RiskCategory, RiskFactors, RiskScorer, ScoringInputs};
