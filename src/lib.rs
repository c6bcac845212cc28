//! # Insight Map
//!
//! Mental-health risk stratification from structured clinical records.
//!
//! This crate provides:
//! - Clinical feature derivation (PHQ-9/GAD-7 severity bins, vitals bins, social risk)
//! - Batch statistical features and a fit/transform preprocessing pipeline
//! - A deterministic composite risk score with tiered recommendations
//! - ANOVA F-test feature importance against a binary outcome
//! - A JSON-over-HTTP serving layer
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core clinical types and pure scoring logic
//! - `analysis`: Batch-scoped computations (augmentation, preprocessing, importance)
//! - `ports`: Trait definitions for scoring backends and dataset sources
//! - `adapters`: Concrete implementations (composite model, CSV, synthetic cohort, log sanitizing)
//! - `application`: Use cases orchestrating domain, analysis and ports
//! - `server`: HTTP endpoints

pub mod adapters;
pub mod analysis;
pub mod application;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod server;

pub use domain::{PatientRecord, RiskAssessment, RiskCategory};

/// Result type for Insight Map operations
pub type Result<T> = std::result::Result<T, InsightError>;

/// Main error type for Insight Map
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("Invalid patient data: {0}")]
    Validation(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Statistics error: {0}")]
    Statistics(String),

    #[error("Dataset error: {0}")]
    Dataset(#[from] adapters::DatasetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
