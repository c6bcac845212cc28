//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `composite`: the deterministic composite scorer as a `RiskModel`
//! - `csv`: tabular dataset persistence
//! - `synthetic`: seeded synthetic cohort generation
//! - `sanitize`: PII filtering for logs

pub mod composite;
pub mod csv;
pub mod sanitize;
pub mod synthetic;

// Re-export dataset error for lib.rs
pub use self::csv::DatasetError;
