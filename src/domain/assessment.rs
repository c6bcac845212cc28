//! Risk assessment result types.
//!
//! Represents the output of the scoring path for one patient.

use serde::{Deserialize, Serialize};

use super::note::NoteFinding;
use super::patient::PatientRecord;
use super::risk::{RiskCategory, RiskFactors};

/// Version tag attached to every assessment.
pub const MODEL_VERSION: &str = "1.0";

/// PHQ-9 above this is reported as the primary driver.
const PHQ9_DRIVER_THRESHOLD: i64 = super::patient::PHQ9_MODERATE;

/// Scored output for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Composite risk score in [0.05, 0.95]
    pub risk_score: f64,

    /// Risk classification
    pub risk_category: RiskCategory,

    /// Model confidence (constant until a trained model is wired in)
    pub confidence: f64,

    /// Recommendations, most urgent first
    pub recommendations: Vec<String>,

    /// Timestamp of assessment
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Scoring model version
    pub model_version: String,
}

/// Interpretive notes shown alongside an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInsights {
    /// "PHQ-9 scores" or "multiple factors"
    pub primary_driver: String,

    /// Keyword screen of the clinical note, when one was supplied
    pub note_analysis: Option<NoteFinding>,
}

impl AssessmentInsights {
    #[must_use]
    pub fn new(phq9_score: i64, note_analysis: Option<NoteFinding>) -> Self {
        let primary_driver = if phq9_score > PHQ9_DRIVER_THRESHOLD {
            "PHQ-9 scores"
        } else {
            "multiple factors"
        };
        Self {
            primary_driver: primary_driver.to_string(),
            note_analysis,
        }
    }
}

/// Exportable report pairing the submitted record with its assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub patient_data: PatientRecord,
    pub risk_assessment: RiskAssessment,
    pub factors: RiskFactors,
    pub insights: AssessmentInsights,
}

impl AssessmentReport {
    /// Pretty-printed JSON export.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested download file name, stamped with the assessment time.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "mental_health_assessment_{}.json",
            self.risk_assessment.timestamp.format("%Y%m%d_%H%M")
        )
    }
}
