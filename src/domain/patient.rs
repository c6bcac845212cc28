//! Patient record types for mental-health risk stratification.
//!
//! Records arrive from the HTTP layer, the dashboard export, or a tabular
//! training dataset. Every field is optional at the type level; scoring
//! requires the two questionnaire scores and fills the rest with defaults.

use serde::{Deserialize, Serialize};

use crate::InsightError;

/// Maximum PHQ-9 total (9 items scored 0-3).
pub const PHQ9_MAX: i64 = 27;

/// Maximum GAD-7 total (7 items scored 0-3).
pub const GAD7_MAX: i64 = 21;

/// Clinical cut-offs for moderate and severe symptom burden.
pub const PHQ9_MODERATE: i64 = 10;
pub const PHQ9_SEVERE: i64 = 15;
pub const GAD7_MODERATE: i64 = 10;
pub const GAD7_SEVERE: i64 = 15;

const AGE_RANGE: std::ops::RangeInclusive<i64> = 0..=120;

/// Raw patient record as submitted by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientRecord {
    /// Caller-supplied identifier, echoed back in batch responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,

    /// Age in years (0-120)
    pub age: Option<i64>,

    /// Gender (open set)
    pub gender: Option<String>,

    /// PHQ-9 depression score (0-27)
    pub phq9_score: Option<i64>,

    /// GAD-7 anxiety score (0-21)
    pub gad7_score: Option<i64>,

    /// Employment status (Employed, Unemployed, Disabled, Student, Retired, ...)
    pub employment: Option<String>,

    /// Education level (High School, College, Graduate, Other)
    pub education: Option<String>,

    /// Systolic blood pressure in mmHg
    pub bp_systolic: Option<f64>,

    /// Heart rate in bpm
    pub heart_rate: Option<f64>,

    /// Body mass index
    pub bmi: Option<f64>,

    /// Free-text clinical note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_note: Option<String>,
}

impl PatientRecord {
    /// Create a record carrying only the two required scores.
    #[must_use]
    pub fn with_scores(phq9_score: i64, gad7_score: i64) -> Self {
        Self {
            phq9_score: Some(phq9_score),
            gad7_score: Some(gad7_score),
            ..Default::default()
        }
    }

    /// Validate that present fields are within their clinical ranges.
    ///
    /// Missing fields are not an error here; see [`Self::validate_for_scoring`].
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(phq9) = self.phq9_score {
            if !(0..=PHQ9_MAX).contains(&phq9) {
                errors.push(format!("PHQ-9 score {phq9} out of range [0, {PHQ9_MAX}]"));
            }
        }
        if let Some(gad7) = self.gad7_score {
            if !(0..=GAD7_MAX).contains(&gad7) {
                errors.push(format!("GAD-7 score {gad7} out of range [0, {GAD7_MAX}]"));
            }
        }
        if let Some(age) = self.age {
            if !AGE_RANGE.contains(&age) {
                errors.push(format!("Age {age} out of range [0, 120]"));
            }
        }
        for (name, value) in [
            ("bp_systolic", self.bp_systolic),
            ("heart_rate", self.heart_rate),
            ("bmi", self.bmi),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    errors.push(format!("{name} must be a finite number"));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate a record before it enters the scoring path.
    ///
    /// Both questionnaire scores are required; every missing one is cited.
    ///
    /// # Errors
    /// Returns `InsightError::Validation` describing every failed check.
    pub fn validate_for_scoring(&self) -> crate::Result<()> {
        let mut errors = Vec::new();
        if self.phq9_score.is_none() {
            errors.push("Missing required field: phq9_score".to_string());
        }
        if self.gad7_score.is_none() {
            errors.push("Missing required field: gad7_score".to_string());
        }
        if let Err(range_errors) = self.validate() {
            errors.extend(range_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(InsightError::Validation(errors.join("; ")))
        }
    }
}

/// Outcome labels attached to a training record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Binary high-risk label (0 or 1)
    pub high_risk: u8,

    /// Days until the event or censoring
    pub time_to_event: f64,

    /// 1 if the event was observed, 0 if censored
    pub event_occurred: u8,
}

/// A patient record paired with its outcome, as stored in a training dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub record: PatientRecord,
    pub outcome: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_record() {
        let record = PatientRecord {
            age: Some(30),
            phq9_score: Some(4),
            gad7_score: Some(3),
            bmi: Some(23.0),
            ..Default::default()
        };
        assert!(record.validate().is_ok());
        assert!(record.validate_for_scoring().is_ok());
    }

    #[test]
    fn test_out_of_range_scores() {
        let record = PatientRecord::with_scores(28, -1);
        let errors = record.validate().expect_err("Should reject scores");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("PHQ-9"));
        assert!(errors[1].contains("GAD-7"));
    }

    #[test]
    fn test_missing_required_field_is_cited() {
        let record = PatientRecord {
            gad7_score: Some(5),
            ..Default::default()
        };
        let err = record.validate_for_scoring().expect_err("Should fail");
        let message = err.to_string();
        assert!(message.contains("phq9_score"));
        assert!(!message.contains("gad7_score"));
    }

    #[test]
    fn test_deserialize_partial_json() {
        let record: PatientRecord =
            serde_json::from_str(r#"{"phq9_score": 12, "gad7_score": 9, "employment": "Student"}"#)
                .expect("Should parse");
        assert_eq!(record.phq9_score, Some(12));
        assert_eq!(record.employment.as_deref(), Some("Student"));
        assert!(record.age.is_none());
    }

    #[test]
    fn test_non_finite_vitals_rejected() {
        let record = PatientRecord {
            bmi: Some(f64::NAN),
            ..PatientRecord::with_scores(1, 1)
        };
        assert!(record.validate_for_scoring().is_err());
    }
}
