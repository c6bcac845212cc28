//! Clinical feature derivation from a raw patient record.

use serde::{Deserialize, Serialize};

use super::bins::{
    AgeGroup, BmiCategory, BpCategory, Gad7Category, Phq9Category, AGE_BINS, BMI_BINS, BP_BINS,
    GAD7_BINS, PHQ9_BINS,
};
use super::patient::PatientRecord;

pub const DEFAULT_EMPLOYMENT: &str = "Employed";
pub const DEFAULT_EDUCATION: &str = "College";
pub const DEFAULT_AGE: i64 = 45;

const PHQ9_COMPOSITE_WEIGHT: f64 = 0.6;
const GAD7_COMPOSITE_WEIGHT: f64 = 0.4;

/// PHQ-9 above this combined with systolic BP above [`HIGH_BP_THRESHOLD`] sets the interaction flag.
const HIGH_PHQ9_THRESHOLD: i64 = super::patient::PHQ9_MODERATE;
const HIGH_BP_THRESHOLD: f64 = 140.0;

const EMPLOYMENT_RISK: [(&str, u32); 5] = [
    ("Employed", 0),
    ("Unemployed", 2),
    ("Disabled", 3),
    ("Student", 1),
    ("Retired", 1),
];
const UNKNOWN_EMPLOYMENT_RISK: u32 = 1;

const EDUCATION_RISK: [(&str, u32); 4] = [
    ("High School", 1),
    ("College", 0),
    ("Graduate", 0),
    ("Other", 1),
];
const UNKNOWN_EDUCATION_RISK: u32 = 0;

/// Employment-status risk weight. Unrecognized statuses weigh 1.
#[must_use]
pub fn employment_risk(employment: &str) -> u32 {
    EMPLOYMENT_RISK
        .iter()
        .find(|(label, _)| *label == employment)
        .map_or(UNKNOWN_EMPLOYMENT_RISK, |(_, risk)| *risk)
}

/// Education-level risk weight. Unrecognized levels weigh 0.
#[must_use]
pub fn education_risk(education: &str) -> u32 {
    EDUCATION_RISK
        .iter()
        .find(|(label, _)| *label == education)
        .map_or(UNKNOWN_EDUCATION_RISK, |(_, risk)| *risk)
}

/// Record fields with defaults applied, plus the clinically derived features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    pub age: i64,
    pub gender: Option<String>,
    pub phq9_score: i64,
    pub gad7_score: i64,
    pub employment: String,
    pub education: String,
    pub bp_systolic: Option<f64>,
    pub heart_rate: Option<f64>,
    pub bmi: Option<f64>,

    pub phq9_category: Phq9Category,
    pub gad7_category: Gad7Category,
    /// `None` when BMI was not recorded
    pub bmi_category: Option<BmiCategory>,
    pub age_group: AgeGroup,
    /// `None` when systolic BP was not recorded
    pub bp_category: Option<BpCategory>,

    /// 0.6 x PHQ-9 + 0.4 x GAD-7 (unnormalized)
    pub composite_mh_score: f64,
    /// Employment risk + education risk
    pub social_risk_score: u32,
    /// 1 if PHQ-9 > 10 and systolic BP > 140
    pub high_phq_high_bp: u8,
}

/// Derives clinical features. Stateless; never fails on missing optional fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureDeriver;

impl FeatureDeriver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Derive the feature set for one record.
    #[must_use]
    pub fn derive(&self, record: &PatientRecord) -> EngineeredFeatures {
        let age = record.age.unwrap_or(DEFAULT_AGE);
        let phq9_score = record.phq9_score.unwrap_or(0);
        let gad7_score = record.gad7_score.unwrap_or(0);
        let employment = record
            .employment
            .clone()
            .unwrap_or_else(|| DEFAULT_EMPLOYMENT.to_string());
        let education = record
            .education
            .clone()
            .unwrap_or_else(|| DEFAULT_EDUCATION.to_string());

        let high_bp = record.bp_systolic.is_some_and(|bp| bp > HIGH_BP_THRESHOLD);
        let high_phq_high_bp = u8::from(phq9_score > HIGH_PHQ9_THRESHOLD && high_bp);

        EngineeredFeatures {
            phq9_category: PHQ9_BINS.classify(phq9_score as f64),
            gad7_category: GAD7_BINS.classify(gad7_score as f64),
            bmi_category: record.bmi.map(|bmi| BMI_BINS.classify(bmi)),
            age_group: AGE_BINS.classify(age as f64),
            bp_category: record.bp_systolic.map(|bp| BP_BINS.classify(bp)),
            composite_mh_score: phq9_score as f64 * PHQ9_COMPOSITE_WEIGHT
                + gad7_score as f64 * GAD7_COMPOSITE_WEIGHT,
            social_risk_score: employment_risk(&employment) + education_risk(&education),
            high_phq_high_bp,
            age,
            gender: record.gender.clone(),
            phq9_score,
            gad7_score,
            employment,
            education,
            bp_systolic: record.bp_systolic,
            heart_rate: record.heart_rate,
            bmi: record.bmi,
        }
    }

    /// Derive features for every record in a batch, preserving order.
    #[must_use]
    pub fn derive_batch(&self, records: &[PatientRecord]) -> Vec<EngineeredFeatures> {
        records.iter().map(|r| self.derive(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(phq9: i64, gad7: i64, employment: &str, education: &str, age: i64) -> PatientRecord {
        PatientRecord {
            age: Some(age),
            phq9_score: Some(phq9),
            gad7_score: Some(gad7),
            employment: Some(employment.to_string()),
            education: Some(education.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_social_risk_lookup() {
        let deriver = FeatureDeriver::new();
        assert_eq!(deriver.derive(&record(4, 3, "Employed", "College", 30)).social_risk_score, 0);
        assert_eq!(deriver.derive(&record(22, 18, "Disabled", "Other", 50)).social_risk_score, 4);
        assert_eq!(deriver.derive(&record(1, 1, "Unemployed", "High School", 30)).social_risk_score, 3);
    }

    #[test]
    fn test_unrecognized_social_categories() {
        assert_eq!(employment_risk("Freelance"), 1);
        assert_eq!(education_risk("Doctorate"), 0);
        let features = FeatureDeriver::new().derive(&record(0, 0, "Freelance", "Doctorate", 30));
        assert_eq!(features.social_risk_score, 1);
    }

    #[test]
    fn test_composite_score_weights() {
        let features = FeatureDeriver::new().derive(&record(10, 5, "Employed", "College", 30));
        assert!((features.composite_mh_score - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let features = FeatureDeriver::new().derive(&PatientRecord::default());
        assert_eq!(features.age, DEFAULT_AGE);
        assert_eq!(features.employment, DEFAULT_EMPLOYMENT);
        assert_eq!(features.education, DEFAULT_EDUCATION);
        assert_eq!(features.phq9_score, 0);
        assert_eq!(features.gad7_score, 0);
        assert_eq!(features.social_risk_score, 0);
        assert_eq!(features.age_group, AgeGroup::Middle);
        assert!(features.bmi_category.is_none());
        assert!(features.bp_category.is_none());
        assert_eq!(features.high_phq_high_bp, 0);
    }

    #[test]
    fn test_high_phq_high_bp_flag() {
        let deriver = FeatureDeriver::new();
        let mut r = record(11, 0, "Employed", "College", 40);
        r.bp_systolic = Some(141.0);
        assert_eq!(deriver.derive(&r).high_phq_high_bp, 1);

        // Both thresholds are strict.
        r.bp_systolic = Some(140.0);
        assert_eq!(deriver.derive(&r).high_phq_high_bp, 0);
        r.bp_systolic = Some(150.0);
        r.phq9_score = Some(10);
        assert_eq!(deriver.derive(&r).high_phq_high_bp, 0);
    }

    #[test]
    fn test_bins_applied() {
        let mut r = record(15, 10, "Employed", "College", 70);
        r.bmi = Some(31.0);
        r.bp_systolic = Some(125.0);
        let features = FeatureDeriver::new().derive(&r);
        assert_eq!(features.phq9_category, Phq9Category::ModeratelySevere);
        assert_eq!(features.gad7_category, Gad7Category::Moderate);
        assert_eq!(features.bmi_category, Some(BmiCategory::Obese));
        assert_eq!(features.age_group, AgeGroup::Elderly);
        assert_eq!(features.bp_category, Some(BpCategory::Elevated));
    }
}
