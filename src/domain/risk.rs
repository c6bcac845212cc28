//! Composite risk scoring.
//!
//! The score blends normalized questionnaire severity, social risk and age,
//! then clamps into [`MIN_RISK_SCORE`, `MAX_RISK_SCORE`]. No fitted state.

use serde::{Deserialize, Serialize};

use super::features::EngineeredFeatures;

pub const MIN_RISK_SCORE: f64 = 0.05;
pub const MAX_RISK_SCORE: f64 = 0.95;

const PHQ9_WEIGHT: f64 = 0.4;
const GAD7_WEIGHT: f64 = 0.3;
const SOCIAL_WEIGHT: f64 = 0.2;
const AGE_WEIGHT: f64 = 0.1;

const PHQ9_SCALE: f64 = 27.0;
const GAD7_SCALE: f64 = 21.0;
const SOCIAL_SCALE: f64 = 5.0;
const AGE_SCALE: f64 = 100.0;

const MODERATE_THRESHOLD: f64 = 0.3;
const HIGH_THRESHOLD: f64 = 0.6;
const VERY_HIGH_THRESHOLD: f64 = 0.8;

/// Risk category, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Very High Risk")]
    VeryHigh,
}

impl RiskCategory {
    /// Map a score onto half-open intervals [0, 0.3), [0.3, 0.6), [0.6, 0.8), [0.8, ..].
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < MODERATE_THRESHOLD {
            Self::Low
        } else if score < HIGH_THRESHOLD {
            Self::Moderate
        } else if score < VERY_HIGH_THRESHOLD {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
            Self::VeryHigh => "Very High Risk",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The four values the composite score depends on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringInputs {
    pub phq9_score: f64,
    pub gad7_score: f64,
    pub social_risk_score: f64,
    pub age: f64,
}

impl From<&EngineeredFeatures> for ScoringInputs {
    fn from(features: &EngineeredFeatures) -> Self {
        Self {
            phq9_score: features.phq9_score as f64,
            gad7_score: features.gad7_score as f64,
            social_risk_score: f64::from(features.social_risk_score),
            age: features.age as f64,
        }
    }
}

/// Per-factor normalized severities, shown as the dashboard breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    /// PHQ-9 / 27
    pub phq9: f64,
    /// GAD-7 / 21
    pub gad7: f64,
    /// Social risk / 5
    pub social: f64,
    /// min(age / 100, 1)
    pub age: f64,
}

impl RiskFactors {
    #[must_use]
    pub fn from_inputs(inputs: &ScoringInputs) -> Self {
        Self {
            phq9: inputs.phq9_score / PHQ9_SCALE,
            gad7: inputs.gad7_score / GAD7_SCALE,
            social: inputs.social_risk_score / SOCIAL_SCALE,
            age: (inputs.age / AGE_SCALE).min(1.0),
        }
    }

    /// Weighted blend before clamping.
    #[must_use]
    pub fn weighted_sum(&self) -> f64 {
        self.phq9 * PHQ9_WEIGHT
            + self.gad7 * GAD7_WEIGHT
            + self.social * SOCIAL_WEIGHT
            + self.age * AGE_WEIGHT
    }
}

/// Deterministic composite risk scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compute the bounded risk score.
    #[must_use]
    pub fn score(&self, inputs: &ScoringInputs) -> f64 {
        RiskFactors::from_inputs(inputs)
            .weighted_sum()
            .clamp(MIN_RISK_SCORE, MAX_RISK_SCORE)
    }

    /// Compute the score and its category.
    #[must_use]
    pub fn assess(&self, inputs: &ScoringInputs) -> (f64, RiskCategory) {
        let score = self.score(inputs);
        (score, RiskCategory::from_score(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn inputs(phq9: f64, gad7: f64, social: f64, age: f64) -> ScoringInputs {
        ScoringInputs {
            phq9_score: phq9,
            gad7_score: gad7,
            social_risk_score: social,
            age,
        }
    }

    #[test]
    fn test_low_risk_scenario() {
        let (score, category) = RiskScorer::new().assess(&inputs(4.0, 3.0, 0.0, 30.0));
        let expected = 4.0 / 27.0 * 0.4 + 3.0 / 21.0 * 0.3 + 0.03;
        assert!((score - expected).abs() < 1e-12);
        assert!((score - 0.1322).abs() < 1e-4);
        assert_eq!(category, RiskCategory::Low);
    }

    #[test]
    fn test_high_risk_scenario() {
        let (score, category) = RiskScorer::new().assess(&inputs(22.0, 18.0, 4.0, 50.0));
        assert!((score - 0.793).abs() < 1e-3);
        assert_eq!(category, RiskCategory::High);
    }

    #[test]
    fn test_score_is_clamped() {
        let scorer = RiskScorer::new();
        assert_eq!(scorer.score(&inputs(0.0, 0.0, 0.0, 0.0)), MIN_RISK_SCORE);
        assert_eq!(scorer.score(&inputs(27.0, 21.0, 5.0, 120.0)), MAX_RISK_SCORE);
    }

    #[test]
    fn test_category_boundaries_are_exact() {
        assert_eq!(RiskCategory::from_score(0.299_999_999), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(0.3), RiskCategory::Moderate);
        assert_eq!(RiskCategory::from_score(0.599_999_999), RiskCategory::Moderate);
        assert_eq!(RiskCategory::from_score(0.6), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(0.799_999_999), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(0.8), RiskCategory::VeryHigh);
        assert_eq!(RiskCategory::from_score(0.95), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_category_ordering_and_labels() {
        assert!(RiskCategory::Low < RiskCategory::Moderate);
        assert!(RiskCategory::High < RiskCategory::VeryHigh);
        assert_eq!(RiskCategory::VeryHigh.to_string(), "Very High Risk");
        let json = serde_json::to_string(&RiskCategory::Moderate).expect("Should serialize");
        assert_eq!(json, "\"Moderate Risk\"");
    }

    #[test]
    fn test_age_factor_saturates() {
        let factors = RiskFactors::from_inputs(&inputs(0.0, 0.0, 0.0, 150.0));
        assert_eq!(factors.age, 1.0);
    }

    proptest! {
        #[test]
        fn test_score_bounded(phq9 in 0i64..=27, gad7 in 0i64..=21, social in 0u32..=4, age in 0i64..=120) {
            let score = RiskScorer::new().score(&inputs(phq9 as f64, gad7 as f64, f64::from(social), age as f64));
            prop_assert!((MIN_RISK_SCORE..=MAX_RISK_SCORE).contains(&score));
        }

        #[test]
        fn test_score_monotone(
            phq9 in 0i64..27,
            gad7 in 0i64..21,
            social in 0u32..4,
            age in 0i64..120,
        ) {
            let scorer = RiskScorer::new();
            let base = inputs(phq9 as f64, gad7 as f64, f64::from(social), age as f64);
            let score = scorer.score(&base);

            let up_phq9 = ScoringInputs { phq9_score: base.phq9_score + 1.0, ..base };
            let up_gad7 = ScoringInputs { gad7_score: base.gad7_score + 1.0, ..base };
            let up_social = ScoringInputs { social_risk_score: base.social_risk_score + 1.0, ..base };
            let up_age = ScoringInputs { age: base.age + 1.0, ..base };

            prop_assert!(scorer.score(&up_phq9) >= score);
            prop_assert!(scorer.score(&up_gad7) >= score);
            prop_assert!(scorer.score(&up_social) >= score);
            prop_assert!(scorer.score(&up_age) >= score);
        }
    }
}
