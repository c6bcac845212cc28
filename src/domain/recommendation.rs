//! Tiered clinical recommendations.

use super::risk::RiskCategory;

const VERY_HIGH: [&str; 5] = [
    "Immediate clinical assessment required",
    "Consider crisis intervention services",
    "Frequent monitoring (daily check-ins)",
    "Safety planning with patient",
    "Consider psychiatric consultation",
];

const HIGH: [&str; 5] = [
    "Schedule urgent follow-up within 48 hours",
    "Increase therapy session frequency",
    "Consider medication evaluation",
    "Develop crisis management plan",
    "Monitor for symptom escalation",
];

const MODERATE: [&str; 5] = [
    "Regular follow-up in 1-2 weeks",
    "Continue current treatment plan",
    "Monitor symptom progression",
    "Provide coping strategy resources",
    "Encourage social support engagement",
];

const LOW: [&str; 5] = [
    "Routine monitoring",
    "Maintain current support systems",
    "Preventive mental health education",
    "Regular check-ins",
    "Promote wellness activities",
];

/// Maps a risk category to its ordered recommendation list.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Recommendations for a category, most urgent first.
    #[must_use]
    pub fn for_category(&self, category: RiskCategory) -> &'static [&'static str] {
        match category {
            RiskCategory::VeryHigh => &VERY_HIGH,
            RiskCategory::High => &HIGH,
            RiskCategory::Moderate => &MODERATE,
            RiskCategory::Low => &LOW,
        }
    }

    /// Owned copy of [`Self::for_category`], for responses.
    #[must_use]
    pub fn recommend(&self, category: RiskCategory) -> Vec<String> {
        self.for_category(category)
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tier_has_five_items() {
        let engine = RecommendationEngine::new();
        for category in [
            RiskCategory::Low,
            RiskCategory::Moderate,
            RiskCategory::High,
            RiskCategory::VeryHigh,
        ] {
            assert_eq!(engine.recommend(category).len(), 5);
        }
    }

    #[test]
    fn test_tier_ordering() {
        let engine = RecommendationEngine::new();
        assert_eq!(
            engine.for_category(RiskCategory::VeryHigh)[0],
            "Immediate clinical assessment required"
        );
        assert_eq!(engine.for_category(RiskCategory::Low)[0], "Routine monitoring");
        assert_eq!(
            engine.for_category(RiskCategory::High)[0],
            "Schedule urgent follow-up within 48 hours"
        );
    }
}
