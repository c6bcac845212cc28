//! Clinical cut points as ordered boundary tables.
//!
//! Each table lists inclusive upper bounds in ascending order; a value falls
//! into the first bin whose upper bound it does not exceed. Values below the
//! first bound land in the first bin and values above the last bound land in
//! the last bin, so out-of-range inputs are clamped rather than rejected.

use serde::{Deserialize, Serialize};

/// Ordered boundary table mapping a numeric value to a bin label.
#[derive(Debug, Clone, Copy)]
pub struct BinTable<C: 'static> {
    upper_bounds: &'static [f64],
    labels: &'static [C],
}

impl<C: Copy> BinTable<C> {
    /// Build a table. There must be exactly one more label than bounds.
    #[must_use]
    pub const fn new(upper_bounds: &'static [f64], labels: &'static [C]) -> Self {
        assert!(labels.len() == upper_bounds.len() + 1);
        Self {
            upper_bounds,
            labels,
        }
    }

    /// Classify a value (right-inclusive bins).
    #[must_use]
    pub fn classify(&self, value: f64) -> C {
        let idx = self.upper_bounds.partition_point(|&upper| value > upper);
        self.labels[idx]
    }
}

/// A bin that renders to the clinical label used in feature names and exports.
pub trait BinLabel {
    fn label(&self) -> &'static str;
}

/// PHQ-9 depression severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phq9Category {
    /// 0-4, reported as "None"
    #[serde(rename = "None")]
    Minimal,
    Mild,
    Moderate,
    #[serde(rename = "Moderately Severe")]
    ModeratelySevere,
    Severe,
}

impl BinLabel for Phq9Category {
    fn label(&self) -> &'static str {
        match self {
            Self::Minimal => "None",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::ModeratelySevere => "Moderately Severe",
            Self::Severe => "Severe",
        }
    }
}

pub const PHQ9_BINS: BinTable<Phq9Category> = BinTable::new(
    &[4.0, 9.0, 14.0, 19.0],
    &[
        Phq9Category::Minimal,
        Phq9Category::Mild,
        Phq9Category::Moderate,
        Phq9Category::ModeratelySevere,
        Phq9Category::Severe,
    ],
);

/// GAD-7 anxiety severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gad7Category {
    /// 0-4, reported as "None"
    #[serde(rename = "None")]
    Minimal,
    Mild,
    Moderate,
    Severe,
}

impl BinLabel for Gad7Category {
    fn label(&self) -> &'static str {
        match self {
            Self::Minimal => "None",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }
}

pub const GAD7_BINS: BinTable<Gad7Category> = BinTable::new(
    &[4.0, 9.0, 14.0],
    &[
        Gad7Category::Minimal,
        Gad7Category::Mild,
        Gad7Category::Moderate,
        Gad7Category::Severe,
    ],
);

/// WHO BMI classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
    #[serde(rename = "Extreme Obesity")]
    ExtremeObesity,
}

impl BinLabel for BmiCategory {
    fn label(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
            Self::ExtremeObesity => "Extreme Obesity",
        }
    }
}

pub const BMI_BINS: BinTable<BmiCategory> = BinTable::new(
    &[18.5, 25.0, 30.0, 35.0],
    &[
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::Obese,
        BmiCategory::ExtremeObesity,
    ],
);

/// Epidemiological age bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Young,
    Middle,
    Older,
    Elderly,
}

impl BinLabel for AgeGroup {
    fn label(&self) -> &'static str {
        match self {
            Self::Young => "Young",
            Self::Middle => "Middle",
            Self::Older => "Older",
            Self::Elderly => "Elderly",
        }
    }
}

pub const AGE_BINS: BinTable<AgeGroup> = BinTable::new(
    &[25.0, 45.0, 65.0],
    &[AgeGroup::Young, AgeGroup::Middle, AgeGroup::Older, AgeGroup::Elderly],
);

/// Systolic blood pressure stages (ACC/AHA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BpCategory {
    Normal,
    Elevated,
    Stage1,
    Stage2,
    Crisis,
}

impl BinLabel for BpCategory {
    fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Elevated => "Elevated",
            Self::Stage1 => "Stage1",
            Self::Stage2 => "Stage2",
            Self::Crisis => "Crisis",
        }
    }
}

pub const BP_BINS: BinTable<BpCategory> = BinTable::new(
    &[120.0, 130.0, 140.0, 180.0],
    &[
        BpCategory::Normal,
        BpCategory::Elevated,
        BpCategory::Stage1,
        BpCategory::Stage2,
        BpCategory::Crisis,
    ],
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phq9_cut_points() {
        let cases = [
            (0.0, Phq9Category::Minimal),
            (4.0, Phq9Category::Minimal),
            (5.0, Phq9Category::Mild),
            (9.0, Phq9Category::Mild),
            (10.0, Phq9Category::Moderate),
            (14.0, Phq9Category::Moderate),
            (15.0, Phq9Category::ModeratelySevere),
            (19.0, Phq9Category::ModeratelySevere),
            (20.0, Phq9Category::Severe),
            (27.0, Phq9Category::Severe),
        ];
        for (score, expected) in cases {
            assert_eq!(PHQ9_BINS.classify(score), expected, "score {score}");
        }
    }

    #[test]
    fn test_gad7_cut_points() {
        assert_eq!(GAD7_BINS.classify(4.0), Gad7Category::Minimal);
        assert_eq!(GAD7_BINS.classify(9.0), Gad7Category::Mild);
        assert_eq!(GAD7_BINS.classify(14.0), Gad7Category::Moderate);
        assert_eq!(GAD7_BINS.classify(15.0), Gad7Category::Severe);
        assert_eq!(GAD7_BINS.classify(21.0), Gad7Category::Severe);
    }

    #[test]
    fn test_right_inclusive_boundaries() {
        assert_eq!(BMI_BINS.classify(18.5), BmiCategory::Underweight);
        assert_eq!(BMI_BINS.classify(18.6), BmiCategory::Normal);
        assert_eq!(BMI_BINS.classify(25.0), BmiCategory::Normal);
        assert_eq!(BMI_BINS.classify(35.0), BmiCategory::Obese);
        assert_eq!(BMI_BINS.classify(35.1), BmiCategory::ExtremeObesity);

        assert_eq!(AGE_BINS.classify(25.0), AgeGroup::Young);
        assert_eq!(AGE_BINS.classify(26.0), AgeGroup::Middle);
        assert_eq!(AGE_BINS.classify(65.0), AgeGroup::Older);
        assert_eq!(AGE_BINS.classify(66.0), AgeGroup::Elderly);

        assert_eq!(BP_BINS.classify(120.0), BpCategory::Normal);
        assert_eq!(BP_BINS.classify(130.0), BpCategory::Elevated);
        assert_eq!(BP_BINS.classify(140.0), BpCategory::Stage1);
        assert_eq!(BP_BINS.classify(180.0), BpCategory::Stage2);
        assert_eq!(BP_BINS.classify(180.5), BpCategory::Crisis);
    }

    #[test]
    fn test_out_of_range_values_clamp_to_outer_bins() {
        assert_eq!(PHQ9_BINS.classify(-3.0), Phq9Category::Minimal);
        assert_eq!(PHQ9_BINS.classify(40.0), Phq9Category::Severe);
        assert_eq!(GAD7_BINS.classify(30.0), Gad7Category::Severe);
        assert_eq!(BMI_BINS.classify(-1.0), BmiCategory::Underweight);
        assert_eq!(BMI_BINS.classify(150.0), BmiCategory::ExtremeObesity);
        assert_eq!(AGE_BINS.classify(130.0), AgeGroup::Elderly);
        assert_eq!(BP_BINS.classify(400.0), BpCategory::Crisis);
    }

    #[test]
    fn test_labels_match_serde_names() {
        let json = serde_json::to_string(&Phq9Category::ModeratelySevere).expect("Should serialize");
        assert_eq!(json, format!("\"{}\"", Phq9Category::ModeratelySevere.label()));
        let json = serde_json::to_string(&Gad7Category::Minimal).expect("Should serialize");
        assert_eq!(json, "\"None\"");
    }
}
