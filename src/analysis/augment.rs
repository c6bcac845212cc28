//! Statistical feature augmentation.
//!
//! The PHQ-9 z-score needs a population, so augmentation works on a batch.
//! Single-record callers pass a reference population via
//! [`StatisticalFeatureAugmenter::augment_with_reference`].

use serde::{Deserialize, Serialize};

use crate::domain::bins::BinLabel;
use crate::domain::EngineeredFeatures;

use super::frame::{ColumnData, Frame, Schema};

/// PHQ-9 location and spread of a reference population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub size: usize,
    pub phq9_mean: f64,
    /// Sample standard deviation (n - 1); 0 for populations smaller than two
    pub phq9_stddev: f64,
}

impl PopulationStats {
    #[must_use]
    pub fn from_features(batch: &[EngineeredFeatures]) -> Self {
        let size = batch.len();
        if size == 0 {
            return Self {
                size,
                phq9_mean: 0.0,
                phq9_stddev: 0.0,
            };
        }

        let n = size as f64;
        let phq9_mean = batch.iter().map(|f| f.phq9_score as f64).sum::<f64>() / n;
        let phq9_stddev = if size < 2 {
            0.0
        } else {
            let ss: f64 = batch
                .iter()
                .map(|f| (f.phq9_score as f64 - phq9_mean).powi(2))
                .sum();
            (ss / (n - 1.0)).sqrt()
        };

        Self {
            size,
            phq9_mean,
            phq9_stddev,
        }
    }

    /// Standardize a PHQ-9 score. Zero spread yields 0 rather than NaN.
    #[must_use]
    pub fn phq9_zscore(&self, phq9_score: f64) -> f64 {
        if self.phq9_stddev > 0.0 && self.phq9_stddev.is_finite() {
            (phq9_score - self.phq9_mean) / self.phq9_stddev
        } else {
            0.0
        }
    }
}

/// Engineered features layered with the statistical derivatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedFeatures {
    pub base: EngineeredFeatures,
    pub phq9_zscore: f64,
    pub age_squared: f64,
    pub phq9_squared: f64,
    pub age_phq_interaction: f64,
    /// `None` when either BMI or heart rate is missing
    pub bmi_hr_interaction: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalFeatureAugmenter;

impl StatisticalFeatureAugmenter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Augment a batch using its own PHQ-9 statistics.
    #[must_use]
    pub fn augment(&self, batch: &[EngineeredFeatures]) -> Vec<AugmentedFeatures> {
        let stats = PopulationStats::from_features(batch);
        tracing::debug!(
            "Augmenting {} records (phq9 mean={:.3}, sd={:.3})",
            stats.size,
            stats.phq9_mean,
            stats.phq9_stddev
        );
        self.augment_with_reference(batch, &stats)
    }

    /// Augment records against a reference population.
    #[must_use]
    pub fn augment_with_reference(
        &self,
        batch: &[EngineeredFeatures],
        reference: &PopulationStats,
    ) -> Vec<AugmentedFeatures> {
        batch
            .iter()
            .map(|f| {
                let age = f.age as f64;
                let phq9 = f.phq9_score as f64;
                AugmentedFeatures {
                    phq9_zscore: reference.phq9_zscore(phq9),
                    age_squared: age * age,
                    phq9_squared: phq9 * phq9,
                    age_phq_interaction: age * phq9,
                    bmi_hr_interaction: f.bmi.zip(f.heart_rate).map(|(bmi, hr)| bmi * hr),
                    base: f.clone(),
                }
            })
            .collect()
    }
}

enum Extract {
    Numeric(fn(&AugmentedFeatures) -> Option<f64>),
    Categorical(fn(&AugmentedFeatures) -> Option<String>),
}

fn label<L: BinLabel>(bin: &L) -> String {
    bin.label().to_string()
}

/// Column declarations for the augmented feature set, in dataset order.
fn feature_columns() -> Vec<(&'static str, Extract)> {
    vec![
        ("age", Extract::Numeric(|f| Some(f.base.age as f64))),
        ("gender", Extract::Categorical(|f| f.base.gender.clone())),
        ("phq9_score", Extract::Numeric(|f| Some(f.base.phq9_score as f64))),
        ("gad7_score", Extract::Numeric(|f| Some(f.base.gad7_score as f64))),
        ("bp_systolic", Extract::Numeric(|f| f.base.bp_systolic)),
        ("heart_rate", Extract::Numeric(|f| f.base.heart_rate)),
        ("bmi", Extract::Numeric(|f| f.base.bmi)),
        ("education", Extract::Categorical(|f| Some(f.base.education.clone()))),
        ("employment", Extract::Categorical(|f| Some(f.base.employment.clone()))),
        ("phq9_category", Extract::Categorical(|f| Some(label(&f.base.phq9_category)))),
        ("gad7_category", Extract::Categorical(|f| Some(label(&f.base.gad7_category)))),
        ("bmi_category", Extract::Categorical(|f| f.base.bmi_category.as_ref().map(label))),
        ("age_group", Extract::Categorical(|f| Some(label(&f.base.age_group)))),
        ("bp_category", Extract::Categorical(|f| f.base.bp_category.as_ref().map(label))),
        ("composite_mh_score", Extract::Numeric(|f| Some(f.base.composite_mh_score))),
        ("high_phq_high_bp", Extract::Numeric(|f| Some(f64::from(f.base.high_phq_high_bp)))),
        ("social_risk_score", Extract::Numeric(|f| Some(f64::from(f.base.social_risk_score)))),
        ("phq9_zscore", Extract::Numeric(|f| Some(f.phq9_zscore))),
        ("age_squared", Extract::Numeric(|f| Some(f.age_squared))),
        ("phq9_squared", Extract::Numeric(|f| Some(f.phq9_squared))),
        ("age_phq_interaction", Extract::Numeric(|f| Some(f.age_phq_interaction))),
        ("bmi_hr_interaction", Extract::Numeric(|f| f.bmi_hr_interaction)),
    ]
}

impl AugmentedFeatures {
    /// Declared schema of [`Self::to_frame`].
    #[must_use]
    pub fn schema() -> Schema {
        feature_columns()
            .into_iter()
            .fold(Schema::new(), |schema, (name, extract)| match extract {
                Extract::Numeric(_) => schema.with_numeric(name),
                Extract::Categorical(_) => schema.with_categorical(name),
            })
    }

    /// Lay a batch out as a frame for preprocessing.
    ///
    /// # Errors
    /// Propagates frame construction errors (not expected for well-formed batches).
    pub fn to_frame(batch: &[Self]) -> crate::Result<Frame> {
        let columns = feature_columns()
            .into_iter()
            .map(|(_, extract)| match extract {
                Extract::Numeric(get) => ColumnData::Numeric(batch.iter().map(get).collect()),
                Extract::Categorical(get) => {
                    ColumnData::Categorical(batch.iter().map(get).collect())
                }
            })
            .collect();
        Frame::new(Self::schema(), columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ColumnKind;
    use crate::domain::{FeatureDeriver, PatientRecord};

    fn batch(scores: &[i64]) -> Vec<EngineeredFeatures> {
        let records: Vec<PatientRecord> = scores
            .iter()
            .map(|&s| PatientRecord {
                age: Some(40),
                bmi: Some(25.0),
                heart_rate: Some(70.0),
                ..PatientRecord::with_scores(s, 0)
            })
            .collect();
        FeatureDeriver::new().derive_batch(&records)
    }

    #[test]
    fn test_zscore_uses_sample_stddev() {
        let augmented = StatisticalFeatureAugmenter::new().augment(&batch(&[2, 4, 6]));
        // mean 4, sample sd 2
        assert!((augmented[0].phq9_zscore + 1.0).abs() < 1e-12);
        assert!(augmented[1].phq9_zscore.abs() < 1e-12);
        assert!((augmented[2].phq9_zscore - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_zscore_is_zero() {
        let augmented = StatisticalFeatureAugmenter::new().augment(&batch(&[7, 7, 7]));
        assert!(augmented.iter().all(|a| a.phq9_zscore == 0.0));

        let single = StatisticalFeatureAugmenter::new().augment(&batch(&[12]));
        assert_eq!(single[0].phq9_zscore, 0.0);
    }

    #[test]
    fn test_polynomial_and_interaction_terms() {
        let augmented = StatisticalFeatureAugmenter::new().augment(&batch(&[3]));
        let a = &augmented[0];
        assert_eq!(a.age_squared, 1600.0);
        assert_eq!(a.phq9_squared, 9.0);
        assert_eq!(a.age_phq_interaction, 120.0);
        assert_eq!(a.bmi_hr_interaction, Some(1750.0));
    }

    #[test]
    fn test_reference_population() {
        let reference = PopulationStats::from_features(&batch(&[0, 10, 20]));
        let augmented =
            StatisticalFeatureAugmenter::new().augment_with_reference(&batch(&[20]), &reference);
        assert!((augmented[0].phq9_zscore - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_frame_layout() {
        let augmented = StatisticalFeatureAugmenter::new().augment(&batch(&[1, 2]));
        let frame = AugmentedFeatures::to_frame(&augmented).expect("Should build frame");
        assert_eq!(frame.n_rows(), 2);
        assert_eq!(frame.schema().len(), 22);
        assert_eq!(frame.schema().kind_of("phq9_category"), Some(ColumnKind::Categorical));
        assert_eq!(frame.schema().kind_of("high_phq_high_bp"), Some(ColumnKind::Numeric));
        match frame.column("gender") {
            Some(ColumnData::Categorical(values)) => assert!(values.iter().all(Option::is_none)),
            other => panic!("unexpected gender column: {other:?}"),
        }
    }
}
