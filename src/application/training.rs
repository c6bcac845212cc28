//! Training analysis: Orchestrates the offline feature pipeline.
//!
//! derive → augment → fit/transform → feature importance, over a labeled
//! batch. Outcome and survival columns never enter the feature frame.

use crate::adapters::DatasetError;
use crate::analysis::{
    AugmentedFeatures, FeatureImportance, FeatureImportanceAnalyzer, FeatureMatrix,
    FittedPreprocessor, Preprocessor, StatisticalFeatureAugmenter,
};
use crate::domain::{EngineeredFeatures, FeatureDeriver, LabeledRecord, PatientRecord};
use crate::ports::DatasetSource;
use crate::InsightError;

/// Output of [`TrainingAnalysis::fit_transform`].
#[derive(Debug, Clone)]
pub struct TrainingOutput {
    /// Transformed features, one row per record
    pub matrix: FeatureMatrix,
    /// Binary high-risk labels aligned with `matrix` rows
    pub outcome: Vec<u8>,
    /// Fitted transform; wrap in `Arc` to share across threads
    pub fitted: FittedPreprocessor,
    /// Clinical features before augmentation
    pub engineered: Vec<EngineeredFeatures>,
}

impl TrainingOutput {
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        self.matrix.feature_names()
    }
}

/// Offline feature pipeline over labeled batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainingAnalysis {
    deriver: FeatureDeriver,
    augmenter: StatisticalFeatureAugmenter,
    preprocessor: Preprocessor,
    analyzer: FeatureImportanceAnalyzer,
}

impl TrainingAnalysis {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive, augment and fit the preprocessor on a labeled batch.
    ///
    /// # Errors
    /// Returns `EmptyInput` for an empty batch, or `Statistics` if a numeric
    /// column cannot be standardized.
    pub fn fit_transform(&self, batch: &[LabeledRecord]) -> crate::Result<TrainingOutput> {
        let records: Vec<PatientRecord> = batch.iter().map(|l| l.record.clone()).collect();
        let outcome: Vec<u8> = batch.iter().map(|l| l.outcome.high_risk).collect();

        let engineered = self.deriver.derive_batch(&records);
        let augmented = self.augmenter.augment(&engineered);
        let frame = AugmentedFeatures::to_frame(&augmented)?;
        let (fitted, matrix) = self.preprocessor.fit_transform(&frame)?;

        tracing::info!(
            "Training pipeline: {} records -> {} features",
            matrix.n_rows(),
            matrix.n_features()
        );

        Ok(TrainingOutput {
            matrix,
            outcome,
            fitted,
            engineered,
        })
    }

    /// Rank the transformed features against the high-risk label.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the labels contain a single class.
    pub fn feature_importance(
        &self,
        output: &TrainingOutput,
    ) -> crate::Result<Vec<FeatureImportance>> {
        self.analyzer.analyze(&output.matrix, &output.outcome)
    }

    /// Load a dataset and run the full pipeline.
    ///
    /// # Errors
    /// Returns error if the dataset cannot be loaded or a stage fails.
    pub fn run<D>(&self, source: &D) -> crate::Result<(TrainingOutput, Vec<FeatureImportance>)>
    where
        D: DatasetSource,
        D::Error: Into<DatasetError>,
    {
        let batch = source
            .load()
            .map_err(|e| InsightError::Dataset(e.into()))?;
        let output = self.fit_transform(&batch)?;
        let ranking = self.feature_importance(&output)?;
        Ok((output, ranking))
    }
}
