//! Analysis layer: batch-scoped feature computations.
//!
//! Everything here operates on a population of records rather than a single
//! record: batch statistics for augmentation, fit/transform preprocessing over
//! a declared schema, and per-feature significance testing.

mod augment;
mod frame;
mod importance;
mod preprocess;

pub use augment::{AugmentedFeatures, PopulationStats, StatisticalFeatureAugmenter};
pub use frame::{ColumnData, ColumnKind, ColumnSpec, FeatureMatrix, Frame, Schema};
pub use importance::{FeatureImportance, FeatureImportanceAnalyzer};
pub use preprocess::{
    CategoryVocabulary, FittedPreprocessor, NumericParams, Preprocessor, MISSING_TOKEN,
};
