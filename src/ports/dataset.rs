//! Dataset port: Trait for labeled training batches.
//!
//! This trait abstracts where training-time records come from (a CSV file,
//! a synthetic generator) from the analysis pipeline.

use crate::domain::LabeledRecord;

/// Trait for sources of labeled patient records.
pub trait DatasetSource: Send + Sync {
    /// Error type for load operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the full labeled batch.
    ///
    /// # Errors
    /// Returns error if the source cannot be read or a row is malformed.
    fn load(&self) -> Result<Vec<LabeledRecord>, Self::Error>;
}
