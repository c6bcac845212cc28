//! Fit/transform preprocessing over a declared schema.
//!
//! Numeric columns: median imputation, then standardization with the mean and
//! population standard deviation of the imputed training column. Categorical
//! columns: missing values become [`MISSING_TOKEN`], then one-hot encoding over
//! the vocabulary observed at fit time.
//!
//! The output layout is every numeric column in schema order followed by one
//! indicator per (categorical column, category). It is fixed at fit time:
//! transform never grows a vocabulary, and a category it has not seen encodes
//! as an all-zero block.

use serde::{Deserialize, Serialize};

use crate::InsightError;

use super::frame::{ColumnData, ColumnKind, FeatureMatrix, Frame, Schema};

/// Category recorded for missing categorical values.
pub const MISSING_TOKEN: &str = "missing";

/// Scales closer to zero than this are treated as constant columns.
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

/// Learned imputation and scaling parameters for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericParams {
    pub column: String,
    pub median: f64,
    pub mean: f64,
    /// Standard deviation, or 1.0 for a constant column
    pub scale: f64,
}

impl NumericParams {
    fn fit(column: &str, values: &[Option<f64>]) -> crate::Result<Self> {
        let mut observed: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
        let median = if observed.is_empty() {
            tracing::warn!("Numeric column '{column}' has no observed values; imputing 0.0");
            0.0
        } else {
            observed.sort_by(f64::total_cmp);
            let n = observed.len();
            if n % 2 == 1 {
                observed[n / 2]
            } else {
                (observed[n / 2 - 1] + observed[n / 2]) / 2.0
            }
        };

        // Running mean and sum of squared deviations
        let (mut mean, mut m2) = (0.0_f64, 0.0_f64);
        for (k, v) in values.iter().enumerate() {
            let x = impute(*v, median);
            let delta = x - mean;
            mean += delta / (k + 1) as f64;
            m2 += delta * (x - mean);
        }
        let std = (m2 / values.len() as f64).sqrt();
        if !mean.is_finite() || !std.is_finite() {
            return Err(InsightError::Statistics(format!(
                "numeric column '{column}' is too large to standardize"
            )));
        }
        let scale = if std < MIN_SCALE { 1.0 } else { std };

        Ok(Self {
            column: column.to_string(),
            median,
            mean,
            scale,
        })
    }

    /// Impute then standardize one value.
    #[must_use]
    pub fn apply(&self, value: Option<f64>) -> f64 {
        (impute(value, self.median) - self.mean) / self.scale
    }
}

fn impute(value: Option<f64>, median: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => median,
    }
}

/// Learned category vocabulary for one categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    pub column: String,
    /// Categories in first-observation order; always contains [`MISSING_TOKEN`]
    pub categories: Vec<String>,
}

impl CategoryVocabulary {
    fn fit(column: &str, values: &[Option<String>]) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for value in values {
            let token = value.as_deref().unwrap_or(MISSING_TOKEN);
            if !categories.iter().any(|c| c == token) {
                categories.push(token.to_string());
            }
        }
        if !categories.iter().any(|c| c == MISSING_TOKEN) {
            categories.push(MISSING_TOKEN.to_string());
        }
        Self {
            column: column.to_string(),
            categories,
        }
    }

    /// Index of a value's indicator, or `None` for a category unseen at fit time.
    #[must_use]
    pub fn position(&self, value: Option<&str>) -> Option<usize> {
        let token = value.unwrap_or(MISSING_TOKEN);
        self.categories.iter().position(|c| c == token)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Immutable artifact produced by [`Preprocessor::fit`].
///
/// Holds no interior mutability; share it across threads behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    schema: Schema,
    numeric: Vec<NumericParams>,
    categorical: Vec<CategoryVocabulary>,
    feature_names: Vec<String>,
}

impl FittedPreprocessor {
    /// Schema seen at fit time.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Output feature names, in output column order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    #[must_use]
    pub fn numeric_params(&self) -> &[NumericParams] {
        &self.numeric
    }

    #[must_use]
    pub fn vocabularies(&self) -> &[CategoryVocabulary] {
        &self.categorical
    }

    /// Apply the learned transform to a batch.
    ///
    /// # Errors
    /// Returns `SchemaMismatch` if the batch's declared columns differ from the
    /// fit-time schema.
    pub fn transform(&self, frame: &Frame) -> crate::Result<FeatureMatrix> {
        if !self.schema.same_columns(frame.schema()) {
            return Err(InsightError::SchemaMismatch(format!(
                "fitted on [{}], got [{}]",
                self.schema.names().join(", "),
                frame.schema().names().join(", ")
            )));
        }

        let mut rows = vec![Vec::with_capacity(self.n_features()); frame.n_rows()];

        for params in &self.numeric {
            let Some(ColumnData::Numeric(values)) = frame.column(&params.column) else {
                return Err(column_type_error(&params.column));
            };
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(params.apply(*value));
            }
        }

        for vocab in &self.categorical {
            let Some(ColumnData::Categorical(values)) = frame.column(&vocab.column) else {
                return Err(column_type_error(&vocab.column));
            };
            let mut unseen = 0usize;
            for (row, value) in rows.iter_mut().zip(values) {
                let start = row.len();
                row.resize(start + vocab.len(), 0.0);
                match vocab.position(value.as_deref()) {
                    Some(idx) => row[start + idx] = 1.0,
                    None => unseen += 1,
                }
            }
            if unseen > 0 {
                tracing::debug!(
                    "Column '{}': {unseen} values outside the fitted vocabulary encoded as zeros",
                    vocab.column
                );
            }
        }

        FeatureMatrix::new(self.feature_names.clone(), rows)
    }
}

fn column_type_error(column: &str) -> InsightError {
    InsightError::SchemaMismatch(format!("column '{column}' missing or of the wrong kind"))
}

/// Builds [`FittedPreprocessor`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor;

impl Preprocessor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Learn imputation, scaling and vocabularies from a training batch.
    ///
    /// # Errors
    /// Returns `EmptyInput` if the batch has no rows, or `Statistics` if a
    /// numeric column's mean or spread overflows.
    pub fn fit(&self, frame: &Frame) -> crate::Result<FittedPreprocessor> {
        if frame.n_rows() == 0 {
            return Err(InsightError::EmptyInput(
                "cannot fit preprocessor on zero rows".to_string(),
            ));
        }

        let mut numeric = Vec::new();
        let mut categorical = Vec::new();
        for (spec, data) in frame.iter() {
            match (spec.kind, data) {
                (ColumnKind::Numeric, ColumnData::Numeric(values)) => {
                    numeric.push(NumericParams::fit(&spec.name, values)?);
                }
                (ColumnKind::Categorical, ColumnData::Categorical(values)) => {
                    categorical.push(CategoryVocabulary::fit(&spec.name, values));
                }
                _ => return Err(column_type_error(&spec.name)),
            }
        }

        let feature_names = numeric
            .iter()
            .map(|p| p.column.clone())
            .chain(categorical.iter().flat_map(|v| {
                v.categories
                    .iter()
                    .map(move |c| format!("{}_{}", v.column, c))
            }))
            .collect::<Vec<_>>();

        tracing::info!(
            "Fitted preprocessor: {} numeric, {} categorical columns -> {} features over {} rows",
            numeric.len(),
            categorical.len(),
            feature_names.len(),
            frame.n_rows()
        );

        Ok(FittedPreprocessor {
            schema: frame.schema().clone(),
            numeric,
            categorical,
            feature_names,
        })
    }

    /// Apply a fitted transform. Equivalent to [`FittedPreprocessor::transform`].
    ///
    /// # Errors
    /// Returns `SchemaMismatch` if the batch's columns differ from the fit-time schema.
    pub fn transform(&self, frame: &Frame, fitted: &FittedPreprocessor) -> crate::Result<FeatureMatrix> {
        fitted.transform(frame)
    }

    /// Fit on a batch and transform that same batch.
    ///
    /// # Errors
    /// Returns `EmptyInput` if the batch has no rows.
    pub fn fit_transform(&self, frame: &Frame) -> crate::Result<(FittedPreprocessor, FeatureMatrix)> {
        let fitted = self.fit(frame)?;
        let matrix = fitted.transform(frame)?;
        Ok((fitted, matrix))
    }
}
