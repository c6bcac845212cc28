//! Declared-schema column frames and dense feature matrices.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::InsightError;

/// Semantic type of a column, declared by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// Ordered column declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_numeric(mut self, name: impl Into<String>) -> Self {
        self.columns.push(ColumnSpec {
            name: name.into(),
            kind: ColumnKind::Numeric,
        });
        self
    }

    #[must_use]
    pub fn with_categorical(mut self, name: impl Into<String>) -> Self {
        self.columns.push(ColumnSpec {
            name: name.into(),
            kind: ColumnKind::Categorical,
        });
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    /// True when both schemas declare the same set of columns with the same
    /// kinds, regardless of order.
    #[must_use]
    pub fn same_columns(&self, other: &Self) -> bool {
        let (ours, theirs) = (self.column_set(), other.column_set());
        ours.len() == self.len() && theirs.len() == other.len() && ours == theirs
    }

    fn column_set(&self) -> HashSet<(&str, ColumnKind)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.kind))
            .collect()
    }

    /// First column name declared more than once, if any.
    #[must_use]
    pub fn duplicate_name(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.columns
            .iter()
            .map(|c| c.name.as_str())
            .find(|name| !seen.insert(*name))
    }
}

/// Values of one column; `None` marks a missing entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Categorical(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Categorical(_) => ColumnKind::Categorical,
        }
    }
}

/// A batch of rows stored column-wise under a declared schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    schema: Schema,
    columns: Vec<ColumnData>,
    n_rows: usize,
}

impl Frame {
    /// Build a frame, checking the columns against the schema.
    ///
    /// # Errors
    /// Returns `SchemaMismatch` if a column name is declared twice or the
    /// column count or a column kind disagrees with the schema, and
    /// `DimensionMismatch` if column lengths differ.
    pub fn new(schema: Schema, columns: Vec<ColumnData>) -> crate::Result<Self> {
        if let Some(name) = schema.duplicate_name() {
            return Err(InsightError::SchemaMismatch(format!(
                "column '{name}' declared more than once"
            )));
        }
        if schema.len() != columns.len() {
            return Err(InsightError::SchemaMismatch(format!(
                "schema declares {} columns, got {}",
                schema.len(),
                columns.len()
            )));
        }
        for (spec, data) in schema.columns().iter().zip(&columns) {
            if spec.kind != data.kind() {
                return Err(InsightError::SchemaMismatch(format!(
                    "column '{}' declared {:?} but holds {:?} data",
                    spec.name,
                    spec.kind,
                    data.kind()
                )));
            }
        }

        let n_rows = columns.first().map_or(0, ColumnData::len);
        if let Some((spec, data)) = schema
            .columns()
            .iter()
            .zip(&columns)
            .find(|(_, d)| d.len() != n_rows)
        {
            return Err(InsightError::DimensionMismatch(format!(
                "column '{}' has {} rows, expected {}",
                spec.name,
                data.len(),
                n_rows
            )));
        }

        Ok(Self {
            schema,
            columns,
            n_rows,
        })
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.schema
            .columns()
            .iter()
            .position(|c| c.name == name)
            .map(|idx| &self.columns[idx])
    }

    /// Iterate (declaration, data) pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnSpec, &ColumnData)> {
        self.schema.columns().iter().zip(&self.columns)
    }
}

/// Dense row-major numeric matrix with named columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    feature_names: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Build a matrix.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if any row's width differs from the name count.
    pub fn new(feature_names: Vec<String>, rows: Vec<Vec<f64>>) -> crate::Result<Self> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != feature_names.len())
        {
            return Err(InsightError::DimensionMismatch(format!(
                "row {idx} has {} values, expected {}",
                row.len(),
                feature_names.len()
            )));
        }
        Ok(Self {
            feature_names,
            rows,
        })
    }

    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = f64> + Clone + '_ {
        self.rows.iter().map(move |r| r[idx])
    }
}
