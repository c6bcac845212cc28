//! CSV adapter: Implementation of DatasetSource.
//!
//! One row per patient, columns in the order the frame layer expects, with
//! outcome labels and provenance at the end:
//!
//! ```text
//! age,gender,phq9_score,gad7_score,bp_systolic,heart_rate,bmi,education,employment,high_risk,time_to_event,event_occurred,data_source,generation_date
//! ```
//!
//! Empty fields read back as missing values.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{LabeledRecord, Outcome, PatientRecord};
use crate::ports::DatasetSource;

/// Error type for dataset operations.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset: {0}")]
    Invalid(String),
}

impl From<std::convert::Infallible> for DatasetError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Where a dataset came from, written alongside every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub data_source: String,
    pub generation_date: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    age: Option<i64>,
    gender: Option<String>,
    phq9_score: Option<i64>,
    gad7_score: Option<i64>,
    bp_systolic: Option<f64>,
    heart_rate: Option<f64>,
    bmi: Option<f64>,
    education: Option<String>,
    employment: Option<String>,
    high_risk: u8,
    time_to_event: f64,
    event_occurred: u8,
    #[serde(default)]
    data_source: Option<String>,
    #[serde(default)]
    generation_date: Option<String>,
}

impl CsvRow {
    fn from_labeled(labeled: &LabeledRecord, provenance: Option<&Provenance>) -> Self {
        let r = &labeled.record;
        Self {
            age: r.age,
            gender: r.gender.clone(),
            phq9_score: r.phq9_score,
            gad7_score: r.gad7_score,
            bp_systolic: r.bp_systolic,
            heart_rate: r.heart_rate,
            bmi: r.bmi,
            education: r.education.clone(),
            employment: r.employment.clone(),
            high_risk: labeled.outcome.high_risk,
            time_to_event: labeled.outcome.time_to_event,
            event_occurred: labeled.outcome.event_occurred,
            data_source: provenance.map(|p| p.data_source.clone()),
            generation_date: provenance.map(|p| p.generation_date.clone()),
        }
    }

    fn into_labeled(self, line: u64) -> Result<LabeledRecord, DatasetError> {
        if self.high_risk > 1 || self.event_occurred > 1 {
            return Err(DatasetError::Invalid(format!(
                "row {line}: outcome labels must be 0 or 1"
            )));
        }
        Ok(LabeledRecord {
            record: PatientRecord {
                age: self.age,
                gender: self.gender,
                phq9_score: self.phq9_score,
                gad7_score: self.gad7_score,
                employment: self.employment,
                education: self.education,
                bp_systolic: self.bp_systolic,
                heart_rate: self.heart_rate,
                bmi: self.bmi,
                ..Default::default()
            },
            outcome: Outcome {
                high_risk: self.high_risk,
                time_to_event: self.time_to_event,
                event_occurred: self.event_occurred,
            },
        })
    }
}

/// A labeled dataset stored as a CSV file.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    path: PathBuf,
}

impl CsvDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse labeled records from any reader.
    ///
    /// # Errors
    /// Returns error on malformed rows or out-of-range labels.
    pub fn read_from<R: Read>(reader: R) -> Result<Vec<LabeledRecord>, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (idx, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
            let row = row?;
            records.push(row.into_labeled(idx as u64 + 1)?);
        }
        Ok(records)
    }

    /// Write labeled records to any writer.
    ///
    /// # Errors
    /// Returns error if serialization or the underlying write fails.
    pub fn write_to<W: Write>(
        writer: W,
        records: &[LabeledRecord],
        provenance: Option<&Provenance>,
    ) -> Result<(), DatasetError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for labeled in records {
            csv_writer.serialize(CsvRow::from_labeled(labeled, provenance))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write records to this dataset's path, creating parent directories.
    ///
    /// # Errors
    /// Returns error if the file cannot be created or written.
    pub fn write_records(
        &self,
        records: &[LabeledRecord],
        provenance: Option<&Provenance>,
    ) -> Result<(), DatasetError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(&self.path)?;
        Self::write_to(BufWriter::new(file), records, provenance)?;
        tracing::info!("Wrote {} records to {:?}", records.len(), self.path);
        Ok(())
    }
}

impl DatasetSource for CsvDataset {
    type Error = DatasetError;

    fn load(&self) -> Result<Vec<LabeledRecord>, Self::Error> {
        let file = File::open(&self.path)?;
        let records = Self::read_from(BufReader::new(file))?;
        tracing::info!("Loaded {} records from {:?}", records.len(), self.path);
        Ok(records)
    }
}
