use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// RowError – why a candidate row was rejected
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("field '{0}' is empty")]
    EmptyField(&'static str),
    #[error("field '{field}' is not a number: '{text}'")]
    NotANumber { field: &'static str, text: String },
    #[error("field '{field}' is not a finite number: {value}")]
    NonFinite { field: &'static str, value: f64 },
}

// ---------------------------------------------------------------------------
// ExperimentRow – one flat result record
// ---------------------------------------------------------------------------

/// A single experiment result: one model evaluated on one dataset at one
/// prediction length.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentRow {
    pub model: String,
    pub dataset: String,
    pub output_len: f64,
    pub mse: f64,
    pub mae: f64,
}

impl ExperimentRow {
    /// Validate and build a row. String fields are trimmed first.
    pub fn new(
        model: &str,
        dataset: &str,
        output_len: f64,
        mse: f64,
        mae: f64,
    ) -> Result<Self, RowError> {
        let model = model.trim();
        let dataset = dataset.trim();
        if model.is_empty() {
            return Err(RowError::EmptyField("model"));
        }
        if dataset.is_empty() {
            return Err(RowError::EmptyField("dataset"));
        }
        for (field, value) in [("output_len", output_len), ("mse", mse), ("mae", mae)] {
            if !value.is_finite() {
                return Err(RowError::NonFinite { field, value });
            }
        }
        Ok(ExperimentRow {
            model: model.to_string(),
            dataset: dataset.to_string(),
            output_len,
            mse,
            mae,
        })
    }
}

// ---------------------------------------------------------------------------
// Pivot building blocks
// ---------------------------------------------------------------------------

/// The (mse, mae) pair shown under one model's column group.
/// `None` marks an absent cell, which is never the same thing as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricPair {
    pub mse: Option<f64>,
    pub mae: Option<f64>,
}

impl MetricPair {
    pub fn from_row(row: &ExperimentRow) -> Self {
        MetricPair {
            mse: Some(row.mse),
            mae: Some(row.mae),
        }
    }
}

/// Row key of a pivot record: a concrete output length or the per-dataset
/// average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputLen {
    Len(f64),
    Avg,
}

impl fmt::Display for OutputLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputLen::Len(v) => write!(f, "{v}"),
            OutputLen::Avg => write!(f, "avg"),
        }
    }
}

/// One body row of the pivot table.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRecord {
    pub dataset: String,
    pub output_len: OutputLen,
    /// Every model of the pivot has an entry, possibly with absent values.
    pub metrics: BTreeMap<String, MetricPair>,
}

impl PivotRecord {
    /// Metrics for `model`, absent if the model is unknown to this record.
    pub fn metric(&self, model: &str) -> MetricPair {
        self.metrics.get(model).copied().unwrap_or_default()
    }
}

/// Result of pivoting flat rows into a dataset × output_len × model matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotResult {
    /// Sorted, deduplicated model names.
    pub models: Vec<String>,
    /// Sorted, deduplicated dataset names.
    pub datasets: Vec<String>,
    /// Strictly ascending output lengths per dataset.
    pub output_lens_by_dataset: BTreeMap<String, Vec<f64>>,
    /// Detail records per dataset, each block closed by its `avg` record.
    pub records: Vec<PivotRecord>,
}

impl PivotResult {
    /// Records belonging to `dataset`, in emission order (details, then avg).
    pub fn records_for<'a>(&'a self, dataset: &'a str) -> impl Iterator<Item = &'a PivotRecord> {
        self.records.iter().filter(move |r| r.dataset == dataset)
    }
}
