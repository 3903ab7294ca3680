use polars::prelude::PolarsError;
use thiserror::Error;

/// Failure to turn a tabular source into a validated row set. Always fatal for the run.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read source {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("source has no header row")]
    MissingHeader,

    #[error("required column '{column}' ({role}) not found; available: {available:?}")]
    MissingColumn {
        role: &'static str,
        column: String,
        available: Vec<String>,
    },

    #[error("column '{column}' is mapped to both the {first} and {second} roles")]
    SharedColumn {
        column: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("data row {line_index} has no subject identifier")]
    MissingSubjectId { line_index: usize },

    #[error("subject identifier '{subject_id}' appears more than once (data rows {first} and {second})")]
    DuplicateSubjectId {
        subject_id: String,
        first: usize,
        second: usize,
    },

    #[error("column '{column}' data row {line_index} is not numeric: '{value}'")]
    NonNumeric {
        column: String,
        line_index: usize,
        value: String,
    },

    #[error("fold-change for subject '{subject_id}' must be a positive finite number, got {value}")]
    NonPositiveFoldChange { subject_id: String, value: f64 },

    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}

impl From<csv::Error> for DataLoadError {
    fn from(source: csv::Error) -> Self {
        DataLoadError::Csv { source }
    }
}
