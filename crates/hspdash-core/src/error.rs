use polars::prelude::PolarsError;
use thiserror::Error;

/// A derived view could not be computed from the row set.
#[derive(Debug, Error)]
pub enum ComputationError {
    #[error("row set is empty")]
    EmptyRowSet,
    #[error("row set has no numeric columns")]
    NoNumericColumns,
    #[error("correlation needs at least 2 numeric columns, found {found}")]
    InsufficientNumericColumns { found: usize },
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize chart: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to format output: {0}")]
    Format(#[from] std::fmt::Error),
    #[error(transparent)]
    Computation(#[from] ComputationError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
