use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use polars::prelude::*;
use tracing::{debug, info};

use crate::errors::DataLoadError;
use crate::model::{ColumnMapping, RowSet};

const NULL_TOKENS: [&str; 6] = ["NA", "N/A", "NaN", "nan", "null", "NULL"];

pub(crate) fn is_null_token(value: &str) -> bool {
    value.is_empty() || NULL_TOKENS.contains(&value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InferredKind {
    Int,
    Float,
    Text,
}

pub fn load_path(path: impl AsRef<Path>, mapping: &ColumnMapping) -> Result<RowSet, DataLoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let rows = load_reader(file, mapping)?;
    info!(
        path = %path.display(),
        rows = rows.height(),
        columns = rows.frame().width(),
        "loaded row set"
    );
    Ok(rows)
}

pub fn load_str(content: &str, mapping: &ColumnMapping) -> Result<RowSet, DataLoadError> {
    load_reader(content.as_bytes(), mapping)
}

pub fn load_reader<R: Read>(reader: R, mapping: &ColumnMapping) -> Result<RowSet, DataLoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(DataLoadError::MissingHeader);
    }

    let records: Vec<StringRecord> = reader.records().collect::<Result<_, _>>()?;
    debug!(
        header_columns = headers.len(),
        data_rows = records.len(),
        "read csv records"
    );

    let subject_header = mapping.subject_id.trim();
    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
    for (col_idx, name) in headers.iter().enumerate() {
        let raw: Vec<Option<&str>> = records
            .iter()
            .map(|record| record.get(col_idx).filter(|value| !is_null_token(value)))
            .collect();

        let kind = if name.eq_ignore_ascii_case(subject_header) {
            InferredKind::Text
        } else {
            infer_kind(&raw)
        };
        columns.push(build_column(name, kind, &raw));
    }

    let df = DataFrame::new(columns)?;
    RowSet::new(df, mapping)
}

fn infer_kind(values: &[Option<&str>]) -> InferredKind {
    let present = values.iter().flatten();
    if present.clone().all(|value| value.parse::<i64>().is_ok()) {
        if values.iter().any(Option::is_some) {
            return InferredKind::Int;
        }
        return InferredKind::Float;
    }
    if present.clone().all(|value| value.parse::<f64>().is_ok()) {
        return InferredKind::Float;
    }
    InferredKind::Text
}

fn build_column(name: &str, kind: InferredKind, values: &[Option<&str>]) -> Column {
    match kind {
        InferredKind::Int => {
            let parsed: Vec<Option<i64>> = values
                .iter()
                .map(|value| value.and_then(|v| v.parse().ok()))
                .collect();
            Series::new(name.into(), parsed).into()
        }
        InferredKind::Float => {
            let parsed: Vec<Option<f64>> = values
                .iter()
                .map(|value| value.and_then(|v| v.parse().ok()))
                .collect();
            Series::new(name.into(), parsed).into()
        }
        InferredKind::Text => Series::new(name.into(), values.to_vec()).into(),
    }
}
