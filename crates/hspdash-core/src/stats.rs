use hspdash_parser::RowSet;
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::ComputationError;
use crate::table::{format_number, Table};

pub const STATISTIC_NAMES: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Descriptive statistics for one numeric column. Statistics over no values are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    fn values(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub columns: Vec<ColumnSummary>,
}

impl SummaryStats {
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|summary| summary.column == column)
    }

    /// One row per statistic, one column per numeric variable.
    pub fn to_table(&self) -> Table {
        let mut header = vec![String::new()];
        header.extend(self.columns.iter().map(|summary| summary.column.clone()));

        let per_column: Vec<[Option<f64>; 8]> =
            self.columns.iter().map(ColumnSummary::values).collect();
        let rows = STATISTIC_NAMES
            .iter()
            .enumerate()
            .map(|(stat_idx, name)| {
                let mut row = vec![name.to_string()];
                row.extend(per_column.iter().map(|values| format_number(values[stat_idx])));
                row
            })
            .collect();

        Table::new(header, rows)
    }
}

pub fn summarize(rows: &RowSet) -> Result<SummaryStats, ComputationError> {
    if rows.is_empty() {
        return Err(ComputationError::EmptyRowSet);
    }

    let numeric = rows.numeric_columns();
    if numeric.is_empty() {
        return Err(ComputationError::NoNumericColumns);
    }

    let mut columns = Vec::with_capacity(numeric.len());
    for name in numeric {
        let cast = rows.frame().column(&name)?.cast(&DataType::Float64)?;
        let summary = summarize_column(&name, cast.f64()?);
        debug!(column = %name, count = summary.count, "summarized column");
        columns.push(summary);
    }

    Ok(SummaryStats { columns })
}

fn summarize_column(name: &str, values: &Float64Chunked) -> ColumnSummary {
    let count = values.len() - values.null_count();

    let mut sorted: Vec<f64> = values.into_iter().flatten().collect();
    sorted.sort_by(f64::total_cmp);

    ColumnSummary {
        column: name.to_string(),
        count,
        mean: values.mean(),
        std: if count > 1 { values.std(1) } else { None },
        min: values.min(),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: values.max(),
    }
}

/// Linear interpolation between the closest ranks of sorted, non-null values.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
