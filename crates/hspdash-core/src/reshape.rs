use hspdash_parser::RowSet;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ComputationError;

/// Labels attached to the two sampling points when unpivoting expression values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayLabels {
    pub baseline: String,
    pub treatment: String,
}

impl Default for DayLabels {
    fn default() -> Self {
        Self {
            baseline: "day0".to_string(),
            treatment: "day2".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldChangePoint {
    pub subject_id: String,
    pub fold_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionRecord {
    pub subject_id: String,
    pub day: String,
    pub expression: Option<f64>,
}

pub fn fold_change_series(rows: &RowSet) -> Result<Vec<FoldChangePoint>, ComputationError> {
    let ids = rows.subject_ids()?;
    let fold_change = rows.fold_change()?;
    Ok(ids
        .into_iter()
        .zip(fold_change)
        .map(|(subject_id, fold_change)| FoldChangePoint {
            subject_id,
            fold_change,
        })
        .collect())
}

/// Two records per row, adjacent, baseline before treatment, in row order.
pub fn to_long_format(
    rows: &RowSet,
    labels: &DayLabels,
) -> Result<Vec<ExpressionRecord>, ComputationError> {
    let ids = rows.subject_ids()?;
    let baseline = rows.baseline_expression()?;
    let treatment = rows.treatment_expression()?;

    let mut records = Vec::with_capacity(ids.len() * 2);
    for ((subject_id, day0), day2) in ids.into_iter().zip(baseline).zip(treatment) {
        records.push(ExpressionRecord {
            subject_id: subject_id.clone(),
            day: labels.baseline.clone(),
            expression: day0,
        });
        records.push(ExpressionRecord {
            subject_id,
            day: labels.treatment.clone(),
            expression: day2,
        });
    }
    Ok(records)
}

/// The long-format records as a `subject_id`/`day`/`expression` frame.
pub fn long_format_frame(rows: &RowSet, labels: &DayLabels) -> Result<DataFrame, ComputationError> {
    let records = to_long_format(rows, labels)?;
    let subject_ids: Vec<&str> = records.iter().map(|r| r.subject_id.as_str()).collect();
    let days: Vec<&str> = records.iter().map(|r| r.day.as_str()).collect();
    let expression: Vec<Option<f64>> = records.iter().map(|r| r.expression).collect();

    let df = DataFrame::new(vec![
        Series::new("subject_id".into(), subject_ids).into(),
        Series::new("day".into(), days).into(),
        Series::new("expression".into(), expression).into(),
    ])?;
    Ok(df)
}
