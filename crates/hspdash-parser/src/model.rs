use std::collections::HashMap;
use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::DataLoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    SubjectId,
    BaselineExpression,
    TreatmentExpression,
    FoldChange,
}

impl ColumnRole {
    pub const REQUIRED: [ColumnRole; 4] = [
        ColumnRole::SubjectId,
        ColumnRole::BaselineExpression,
        ColumnRole::TreatmentExpression,
        ColumnRole::FoldChange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::SubjectId => "subject id",
            ColumnRole::BaselineExpression => "baseline expression",
            ColumnRole::TreatmentExpression => "treatment expression",
            ColumnRole::FoldChange => "fold-change",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which physical column plays each required role. Names match case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub subject_id: String,
    pub baseline_expression: String,
    pub treatment_expression: String,
    pub fold_change: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            subject_id: "subjid".to_string(),
            baseline_expression: "expression_malaria".to_string(),
            treatment_expression: "expression_treatment".to_string(),
            fold_change: "fold_change".to_string(),
        }
    }
}

impl ColumnMapping {
    pub fn column_for(&self, role: ColumnRole) -> &str {
        match role {
            ColumnRole::SubjectId => &self.subject_id,
            ColumnRole::BaselineExpression => &self.baseline_expression,
            ColumnRole::TreatmentExpression => &self.treatment_expression,
            ColumnRole::FoldChange => &self.fold_change,
        }
    }

    fn set(&mut self, role: ColumnRole, name: String) {
        match role {
            ColumnRole::SubjectId => self.subject_id = name,
            ColumnRole::BaselineExpression => self.baseline_expression = name,
            ColumnRole::TreatmentExpression => self.treatment_expression = name,
            ColumnRole::FoldChange => self.fold_change = name,
        }
    }

    /// Rewrites each configured name to the exact header text found in `df`.
    fn resolve(&self, df: &DataFrame) -> Result<ColumnMapping, DataLoadError> {
        let available: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut resolved = self.clone();
        let mut claimed: Vec<(&str, ColumnRole)> = Vec::with_capacity(ColumnRole::REQUIRED.len());
        for role in ColumnRole::REQUIRED {
            let wanted = self.column_for(role).trim();
            let found = available
                .iter()
                .find(|name| name.trim().eq_ignore_ascii_case(wanted))
                .ok_or_else(|| DataLoadError::MissingColumn {
                    role: role.as_str(),
                    column: wanted.to_string(),
                    available: available.clone(),
                })?;
            if let Some((_, first)) = claimed.iter().find(|(name, _)| *name == found.as_str()) {
                return Err(DataLoadError::SharedColumn {
                    column: found.clone(),
                    first: first.as_str(),
                    second: role.as_str(),
                });
            }
            claimed.push((found.as_str(), role));
            resolved.set(role, found.clone());
        }
        Ok(resolved)
    }
}

/// A single table cell, typed the way the column was inferred.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str(""),
            CellValue::Int(value) => write!(f, "{value}"),
            CellValue::Float(value) => write!(f, "{value:?}"),
            CellValue::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub subject_id: String,
    pub baseline_expression: Option<f64>,
    pub treatment_expression: Option<f64>,
    pub fold_change: Option<f64>,
    pub covariates: Vec<(String, CellValue)>,
}

/// Immutable, validated set of per-subject rows.
///
/// The subject id column is always `String`; the three measurement columns are always
/// `Float64`. Every other column is carried through with its inferred type.
#[derive(Debug, Clone)]
pub struct RowSet {
    df: DataFrame,
    mapping: ColumnMapping,
}

impl RowSet {
    pub fn new(df: DataFrame, mapping: &ColumnMapping) -> Result<Self, DataLoadError> {
        let mapping = mapping.resolve(&df)?;
        let mut df = df;

        let subject = df.column(&mapping.subject_id)?;
        if subject.dtype() != &DataType::String {
            let cast = subject.cast(&DataType::String)?;
            df.with_column(cast)?;
        }
        validate_subject_ids(&df, &mapping.subject_id)?;

        for column in [
            &mapping.baseline_expression,
            &mapping.treatment_expression,
            &mapping.fold_change,
        ] {
            let cast = numeric_column(&df, column)?;
            df.with_column(cast)?;
        }

        let rows = Self { df, mapping };
        rows.validate_fold_change()?;
        Ok(rows)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Numeric columns in frame order. The subject id is a key and never listed.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|column| column.name().as_str() != self.mapping.subject_id)
            .filter(|column| is_numeric_dtype(column.dtype()))
            .map(|column| column.name().to_string())
            .collect()
    }

    pub fn subject_ids(&self) -> Result<Vec<String>, PolarsError> {
        let ids = self.df.column(&self.mapping.subject_id)?.str()?;
        Ok(ids
            .into_iter()
            .map(|value| value.unwrap_or_default().to_string())
            .collect())
    }

    pub fn numeric_values(&self, column: &str) -> Result<Vec<Option<f64>>, PolarsError> {
        let cast = self.df.column(column)?.cast(&DataType::Float64)?;
        Ok(cast.f64()?.into_iter().collect())
    }

    pub fn baseline_expression(&self) -> Result<Vec<Option<f64>>, PolarsError> {
        self.numeric_values(&self.mapping.baseline_expression)
    }

    pub fn treatment_expression(&self) -> Result<Vec<Option<f64>>, PolarsError> {
        self.numeric_values(&self.mapping.treatment_expression)
    }

    pub fn fold_change(&self) -> Result<Vec<Option<f64>>, PolarsError> {
        self.numeric_values(&self.mapping.fold_change)
    }

    pub fn cell_values(&self, column: &str) -> Result<Vec<CellValue>, PolarsError> {
        let column = self.df.column(column)?;
        let values = match column.dtype() {
            DataType::String => column
                .str()?
                .into_iter()
                .map(|value| value.map_or(CellValue::Null, |v| CellValue::Text(v.to_string())))
                .collect(),
            DataType::Float32 | DataType::Float64 => column
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .map(|value| value.map_or(CellValue::Null, CellValue::Float))
                .collect(),
            dtype if is_numeric_dtype(dtype) => column
                .cast(&DataType::Int64)?
                .i64()?
                .into_iter()
                .map(|value| value.map_or(CellValue::Null, CellValue::Int))
                .collect(),
            _ => column
                .cast(&DataType::String)?
                .str()?
                .into_iter()
                .map(|value| value.map_or(CellValue::Null, |v| CellValue::Text(v.to_string())))
                .collect(),
        };
        Ok(values)
    }

    /// Typed per-row view; covariates keep their frame order.
    pub fn samples(&self) -> Result<Vec<SampleRow>, PolarsError> {
        let ids = self.subject_ids()?;
        let baseline = self.baseline_expression()?;
        let treatment = self.treatment_expression()?;
        let fold_change = self.fold_change()?;

        let covariate_names: Vec<String> = self
            .column_names()
            .into_iter()
            .filter(|name| !self.is_required(name))
            .collect();
        let mut covariate_columns = Vec::with_capacity(covariate_names.len());
        for name in &covariate_names {
            covariate_columns.push(self.cell_values(name)?);
        }

        let mut samples = Vec::with_capacity(ids.len());
        for (idx, subject_id) in ids.into_iter().enumerate() {
            let covariates = covariate_names
                .iter()
                .zip(covariate_columns.iter())
                .map(|(name, values)| (name.clone(), values[idx].clone()))
                .collect();
            samples.push(SampleRow {
                subject_id,
                baseline_expression: baseline[idx],
                treatment_expression: treatment[idx],
                fold_change: fold_change[idx],
                covariates,
            });
        }
        Ok(samples)
    }

    fn is_required(&self, name: &str) -> bool {
        ColumnRole::REQUIRED
            .iter()
            .any(|role| self.mapping.column_for(*role) == name)
    }

    fn validate_fold_change(&self) -> Result<(), DataLoadError> {
        let ids = self.subject_ids()?;
        for (subject_id, value) in ids.into_iter().zip(self.fold_change()?) {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(DataLoadError::NonPositiveFoldChange { subject_id, value });
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn validate_subject_ids(df: &DataFrame, column: &str) -> Result<(), DataLoadError> {
    let ids = df.column(column)?.str()?;
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(ids.len());
    for (idx, value) in ids.into_iter().enumerate() {
        let line_index = idx + 1;
        let id = match value.map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => return Err(DataLoadError::MissingSubjectId { line_index }),
        };
        if let Some(first) = seen.insert(id, line_index) {
            return Err(DataLoadError::DuplicateSubjectId {
                subject_id: id.to_string(),
                first,
                second: line_index,
            });
        }
    }
    Ok(())
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<Column, DataLoadError> {
    let column = df.column(name)?;
    let dtype = column.dtype();

    if is_numeric_dtype(dtype) {
        return Ok(column.cast(&DataType::Float64)?);
    }

    if dtype == &DataType::String {
        let mut values = Vec::with_capacity(column.len());
        for (idx, value) in column.str()?.into_iter().enumerate() {
            let parsed = match value.map(str::trim) {
                None => None,
                Some(text) if crate::loader::is_null_token(text) => None,
                Some(text) => Some(text.parse::<f64>().map_err(|_| DataLoadError::NonNumeric {
                    column: name.to_string(),
                    line_index: idx + 1,
                    value: text.to_string(),
                })?),
            };
            values.push(parsed);
        }
        return Ok(Series::new(name.into(), values).into());
    }

    Err(DataLoadError::NonNumeric {
        column: name.to_string(),
        line_index: 0,
        value: format!("column of type {dtype}"),
    })
}
