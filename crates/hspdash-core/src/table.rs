use hspdash_parser::RowSet;
use polars::prelude::PolarsError;
use serde::Serialize;

/// Display-ready table: every cell is already formatted text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    pub fn from_row_set(rows: &RowSet) -> Result<Self, PolarsError> {
        let header = rows.column_names();
        let mut columns = Vec::with_capacity(header.len());
        for name in &header {
            columns.push(rows.cell_values(name)?);
        }

        let body = (0..rows.height())
            .map(|idx| columns.iter().map(|column| column[idx].to_string()).collect())
            .collect();

        Ok(Self::new(header, body))
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// Six decimals, `NaN` kept visible, absent values left blank.
pub fn format_number(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.is_nan() => "NaN".to_string(),
        Some(v) => format!("{v:.6}"),
    }
}
