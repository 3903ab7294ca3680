use hspdash_parser::RowSet;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ComputationError;
use crate::table::{format_number, Table};

/// Square Pearson matrix over the row set's numeric columns, in frame order.
///
/// Entries are computed over pairwise-complete rows. Pairs with fewer than two complete rows
/// or zero variance are `NaN`. The diagonal is always `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let row = self.index_of(a)?;
        let col = self.index_of(b)?;
        Some(self.values[row][col])
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn to_table(&self) -> Table {
        let mut header = vec![String::new()];
        header.extend(self.columns.iter().cloned());

        let rows = self
            .columns
            .iter()
            .zip(self.values.iter())
            .map(|(name, values)| {
                let mut row = vec![name.clone()];
                row.extend(values.iter().map(|value| format_number(Some(*value))));
                row
            })
            .collect();

        Table::new(header, rows)
    }
}

pub fn correlate(rows: &RowSet) -> Result<CorrelationMatrix, ComputationError> {
    let columns = rows.numeric_columns();
    if columns.len() < 2 {
        return Err(ComputationError::InsufficientNumericColumns {
            found: columns.len(),
        });
    }

    let mut data = Vec::with_capacity(columns.len());
    for name in &columns {
        data.push(rows.numeric_values(name)?);
    }

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pairwise_pearson(&data[i], &data[j]).unwrap_or(f64::NAN);
            if r.is_nan() {
                warn!(
                    a = %columns[i],
                    b = %columns[j],
                    "correlation undefined for column pair"
                );
            }
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    debug!(columns = n, "computed correlation matrix");
    Ok(CorrelationMatrix { columns, values })
}

/// Pearson r over the rows where both values are present.
pub fn pairwise_pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if !a.is_nan() && !b.is_nan() => Some((*a, *b)),
            _ => None,
        })
        .unzip();
    pearson(&xs, &ys)
}

pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() < 2 || x.len() != y.len() {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut num, mut denom_x, mut denom_y) = (0.0, 0.0, 0.0);
    for (&xx, &yy) in x.iter().zip(y.iter()) {
        let dx = xx - mean_x;
        let dy = yy - mean_y;
        num += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }

    let denom = denom_x.sqrt() * denom_y.sqrt();
    if denom == 0.0 {
        return None;
    }

    Some((num / denom).clamp(-1.0, 1.0))
}
