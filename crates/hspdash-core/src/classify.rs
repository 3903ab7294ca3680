use std::collections::BTreeMap;
use std::fmt;

use hspdash_parser::RowSet;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ComputationError, ConfigError};
use crate::reshape::fold_change_series;
use crate::table::Table;

/// Cut-offs for fold-change categories. Both bounds are exclusive.
///
/// The defaults are the values quoted in the study write-up (>1.6 up, <0.6 down); confirm them
/// against the study methodology before relying on the counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldChangeThresholds {
    pub upregulated_above: f64,
    pub downregulated_below: f64,
}

impl Default for FoldChangeThresholds {
    fn default() -> Self {
        Self {
            upregulated_above: 1.6,
            downregulated_below: 0.6,
        }
    }
}

impl FoldChangeThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.downregulated_below.is_nan() || self.downregulated_below <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "downregulated_below must be positive, got {}",
                self.downregulated_below
            )));
        }
        if self.upregulated_above.is_nan() || self.downregulated_below >= self.upregulated_above {
            return Err(ConfigError::Invalid(format!(
                "downregulated_below ({}) must be below upregulated_above ({})",
                self.downregulated_below, self.upregulated_above
            )));
        }
        Ok(())
    }

    pub fn classify(&self, fold_change: Option<f64>) -> FoldChangeClass {
        match fold_change {
            None => FoldChangeClass::Missing,
            Some(value) if value > self.upregulated_above => FoldChangeClass::Upregulated,
            Some(value) if value < self.downregulated_below => FoldChangeClass::Downregulated,
            Some(_) => FoldChangeClass::Unchanged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldChangeClass {
    Upregulated,
    Unchanged,
    Downregulated,
    Missing,
}

impl FoldChangeClass {
    pub const ALL: [FoldChangeClass; 4] = [
        FoldChangeClass::Upregulated,
        FoldChangeClass::Unchanged,
        FoldChangeClass::Downregulated,
        FoldChangeClass::Missing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoldChangeClass::Upregulated => "upregulated",
            FoldChangeClass::Unchanged => "unchanged",
            FoldChangeClass::Downregulated => "downregulated",
            FoldChangeClass::Missing => "missing",
        }
    }
}

impl fmt::Display for FoldChangeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassCount {
    pub class: FoldChangeClass,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectClass {
    pub subject_id: String,
    pub fold_change: Option<f64>,
    pub class: FoldChangeClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationSummary {
    pub thresholds: FoldChangeThresholds,
    pub total: usize,
    pub counts: Vec<ClassCount>,
    /// Upregulated subjects bucketed by fold-change rounded to the nearest integer.
    pub fold_multiples: BTreeMap<u32, usize>,
    pub subjects: Vec<SubjectClass>,
}

impl ClassificationSummary {
    pub fn count(&self, class: FoldChangeClass) -> usize {
        self.counts
            .iter()
            .find(|entry| entry.class == class)
            .map_or(0, |entry| entry.count)
    }

    pub fn to_table(&self) -> Table {
        let header = vec![
            "category".to_string(),
            "subjects".to_string(),
            "percent".to_string(),
        ];
        let mut rows: Vec<Vec<String>> = self
            .counts
            .iter()
            .map(|entry| {
                vec![
                    entry.class.to_string(),
                    entry.count.to_string(),
                    format!("{:.1}%", entry.percent),
                ]
            })
            .collect();

        let upregulated = self.count(FoldChangeClass::Upregulated);
        for (multiple, count) in &self.fold_multiples {
            let percent = percent_of(*count, upregulated);
            rows.push(vec![
                format!("{multiple}-fold increase"),
                count.to_string(),
                format!("{percent:.1}%"),
            ]);
        }

        Table::new(header, rows)
    }
}

pub fn classify_fold_changes(
    rows: &RowSet,
    thresholds: &FoldChangeThresholds,
) -> Result<ClassificationSummary, ComputationError> {
    let series = fold_change_series(rows)?;
    let total = series.len();

    let mut tallies: BTreeMap<FoldChangeClass, usize> = BTreeMap::new();
    let mut fold_multiples: BTreeMap<u32, usize> = BTreeMap::new();
    let mut subjects = Vec::with_capacity(total);

    for point in series {
        let class = thresholds.classify(point.fold_change);
        *tallies.entry(class).or_default() += 1;
        if let (FoldChangeClass::Upregulated, Some(value)) = (class, point.fold_change) {
            *fold_multiples.entry(value.round() as u32).or_default() += 1;
        }
        subjects.push(SubjectClass {
            subject_id: point.subject_id,
            fold_change: point.fold_change,
            class,
        });
    }

    let counts = FoldChangeClass::ALL
        .iter()
        .map(|class| {
            let count = tallies.get(class).copied().unwrap_or(0);
            ClassCount {
                class: *class,
                count,
                percent: percent_of(count, total),
            }
        })
        .collect();

    info!(
        total,
        upregulated = tallies.get(&FoldChangeClass::Upregulated).copied().unwrap_or(0),
        downregulated = tallies.get(&FoldChangeClass::Downregulated).copied().unwrap_or(0),
        "classified fold changes"
    );

    Ok(ClassificationSummary {
        thresholds: *thresholds,
        total,
        counts,
        fold_multiples,
        subjects,
    })
}

fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}
