use std::path::Path;

use hspdash_parser::{DataLoadError, RowSet};
use polars::prelude::DataFrame;

use crate::charts::{expression_line_chart, fold_change_bar_chart, ChartSpec};
use crate::classify::{classify_fold_changes, ClassificationSummary};
use crate::config::DashboardConfig;
use crate::correlation::{correlate, CorrelationMatrix};
use crate::dashboard::{build_dashboard, Dashboard};
use crate::error::ComputationError;
use crate::reshape::{
    fold_change_series, long_format_frame, to_long_format, ExpressionRecord, FoldChangePoint,
};
use crate::stats::{summarize, SummaryStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    FoldChange,
    Expression,
}

/// Load-once, derive-on-demand pipeline over a per-subject expression table.
///
/// Holds only configuration; every method is a pure function of the row set it is given.
#[derive(Debug, Clone, Default)]
pub struct TabularMetricsPipeline {
    config: DashboardConfig,
}

impl TabularMetricsPipeline {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn load(&self, source: impl AsRef<Path>) -> Result<RowSet, DataLoadError> {
        hspdash_parser::load_path(source, &self.config.columns)
    }

    pub fn load_str(&self, content: &str) -> Result<RowSet, DataLoadError> {
        hspdash_parser::load_str(content, &self.config.columns)
    }

    pub fn summarize(&self, rows: &RowSet) -> Result<SummaryStats, ComputationError> {
        summarize(rows)
    }

    pub fn correlate(&self, rows: &RowSet) -> Result<CorrelationMatrix, ComputationError> {
        correlate(rows)
    }

    pub fn fold_change_series(
        &self,
        rows: &RowSet,
    ) -> Result<Vec<FoldChangePoint>, ComputationError> {
        fold_change_series(rows)
    }

    pub fn to_long_format(&self, rows: &RowSet) -> Result<Vec<ExpressionRecord>, ComputationError> {
        to_long_format(rows, &self.config.labels)
    }

    pub fn long_format_frame(&self, rows: &RowSet) -> Result<DataFrame, ComputationError> {
        long_format_frame(rows, &self.config.labels)
    }

    pub fn classify(&self, rows: &RowSet) -> Result<ClassificationSummary, ComputationError> {
        classify_fold_changes(rows, &self.config.thresholds)
    }

    pub fn chart(&self, rows: &RowSet, kind: ChartKind) -> Result<ChartSpec, ComputationError> {
        let charts = &self.config.charts;
        Ok(match kind {
            ChartKind::FoldChange => {
                fold_change_bar_chart(&fold_change_series(rows)?, &charts.fold_change)
            }
            ChartKind::Expression => expression_line_chart(
                &self.to_long_format(rows)?,
                &self.config.labels,
                &charts.expression,
            ),
        })
    }

    pub fn dashboard(&self, rows: &RowSet) -> Result<Dashboard, ComputationError> {
        build_dashboard(rows, &self.config)
    }
}
