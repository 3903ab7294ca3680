use hspdash_parser::RowSet;
use serde::Serialize;
use tracing::debug;

use crate::charts::{expression_line_chart, fold_change_bar_chart, ChartSpec};
use crate::classify::classify_fold_changes;
use crate::config::{DashboardConfig, SectionSlot};
use crate::correlation::correlate;
use crate::error::ComputationError;
use crate::reshape::{fold_change_series, to_long_format};
use crate::stats::summarize;
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Header { text: String },
    Markdown { text: String },
    Table { table: Table },
    Chart { chart: ChartSpec },
}

/// Ordered page content. Drawing it is left entirely to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Dashboard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn header(&mut self, text: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Header { text: text.into() });
        self
    }

    pub fn markdown(&mut self, text: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Markdown { text: text.into() });
        self
    }

    pub fn table(&mut self, table: Table) -> &mut Self {
        self.blocks.push(Block::Table { table });
        self
    }

    pub fn chart(&mut self, chart: ChartSpec) -> &mut Self {
        self.blocks.push(Block::Chart { chart });
        self
    }

    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Chart { chart } => Some(chart),
            _ => None,
        })
    }

    fn narrative(&mut self, config: &DashboardConfig, slot: SectionSlot) -> &mut Self {
        if let Some(section) = config.section(slot) {
            self.header(section.heading.clone());
            if !section.body.trim().is_empty() {
                self.markdown(section.body.clone());
            }
        }
        self
    }
}

/// Assembles the study page: narrative, raw table, statistics, correlations and both charts.
pub fn build_dashboard(
    rows: &RowSet,
    config: &DashboardConfig,
) -> Result<Dashboard, ComputationError> {
    let summary = summarize(rows)?;
    let correlation = correlate(rows)?;
    let fold_changes = fold_change_series(rows)?;
    let long_format = to_long_format(rows, &config.labels)?;
    let classification = classify_fold_changes(rows, &config.thresholds)?;

    let mut page = Dashboard::new(config.title.clone());
    page.header(config.header.clone())
        .narrative(config, SectionSlot::Background)
        .header(config.data_heading.clone())
        .table(Table::from_row_set(rows)?)
        .narrative(config, SectionSlot::Methods)
        .header("Descriptive_statistics")
        .table(summary.to_table())
        .chart(fold_change_bar_chart(&fold_changes, &config.charts.fold_change))
        .narrative(config, SectionSlot::Results)
        .header("Fold-change categories")
        .markdown(format!(
            "Fold change above {} is counted as upregulated, below {} as downregulated.",
            config.thresholds.upregulated_above, config.thresholds.downregulated_below
        ))
        .table(classification.to_table())
        .header("Correlation Matrix")
        .table(correlation.to_table())
        .chart(expression_line_chart(
            &long_format,
            &config.labels,
            &config.charts.expression,
        ));

    debug!(blocks = page.blocks.len(), "assembled dashboard");
    Ok(page)
}
