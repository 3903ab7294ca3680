use std::io::Write;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table as ComfyTable};
use hspdash_core::render::DashboardRenderer;
use hspdash_core::{Block, ChartSpec, Dashboard, RenderError, Table};

/// Draws a dashboard as plain text: headings, wrapped paragraphs and box tables.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) -> Result<(), RenderError> {
        writeln!(self.out, "{text}").map_err(|source| RenderError::Io {
            target: "terminal".to_string(),
            source,
        })
    }
}

impl<W: Write> DashboardRenderer for TerminalRenderer<W> {
    fn render(&mut self, page: &Dashboard) -> Result<(), RenderError> {
        self.emit(&format!("# {}", page.title))?;
        for block in &page.blocks {
            self.emit("")?;
            match block {
                Block::Header { text } => self.emit(&format!("## {text}"))?,
                Block::Markdown { text } => {
                    for paragraph in paragraphs(text) {
                        self.emit(&paragraph)?;
                    }
                }
                Block::Table { table } => self.emit(&comfy(table).to_string())?,
                Block::Chart { chart } => {
                    self.emit(&format!("[chart] {}", chart.title()))?;
                    self.emit(&comfy(&chart_table(chart)).to_string())?;
                }
            }
        }
        Ok(())
    }
}

pub fn comfy(table: &Table) -> ComfyTable {
    let mut rendered = ComfyTable::new();
    rendered
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(table.header.clone());
    for row in &table.rows {
        rendered.add_row(row.clone());
    }
    rendered
}

/// Chart data laid out as rows, one per x value.
pub fn chart_table(chart: &ChartSpec) -> Table {
    let cell = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    match chart {
        ChartSpec::Bar(bar) => Table::new(
            vec![bar.x_label.clone(), bar.y_label.clone()],
            bar.categories
                .iter()
                .zip(bar.values.iter())
                .map(|(category, value)| vec![category.clone(), cell(*value)])
                .collect(),
        ),
        ChartSpec::Line(line) => {
            let mut header = vec![line.x_label.clone()];
            header.extend(line.series.iter().map(|series| series.name.clone()));
            let rows = line
                .x
                .iter()
                .enumerate()
                .map(|(idx, x)| {
                    let mut row = vec![x.clone()];
                    row.extend(
                        line.series
                            .iter()
                            .map(|series| cell(series.y.get(idx).copied().flatten())),
                    );
                    row
                })
                .collect();
            Table::new(header, rows)
        }
    }
}

fn paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(|chunk| chunk.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|paragraph| !paragraph.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hspdash_core::charts::{BarChart, LineChart, LineSeries};

    #[test]
    fn renders_headers_paragraphs_and_tables() {
        let mut page = Dashboard::new("Study");
        page.header("Results")
            .markdown("one\ntwo\n\nthree")
            .table(Table::new(
                vec!["a".to_string(), "b".to_string()],
                vec![vec!["1".to_string(), "2".to_string()]],
            ));

        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&page).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(text.starts_with("# Study\n"));
        assert!(text.contains("## Results"));
        assert!(text.contains("one two\nthree"));
        assert!(text.contains('│'));
    }

    #[test]
    fn bar_chart_becomes_two_column_table() {
        let chart = ChartSpec::Bar(BarChart {
            title: "fc".to_string(),
            x_label: "Samples".to_string(),
            y_label: "Expression change".to_string(),
            categories: vec!["S1".to_string(), "S2".to_string()],
            values: vec![Some(1.6), None],
        });
        let table = chart_table(&chart);
        assert_eq!(table.header, vec!["Samples", "Expression change"]);
        assert_eq!(table.rows[0], vec!["S1", "1.6"]);
        assert_eq!(table.rows[1], vec!["S2", ""]);
    }

    #[test]
    fn line_chart_has_column_per_series() {
        let chart = ChartSpec::Line(LineChart {
            title: "expr".to_string(),
            x_label: "Subject ID".to_string(),
            y_label: "HSP90 Expression".to_string(),
            x: vec!["S1".to_string()],
            series: vec![
                LineSeries {
                    name: "day0".to_string(),
                    color: "blue".to_string(),
                    y: vec![Some(10.0)],
                },
                LineSeries {
                    name: "day2".to_string(),
                    color: "green".to_string(),
                    y: vec![Some(16.0)],
                },
            ],
        });
        let table = chart_table(&chart);
        assert_eq!(table.header, vec!["Subject ID", "day0", "day2"]);
        assert_eq!(table.rows, vec![vec!["S1", "10", "16"]]);
    }
}
