use std::fs;

use hspdash_core::render::{
    escape_html, render_chart_document, ChartExporter, DashboardRenderer, HtmlChartExporter,
    HtmlRenderer, PLOTLY_CDN,
};
use hspdash_core::{Block, ChartKind, ChartSpec, DashboardConfig, TabularMetricsPipeline};
use hspdash_parser::{ColumnMapping, RowSet};
use polars::prelude::*;
use serde_json::json;

fn rows() -> RowSet {
    let df = df!(
        "subjid" => &["S1", "S2"],
        "expression_malaria" => &[10.0f64, 5.0],
        "expression_treatment" => &[16.0f64, 4.0],
        "fold_change" => &[1.6f64, 0.8],
        "notes" => &["<b>bold</b>", "plain"],
    )
    .unwrap();
    RowSet::new(df, &ColumnMapping::default()).unwrap()
}

#[test]
fn bar_chart_carries_subjects_and_labels() {
    let pipeline = TabularMetricsPipeline::default();
    let chart = pipeline.chart(&rows(), ChartKind::FoldChange).unwrap();

    let ChartSpec::Bar(bar) = &chart else {
        panic!("expected bar chart");
    };
    assert_eq!(bar.categories, vec!["S1", "S2"]);
    assert_eq!(bar.values, vec![Some(1.6), Some(0.8)]);
    assert_eq!(bar.x_label, "Samples");
    assert_eq!(bar.y_label, "Expression change");
    assert_eq!(chart.traces(), json!([{ "type": "bar", "x": ["S1", "S2"], "y": [1.6, 0.8] }]));
}

#[test]
fn line_chart_has_one_coloured_series_per_day() {
    let pipeline = TabularMetricsPipeline::default();
    let chart = pipeline.chart(&rows(), ChartKind::Expression).unwrap();

    let ChartSpec::Line(line) = &chart else {
        panic!("expected line chart");
    };
    assert_eq!(line.x, vec!["S1", "S2"]);
    assert_eq!(line.series.len(), 2);
    assert_eq!(line.series[0].name, "day0");
    assert_eq!(line.series[0].color, "blue");
    assert_eq!(line.series[0].y, vec![Some(10.0), Some(5.0)]);
    assert_eq!(line.series[1].name, "day2");
    assert_eq!(line.series[1].color, "green");
    assert_eq!(line.series[1].y, vec![Some(16.0), Some(4.0)]);

    let traces = chart.traces();
    assert_eq!(traces[1]["line"]["color"], "green");
    assert_eq!(chart.layout()["yaxis"]["title"]["text"], "HSP90 Expression");
}

#[test]
fn chart_document_is_deterministic() {
    let pipeline = TabularMetricsPipeline::default();
    let chart = pipeline.chart(&rows(), ChartKind::FoldChange).unwrap();

    let first = render_chart_document(&chart, PLOTLY_CDN).unwrap();
    let second = render_chart_document(&chart, PLOTLY_CDN).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("Plotly.newPlot('chart-0',"));
    assert!(first.contains(r#""x":["S1","S2"]"#));
    assert!(first.contains("<title>HSP90 fold change btn day0 and day2</title>"));
}

#[test]
fn exporter_writes_standalone_file() {
    let pipeline = TabularMetricsPipeline::default();
    let chart = pipeline.chart(&rows(), ChartKind::Expression).unwrap();

    let dir = std::env::temp_dir().join(format!("hspdash-export-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let destination = dir.join("plot.html");

    let written = HtmlChartExporter::default()
        .export(&chart, &destination)
        .unwrap();
    assert_eq!(written, destination);

    let content = fs::read_to_string(&written).unwrap();
    assert_eq!(content, render_chart_document(&chart, PLOTLY_CDN).unwrap());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn html_renderer_escapes_text_and_embeds_every_chart() {
    let pipeline = TabularMetricsPipeline::new(DashboardConfig::default());
    let page = pipeline.dashboard(&rows()).unwrap();

    let mut renderer = HtmlRenderer::new(Vec::new());
    renderer.render(&page).unwrap();
    let html = String::from_utf8(renderer.into_inner()).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(!html.contains("<b>bold</b>"));
    assert!(html.contains("Plotly.newPlot('chart-0',"));
    assert!(html.contains("Plotly.newPlot('chart-1',"));
    assert!(html.contains("<h2>Correlation Matrix</h2>"));
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn markdown_blocks_become_paragraphs() {
    let mut page = hspdash_core::Dashboard::new("t");
    page.markdown("first line\ncontinues\n\nsecond & last");

    let mut renderer = HtmlRenderer::new(Vec::new()).with_plotly_src("plotly.js");
    renderer.render(&page).unwrap();
    let html = String::from_utf8(renderer.into_inner()).unwrap();

    assert!(html.contains("<p>first line continues</p>"));
    assert!(html.contains("<p>second &amp; last</p>"));
    assert!(html.contains("<script src=\"plotly.js\"></script>"));
    assert!(matches!(page.blocks[0], Block::Markdown { .. }));
}

#[test]
fn escape_html_covers_attribute_characters() {
    assert_eq!(escape_html(r#"a<"b">&'c'"#), "a&lt;&quot;b&quot;&gt;&amp;&#39;c&#39;");
}
