use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::reshape::{DayLabels, ExpressionRecord, FoldChangePoint};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarChartConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            title: "HSP90 fold change btn day0 and day2".to_string(),
            x_label: "Samples".to_string(),
            y_label: "Expression change".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineChartConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub baseline_color: String,
    pub treatment_color: String,
}

impl Default for LineChartConfig {
    fn default() -> Self {
        Self {
            title: "HSP90 Expression Change between Day 0 and Day 2".to_string(),
            x_label: "Subject ID".to_string(),
            y_label: "HSP90 Expression".to_string(),
            baseline_color: "blue".to_string(),
            treatment_color: "green".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    pub fold_change: BarChartConfig,
    pub expression: LineChartConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub color: String,
    pub y: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<String>,
    pub series: Vec<LineSeries>,
}

/// Renderer-independent chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Bar(BarChart),
    Line(LineChart),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Bar(chart) => &chart.title,
            ChartSpec::Line(chart) => &chart.title,
        }
    }

    /// Plotly trace objects, one per bar set or line series.
    pub fn traces(&self) -> Value {
        match self {
            ChartSpec::Bar(chart) => json!([{
                "type": "bar",
                "x": chart.categories,
                "y": chart.values,
            }]),
            ChartSpec::Line(chart) => Value::Array(
                chart
                    .series
                    .iter()
                    .map(|series| {
                        json!({
                            "type": "scatter",
                            "mode": "lines",
                            "name": series.name,
                            "x": chart.x,
                            "y": series.y,
                            "line": { "color": series.color },
                        })
                    })
                    .collect(),
            ),
        }
    }

    pub fn layout(&self) -> Value {
        let (title, x_label, y_label) = match self {
            ChartSpec::Bar(chart) => (&chart.title, &chart.x_label, &chart.y_label),
            ChartSpec::Line(chart) => (&chart.title, &chart.x_label, &chart.y_label),
        };
        let mut layout = json!({
            "title": { "text": title },
            "xaxis": { "title": { "text": x_label }, "type": "category" },
            "yaxis": { "title": { "text": y_label } },
        });
        if let ChartSpec::Line(_) = self {
            layout["legend"] = json!({ "title": { "text": "day" } });
        }
        layout
    }
}

pub fn fold_change_bar_chart(series: &[FoldChangePoint], config: &BarChartConfig) -> ChartSpec {
    ChartSpec::Bar(BarChart {
        title: config.title.clone(),
        x_label: config.x_label.clone(),
        y_label: config.y_label.clone(),
        categories: series.iter().map(|p| p.subject_id.clone()).collect(),
        values: series.iter().map(|p| p.fold_change).collect(),
    })
}

/// One line per day label; x values are subject ids in first-seen order.
pub fn expression_line_chart(
    records: &[ExpressionRecord],
    labels: &DayLabels,
    config: &LineChartConfig,
) -> ChartSpec {
    let mut x: Vec<String> = Vec::new();
    for record in records {
        if !x.contains(&record.subject_id) {
            x.push(record.subject_id.clone());
        }
    }

    let series_for = |day: &str, color: &str| {
        let y = x
            .iter()
            .map(|subject| {
                records
                    .iter()
                    .find(|r| r.day == day && &r.subject_id == subject)
                    .and_then(|r| r.expression)
            })
            .collect();
        LineSeries {
            name: day.to_string(),
            color: color.to_string(),
            y,
        }
    };

    let series = vec![
        series_for(&labels.baseline, &config.baseline_color),
        series_for(&labels.treatment, &config.treatment_color),
    ];

    ChartSpec::Line(LineChart {
        title: config.title.clone(),
        x_label: config.x_label.clone(),
        y_label: config.y_label.clone(),
        x,
        series,
    })
}
