use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{ChartExporter, DashboardRenderer};
use crate::charts::ChartSpec;
use crate::dashboard::{Block, Dashboard};
use crate::error::RenderError;
use crate::table::Table;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.0.min.js";

const STYLE: &str = "body{font-family:system-ui,-apple-system,sans-serif;max-width:1200px;\
margin:0 auto;padding:20px;color:#222;background:#fafafa}\
h1{color:#1a1a2e}h2{color:#16213e;border-bottom:1px solid #ddd;padding-bottom:5px}\
p{max-width:1000px;line-height:1.5}\
.table{border-collapse:collapse;margin:10px 0 20px 0;font-size:13px}\
.table th,.table td{border:1px solid #ddd;padding:4px 8px;text-align:right}\
.table th:first-child,.table td:first-child{text-align:left}\
.plot{background:#fff;border-radius:8px;padding:10px;margin:20px 0;\
box-shadow:0 1px 3px rgba(0,0,0,0.1)}";

/// Writes the whole dashboard as one self-contained HTML page.
pub struct HtmlRenderer<W: Write> {
    out: W,
    plotly_src: String,
}

impl<W: Write> HtmlRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            plotly_src: PLOTLY_CDN.to_string(),
        }
    }

    pub fn with_plotly_src(mut self, src: impl Into<String>) -> Self {
        self.plotly_src = src.into();
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn document(&self, page: &Dashboard) -> Result<String, RenderError> {
        let mut html = String::with_capacity(64 * 1024);
        write_head(&mut html, &page.title, &self.plotly_src)?;
        writeln!(html, "<h1>{}</h1>", escape_html(&page.title))?;

        let mut chart_idx = 0;
        for block in &page.blocks {
            match block {
                Block::Header { text } => writeln!(html, "<h2>{}</h2>", escape_html(text))?,
                Block::Markdown { text } => write_paragraphs(&mut html, text)?,
                Block::Table { table } => write_table(&mut html, table)?,
                Block::Chart { chart } => {
                    write_chart(&mut html, &format!("chart-{chart_idx}"), chart)?;
                    chart_idx += 1;
                }
            }
        }

        writeln!(html, "</body>")?;
        writeln!(html, "</html>")?;
        Ok(html)
    }
}

impl<W: Write> DashboardRenderer for HtmlRenderer<W> {
    fn render(&mut self, page: &Dashboard) -> Result<(), RenderError> {
        let html = self.document(page)?;
        self.out
            .write_all(html.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|source| RenderError::Io {
                target: "html output".to_string(),
                source,
            })?;
        info!(title = %page.title, blocks = page.blocks.len(), "rendered html dashboard");
        Ok(())
    }
}

/// Writes each chart to its own standalone HTML file.
#[derive(Debug, Clone)]
pub struct HtmlChartExporter {
    plotly_src: String,
}

impl Default for HtmlChartExporter {
    fn default() -> Self {
        Self {
            plotly_src: PLOTLY_CDN.to_string(),
        }
    }
}

impl HtmlChartExporter {
    pub fn new(plotly_src: impl Into<String>) -> Self {
        Self {
            plotly_src: plotly_src.into(),
        }
    }
}

impl ChartExporter for HtmlChartExporter {
    fn export(&self, chart: &ChartSpec, destination: &Path) -> Result<PathBuf, RenderError> {
        let document = render_chart_document(chart, &self.plotly_src)?;
        fs::write(destination, document).map_err(|source| RenderError::Io {
            target: destination.display().to_string(),
            source,
        })?;
        info!(path = %destination.display(), title = chart.title(), "exported chart");
        Ok(destination.to_path_buf())
    }
}

/// A page holding only `chart`. Identical input yields identical bytes.
pub fn render_chart_document(chart: &ChartSpec, plotly_src: &str) -> Result<String, RenderError> {
    let mut html = String::with_capacity(16 * 1024);
    write_head(&mut html, chart.title(), plotly_src)?;
    write_chart(&mut html, "chart-0", chart)?;
    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn write_head(html: &mut String, title: &str, plotly_src: &str) -> Result<(), RenderError> {
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\"/>")?;
    writeln!(
        html,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>"
    )?;
    writeln!(html, "<title>{}</title>", escape_html(title))?;
    writeln!(html, "<script src=\"{}\"></script>", escape_html(plotly_src))?;
    writeln!(html, "<style>{STYLE}</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    Ok(())
}

fn write_paragraphs(html: &mut String, text: &str) -> Result<(), RenderError> {
    let mut paragraph: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim).chain(std::iter::once("")) {
        if line.is_empty() {
            if !paragraph.is_empty() {
                writeln!(html, "<p>{}</p>", escape_html(&paragraph.join(" ")))?;
                paragraph.clear();
            }
        } else {
            paragraph.push(line);
        }
    }
    Ok(())
}

fn write_table(html: &mut String, table: &Table) -> Result<(), RenderError> {
    writeln!(html, "<table class=\"table\">")?;
    write!(html, "<thead><tr>")?;
    for cell in &table.header {
        write!(html, "<th>{}</th>", escape_html(cell))?;
    }
    writeln!(html, "</tr></thead>")?;
    writeln!(html, "<tbody>")?;
    for row in &table.rows {
        write!(html, "<tr>")?;
        for cell in row {
            write!(html, "<td>{}</td>", escape_html(cell))?;
        }
        writeln!(html, "</tr>")?;
    }
    writeln!(html, "</tbody>")?;
    writeln!(html, "</table>")?;
    Ok(())
}

fn write_chart(html: &mut String, id: &str, chart: &ChartSpec) -> Result<(), RenderError> {
    let traces = script_json(&chart.traces())?;
    let layout = script_json(&chart.layout())?;
    writeln!(
        html,
        "<div class=\"plot\"><div id=\"{id}\" style=\"height:450px\"></div></div>"
    )?;
    writeln!(
        html,
        "<script>Plotly.newPlot('{id}',{traces},{layout});</script>"
    )?;
    Ok(())
}

/// JSON safe to inline inside a `<script>` element.
fn script_json(value: &serde_json::Value) -> Result<String, RenderError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
