use std::path::{Path, PathBuf};

use crate::charts::ChartSpec;
use crate::dashboard::Dashboard;
use crate::error::RenderError;

mod html;

pub use html::{escape_html, render_chart_document, HtmlChartExporter, HtmlRenderer, PLOTLY_CDN};

/// Display surface for a whole page. Any page or session state belongs to the implementor.
pub trait DashboardRenderer {
    fn render(&mut self, page: &Dashboard) -> Result<(), RenderError>;
}

/// Serializes a single chart into a viewable artifact at `destination`.
pub trait ChartExporter {
    fn export(&self, chart: &ChartSpec, destination: &Path) -> Result<PathBuf, RenderError>;
}
