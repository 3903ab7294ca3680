pub mod charts;
pub mod classify;
pub mod config;
pub mod correlation;
pub mod dashboard;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod reshape;
pub mod stats;
pub mod table;

pub use charts::ChartSpec;
pub use classify::{classify_fold_changes, ClassificationSummary, FoldChangeClass, FoldChangeThresholds};
pub use config::DashboardConfig;
pub use correlation::{correlate, CorrelationMatrix};
pub use dashboard::{build_dashboard, Block, Dashboard};
pub use error::{ComputationError, ConfigError, RenderError};
pub use pipeline::{ChartKind, TabularMetricsPipeline};
pub use reshape::{fold_change_series, to_long_format, DayLabels, ExpressionRecord, FoldChangePoint};
pub use stats::{summarize, SummaryStats};
pub use table::Table;
