use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hspdash_core::render::{ChartExporter, DashboardRenderer, HtmlChartExporter, HtmlRenderer};
use hspdash_core::{ChartKind, DashboardConfig, TabularMetricsPipeline};
use hspdash_parser::RowSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::{comfy, TerminalRenderer};

#[derive(Parser, Debug)]
#[command(author, version, about = "HSP90 expression dashboard", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the full dashboard as one HTML page
    Render(RenderArgs),
    /// Print the full dashboard to the terminal
    Show(InputArgs),
    /// Print descriptive statistics for every numeric column
    Describe(InputArgs),
    /// Print the Pearson correlation matrix of the numeric columns
    Correlate(InputArgs),
    /// Print fold-change category counts
    Classify(InputArgs),
    /// Write the day 0 / day 2 long-format records as CSV on stdout
    LongFormat(InputArgs),
    /// Write a single chart as a standalone HTML file
    ExportChart(ExportChartArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Per-subject CSV file
    #[arg(short, long)]
    input: PathBuf,
    /// Dashboard TOML config; built-in study defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: InputArgs,
    /// Destination HTML file
    #[arg(short, long, default_value = "dashboard.html")]
    out: PathBuf,
    /// Script URL for plotly.js
    #[arg(long)]
    plotly_src: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChartArg {
    FoldChange,
    Expression,
}

impl From<ChartArg> for ChartKind {
    fn from(value: ChartArg) -> Self {
        match value {
            ChartArg::FoldChange => ChartKind::FoldChange,
            ChartArg::Expression => ChartKind::Expression,
        }
    }
}

#[derive(Args, Debug)]
struct ExportChartArgs {
    #[command(flatten)]
    source: InputArgs,
    #[arg(long, value_enum)]
    chart: ChartArg,
    /// Destination HTML file
    #[arg(short, long)]
    out: PathBuf,
    /// Script URL for plotly.js
    #[arg(long)]
    plotly_src: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Command::Render(args) => handle_render(args),
        Command::Show(args) => handle_show(args),
        Command::Describe(args) => handle_describe(args),
        Command::Correlate(args) => handle_correlate(args),
        Command::Classify(args) => handle_classify(args),
        Command::LongFormat(args) => handle_long_format(args),
        Command::ExportChart(args) => handle_export_chart(args),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load(args: &InputArgs) -> Result<(TabularMetricsPipeline, RowSet)> {
    let config = match &args.config {
        Some(path) => DashboardConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    let pipeline = TabularMetricsPipeline::new(config);
    let rows = pipeline
        .load(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    Ok((pipeline, rows))
}

fn handle_render(args: RenderArgs) -> Result<()> {
    let (pipeline, rows) = load(&args.source)?;
    let page = pipeline
        .dashboard(&rows)
        .context("failed to assemble dashboard")?;

    let file = create(&args.out)?;
    let mut renderer = HtmlRenderer::new(BufWriter::new(file));
    if let Some(src) = args.plotly_src {
        renderer = renderer.with_plotly_src(src);
    }
    renderer.render(&page)?;

    info!(path = %args.out.display(), "dashboard written; open it in a browser to view");
    Ok(())
}

fn handle_show(args: InputArgs) -> Result<()> {
    let (pipeline, rows) = load(&args)?;
    let page = pipeline
        .dashboard(&rows)
        .context("failed to assemble dashboard")?;
    TerminalRenderer::new(io::stdout().lock()).render(&page)?;
    Ok(())
}

fn handle_describe(args: InputArgs) -> Result<()> {
    let (pipeline, rows) = load(&args)?;
    let summary = pipeline
        .summarize(&rows)
        .context("failed to summarize row set")?;
    println!("{}", comfy(&summary.to_table()));
    Ok(())
}

fn handle_correlate(args: InputArgs) -> Result<()> {
    let (pipeline, rows) = load(&args)?;
    let matrix = pipeline
        .correlate(&rows)
        .context("failed to compute correlation matrix")?;
    println!("{}", comfy(&matrix.to_table()));
    Ok(())
}

fn handle_classify(args: InputArgs) -> Result<()> {
    let (pipeline, rows) = load(&args)?;
    let summary = pipeline
        .classify(&rows)
        .context("failed to classify fold changes")?;
    println!(
        "thresholds: up > {}, down < {}",
        summary.thresholds.upregulated_above, summary.thresholds.downregulated_below
    );
    println!("{}", comfy(&summary.to_table()));
    Ok(())
}

fn handle_long_format(args: InputArgs) -> Result<()> {
    let (pipeline, rows) = load(&args)?;
    let records = pipeline.to_long_format(&rows)?;

    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    writer.write_record(["subject_id", "day", "expression"])?;
    for record in &records {
        let expression = record.expression.map(|v| v.to_string()).unwrap_or_default();
        writer.write_record([
            record.subject_id.as_str(),
            record.day.as_str(),
            expression.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn handle_export_chart(args: ExportChartArgs) -> Result<()> {
    let (pipeline, rows) = load(&args.source)?;
    let chart = pipeline.chart(&rows, args.chart.into())?;

    let exporter = match args.plotly_src {
        Some(src) => HtmlChartExporter::new(src),
        None => HtmlChartExporter::default(),
    };
    let path = exporter.export(&chart, &args.out)?;
    info!(path = %path.display(), "chart written; open it in a browser to view");
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("failed to create {}", path.display()))
}
