//! Command-line data analyzer
//!
//! Usage: `data-analyzer <data.csv> [config.json] [--report]`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::util::pretty::pretty_format_batches;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use da_core::{QueryEngine, ViewSnapshot, ViewSubscriber};
use da_data::batch::to_record_batch;
use da_data::export::Report;
use da_data::{analyze, Config, CsvSource};

mod summary;

/// Parsed command-line arguments
#[derive(Debug, PartialEq)]
struct Args {
    data: PathBuf,
    config: Option<PathBuf>,
    /// Print the JSON analytics report instead of the text summary
    report: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut positional = Vec::new();
        let mut report = false;
        for arg in args {
            match arg.as_str() {
                "--report" => report = true,
                flag if flag.starts_with("--") => bail!("Unknown flag: {flag}"),
                _ => positional.push(PathBuf::from(arg)),
            }
        }

        let mut positional = positional.into_iter();
        let Some(data) = positional.next() else {
            bail!("Usage: data-analyzer <data.csv> [config.json] [--report]");
        };
        let config = positional.next();
        if positional.next().is_some() {
            bail!("Too many arguments");
        }
        Ok(Self { data, config, report })
    }
}

/// Logs every view the query engine produces
struct ViewLogger;

impl ViewSubscriber for ViewLogger {
    fn on_view_change(&self, view: &ViewSnapshot) {
        info!(
            "View: page {}/{}, {} of {} records match",
            view.current_page, view.total_pages, view.filtered_items, view.dataset_items
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::default(),
    };

    let path = args.data.clone();
    let source = tokio::task::spawn_blocking(move || CsvSource::from_path(path))
        .await
        .context("Loader task panicked")?
        .with_context(|| format!("Failed to load {}", args.data.display()))?;
    let dataset = source.into_dataset();

    if dataset.is_empty() {
        warn!("{} has no data rows", args.data.display());
        println!("No data to analyze.");
        return Ok(());
    }

    let analysis_config = config.analysis.clone();
    let analysis_input = dataset.clone();
    let analysis = tokio::task::spawn_blocking(move || analyze(&analysis_input, &analysis_config))
        .await
        .context("Analysis task panicked")?;

    if args.report {
        let report = Report::generate(dataset.records(), &analysis)?;
        println!("{}", report.to_json()?);
        return Ok(());
    }

    print!("{}", summary::render(&analysis, &dataset, &config.analysis));

    let engine = QueryEngine::new(dataset, config.view.items_per_page)?;
    let logger: Arc<dyn ViewSubscriber> = Arc::new(ViewLogger);
    engine.add_subscriber(logger.clone());

    let filter = config.view.filter_state();
    if filter.is_active() {
        engine.set_filter(filter);
    }
    if let Some(sort) = config.view.sort_spec() {
        engine
            .sort_by(&sort.column, sort.direction)
            .with_context(|| format!("Cannot sort by '{}'", sort.column))?;
    }
    if let Some(page) = config.view.page {
        if !engine.go_to_page(page) {
            warn!("Page {} is out of range, staying on page {}", page, engine.view().current_page);
        }
    }

    let view = engine.view();
    if view.records.is_empty() {
        println!("No records match the current filters.");
    } else {
        let batch = to_record_batch(&view.records, &analysis)?;
        println!("{}", pretty_format_batches(&[batch])?);
    }
    println!("{}", view.range_label);

    Ok(())
}
