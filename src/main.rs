//! Claims EDA - command line driver
//!
//! Loads, cleans and analyzes a pipe-delimited insurance claims file.

use anyhow::{Context as _, Result};
use chrono::Datelike as _;
use claims_eda::analysis::EdaAnalyzer;
use claims_eda::data::DELIMITER;
use claims_eda::stats::report;
use claims_eda::{pipeline, PipelineConfig};
use clap::Parser;
use polars::prelude::{CsvWriter, SerWriter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "claims-eda", about = "Insurance claims loading, cleaning and EDA")]
struct Cli {
    /// Pipe-delimited input file with a header row
    input: PathBuf,

    /// TOML configuration file (column sets, thresholds, chart options)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory charts are written to
    #[arg(short, long, default_value = "eda_output")]
    output_dir: PathBuf,

    /// Skip chart rendering, print statistics only
    #[arg(long)]
    no_charts: bool,

    /// Upper bound for registration years. Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,

    /// Write the cleaned table here (pipe-delimited)
    #[arg(long)]
    export: Option<PathBuf>,

    /// Write the cleaning report and summaries here as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PipelineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let year = cli.year.unwrap_or_else(|| chrono::Local::now().year());

    let output = pipeline::run(&cli.input, &config, year)
        .with_context(|| format!("Failed to process {}", cli.input.display()))?;
    let mut df = output.df;

    let analyzer = EdaAnalyzer::new(&df, config.analysis.clone());
    let (numeric, categorical) = if cli.no_charts {
        (
            analyzer.distribution_summary(None)?,
            analyzer.categorical_summary(None)?,
        )
    } else {
        let hist = analyzer.plot_histograms(None, &cli.output_dir)?;
        let bars = analyzer.bar_plot_categorical(None, &cli.output_dir)?;
        (hist.summaries, bars.summaries)
    };

    println!("{}", report::format_distribution_table(&numeric));
    println!("{}", report::format_categorical_summary(&categorical));

    if let Some(path) = &cli.report {
        let json = serde_json::json!({
            "cleaning": output.report,
            "numeric": numeric,
            "categorical": categorical,
        });
        std::fs::write(path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }

    if let Some(path) = &cli.export {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        CsvWriter::new(file)
            .include_header(true)
            .with_separator(DELIMITER)
            .finish(&mut df)
            .context("Failed to write cleaned data")?;
        log::info!("Cleaned data exported to {}", path.display());
    }

    Ok(())
}
