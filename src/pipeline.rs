//! Load → convert → clean, in the fixed order the cleaning steps expect.

use crate::config::PipelineConfig;
use crate::data::{Cleaner, CleaningReport, DataLoader};
use crate::error::Result;
use polars::prelude::DataFrame;
use std::path::Path;

pub struct PipelineOutput {
    pub df: DataFrame,
    pub report: CleaningReport,
}

pub fn run<P: AsRef<Path>>(
    path: P,
    config: &PipelineConfig,
    current_year: i32,
) -> Result<PipelineOutput> {
    let loader = DataLoader::new(config.columns.clone());
    let mut df = loader.load(path)?;
    loader.convert_types(&mut df)?;

    let mut cleaner = Cleaner::new(&df, config.cleaning.clone());
    cleaner.remove_nulls()?;
    cleaner.drop_duplicate_values()?;
    cleaner.logical_data_filter(current_year)?;

    let report = cleaner.report().clone();
    log::info!(
        "Cleaning finished: {} -> {} rows, {} -> {} columns",
        report.initial_rows,
        report.final_rows,
        report.initial_columns,
        report.final_columns
    );

    Ok(PipelineOutput {
        df: cleaner.into_dataframe(),
        report,
    })
}
