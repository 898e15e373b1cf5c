//! Analysis module - Read-only EDA over the cleaned table

mod analyzer;

pub use analyzer::{EdaAnalyzer, PlotOutput, BAR_CHART_FILE, HISTOGRAM_FILE};
