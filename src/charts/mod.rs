//! Charts module - Static chart rendering

mod renderer;

use crate::stats::CategoryCount;

pub use renderer::{StaticChartRenderer, GRID_COLS};

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: u32,
}

/// One histogram panel.
#[derive(Debug, Clone)]
pub struct HistogramData {
    pub column: String,
    pub bins: Vec<HistogramBin>,
    /// Kernel density estimate scaled to bin counts, as `(x, y)` points.
    pub kde: Vec<(f64, f64)>,
    pub mean: f64,
    pub median: f64,
    pub skew: f64,
}

/// One bar chart panel; entries already capped with "Other".
#[derive(Debug, Clone)]
pub struct BarChartData {
    pub column: String,
    pub entries: Vec<CategoryCount>,
}
