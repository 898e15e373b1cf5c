//! Stats module - Distribution statistics and printable summaries

mod calculator;
pub mod report;

pub use calculator::{
    CategoricalSummary, CategoryCount, NumericSummary, StatsCalculator, OTHER_LABEL,
};
