//! Data module - claims file loading, type conversion and cleaning

pub mod coerce;
mod cleaner;
mod loader;

pub use cleaner::{Cleaner, CleaningReport, ColumnNullStat};
pub use loader::{DataLoader, DELIMITER};
