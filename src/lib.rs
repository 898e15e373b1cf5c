//! Claims EDA - loading, cleaning & distribution analysis of insurance claims data
//!
//! Reads a pipe-delimited claims file, normalizes column types, cleans the
//! table and renders distribution charts with printed summary statistics.

pub mod analysis;
pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod stats;

pub use config::PipelineConfig;
pub use error::{EdaError, Result};
