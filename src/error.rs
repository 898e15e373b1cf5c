use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdaError {
    #[error("The file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("An error occurred while loading {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    #[error("The loaded data in {} is empty", .0.display())]
    EmptyData(PathBuf),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EdaError>;
