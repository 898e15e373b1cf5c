//! Claims Data Loader Module
//! Reads pipe-delimited files with Polars and normalizes column types.

use super::coerce;
use crate::config::ColumnConfig;
use crate::error::{EdaError, Result};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;

pub const DELIMITER: u8 = b'|';

/// Loads the claims file and applies column-name-driven type conversion.
pub struct DataLoader {
    config: ColumnConfig,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(ColumnConfig::default())
    }
}

impl DataLoader {
    pub fn new(config: ColumnConfig) -> Self {
        Self { config }
    }

    /// Load a pipe-delimited file with a header row.
    ///
    /// Every column is read as raw strings; empty fields become null.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EdaError::NotFound(path.to_path_buf()));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|opts| opts.with_separator(DELIMITER))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .map_err(|e| EdaError::Load {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if df.height() == 0 {
            return Err(EdaError::EmptyData(path.to_path_buf()));
        }

        log::info!(
            "Data loaded successfully from {} ({} rows x {} columns)",
            path.display(),
            df.height(),
            df.width()
        );
        Ok(df)
    }

    /// Normalize column names and types in place.
    ///
    /// Steps run in a fixed order: trim names, trim text values, dates,
    /// numerics, yes/no flags, native booleans. Values that fail to convert
    /// become null. Columns already holding their target dtype are left
    /// untouched, so running this twice is a no-op the second time.
    pub fn convert_types(&self, df: &mut DataFrame) -> Result<()> {
        Self::trim_column_names(df)?;
        Self::trim_text_columns(df)?;

        for name in Self::present(df, &self.config.date_cols) {
            Self::convert_dates(df, &name)?;
        }
        for name in Self::present(df, &self.config.numeric_cols) {
            Self::convert_numeric(df, &name)?;
        }
        for name in Self::present(df, &self.config.bool_str_cols) {
            Self::convert_bool(df, &name, coerce::parse_yes_no)?;
        }
        for name in Self::present(df, &self.config.bool_native_cols) {
            Self::convert_bool(df, &name, coerce::parse_bool)?;
        }

        log::debug!("Converted column types: {:?}", df.schema());
        Ok(())
    }

    /// Configured names that exist in the DataFrame, in configured order.
    fn present(df: &DataFrame, names: &[String]) -> Vec<String> {
        let columns = df.get_column_names();
        names
            .iter()
            .filter(|name| columns.iter().any(|c| c.as_str() == name.as_str()))
            .cloned()
            .collect()
    }

    /// Strip surrounding whitespace from names. A name whose trimmed form is
    /// already taken keeps its original spelling.
    fn trim_column_names(df: &mut DataFrame) -> Result<()> {
        let mut taken: HashSet<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let untrimmed: Vec<String> = df
            .get_column_names()
            .iter()
            .filter(|name| name.as_str() != name.trim())
            .map(|name| name.to_string())
            .collect();

        for old in untrimmed {
            let new = old.trim().to_string();
            if taken.contains(&new) {
                log::warn!(
                    "Column '{}' kept untrimmed: '{}' already exists",
                    old,
                    new
                );
                continue;
            }
            df.rename(&old, new.as_str().into())?;
            taken.remove(&old);
            taken.insert(new);
        }
        Ok(())
    }

    fn trim_text_columns(df: &mut DataFrame) -> Result<()> {
        let text_cols: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| matches!(col.dtype(), DataType::String))
            .map(|col| col.name().to_string())
            .collect();

        for name in text_cols {
            let trimmed: Vec<Option<String>> = df
                .column(&name)?
                .str()?
                .into_iter()
                .map(|v| v.and_then(coerce::trim_to_option).map(str::to_string))
                .collect();
            df.with_column(Series::new(name.as_str().into(), trimmed))?;
        }
        Ok(())
    }

    /// Raw string values of a column, casting non-string columns first.
    fn raw_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
        let as_str = df.column(name)?.cast(&DataType::String)?;
        let values = as_str
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(values)
    }

    fn convert_dates(df: &mut DataFrame, name: &str) -> Result<()> {
        let target = DataType::Datetime(TimeUnit::Milliseconds, None);
        let series = match df.column(name)?.dtype() {
            DataType::Datetime(_, _) => return Ok(()),
            DataType::Date => df.column(name)?.as_materialized_series().cast(&target)?,
            _ => {
                let millis: Vec<Option<i64>> = Self::raw_values(df, name)?
                    .iter()
                    .map(|v| v.as_deref().and_then(coerce::parse_datetime_millis))
                    .collect();
                Series::new(name.into(), millis).cast(&target)?
            }
        };
        Self::replace_reporting(df, name, series)
    }

    fn convert_numeric(df: &mut DataFrame, name: &str) -> Result<()> {
        let series = match df.column(name)?.dtype() {
            DataType::Float64 => return Ok(()),
            DataType::Float32
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => df
                .column(name)?
                .as_materialized_series()
                .cast(&DataType::Float64)?,
            _ => {
                let numbers: Vec<Option<f64>> = Self::raw_values(df, name)?
                    .iter()
                    .map(|v| v.as_deref().and_then(coerce::parse_number))
                    .collect();
                Series::new(name.into(), numbers)
            }
        };
        Self::replace_reporting(df, name, series)
    }

    fn convert_bool(df: &mut DataFrame, name: &str, parse: fn(&str) -> Option<bool>) -> Result<()> {
        if matches!(df.column(name)?.dtype(), DataType::Boolean) {
            return Ok(());
        }
        let flags: Vec<Option<bool>> = Self::raw_values(df, name)?
            .iter()
            .map(|v| v.as_deref().and_then(parse))
            .collect();
        Self::replace_reporting(df, name, Series::new(name.into(), flags))
    }

    /// Swap in a converted column, logging how many values were coerced to null.
    fn replace_reporting(df: &mut DataFrame, name: &str, series: Series) -> Result<()> {
        let before = df.column(name)?.null_count();
        let after = series.null_count();
        if after > before {
            log::debug!(
                "Column '{}': {} value(s) could not be converted and were set to null",
                name,
                after - before
            );
        }
        df.with_column(series)?;
        Ok(())
    }
}
