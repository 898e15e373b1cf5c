//! Data Cleaner Module
//! Null handling, de-duplication and logical filtering of the claims table.

use crate::config::CleaningConfig;
use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;

/// Null statistics for one column, measured before columns are dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnNullStat {
    pub column: String,
    pub null_count: usize,
    pub null_pct: f64,
}

/// Everything the cleaner reports while it works.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub initial_rows: usize,
    pub initial_columns: usize,
    pub null_summary: Vec<ColumnNullStat>,
    pub claims_imputed: usize,
    pub dropped_columns: Vec<String>,
    pub rows_missing_critical: usize,
    pub duplicate_rows: usize,
    pub invalid_rows: usize,
    pub final_rows: usize,
    pub final_columns: usize,
}

/// Cleans its own copy of the table in place.
pub struct Cleaner {
    df: DataFrame,
    config: CleaningConfig,
    report: CleaningReport,
}

impl Cleaner {
    pub fn new(df: &DataFrame, config: CleaningConfig) -> Self {
        let report = CleaningReport {
            initial_rows: df.height(),
            initial_columns: df.width(),
            final_rows: df.height(),
            final_columns: df.width(),
            ..Default::default()
        };
        Self {
            df: df.clone(),
            config,
            report,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.config.null_threshold_pct
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_dataframe(self) -> DataFrame {
        self.df
    }

    pub fn report(&self) -> &CleaningReport {
        &self.report
    }

    /// Impute claims, drop mostly-null columns, drop rows missing critical values.
    pub fn remove_nulls(&mut self) -> Result<()> {
        log::info!(
            "Shape of data before handling nulls: ({}, {})",
            self.df.height(),
            self.df.width()
        );

        self.impute_claims()?;

        let null_summary = self.null_summary();
        for stat in &null_summary {
            if stat.null_count > 0 {
                log::info!(
                    "  {}: {} nulls ({:.2}%)",
                    stat.column,
                    stat.null_count,
                    stat.null_pct
                );
            }
        }

        let threshold = self.config.null_threshold_pct;
        let cols_to_drop: Vec<String> = null_summary
            .iter()
            .filter(|stat| stat.null_pct > threshold)
            .map(|stat| stat.column.clone())
            .collect();

        if cols_to_drop.is_empty() {
            log::info!("No columns exceeded the null percentage threshold.");
        } else {
            self.df = self.df.drop_many(cols_to_drop.iter().map(String::as_str));
            log::info!(
                "Dropped columns with >{}% nulls: {:?}",
                threshold,
                cols_to_drop
            );
        }

        let critical = self.present_critical_columns();
        let initial_rows = self.df.height();
        let mut mask = BooleanChunked::full("critical".into(), true, initial_rows);
        for name in &critical {
            mask = &mask & &self.df.column(name)?.is_not_null();
        }
        self.df = self.df.filter(&mask)?;
        let rows_dropped = initial_rows - self.df.height();

        if rows_dropped > 0 {
            log::info!(
                "Dropped {} rows with missing critical information.",
                rows_dropped
            );
        } else {
            log::info!("No rows with missing critical information found.");
        }

        self.report.null_summary = null_summary;
        self.report.dropped_columns.extend(cols_to_drop);
        self.report.rows_missing_critical += rows_dropped;
        self.update_final_shape();
        Ok(())
    }

    /// Remove rows identical to an earlier row, keeping the first occurrence.
    pub fn drop_duplicate_values(&mut self) -> Result<&DataFrame> {
        let initial_rows = self.df.height();
        self.df = self
            .df
            .unique_stable(None, UniqueKeepStrategy::First, None)?;
        let dropped = initial_rows - self.df.height();

        log::info!("Dropped {} duplicate rows.", dropped);
        self.report.duplicate_rows += dropped;
        self.update_final_shape();
        Ok(&self.df)
    }

    /// Keep rows with a positive premium and a plausible registration year.
    ///
    /// `current_year` is the upper bound (inclusive) for registration years.
    pub fn logical_data_filter(&mut self, current_year: i32) -> Result<()> {
        let initial_rows = self.df.height();
        let mut predicates: Vec<Expr> = Vec::new();

        let premium = self.config.premium_col.as_str();
        if self.has_column(premium) {
            predicates.push(col(premium).gt(lit(0.0)));
        } else {
            log::warn!("Column '{}' not found; premium filter skipped.", premium);
        }

        let year = self.config.registration_year_col.as_str();
        if self.has_column(year) {
            let min_year = self.config.min_registration_year as f64;
            predicates.push(
                col(year)
                    .gt(lit(min_year))
                    .and(col(year).lt_eq(lit(current_year as f64))),
            );
        } else {
            log::warn!("Column '{}' not found; registration year filter skipped.", year);
        }

        if let Some(predicate) = predicates.into_iter().reduce(|acc, p| acc.and(p)) {
            self.df = self.df.clone().lazy().filter(predicate).collect()?;
        }

        let rows_dropped = initial_rows - self.df.height();
        if rows_dropped > 0 {
            log::info!(
                "Dropped {} rows with logically invalid data (e.g., zero premium, invalid year).",
                rows_dropped
            );
        } else {
            log::info!("No logically invalid rows found.");
        }
        if self.df.height() == 0 && initial_rows > 0 {
            log::warn!("Logical filtering removed every row.");
        }

        self.report.invalid_rows += rows_dropped;
        self.update_final_shape();
        Ok(())
    }

    fn impute_claims(&mut self) -> Result<()> {
        let claims = self.config.claims_col.clone();
        if !self.has_column(&claims) {
            log::warn!("Column '{}' not found; nothing to impute.", claims);
            return Ok(());
        }

        let missing = self.df.column(&claims)?.null_count();
        if missing > 0 {
            self.df = self
                .df
                .clone()
                .lazy()
                .with_column(col(claims.as_str()).fill_null(lit(0.0)))
                .collect()?;
        }

        log::info!("'{}' nulls filled with 0 ({} values).", claims, missing);
        self.report.claims_imputed += missing;
        Ok(())
    }

    fn null_summary(&self) -> Vec<ColumnNullStat> {
        let rows = self.df.height();
        self.df
            .get_columns()
            .iter()
            .map(|column| {
                let null_count = column.null_count();
                let null_pct = if rows == 0 {
                    0.0
                } else {
                    null_count as f64 / rows as f64 * 100.0
                };
                ColumnNullStat {
                    column: column.name().to_string(),
                    null_count,
                    null_pct,
                }
            })
            .collect()
    }

    fn present_critical_columns(&self) -> Vec<String> {
        self.config
            .critical_cols
            .iter()
            .filter(|name| self.has_column(name))
            .cloned()
            .collect()
    }

    fn has_column(&self, name: &str) -> bool {
        self.df
            .get_column_names()
            .iter()
            .any(|c| c.as_str() == name)
    }

    fn update_final_shape(&mut self) {
        self.report.final_rows = self.df.height();
        self.report.final_columns = self.df.width();
    }
}
