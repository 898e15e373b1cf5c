//! EDA Analyzer
//! Read-only distribution analysis over a cleaned claims table.

use crate::charts::{BarChartData, HistogramData, StaticChartRenderer};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::stats::{CategoricalSummary, NumericSummary, StatsCalculator};
use polars::prelude::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

pub const HISTOGRAM_FILE: &str = "histograms.png";
pub const BAR_CHART_FILE: &str = "categorical_distributions.png";

/// Result of a plotting call: the statistics shown and the image written, if any.
#[derive(Debug, Clone)]
pub struct PlotOutput<S> {
    pub summaries: Vec<S>,
    pub chart: Option<PathBuf>,
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

pub struct EdaAnalyzer<'a> {
    df: &'a DataFrame,
    config: AnalysisConfig,
}

impl<'a> EdaAnalyzer<'a> {
    pub fn new(df: &'a DataFrame, config: AnalysisConfig) -> Self {
        Self { df, config }
    }

    /// Names of every numeric column, in table order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|col| is_numeric(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    fn has_column(&self, name: &str) -> bool {
        self.df
            .get_column_names()
            .iter()
            .any(|c| c.as_str() == name)
    }

    /// Requested numeric columns that exist, or all numeric columns for `None`.
    fn resolve_numeric(&self, columns: Option<&[String]>) -> Vec<String> {
        let Some(columns) = columns else {
            return self.numeric_columns();
        };

        let numeric = self.numeric_columns();
        let (valid, invalid): (Vec<String>, Vec<String>) =
            columns.iter().cloned().partition(|c| numeric.contains(c));
        if !invalid.is_empty() {
            log::warn!("Skipping missing or non-numeric columns: {:?}", invalid);
        }
        valid
    }

    fn resolve_categorical(&self, columns: Option<&[String]>) -> Vec<String> {
        let requested = columns.unwrap_or(&self.config.categorical_cols);
        let (existing, missing): (Vec<String>, Vec<String>) =
            requested.iter().cloned().partition(|c| self.has_column(c));
        if !missing.is_empty() {
            log::warn!("The following columns were not found: {:?}", missing);
        }
        existing
    }

    fn numeric_values(&self, name: &str) -> Result<Vec<f64>> {
        let casted = self.df.column(name)?.cast(&DataType::Float64)?;
        let values = casted.f64()?.into_iter().flatten().collect();
        Ok(values)
    }

    fn label_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        let casted = self.df.column(name)?.cast(&DataType::String)?;
        let values = casted
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(values)
    }

    /// Distribution statistics per numeric column, computed in parallel.
    pub fn distribution_summary(&self, columns: Option<&[String]>) -> Result<Vec<NumericSummary>> {
        let total = self.df.height();
        self.resolve_numeric(columns)
            .par_iter()
            .map(|name| {
                let values = self.numeric_values(name)?;
                Ok(StatsCalculator::numeric_summary(name, &values, total))
            })
            .collect()
    }

    /// Frequency breakdowns for categorical columns.
    pub fn categorical_summary(
        &self,
        columns: Option<&[String]>,
    ) -> Result<Vec<CategoricalSummary>> {
        self.resolve_categorical(columns)
            .iter()
            .map(|name| {
                let values = self.label_values(name)?;
                Ok(StatsCalculator::categorical_summary(name, &values))
            })
            .collect()
    }

    /// Render a grid of histograms for numeric columns into `out_dir`.
    pub fn plot_histograms(
        &self,
        columns: Option<&[String]>,
        out_dir: &Path,
    ) -> Result<PlotOutput<NumericSummary>> {
        let names = self.resolve_numeric(columns);
        if names.is_empty() {
            log::warn!("No valid numeric columns found!");
            return Ok(PlotOutput {
                summaries: Vec::new(),
                chart: None,
            });
        }
        log::info!("Plotting histograms for {} numeric columns", names.len());

        let summaries = self.distribution_summary(Some(names.as_slice()))?;
        let mut panels = Vec::with_capacity(names.len());
        for summary in &summaries {
            let values = self.numeric_values(&summary.column)?;
            let bins = StaticChartRenderer::histogram_bins(&values, self.config.histogram_bins);
            panels.push(HistogramData {
                column: summary.column.clone(),
                kde: StaticChartRenderer::kde_curve(&values, &bins),
                bins,
                mean: summary.mean,
                median: summary.median,
                skew: summary.skew,
            });
        }

        std::fs::create_dir_all(out_dir)?;
        let path = out_dir.join(HISTOGRAM_FILE);
        StaticChartRenderer::render_histogram_grid(
            &path,
            "Histogram Analysis of Numeric Variables",
            &panels,
            self.config.chart_width,
        )?;

        Ok(PlotOutput {
            summaries,
            chart: Some(path),
        })
    }

    /// Render a grid of bar charts for categorical columns into `out_dir`.
    pub fn bar_plot_categorical(
        &self,
        columns: Option<&[String]>,
        out_dir: &Path,
    ) -> Result<PlotOutput<CategoricalSummary>> {
        let summaries = self.categorical_summary(columns)?;
        if summaries.is_empty() {
            log::warn!("No valid categorical columns found to plot!");
            return Ok(PlotOutput {
                summaries,
                chart: None,
            });
        }
        log::info!(
            "Plotting bar charts for: {:?}",
            summaries.iter().map(|s| s.column.as_str()).collect::<Vec<_>>()
        );

        let panels: Vec<BarChartData> = summaries
            .iter()
            .filter(|s| !s.counts.is_empty())
            .map(|s| BarChartData {
                column: s.column.clone(),
                entries: s.capped(self.config.max_categories),
            })
            .collect();

        std::fs::create_dir_all(out_dir)?;
        let path = out_dir.join(BAR_CHART_FILE);
        StaticChartRenderer::render_bar_grid(
            &path,
            "Categorical Variable Distributions - Insurance Portfolio",
            &panels,
            self.config.chart_width,
        )?;

        let chart = if panels.is_empty() { None } else { Some(path) };
        Ok(PlotOutput { summaries, chart })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn frame() -> DataFrame {
        df! {
            "TotalPremium" => &[Some(10.0), Some(20.0), None, Some(30.0)],
            "Province" => &[Some("Gauteng"), Some("Gauteng"), Some("Limpopo"), None],
            "RegistrationYear" => &[2004i64, 2010, 2012, 2015],
        }
        .unwrap()
    }

    #[test]
    fn test_numeric_columns() {
        let df = frame();
        let analyzer = EdaAnalyzer::new(&df, AnalysisConfig::default());
        assert_eq!(
            analyzer.numeric_columns(),
            vec!["TotalPremium".to_string(), "RegistrationYear".to_string()]
        );
    }

    #[test]
    fn test_distribution_summary() {
        let df = frame();
        let analyzer = EdaAnalyzer::new(&df, AnalysisConfig::default());
        let summaries = analyzer.distribution_summary(None).unwrap();

        assert_eq!(summaries.len(), 2);
        let premium = &summaries[0];
        assert_eq!(premium.column, "TotalPremium");
        assert_eq!(premium.count, 3);
        assert_eq!(premium.mean, 20.0);
        assert_eq!(premium.missing_pct, 25.0);
    }

    #[test]
    fn test_distribution_summary_skips_invalid_columns() {
        let df = frame();
        let analyzer = EdaAnalyzer::new(&df, AnalysisConfig::default());
        let requested = vec!["Province".to_string(), "Nope".to_string(), "TotalPremium".to_string()];
        let summaries = analyzer.distribution_summary(Some(requested.as_slice())).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].column, "TotalPremium");
    }

    #[test]
    fn test_categorical_summary_defaults() {
        let df = frame();
        let analyzer = EdaAnalyzer::new(&df, AnalysisConfig::default());
        let summaries = analyzer.categorical_summary(None).unwrap();

        // only Province of the default columns exists
        assert_eq!(summaries.len(), 1);
        let province = &summaries[0];
        assert_eq!(province.missing, 1);
        assert_eq!(province.counts[0].label, "Gauteng");
        assert_eq!(province.counts[0].count, 2);
    }

    #[test]
    fn test_plots_without_valid_columns_write_nothing() {
        let df = frame();
        let analyzer = EdaAnalyzer::new(&df, AnalysisConfig::default());
        let dir = std::env::temp_dir();
        let missing = vec!["Nope".to_string()];

        let hist = analyzer.plot_histograms(Some(missing.as_slice()), &dir).unwrap();
        assert!(hist.chart.is_none());
        let bars = analyzer.bar_plot_categorical(Some(missing.as_slice()), &dir).unwrap();
        assert!(bars.chart.is_none());
        assert!(bars.summaries.is_empty());
    }
}
