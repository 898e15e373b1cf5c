//! Pipeline configuration
//! Column-name sets, cleaning thresholds and analysis options, loadable from TOML.

use crate::error::{EdaError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Column-name sets driving type conversion in the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub date_cols: Vec<String>,
    pub bool_str_cols: Vec<String>,
    pub bool_native_cols: Vec<String>,
    pub numeric_cols: Vec<String>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            date_cols: names(&["TransactionMonth", "VehicleIntroDate"]),
            bool_str_cols: names(&["WrittenOff", "Rebuilt", "Converted", "CrossBorder"]),
            bool_native_cols: names(&["IsVATRegistered"]),
            numeric_cols: names(&[
                "mmcode",
                "Cylinders",
                "cubiccapacity",
                "kilowatts",
                "NumberOfDoors",
                "CustomValueEstimate",
                "CapitalOutstanding",
                "NumberOfVehiclesInFleet",
                "RegistrationYear",
                "SumInsured",
                "CalculatedPremiumPerTerm",
                "TotalPremium",
                "TotalClaims",
            ]),
        }
    }
}

/// Options for the cleaner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Columns with a null percentage strictly above this are dropped.
    pub null_threshold_pct: f64,
    /// Rows missing a value in any of these (when present) are dropped.
    pub critical_cols: Vec<String>,
    /// Column whose nulls are imputed to zero.
    pub claims_col: String,
    pub premium_col: String,
    pub registration_year_col: String,
    /// Registration years must be strictly greater than this.
    pub min_registration_year: i32,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            null_threshold_pct: 70.0,
            critical_cols: names(&[
                "SumInsured",
                "TotalPremium",
                "CalculatedPremiumPerTerm",
                "Make",
                "Model",
                "RegistrationYear",
                "Province",
            ]),
            claims_col: "TotalClaims".to_string(),
            premium_col: "TotalPremium".to_string(),
            registration_year_col: "RegistrationYear".to_string(),
            min_registration_year: 1980,
        }
    }
}

/// Options for the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub categorical_cols: Vec<String>,
    /// Categories shown per bar chart before the rest collapse into "Other".
    pub max_categories: usize,
    pub histogram_bins: usize,
    pub chart_width: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            categorical_cols: names(&[
                "Gender",
                "Province",
                "VehicleType",
                "MaritalStatus",
                "CoverType",
                "Bodytype",
            ]),
            max_categories: 10,
            histogram_bins: 30,
            chart_width: 1500,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub columns: ColumnConfig,
    pub cleaning: CleaningConfig,
    pub analysis: AnalysisConfig,
}

impl PipelineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            EdaError::Configuration(format!(
                "Failed to read config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(contents)
            .map_err(|e| EdaError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.cleaning.null_threshold_pct;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(EdaError::Configuration(format!(
                "null_threshold_pct must be within 0..=100, got {}",
                threshold
            )));
        }
        if self.analysis.max_categories == 0 {
            return Err(EdaError::Configuration(
                "max_categories must be at least 1".to_string(),
            ));
        }
        if self.analysis.histogram_bins == 0 {
            return Err(EdaError::Configuration(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
