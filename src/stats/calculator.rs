//! Statistics Calculator Module
//! Descriptive statistics for numeric columns and frequency breakdowns for
//! categorical ones.

use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::HashMap;

/// Label under which categories beyond the display cap are aggregated.
pub const OTHER_LABEL: &str = "Other";

/// Distribution statistics for a single numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
    pub skew: f64,
    pub missing_pct: f64,
}

impl Default for NumericSummary {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
            skew: f64::NAN,
            missing_pct: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
    /// Share of the non-null values in the column.
    pub pct: f64,
}

/// Frequency breakdown for one categorical column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub column: String,
    pub total: usize,
    pub missing: usize,
    /// All distinct non-null values, most frequent first.
    pub counts: Vec<CategoryCount>,
}

impl CategoricalSummary {
    pub fn unique_count(&self) -> usize {
        self.counts.len()
    }

    pub fn missing_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.missing as f64 / self.total as f64 * 100.0
        }
    }

    /// Top `max_categories` values with the remainder summed under "Other".
    pub fn capped(&self, max_categories: usize) -> Vec<CategoryCount> {
        if self.counts.len() <= max_categories {
            return self.counts.clone();
        }

        let mut capped: Vec<CategoryCount> = self.counts[..max_categories].to_vec();
        let other_count: usize = self.counts[max_categories..].iter().map(|c| c.count).sum();
        let other_pct: f64 = self.counts[max_categories..].iter().map(|c| c.pct).sum();
        capped.push(CategoryCount {
            label: OTHER_LABEL.to_string(),
            count: other_count,
            pct: other_pct,
        });
        capped
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute distribution statistics for the non-null values of a column.
    ///
    /// `total` is the column length including nulls.
    pub fn numeric_summary(column: &str, values: &[f64], total: usize) -> NumericSummary {
        let n = values.len();
        let missing_pct = if total == 0 {
            0.0
        } else {
            (total - n) as f64 / total as f64 * 100.0
        };

        if n == 0 {
            return NumericSummary {
                column: column.to_string(),
                missing_pct,
                ..Default::default()
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let std = if n > 1 { values.std_dev() } else { f64::NAN };

        NumericSummary {
            column: column.to_string(),
            count: n,
            mean: values.mean(),
            std,
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
            skew: Self::skewness(values),
            missing_pct,
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Adjusted Fisher-Pearson sample skewness. NaN below three values.
    pub fn skewness(values: &[f64]) -> f64 {
        let n = values.len();
        if n < 3 {
            return f64::NAN;
        }

        let nf = n as f64;
        let mean = values.mean();
        let m2 = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / nf;
        let m3 = values.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / nf;
        if m2 == 0.0 {
            return 0.0;
        }

        let g1 = m3 / m2.powf(1.5);
        (nf * (nf - 1.0)).sqrt() / (nf - 2.0) * g1
    }

    /// Count non-null labels, most frequent first; ties in first-seen order.
    pub fn categorical_summary(column: &str, values: &[Option<String>]) -> CategoricalSummary {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut missing = 0usize;

        for value in values {
            match value {
                Some(label) => match index.get(label.as_str()) {
                    Some(&i) => counts[i].1 += 1,
                    None => {
                        index.insert(label.as_str(), counts.len());
                        counts.push((label.clone(), 1));
                    }
                },
                None => missing += 1,
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let non_null = values.len() - missing;
        let counts = counts
            .into_iter()
            .map(|(label, count)| CategoryCount {
                label,
                count,
                pct: if non_null == 0 {
                    0.0
                } else {
                    count as f64 / non_null as f64 * 100.0
                },
            })
            .collect();

        CategoricalSummary {
            column: column.to_string(),
            total: values.len(),
            missing,
            counts,
        }
    }
}
