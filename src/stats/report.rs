//! Plain-text summary tables printed after each analysis.

use super::{CategoricalSummary, NumericSummary};
use prettytable::{format, Cell, Row, Table};

const RULE_WIDTH: usize = 70;
const TOP_CATEGORIES: usize = 10;

const DISTRIBUTION_HEADERS: [&str; 11] = [
    "Column", "Count", "Mean", "Std", "Min", "25%", "Median", "75%", "Max", "Skew", "Missing %",
];

fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n{title}\n{rule}\n")
}

fn fmt_float(v: f64) -> String {
    if v.is_nan() {
        "-".to_string()
    } else {
        format!("{:.2}", v)
    }
}

/// Thousands separators for counts (`12,345`).
pub fn fmt_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Grid table of numeric distribution statistics. Columns with no values
/// are left out.
pub fn format_distribution_table(summaries: &[NumericSummary]) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_DEFAULT);
    table.set_titles(Row::new(
        DISTRIBUTION_HEADERS
            .iter()
            .map(|h| Cell::new(h).style_spec("b"))
            .collect(),
    ));

    for s in summaries.iter().filter(|s| s.count > 0) {
        let stats = [
            s.mean,
            s.std,
            s.min,
            s.q25,
            s.median,
            s.q75,
            s.max,
            s.skew,
            s.missing_pct,
        ];
        let mut cells = vec![
            Cell::new(&s.column),
            Cell::new(&fmt_count(s.count)).style_spec("r"),
        ];
        cells.extend(stats.iter().map(|v| Cell::new(&fmt_float(*v)).style_spec("r")));
        table.add_row(Row::new(cells));
    }

    let mut out = banner("DISTRIBUTION SUMMARY STATISTICS");
    out.push_str(&table.to_string());
    out
}

/// Top categories, remaining count and missing values per column.
pub fn format_categorical_summary(summaries: &[CategoricalSummary]) -> String {
    let mut out = banner("CATEGORICAL VARIABLES SUMMARY");

    for summary in summaries {
        out.push_str(&format!("\n{}:\n{}\n", summary.column, "-".repeat(40)));

        for entry in summary.counts.iter().take(TOP_CATEGORIES) {
            let pct = if summary.total == 0 {
                0.0
            } else {
                entry.count as f64 / summary.total as f64 * 100.0
            };
            out.push_str(&format!(
                "  {}: {} ({:.1}%)\n",
                entry.label,
                fmt_count(entry.count),
                pct
            ));
        }

        if summary.unique_count() > TOP_CATEGORIES {
            out.push_str(&format!(
                "  ... and {} more categories\n",
                summary.unique_count() - TOP_CATEGORIES
            ));
        }

        if summary.missing > 0 {
            out.push_str(&format!(
                "  Missing values: {} ({:.1}%)\n",
                fmt_count(summary.missing),
                summary.missing_pct()
            ));
        }
    }
    out
}
